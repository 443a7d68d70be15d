use remix_core::types::{CandidateTrack, MemberId};
use std::collections::HashSet;

/// Round-robin order: each pass over the remaining candidates takes the
/// first remaining track of every contributor, in the order contributors
/// appear. A contributor's own tracks keep their relative order.
pub fn interleave(candidates: Vec<CandidateTrack>) -> Vec<CandidateTrack> {
    let mut output = Vec::with_capacity(candidates.len());
    let mut remaining = candidates;

    while !remaining.is_empty() {
        let mut seen: HashSet<MemberId> = HashSet::new();
        let mut rest = Vec::with_capacity(remaining.len());

        for candidate in remaining {
            if seen.insert(candidate.contributor.clone()) {
                output.push(candidate);
            } else {
                rest.push(candidate);
            }
        }

        remaining = rest;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use remix_core::types::Track;

    fn candidates(contributors: &[&str]) -> Vec<CandidateTrack> {
        contributors
            .iter()
            .enumerate()
            .map(|(i, who)| {
                CandidateTrack::new(
                    Track::new(format!("spotify:track:{i}"), format!("Song {i}"), vec![], ""),
                    MemberId::new(*who),
                )
            })
            .collect()
    }

    fn contributors(tracks: &[CandidateTrack]) -> Vec<&str> {
        tracks.iter().map(|c| c.contributor.as_str()).collect()
    }

    #[test]
    fn test_round_robin_fairness() {
        let result = interleave(candidates(&["1", "1", "3", "3", "2", "1"]));

        assert_eq!(contributors(&result), vec!["1", "3", "2", "1", "3", "1"]);
    }

    #[test]
    fn test_contributor_order_is_preserved() {
        let result = interleave(candidates(&["a", "a", "b", "a", "b"]));

        let a_uris: Vec<&str> = result
            .iter()
            .filter(|c| c.contributor.as_str() == "a")
            .map(|c| c.uri())
            .collect();
        assert_eq!(a_uris, vec!["spotify:track:0", "spotify:track:1", "spotify:track:3"]);
    }

    #[test]
    fn test_single_contributor_unchanged() {
        let input = candidates(&["solo", "solo", "solo", "solo"]);
        let result = interleave(input.clone());

        assert_eq!(result, input);
    }

    #[test]
    fn test_round_order_follows_remaining_list() {
        // Second pass sees b before a
        let result = interleave(candidates(&["a", "b", "b", "a"]));

        assert_eq!(contributors(&result), vec!["a", "b", "b", "a"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(interleave(Vec::new()).is_empty());
    }
}
