//! Operations exposed to the HTTP layer

mod common;

use common::*;
use remix_core::types::*;
use remix_sync::{PlaylistService, SubscribeOutcome, SyncError, SyncSettings};
use std::sync::Arc;

fn service(store: &Arc<FakeStore>, provider: &Arc<FakeProvider>) -> PlaylistService {
    PlaylistService::new(store.clone(), provider.clone(), SyncSettings::default())
}

#[tokio::test]
async fn test_refresh_playlist_returns_report() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");
    provider.accept(&["alice"]);
    provider.set_top("alice", vec![track("t1", "A")]);
    let playlist = store.add_playlist("pl", "alice", &[]);

    let service = service(&store, &provider);
    let report = service.refresh_playlist(&playlist).await.unwrap().unwrap();

    assert_eq!(report.inserted.len(), 1);
    assert!(service.queue().is_idle("pl").await);
}

#[tokio::test]
async fn test_refresh_unknown_playlist_is_none() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();

    let result = service(&store, &provider)
        .refresh_playlist(&PlaylistId::new("ghost"))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_create_playlist_stores_owner_and_queues_rebuild() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");
    provider.accept(&["alice"]);
    provider.set_top("alice", vec![track("t1", "A")]);

    let service = service(&store, &provider);
    let playlist = service.create_playlist("alice-access").await.unwrap();

    assert_eq!(playlist.id, PlaylistId::new("alice-remix"));
    assert_eq!(playlist.owner.id, MemberId::new("alice"));
    assert_eq!(playlist.members.len(), 1);
    assert!(store.member("alice").owns(&playlist.id));

    // Waiting on a follow-up rebuild also waits out the initial one
    service.refresh_playlist(&playlist.id).await.unwrap();
    assert!(provider.calls().contains(&"create:alice".to_string()));
    assert_eq!(store.history(&playlist.id).len(), 1);
}

#[tokio::test]
async fn test_unknown_credential_is_authentication_error() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();

    let result = service(&store, &provider).create_playlist("who-is-this").await;

    assert!(matches!(result, Err(SyncError::Authentication(_))));
}

#[tokio::test]
async fn test_subscribe_follows_and_joins() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");
    store.add_member("bob");
    provider.accept(&["alice", "bob"]);
    let playlist = store.add_playlist("pl", "alice", &[]);

    let service = service(&store, &provider);
    let outcome = service.subscribe_to_playlist("bob-access", &playlist).await.unwrap();

    match outcome {
        SubscribeOutcome::Subscribed(playlist) => {
            let ids: Vec<&str> = playlist.members.iter().map(|m| m.id.as_str()).collect();
            assert_eq!(ids, vec!["alice", "bob"]);
        }
        SubscribeOutcome::AlreadyMember => panic!("Expected a new subscription"),
    }
    assert!(provider.calls().contains(&"follow:pl".to_string()));

    let again = service.subscribe_to_playlist("bob-access", &playlist).await.unwrap();
    assert!(matches!(again, SubscribeOutcome::AlreadyMember));
}

#[tokio::test]
async fn test_subscribe_to_unknown_playlist() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("bob");

    let result = service(&store, &provider)
        .subscribe_to_playlist("bob-access", &PlaylistId::new("ghost"))
        .await;

    assert!(matches!(result, Err(SyncError::NotFound { .. })));
}

#[tokio::test]
async fn test_remove_only_owned_playlists() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");
    store.add_member("bob");
    let mine = store.add_playlist("mine", "alice", &["bob"]);
    let theirs = store.add_playlist("theirs", "bob", &["alice"]);

    let removed = service(&store, &provider)
        .remove_playlists("alice-access", &[mine.clone(), theirs.clone()])
        .await
        .unwrap();

    assert_eq!(removed, vec![mine]);
    assert!(store.member("bob").owns(&theirs));
}

#[tokio::test]
async fn test_history_of_unknown_playlist_is_not_found() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();

    let result = service(&store, &provider)
        .playlist_history(&PlaylistId::new("ghost"))
        .await;

    assert!(matches!(result, Err(SyncError::NotFound { .. })));
}

#[tokio::test]
async fn test_list_playlists_categorises_against_remote() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");
    store.add_member("bob");
    provider.accept(&["alice"]);
    store.add_playlist("owned", "alice", &[]);
    store.add_playlist("gone", "alice", &[]);
    store.add_playlist("joined", "bob", &["alice"]);
    provider.set_remote_listing("alice", &["owned", "joined", "unmanaged"]);

    let overview = service(&store, &provider)
        .list_playlists("alice-access")
        .await
        .unwrap();

    assert_eq!(overview.owned, vec![PlaylistId::new("owned")]);
    assert_eq!(overview.subscribed, vec![PlaylistId::new("joined")]);
    assert_eq!(overview.orphaned, vec![PlaylistId::new("gone")]);
}

#[tokio::test]
async fn test_refresh_member_credentials() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");

    let service = service(&store, &provider);
    let member = service
        .refresh_member_credentials("alice-access", Some(&MemberId::new("alice")))
        .await
        .unwrap();
    assert_eq!(member.access_token, "alice-access-1");

    let unknown = service.refresh_member_credentials("nobody", None).await;
    assert!(matches!(unknown, Err(SyncError::Authentication(_))));
}

#[tokio::test]
async fn test_refresh_all_counts_outcomes() {
    let store = FakeStore::new();
    let provider = FakeProvider::new();
    store.add_member("alice");
    store.add_member("bob");
    provider.accept(&["alice"]);
    provider.set_top("alice", vec![track("t1", "A")]);
    store.add_playlist("good", "alice", &[]);
    store.add_playlist("broken", "bob", &[]);
    // bob's credential is rejected and cannot be refreshed
    provider.fail_refreshes(100);

    let summary = service(&store, &provider).refresh_all_playlists().await.unwrap();

    assert_eq!(summary.refreshed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
}
