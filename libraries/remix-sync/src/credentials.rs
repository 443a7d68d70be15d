//! Deduplicated, retried credential refresh

use crate::error::{Result, SyncError};
use crate::types::CredentialSettings;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use remix_core::types::{Member, MemberId};
use remix_core::{CredentialStore, MusicProvider, ProviderError};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type RefreshResult = Shared<BoxFuture<'static, Option<Member>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RefreshKey {
    Identity(MemberId),
    /// Used when the caller does not know whose credential it holds
    Credential(String),
}

struct InFlight {
    generation: u64,
    result: RefreshResult,
}

type InFlightMap = Arc<Mutex<HashMap<RefreshKey, InFlight>>>;

/// Refreshes member credentials, coalescing concurrent requests for the same
/// member into one exchange with the provider.
///
/// A refresh never fails with an error: exhausting the retries (or not finding
/// the member) resolves to `None` and the caller decides what that means.
pub struct CredentialRefreshCoordinator {
    store: Arc<dyn CredentialStore>,
    provider: Arc<dyn MusicProvider>,
    settings: CredentialSettings,
    in_flight: InFlightMap,
    next_generation: AtomicU64,
}

impl CredentialRefreshCoordinator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        provider: Arc<dyn MusicProvider>,
        settings: CredentialSettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Refresh the credentials of the member identified by `identity`, or by
    /// `access_token` when no identity is known.
    ///
    /// Joins an in-flight refresh for the same member instead of starting
    /// another, whether or not the caller knew the identity.
    pub async fn refresh(&self, access_token: &str, identity: Option<&MemberId>) -> Option<Member> {
        let resolved = match identity {
            Some(id) => Some(id.clone()),
            None => self.resolve_identity(access_token).await,
        };
        let identity = resolved.as_ref();

        let key = match identity {
            Some(id) => RefreshKey::Identity(id.clone()),
            None => RefreshKey::Credential(access_token.to_string()),
        };

        let result = {
            let mut in_flight = self.in_flight.lock().await;

            if let Some(existing) = in_flight.get(&key) {
                debug!(key = ?key, "Joining in-flight credential refresh");
                existing.result.clone()
            } else {
                let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

                // Spawned so the exchange finishes even if every waiter goes away.
                // It cannot release its key before the insert below: that needs
                // the lock we are holding.
                let exchange = tokio::spawn(Self::exchange(
                    Arc::clone(&self.store),
                    Arc::clone(&self.provider),
                    self.settings.clone(),
                    access_token.to_string(),
                    identity.cloned(),
                    Arc::clone(&self.in_flight),
                    key.clone(),
                    generation,
                ));
                let result: RefreshResult = async move { exchange.await.ok().flatten() }
                    .boxed()
                    .shared();

                in_flight.insert(
                    key.clone(),
                    InFlight {
                        generation,
                        result: result.clone(),
                    },
                );

                let map = Arc::clone(&self.in_flight);
                let ttl = self.settings.in_flight_ttl;
                tokio::spawn(async move {
                    tokio::time::sleep(ttl).await;
                    if release(&map, &key, generation).await {
                        warn!(key = ?key, "Credential refresh still pending after TTL, released");
                    }
                });

                result
            }
        };

        result.await
    }

    /// Run `call` with the member's access credential; if the provider rejects
    /// it, refresh once and retry with the new credential.
    ///
    /// `member` is updated in place so later calls use the fresh credential.
    pub async fn with_fresh_credentials<T, F, Fut>(&self, member: &mut Member, call: F) -> Result<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
    {
        match call(member.access_token.clone()).await {
            Err(e) if e.is_unauthorized() => {
                debug!(member_id = %member.id, "Access credential rejected, refreshing");

                let refreshed = self
                    .refresh(&member.access_token, Some(&member.id))
                    .await
                    .ok_or_else(|| {
                        SyncError::Authentication(format!(
                            "could not refresh credentials for {}",
                            member.id
                        ))
                    })?;

                member.access_token = refreshed.access_token;
                member.refresh_token = refreshed.refresh_token;

                Ok(call(member.access_token.clone()).await?)
            }
            other => Ok(other?),
        }
    }

    /// Member id behind an access credential, if the store knows it
    async fn resolve_identity(&self, access_token: &str) -> Option<MemberId> {
        match self.store.find_member_by_access_token(access_token).await {
            Ok(member) => member.map(|m| m.id),
            Err(e) => {
                warn!(error = %e, "Member lookup failed while keying credential refresh");
                None
            }
        }
    }

    /// Number of keys currently marked in flight
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    async fn exchange(
        store: Arc<dyn CredentialStore>,
        provider: Arc<dyn MusicProvider>,
        settings: CredentialSettings,
        access_token: String,
        identity: Option<MemberId>,
        in_flight: InFlightMap,
        key: RefreshKey,
        generation: u64,
    ) -> Option<Member> {
        let result = Self::exchange_inner(
            store.as_ref(),
            provider.as_ref(),
            &settings,
            &access_token,
            identity.as_ref(),
        )
        .await;
        release(&in_flight, &key, generation).await;
        result
    }

    async fn exchange_inner(
        store: &dyn CredentialStore,
        provider: &dyn MusicProvider,
        settings: &CredentialSettings,
        access_token: &str,
        identity: Option<&MemberId>,
    ) -> Option<Member> {
        let lookup = match identity {
            Some(id) => store.find_member_by_id(id).await,
            None => store.find_member_by_access_token(access_token).await,
        };

        let mut member = match lookup {
            Ok(Some(member)) => member,
            Ok(None) => {
                warn!(identity = ?identity, "No member for credential refresh");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Member lookup failed during credential refresh");
                return None;
            }
        };

        let attempts = settings.max_attempts.max(1);
        for attempt in 1..=attempts {
            match provider.refresh_access_credential(&member.refresh_token).await {
                Ok(credentials) => {
                    member.apply_credentials(credentials);
                    return match store.upsert_member(&member).await {
                        Ok(saved) => {
                            info!(member_id = %saved.id, attempt, "Refreshed member credentials");
                            Some(saved)
                        }
                        Err(e) => {
                            warn!(member_id = %member.id, error = %e, "Failed to persist refreshed credentials");
                            None
                        }
                    };
                }
                Err(e) => {
                    warn!(member_id = %member.id, attempt, error = %e, "Credential exchange failed");
                    if attempt < attempts {
                        tokio::time::sleep(settings.retry_backoff * attempt).await;
                    }
                }
            }
        }

        warn!(member_id = %member.id, attempts, "Giving up on credential refresh");
        None
    }
}

/// Remove `key` if it still belongs to `generation`; a newer refresh under the
/// same key is left alone.
async fn release(map: &InFlightMap, key: &RefreshKey, generation: u64) -> bool {
    let mut in_flight = map.lock().await;
    if in_flight.get(key).is_some_and(|entry| entry.generation == generation) {
        in_flight.remove(key);
        true
    } else {
        false
    }
}
