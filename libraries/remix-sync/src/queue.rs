//! Per-playlist serialization of rebuild jobs

use crate::error::{Result, SyncError};
use futures_util::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

/// A unit of work bound to one playlist key, run exactly once
pub type RefreshJob<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T>> + Send>;

struct PendingJob<T> {
    job: RefreshJob<T>,
    reply: oneshot::Sender<Result<T>>,
}

type QueueState<T> = Arc<Mutex<HashMap<String, VecDeque<PendingJob<T>>>>>;

/// Runs at most one job per key at a time, in enqueue order.
///
/// A key is present in the map exactly while it is draining; the deque holds
/// the jobs waiting behind the one currently running. Jobs that arrive during
/// a drain join it instead of starting a parallel one.
pub struct PlaylistRefreshQueue<T> {
    state: QueueState<T>,
    job_timeout: Option<Duration>,
}

/// Handle to an enqueued job
pub struct QueuedJob<T> {
    is_owner: bool,
    result: oneshot::Receiver<Result<T>>,
}

impl<T> QueuedJob<T> {
    /// Whether this job started the drain for its key
    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    /// Wait for this job's own result
    pub async fn wait(self) -> Result<T> {
        self.result
            .await
            .unwrap_or_else(|_| Err(SyncError::QueueFault("job dropped before completion".into())))
    }
}

impl<T: Send + 'static> PlaylistRefreshQueue<T> {
    pub fn new(job_timeout: Option<Duration>) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            job_timeout,
        }
    }

    /// Add a job for `key`. The first job for an idle key starts a drain task;
    /// later ones wait behind it.
    ///
    /// The job runs even if the returned handle is dropped.
    pub async fn enqueue(&self, key: impl Into<String>, job: RefreshJob<T>) -> QueuedJob<T> {
        let key = key.into();
        let (reply, result) = oneshot::channel();
        let pending = PendingJob { job, reply };

        let mut state = self.state.lock().await;
        if let Some(waiting) = state.get_mut(&key) {
            waiting.push_back(pending);
            debug!(key = %key, queued = waiting.len(), "Joined running drain");
            return QueuedJob {
                is_owner: false,
                result,
            };
        }

        state.insert(key.clone(), VecDeque::new());
        drop(state);

        debug!(key = %key, "Starting drain");
        tokio::spawn(drain(Arc::clone(&self.state), key, pending, self.job_timeout));

        QueuedJob {
            is_owner: true,
            result,
        }
    }

    /// Keys with a drain in progress
    pub async fn active_keys(&self) -> Vec<String> {
        self.state.lock().await.keys().cloned().collect()
    }

    pub async fn is_idle(&self, key: &str) -> bool {
        !self.state.lock().await.contains_key(key)
    }
}

async fn drain<T>(
    state: QueueState<T>,
    key: String,
    first: PendingJob<T>,
    job_timeout: Option<Duration>,
) {
    let mut current = first;

    loop {
        let PendingJob { job, reply } = current;
        let outcome = run_job(job, job_timeout).await;

        if let Err(e) = &outcome {
            warn!(key = %key, error = %e, "Refresh job failed");
        }

        let next = {
            let mut state = state.lock().await;
            let next = state.get_mut(&key).and_then(VecDeque::pop_front);
            if next.is_none() {
                state.remove(&key);
            }
            next
        };

        // The caller may have stopped listening
        let _ = reply.send(outcome);

        match next {
            Some(job) => current = job,
            None => break,
        }
    }

    debug!(key = %key, "Drain finished");
}

async fn run_job<T>(job: RefreshJob<T>, job_timeout: Option<Duration>) -> Result<T> {
    let guarded = AssertUnwindSafe(async move { job().await }).catch_unwind();

    let outcome = match job_timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Err(SyncError::QueueFault(format!(
                    "timed out after {}s",
                    limit.as_secs()
                )))
            }
        },
        None => guarded.await,
    };

    outcome.unwrap_or_else(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "job panicked".to_string());
        Err(SyncError::QueueFault(message))
    })
}
