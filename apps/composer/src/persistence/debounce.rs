//! Per-key debounced task scheduling.
//!
//! Each key has at most one pending task. Scheduling a key that already has one aborts
//! it (whether still waiting out the quiet window or already running) and starts over,
//! so the last edit wins.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

struct Pending {
    ticket: u64,
    handle: AbortHandle,
}

type PendingMap<K> = Arc<Mutex<HashMap<K, Pending>>>;

pub struct DebounceScheduler<K> {
    delay: Duration,
    pending: PendingMap<K>,
    next_ticket: AtomicU64,
}

impl<K> DebounceScheduler<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `task` once `key` has been quiet for the configured delay.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: K, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let delay = self.delay;
        let pending = Arc::clone(&self.pending);
        let task_key = key.clone();

        // Hold the lock across spawn so the task cannot finish and look for its entry
        // before the entry exists.
        let mut guard = lock(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
            let mut guard = lock(&pending);
            if guard.get(&task_key).map(|p| p.ticket) == Some(ticket) {
                guard.remove(&task_key);
            }
        });

        let replaced = guard.insert(
            key.clone(),
            Pending {
                ticket,
                handle: handle.abort_handle(),
            },
        );
        if let Some(previous) = replaced {
            previous.handle.abort();
            debug!("Debounce restarted for {key:?}");
        }
    }

    /// Aborts every pending task and returns how many there were.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Pending> = lock(&self.pending).drain().map(|(_, p)| p).collect();
        for pending in &drained {
            pending.handle.abort();
        }
        drained.len()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.pending).contains_key(key)
    }
}

impl<K> Drop for DebounceScheduler<K> {
    fn drop(&mut self) {
        let mut guard = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        for (_, pending) in guard.drain() {
            pending.handle.abort();
        }
    }
}

fn lock<K>(pending: &Mutex<HashMap<K, Pending>>) -> MutexGuard<'_, HashMap<K, Pending>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn record(log: &Arc<Mutex<Vec<String>>>, value: &str) -> impl Future<Output = ()> + Send + 'static {
        let log = Arc::clone(log);
        let value = value.to_string();
        async move {
            log.lock().unwrap().push(value);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_quiet_window() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(1000));
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule(1, record(&log, "saved"));
        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(log.lock().unwrap().is_empty());
        assert!(scheduler.is_pending(&1));

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(*log.lock().unwrap(), vec!["saved"]);
        assert!(!scheduler.is_pending(&1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_restarts_timer_and_last_edit_wins() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(1000));
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule(7, record(&log, "draft 1"));
        tokio::time::sleep(Duration::from_millis(600)).await;
        scheduler.schedule(7, record(&log, "draft 2"));
        tokio::time::sleep(Duration::from_millis(600)).await;
        // 1200ms after the first edit, but only 600ms after the second.
        assert!(log.lock().unwrap().is_empty());
        assert!(scheduler.is_pending(&7));

        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(*log.lock().unwrap(), vec!["draft 2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_debounce_independently() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(1000));
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule("a", record(&log, "a"));
        tokio::time::sleep(Duration::from_millis(500)).await;
        scheduler.schedule("b", record(&log, "b"));
        tokio::time::sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert_eq!(*log.lock().unwrap(), vec!["a"]);

        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_drops_pending_tasks() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(1000));
        let runs = Arc::new(AtomicUsize::new(0));

        for key in 0..3 {
            let runs = Arc::clone(&runs);
            scheduler.schedule(key, async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(scheduler.cancel_all(), 3);
        assert_eq!(scheduler.cancel_all(), 0);
        assert!(!scheduler.is_pending(&0));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_tasks() {
        let runs = Arc::new(AtomicUsize::new(0));
        {
            let scheduler = DebounceScheduler::new(Duration::from_millis(100));
            let runs = Arc::clone(&runs);
            scheduler.schedule(1, async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
