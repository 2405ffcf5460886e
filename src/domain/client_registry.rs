//! Per-client admission control with idle eviction.
//!
//! [`ClientRegistry`] owns one [`TokenBucket`] per client identity. Entries are
//! created lazily on the first request and reclaimed by [`run_client_sweeper`]
//! once they have been idle for longer than the configured timeout; there is no
//! disconnect signal, so the sweep is the only thing that frees client state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::clock::Clock;
use crate::domain::token_bucket::{RateLimitPolicy, TokenBucket};

/// Default idle window after which a client is forgotten.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Default period of the background sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Rate limiting state tracked for a single client.
#[derive(Debug)]
struct ClientState {
    limiter: TokenBucket,
    last_seen: Instant,
}

/// Registry of per-client token buckets.
///
/// A single mutex guards the whole map. It is held only for the lookup/insert
/// and the token decision, never across I/O, and is shared by [`admit`] and
/// [`sweep`] so at most one bucket exists per identity.
///
/// [`admit`]: ClientRegistry::admit
/// [`sweep`]: ClientRegistry::sweep
#[derive(Debug)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<String, ClientState>>,
    policy: RateLimitPolicy,
    idle_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl ClientRegistry {
    pub fn new(policy: RateLimitPolicy, idle_timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            policy,
            idle_timeout,
            clock,
        }
    }

    /// Decides whether `identity` may issue a request right now.
    ///
    /// Unknown identities get a fresh, full bucket. Every call refreshes the
    /// client's last-seen time, admitted or not.
    pub fn admit(&self, identity: &str) -> bool {
        let mut clients = self.lock();
        // Read under the lock so concurrent callers observe non-decreasing times.
        let now = self.clock.now();

        let state = clients
            .entry(identity.to_owned())
            .or_insert_with(|| ClientState {
                limiter: TokenBucket::new(self.policy, now),
                last_seen: now,
            });

        state.last_seen = state.last_seen.max(now);
        state.limiter.try_acquire(now)
    }

    /// Removes clients idle for longer than the timeout and returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let mut clients = self.lock();
        let now = self.clock.now();
        let before = clients.len();

        clients.retain(|_, state| {
            now.saturating_duration_since(state.last_seen) <= self.idle_timeout
        });

        before - clients.len()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientState>> {
        // Nothing inside the critical section can leave the map half-updated.
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Periodically evicts idle clients from `registry`.
///
/// Runs until the task is dropped or aborted. The first sweep happens one full
/// `interval` after start.
pub async fn run_client_sweeper(registry: Arc<ClientRegistry>, interval: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let evicted = registry.sweep();
        if evicted > 0 {
            metrics::counter!("clients_evicted_total").increment(evicted as u64);
            debug!(
                evicted,
                remaining = registry.tracked_clients(),
                "Evicted idle rate-limit clients"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::mpsc;

    fn registry_with_clock() -> (Arc<ClientRegistry>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let registry = Arc::new(ClientRegistry::new(
            RateLimitPolicy::default(),
            DEFAULT_IDLE_TIMEOUT,
            clock.clone(),
        ));
        (registry, clock)
    }

    #[test]
    fn test_five_rapid_requests() {
        let (registry, _clock) = registry_with_clock();

        let results: Vec<bool> = (0..5).map(|_| registry.admit("10.0.0.1")).collect();

        assert_eq!(results, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_clients_are_isolated() {
        let (registry, _clock) = registry_with_clock();

        for _ in 0..4 {
            assert!(registry.admit("10.0.0.1"));
        }
        assert!(!registry.admit("10.0.0.1"));

        assert!(registry.admit("10.0.0.2"));
        assert_eq!(registry.tracked_clients(), 2);
    }

    #[test]
    fn test_slow_client_always_admitted() {
        let (registry, clock) = registry_with_clock();

        for _ in 0..50 {
            assert!(registry.admit("slow"));
            clock.advance(Duration::from_millis(500));
        }
    }

    #[test]
    fn test_sweep_evicts_only_idle_clients() {
        let (registry, clock) = registry_with_clock();

        registry.admit("idle");
        clock.advance(Duration::from_secs(120));
        registry.admit("active");
        clock.advance(Duration::from_secs(61));

        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.tracked_clients(), 1);
    }

    #[test]
    fn test_client_at_exact_timeout_is_kept() {
        let (registry, clock) = registry_with_clock();

        registry.admit("edge");
        clock.advance(DEFAULT_IDLE_TIMEOUT);

        assert_eq!(registry.sweep(), 0);
        assert_eq!(registry.tracked_clients(), 1);
    }

    #[test]
    fn test_evicted_client_returns_with_full_burst() {
        let (registry, clock) = registry_with_clock();

        for _ in 0..4 {
            registry.admit("returning");
        }
        assert!(!registry.admit("returning"));

        clock.advance(Duration::from_secs(181));
        assert_eq!(registry.sweep(), 1);

        let results: Vec<bool> = (0..5).map(|_| registry.admit("returning")).collect();
        assert_eq!(results, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_denied_request_still_refreshes_last_seen() {
        let clock = Arc::new(ManualClock::new());
        let registry = ClientRegistry::new(
            RateLimitPolicy {
                per_second: 0.001,
                burst: 1,
            },
            DEFAULT_IDLE_TIMEOUT,
            clock.clone(),
        );

        assert!(registry.admit("noisy"));
        clock.advance(Duration::from_secs(170));
        assert!(!registry.admit("noisy"));
        clock.advance(Duration::from_secs(170));

        assert_eq!(registry.sweep(), 0);
    }

    #[test]
    fn test_concurrent_admissions_share_one_bucket() {
        let (registry, _clock) = registry_with_clock();

        let admitted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let registry = &registry;
                    scope.spawn(move || (0..4).filter(|_| registry.admit("shared")).count())
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(admitted, 4);
        assert_eq!(registry.tracked_clients(), 1);
    }

    /// Parks the first `now()` call until released, after capturing its instant.
    #[derive(Debug)]
    struct GatedClock {
        inner: ManualClock,
        gate: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
    }

    impl Clock for GatedClock {
        fn now(&self) -> Instant {
            let gate = self.gate.lock().unwrap().take();
            let now = self.inner.now();
            if let Some((captured, release)) = gate {
                captured.send(()).unwrap();
                release.recv().unwrap();
            }
            now
        }
    }

    #[test]
    fn test_last_seen_never_moves_backwards() {
        let (captured_tx, captured_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let clock = Arc::new(GatedClock {
            inner: ManualClock::new(),
            gate: Mutex::new(Some((captured_tx, release_rx))),
        });
        let registry = ClientRegistry::new(
            RateLimitPolicy::default(),
            DEFAULT_IDLE_TIMEOUT,
            clock.clone(),
        );

        std::thread::scope(|scope| {
            let registry = &registry;
            let early = scope.spawn(move || registry.admit("racer"));
            captured_rx.recv().unwrap();

            clock.inner.advance(Duration::from_secs(10));
            let late = scope.spawn(move || registry.admit("racer"));

            // Give the later call a chance to finish first.
            std::thread::sleep(Duration::from_millis(50));
            release_tx.send(()).unwrap();

            assert!(early.join().unwrap());
            assert!(late.join().unwrap());
        });

        // Idle for 175s since the later request, 185s since the earlier one.
        clock.inner.advance(Duration::from_secs(175));
        assert_eq!(registry.sweep(), 0);
        assert_eq!(registry.tracked_clients(), 1);
    }

    #[tokio::test]
    async fn test_sweeper_task_evicts_idle_clients() {
        let clock = Arc::new(ManualClock::new());
        let registry = Arc::new(ClientRegistry::new(
            RateLimitPolicy::default(),
            Duration::from_secs(180),
            clock.clone(),
        ));

        registry.admit("one-shot");
        clock.advance(Duration::from_secs(200));

        let handle = tokio::spawn(run_client_sweeper(
            registry.clone(),
            Duration::from_millis(10),
        ));

        for _ in 0..100 {
            if registry.tracked_clients() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(registry.tracked_clients(), 0);
    }
}
