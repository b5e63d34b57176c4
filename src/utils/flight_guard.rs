use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// At most one reconciliation may be in flight per member per calendar day;
/// a second scan for the same pair waits for the first to finish instead of
/// racing it to a double time-in.
pub struct FlightGuard {
    inflight: Mutex<HashMap<(String, NaiveDate), Arc<AsyncMutex<()>>>>,
}

impl FlightGuard {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Take the slot for `(member_id, date)`, waiting out any reconciliation
    /// already in flight for the same pair. The slot is held until the
    /// returned guard drops.
    pub async fn acquire(&self, member_id: &str, date: NaiveDate) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inflight.lock().expect("flight map poisoned");

            // slots nobody holds or waits on anymore can go
            map.retain(|_, slot| Arc::strong_count(slot) > 1);

            map.entry((member_id.to_string(), date))
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[tokio::test]
    async fn same_key_waits_for_release() {
        let guard = Arc::new(FlightGuard::new());
        let held = guard.acquire("4821", day()).await;

        let entered = Arc::new(AtomicBool::new(false));
        let entered_clone = Arc::clone(&entered);
        let guard_clone = Arc::clone(&guard);

        let waiter = tokio::spawn(async move {
            let _slot = guard_clone.acquire("4821", day()).await;
            entered_clone.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!entered.load(Ordering::SeqCst));

        drop(held);
        waiter.await.unwrap();
        assert!(entered.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let guard = FlightGuard::new();
        let _a = guard.acquire("4821", day()).await;
        // completes without waiting on the other member's slot
        let _b = guard.acquire("4822", day()).await;
    }

    #[tokio::test]
    async fn released_slots_are_pruned() {
        let guard = FlightGuard::new();
        {
            let _slot = guard.acquire("4821", day()).await;
        }

        // next acquire sweeps the released entry
        let _other = guard.acquire("4822", day()).await;

        let map = guard.inflight.lock().unwrap();
        assert!(!map.contains_key(&("4821".to_string(), day())));
    }
}
