//! Integration tests for the credit pool under thread contention.
//!
//! These tests verify that acquisitions and refreshes from many threads are
//! applied as whole operations, with no lost updates.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

use shopify_gateway::{AdmissionController, CreditPool, UsageReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Acquire(bool),
    Refresh(i64, i64),
}

/// Records the order in which operations reach the pool.
///
/// Each operation takes the log lock around the pool call, so the log order
/// is the order the pool applied them in.
struct SequencedPool {
    pool: CreditPool,
    log: Mutex<Vec<(Op, i64)>>,
}

impl SequencedPool {
    fn try_acquire(&self) -> bool {
        let mut log = self.log.lock().unwrap();
        let acquired = self.pool.try_acquire();
        log.push((Op::Acquire(acquired), self.pool.credits_remaining()));
        acquired
    }

    fn refresh(&self, used: i64, total: i64) {
        let mut log = self.log.lock().unwrap();
        self.pool.refresh(used, total);
        log.push((Op::Refresh(used, total), self.pool.credits_remaining()));
    }
}

#[test]
fn test_fifty_callers_get_exactly_thirty_four_credits() {
    for _ in 0..10 {
        let pool = Arc::new(CreditPool::new(40, 5));
        let barrier = Arc::new(Barrier::new(50));
        let successes = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let barrier = Arc::clone(&barrier);
                let successes = Arc::clone(&successes);
                std::thread::spawn(move || {
                    barrier.wait();
                    if pool.try_acquire() {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(successes.load(Ordering::SeqCst), 34);
        assert_eq!(pool.credits_remaining(), 5);
    }
}

#[test]
fn test_interleaved_operations_match_a_serial_replay() {
    let sequenced = SequencedPool {
        pool: CreditPool::new(40, 5),
        log: Mutex::new(Vec::new()),
    };
    let barrier = Barrier::new(24);

    std::thread::scope(|scope| {
        for _ in 0..16 {
            scope.spawn(|| {
                barrier.wait();
                for _ in 0..10 {
                    sequenced.try_acquire();
                }
            });
        }
        for i in 0..8_i64 {
            let sequenced = &sequenced;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                for round in 0..5 {
                    sequenced.refresh(i + round, 40);
                }
            });
        }
    });

    let log = sequenced.log.into_inner().unwrap();
    assert_eq!(log.len(), 16 * 10 + 8 * 5);

    // Replaying the log on a plain counter must reproduce every observation.
    let mut model: i64 = 40;
    for (op, observed) in &log {
        match *op {
            Op::Acquire(acquired) => {
                assert_eq!(acquired, model > 5, "log = {log:?}");
                if acquired {
                    model -= 1;
                }
            }
            Op::Refresh(used, total) => model = total - used,
        }
        assert_eq!(*observed, model);
    }
    assert_eq!(sequenced.pool.credits_remaining(), model);
}

#[test]
fn test_refresh_from_report_after_contention() {
    let pool = CreditPool::new(40, 5);
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| while pool.try_acquire() {});
        }
    });
    assert_eq!(pool.credits_remaining(), 5);

    pool.refresh_from(UsageReport::parse(Some("12/40")));
    assert_eq!(pool.credits_remaining(), 28);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_waiters_on_other_threads_are_released_by_refresh() {
    let pool = Arc::new(CreditPool::new(40, 5));
    pool.refresh(40, 40);
    let controller = AdmissionController::new(Arc::clone(&pool), Duration::from_millis(20));

    let waiters: Vec<_> = (0..10)
        .map(|_| {
            let controller = controller.clone();
            tokio::spawn(async move { controller.wait_for_credit().await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(waiters.iter().all(|waiter| !waiter.is_finished()));

    pool.refresh(25, 40);
    for waiter in waiters {
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
    }
    assert_eq!(pool.credits_remaining(), 5);
}
