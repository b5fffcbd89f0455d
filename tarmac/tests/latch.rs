use tarmac::sync::CountDownLatch;

use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_latch_opens_after_all_signals() {
    let latch = CountDownLatch::new(4);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let latch = latch.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(5 * i));
                latch.count_down();
            })
        })
        .collect();

    latch.wait();
    assert_eq!(latch.count(), 0);

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_latch_wait_timeout_expires_while_pending() {
    let latch = CountDownLatch::new(2);
    latch.count_down();

    let started = Instant::now();
    assert!(!latch.wait_timeout(Duration::from_millis(30)));
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(latch.count(), 1);
}

#[test]
fn test_latch_wait_timeout_returns_when_opened() {
    let latch = CountDownLatch::new(1);

    let signaller = {
        let latch = latch.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            latch.count_down();
        })
    };

    assert!(latch.wait_timeout(Duration::from_secs(5)));
    signaller.join().unwrap();
}

#[test]
fn test_latch_ignores_extra_signals() {
    let latch = CountDownLatch::new(1);

    latch.count_down();
    latch.count_down();

    assert_eq!(latch.count(), 0);
    assert!(latch.wait_timeout(Duration::ZERO));
}

#[test]
fn test_zero_latch_is_open() {
    let latch = CountDownLatch::new(0);

    latch.wait();
    assert!(latch.wait_timeout(Duration::ZERO));
}

#[test]
fn test_signal_on_drop_counts_down_once() {
    let latch = CountDownLatch::new(2);

    {
        let _signal = latch.signal_on_drop();
        assert_eq!(latch.count(), 2);
    }

    assert_eq!(latch.count(), 1);
}

#[test]
fn test_signal_on_drop_fires_on_panic() {
    let latch = CountDownLatch::new(1);

    let worker = {
        let latch = latch.clone();
        thread::spawn(move || {
            let _signal = latch.signal_on_drop();
            panic!("flight crashed");
        })
    };

    assert!(worker.join().is_err());
    assert_eq!(latch.count(), 0);
}
