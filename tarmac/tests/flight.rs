use tarmac::flight::{Flight, FlightOutcome, HoldTime, UniformHold};
use tarmac::sync::{CountDownLatch, Runway};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_single_flight_lands_without_blocking() {
    let runway = Runway::new();
    let latch = CountDownLatch::new(1);

    let flight = Flight::new("Flight-0", runway.clone(), latch.clone())
        .hold_time(|| Duration::from_millis(5));
    assert_eq!(flight.id(), "Flight-0");

    let started = Instant::now();
    let outcome = flight.run();

    assert_eq!(
        outcome,
        FlightOutcome::Landed {
            hold: Duration::from_millis(5)
        }
    );
    assert!(outcome.is_landed());
    assert!(started.elapsed() < Duration::from_secs(1));

    assert!(runway.is_free());
    assert_eq!((runway.grants(), runway.releases()), (1, 1));
    assert_eq!(latch.count(), 0);
    latch.wait();
}

#[test]
fn test_hold_time_is_drawn_once_per_grant() {
    let runway = Runway::new();
    let latch = CountDownLatch::new(1);
    let draws = Arc::new(AtomicUsize::new(0));

    let counter = draws.clone();
    let flight = Flight::new("Flight-0", runway, latch).hold_time(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Duration::ZERO
    });

    assert!(flight.run().is_landed());
    assert_eq!(draws.load(Ordering::SeqCst), 1);
}

#[test]
fn test_flights_take_turns_on_the_runway() {
    let runway = Runway::new();
    let latch = CountDownLatch::new(3);
    let hold = Duration::from_millis(20);

    let started = Instant::now();
    let handles: Vec<_> = (0..3)
        .map(|i| {
            let flight = Flight::new(format!("Flight-{i}"), runway.clone(), latch.clone())
                .hold_time(move || hold);
            thread::spawn(move || flight.run())
        })
        .collect();

    latch.wait();

    for handle in handles {
        assert!(handle.join().unwrap().is_landed());
    }

    // Holds are serialized by the runway.
    assert!(started.elapsed() >= hold * 3);
    assert_eq!(runway.grants(), 3);
    assert!(runway.is_free());
}

#[test]
fn test_panicking_hold_source_still_releases_and_signals() {
    let runway = Runway::new();
    let latch = CountDownLatch::new(1);

    let flight = Flight::new("Flight-0", runway.clone(), latch.clone())
        .hold_time(|| -> Duration { panic!("instrument failure") });

    let handle = thread::spawn(move || flight.run());

    assert!(handle.join().is_err());
    assert!(runway.is_free());
    assert_eq!(runway.releases(), 1);
    assert_eq!(latch.count(), 0);
}

#[test]
fn test_uniform_hold_stays_in_range() {
    let hold = UniformHold::new(Duration::from_millis(5000));
    assert_eq!(hold.upper(), Duration::from_millis(5000));

    for _ in 0..1000 {
        assert!(hold.next_hold() < Duration::from_millis(5000));
    }
}

#[test]
fn test_uniform_hold_empty_range_is_zero() {
    let hold = UniformHold::new(Duration::ZERO);
    assert_eq!(hold.next_hold(), Duration::ZERO);
}

#[test]
fn test_outcome_helpers() {
    let hold = Duration::from_millis(1);

    assert!(FlightOutcome::Landed { hold }.was_granted());
    assert!(FlightOutcome::Interrupted { hold }.was_granted());
    assert!(!FlightOutcome::Interrupted { hold }.is_landed());
    assert!(!FlightOutcome::Diverted.was_granted());
}
