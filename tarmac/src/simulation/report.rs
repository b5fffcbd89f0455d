use crate::flight::FlightOutcome;
use crate::sync::{Transition, TransitionKind};

use std::time::Duration;

/// Summary of a finished simulation.
#[derive(Clone, Debug)]
pub struct Report {
    /// Outcome of each flight, in spawn order.
    pub(super) outcomes: Vec<(String, FlightOutcome)>,

    /// The runway journal.
    pub(super) transitions: Vec<Transition>,

    /// Time between the first spawn and the latch opening.
    pub(super) elapsed: Duration,
}

impl Report {
    /// Outcome of each flight, in spawn order.
    pub fn outcomes(&self) -> &[(String, FlightOutcome)] {
        &self.outcomes
    }

    /// Every grant and release, in the order they happened.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of flights that completed their hold.
    pub fn landed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FlightOutcome::Landed { .. }))
    }

    /// Number of flights whose hold was cut short.
    pub fn interrupted(&self) -> usize {
        self.count(|outcome| matches!(outcome, FlightOutcome::Interrupted { .. }))
    }

    /// Number of flights cancelled before they got the runway.
    pub fn diverted(&self) -> usize {
        self.count(|outcome| matches!(outcome, FlightOutcome::Diverted))
    }

    /// Number of grants in the journal.
    pub fn grants(&self) -> usize {
        self.kind(TransitionKind::Granted)
    }

    /// Number of releases in the journal.
    pub fn releases(&self) -> usize {
        self.kind(TransitionKind::Released)
    }

    /// Returns `true` if the journal is a sequence of grant/release pairs
    /// for the same flight, with no two grants in a row.
    pub fn alternates(&self) -> bool {
        let mut holder: Option<&str> = None;

        for transition in &self.transitions {
            match (transition.kind, holder) {
                (TransitionKind::Granted, None) => holder = Some(transition.flight.as_str()),
                (TransitionKind::Released, Some(flight)) if flight == transition.flight => {
                    holder = None
                }
                _ => return false,
            }
        }

        holder.is_none()
    }

    fn count(&self, predicate: impl Fn(&FlightOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }

    fn kind(&self, kind: TransitionKind) -> usize {
        self.transitions
            .iter()
            .filter(|transition| transition.kind == kind)
            .count()
    }
}
