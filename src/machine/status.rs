//! Point-in-time view of a machine for diagnostics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Snapshot returned by [`Machine::status`](super::Machine::status).
///
/// Serializable whenever the discriminant is, so hosts can dump it into
/// structured logs or debug overlays. There is no way back from a status to
/// a machine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MachineStatus<S> {
    /// Instance id of the machine
    pub id: Uuid,
    /// Display name of the machine
    pub name: String,
    /// Active discriminant, absent until a state is registered
    pub current: Option<S>,
    /// Discriminant active before the last successful transition
    pub previous: Option<S>,
    /// When the current state became active
    pub entered_at: Option<DateTime<Utc>>,
    /// Number of registered states
    pub states: usize,
    /// Successful transitions so far
    pub transitions: u64,
    /// Ticks dispatched to a unit
    pub ticks: u64,
    /// Fixed ticks dispatched to a unit
    pub fixed_ticks: u64,
    /// Machine-level debug flag
    pub debug: bool,
    /// Whether the awake phase has run
    pub awake: bool,
}

impl<S> MachineStatus<S> {
    /// Time spent in the current state as of `now`.
    ///
    /// Returns `None` when no state is active or the clock went backwards.
    pub fn time_in_state_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.entered_at
            .and_then(|entered| now.signed_duration_since(entered).to_std().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(entered_at: Option<DateTime<Utc>>) -> MachineStatus<&'static str> {
        MachineStatus {
            id: Uuid::new_v4(),
            name: "Guard".to_string(),
            current: Some("Patrol"),
            previous: Some("Idle"),
            entered_at,
            states: 3,
            transitions: 1,
            ticks: 10,
            fixed_ticks: 5,
            debug: false,
            awake: true,
        }
    }

    #[test]
    fn time_in_state_measures_from_entry() {
        let entered = Utc::now();
        let status = status(Some(entered));
        let elapsed = status.time_in_state_at(entered + chrono::Duration::milliseconds(250));
        assert_eq!(elapsed, Some(Duration::from_millis(250)));
    }

    #[test]
    fn time_in_state_is_none_without_entry() {
        assert!(status(None).time_in_state_at(Utc::now()).is_none());
    }

    #[test]
    fn negative_elapsed_is_none() {
        let entered = Utc::now();
        let status = status(Some(entered));
        assert!(status
            .time_in_state_at(entered - chrono::Duration::seconds(1))
            .is_none());
    }

    #[test]
    fn status_serializes_to_json() {
        let status = status(None);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["name"], "Guard");
        assert_eq!(json["current"], "Patrol");
        assert_eq!(json["previous"], "Idle");
        assert_eq!(json["transitions"], 1);
        assert!(json["entered_at"].is_null());
    }
}
