//! Session-0 snapshot availability state machine.
//!
//! A session-0 snapshot records a character's state before the campaign's
//! first recorded session. The capture window closes implicitly the moment
//! any session note exists; there is no persisted "locked" flag. The gate
//! is re-evaluated from two facts on every request.

use serde::Serialize;

/// Availability of a session-0 snapshot for one (campaign, character) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Session0State {
    /// No snapshot yet and no session history: capture is allowed.
    Capturable,
    /// A snapshot exists. Retrievable indefinitely, regardless of later
    /// session history; re-capture returns the stored data.
    Captured,
    /// No snapshot was taken and session history exists. The window has
    /// passed permanently.
    WindowClosed,
}

/// Shown to users when the capture window has passed. A reason string,
/// not an error code: the gate's answer is displayed directly.
pub const WINDOW_CLOSED_REASON: &str = "No Session 0 snapshot was captured before the campaign \
     began. The window to save the pre-campaign character state has passed.";

/// Shown when an existing snapshot makes session-0 data retrievable.
pub const CAPTURED_REASON: &str = "Session 0 snapshot is saved and available.";

/// Evaluate the gate from its two inputs.
///
/// An existing snapshot always wins: session history accrued after capture
/// never revokes access to the stored state.
pub fn session0_state(has_snapshot: bool, has_session_notes: bool) -> Session0State {
    if has_snapshot {
        Session0State::Captured
    } else if has_session_notes {
        Session0State::WindowClosed
    } else {
        Session0State::Capturable
    }
}

impl Session0State {
    /// Whether a session-0 export may proceed in this state.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Capturable | Self::Captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_campaign_is_capturable() {
        assert_eq!(session0_state(false, false), Session0State::Capturable);
    }

    #[test]
    fn snapshot_without_history_is_captured() {
        assert_eq!(session0_state(true, false), Session0State::Captured);
    }

    #[test]
    fn snapshot_survives_later_history() {
        assert_eq!(session0_state(true, true), Session0State::Captured);
    }

    #[test]
    fn history_without_snapshot_closes_window() {
        assert_eq!(session0_state(false, true), Session0State::WindowClosed);
    }

    #[test]
    fn availability_per_state() {
        assert!(Session0State::Capturable.is_available());
        assert!(Session0State::Captured.is_available());
        assert!(!Session0State::WindowClosed.is_available());
    }
}
