//! Membership state machine for direct join / leave / kick requests.
//!
//! ```text
//!   absent --join--> active --captain removes--> kicked
//!                      |                           |
//!                      +--self leave--> absent     +--join--> active
//! ```

use crate::layout::{ABSENCE_MARK, PRESENCE_MARK};
use crate::types::Timestamp;

/// Persisted state of one `(trip, user)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipState {
    /// No row.
    Absent,
    Active,
    /// Row kept for history: `kicked` or `deleted_at` set.
    Kicked,
}

impl MembershipState {
    /// Classify a stored row.
    pub fn of_row(kicked: bool, deleted_at: Option<Timestamp>) -> Self {
        if kicked || deleted_at.is_some() {
            Self::Kicked
        } else {
            Self::Active
        }
    }
}

/// Attendance mark requested for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Present,
    Absent,
}

impl Mark {
    /// Cell text to write.
    pub fn cell_value(self) -> &'static str {
        match self {
            Self::Present => PRESENCE_MARK,
            Self::Absent => ABSENCE_MARK,
        }
    }

    pub fn from_present(present: bool) -> Self {
        if present {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

/// Store operation that realises a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Insert,
    /// Clear `kicked` and `deleted_at`.
    Reactivate,
    /// Set `kicked` and stamp `deleted_at`.
    Kick,
    /// Delete the row.
    Remove,
    Nothing,
}

/// Decide what the store must do for a requested mark.
///
/// Self-leave removes the row outright while a captain removal keeps it as
/// history. A kicked member leaving on their own is removed too.
pub fn transition(state: MembershipState, mark: Mark, by_captain: bool) -> MembershipAction {
    use MembershipAction::*;
    use MembershipState as S;

    match (state, mark) {
        (S::Absent, Mark::Present) => Insert,
        (S::Active, Mark::Present) => Nothing,
        (S::Kicked, Mark::Present) => Reactivate,
        (S::Absent, Mark::Absent) => Nothing,
        (S::Active, Mark::Absent) if by_captain => Kick,
        (S::Kicked, Mark::Absent) if by_captain => Nothing,
        (S::Active | S::Kicked, Mark::Absent) => Remove,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn classify_rows() {
        assert_eq!(MembershipState::of_row(false, None), MembershipState::Active);
        assert_eq!(MembershipState::of_row(true, None), MembershipState::Kicked);
        assert_eq!(
            MembershipState::of_row(false, Some(Utc::now())),
            MembershipState::Kicked
        );
    }

    #[test]
    fn join_from_absent_inserts() {
        assert_eq!(
            transition(MembershipState::Absent, Mark::Present, false),
            MembershipAction::Insert
        );
    }

    #[test]
    fn join_after_kick_reactivates() {
        assert_eq!(
            transition(MembershipState::Kicked, Mark::Present, true),
            MembershipAction::Reactivate
        );
    }

    #[test]
    fn captain_removal_kicks() {
        assert_eq!(
            transition(MembershipState::Active, Mark::Absent, true),
            MembershipAction::Kick
        );
        assert_eq!(
            transition(MembershipState::Kicked, Mark::Absent, true),
            MembershipAction::Nothing
        );
    }

    #[test]
    fn self_leave_removes() {
        assert_eq!(
            transition(MembershipState::Active, Mark::Absent, false),
            MembershipAction::Remove
        );
        assert_eq!(
            transition(MembershipState::Kicked, Mark::Absent, false),
            MembershipAction::Remove
        );
    }

    #[test]
    fn no_ops() {
        assert_eq!(
            transition(MembershipState::Active, Mark::Present, false),
            MembershipAction::Nothing
        );
        assert_eq!(
            transition(MembershipState::Absent, Mark::Absent, true),
            MembershipAction::Nothing
        );
    }

    #[test]
    fn mark_cell_values() {
        assert_eq!(Mark::from_present(true), Mark::Present);
        assert_eq!(Mark::from_present(false), Mark::Absent);
        assert_eq!(Mark::Present.cell_value(), "1");
        assert_eq!(Mark::Absent.cell_value(), "");
    }
}
