use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

/// Which party of a mission may request a given transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionActor {
    ProviderOnly,
    EitherParty,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Pending => "PENDING",
            MissionStatus::Accepted => "ACCEPTED",
            MissionStatus::InProgress => "IN_PROGRESS",
            MissionStatus::Completed => "COMPLETED",
            MissionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(MissionStatus::Pending),
            "ACCEPTED" => Some(MissionStatus::Accepted),
            "IN_PROGRESS" => Some(MissionStatus::InProgress),
            "COMPLETED" => Some(MissionStatus::Completed),
            "CANCELLED" => Some(MissionStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Cancelled)
    }

    /// The transition table of the lifecycle engine. Transitions absent from
    /// this table are invalid for every actor; `accept` (PENDING -> ACCEPTED)
    /// has its own operation and is deliberately not listed here.
    pub fn transition_actor(from: MissionStatus, to: MissionStatus) -> Option<TransitionActor> {
        match (from, to) {
            (MissionStatus::Accepted, MissionStatus::InProgress) => {
                Some(TransitionActor::ProviderOnly)
            }
            (MissionStatus::InProgress, MissionStatus::Completed) => {
                Some(TransitionActor::ProviderOnly)
            }
            (
                MissionStatus::Pending | MissionStatus::Accepted | MissionStatus::InProgress,
                MissionStatus::Cancelled,
            ) => Some(TransitionActor::EitherParty),
            _ => None,
        }
    }
}

impl Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MissionStatus; 5] = [
        MissionStatus::Pending,
        MissionStatus::Accepted,
        MissionStatus::InProgress,
        MissionStatus::Completed,
        MissionStatus::Cancelled,
    ];

    #[test]
    fn status_round_trips_through_str() {
        for status in ALL {
            assert_eq!(MissionStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn forward_transitions_are_provider_only() {
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::Accepted, MissionStatus::InProgress),
            Some(TransitionActor::ProviderOnly)
        );
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::InProgress, MissionStatus::Completed),
            Some(TransitionActor::ProviderOnly)
        );
    }

    #[test]
    fn cancellation_is_open_to_either_party_before_completion() {
        for from in [
            MissionStatus::Pending,
            MissionStatus::Accepted,
            MissionStatus::InProgress,
        ] {
            assert_eq!(
                MissionStatus::transition_actor(from, MissionStatus::Cancelled),
                Some(TransitionActor::EitherParty)
            );
        }
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::Completed, MissionStatus::Cancelled),
            None
        );
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::Cancelled, MissionStatus::Cancelled),
            None
        );
    }

    #[test]
    fn backward_and_skipping_transitions_are_rejected() {
        // The table only models the forward path; everything else is denied.
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::Pending, MissionStatus::Completed),
            None
        );
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::Completed, MissionStatus::InProgress),
            None
        );
        assert_eq!(
            MissionStatus::transition_actor(MissionStatus::InProgress, MissionStatus::Accepted),
            None
        );
        for status in ALL {
            assert_eq!(MissionStatus::transition_actor(status, status), None);
        }
    }

    #[test]
    fn terminal_states() {
        assert!(MissionStatus::Completed.is_terminal());
        assert!(MissionStatus::Cancelled.is_terminal());
        assert!(!MissionStatus::Pending.is_terminal());
        assert!(!MissionStatus::Accepted.is_terminal());
        assert!(!MissionStatus::InProgress.is_terminal());
    }
}
