//! Conversation flow state machine
//!
//! One tagged enum per chat: the scratch data a step needs lives inside its
//! variant, so a step cannot observe data it has no business seeing. A static
//! transition table defines which event kinds a state accepts and where they
//! lead; an event a state does not accept re-prompts in place with no
//! transition.

use serde::{Deserialize, Serialize};

use crate::utils::errors::{FleetCheckError, Result};

/// The kind of inbound event, as far as routing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Free-text message.
    Text,
    /// Photo message.
    Photo,
    /// Inline button press.
    Choice,
}

/// State tags without scratch data, used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    AwaitingSearch,
    AwaitingChoice,
    AwaitingPhotoOne,
    AwaitingPhotoTwo,
    AwaitingPlateNumber,
}

/// `(state, accepted event) -> next state` for every legal transition.
/// Self-loops (re-prompt without leaving the state) are legal too:
/// `AwaitingSearch` loops on short queries and empty results.
const TRANSITIONS: &[(FlowState, EventKind, FlowState)] = &[
    (FlowState::AwaitingSearch, EventKind::Text, FlowState::AwaitingSearch),
    (FlowState::AwaitingSearch, EventKind::Text, FlowState::AwaitingChoice),
    (FlowState::AwaitingChoice, EventKind::Choice, FlowState::AwaitingPhotoOne),
    // Conflict on claim sends the user back to search
    (FlowState::AwaitingChoice, EventKind::Choice, FlowState::AwaitingSearch),
    (FlowState::AwaitingPhotoOne, EventKind::Photo, FlowState::AwaitingPhotoTwo),
    (FlowState::AwaitingPhotoTwo, EventKind::Photo, FlowState::AwaitingPlateNumber),
    (FlowState::AwaitingPlateNumber, EventKind::Text, FlowState::AwaitingPlateNumber),
];

impl FlowState {
    /// Whether this state accepts the given event kind at all.
    pub fn accepts(self, event: EventKind) -> bool {
        TRANSITIONS
            .iter()
            .any(|(from, kind, _)| *from == self && *kind == event)
    }

    /// Whether moving to `next` on `event` is a legal transition.
    pub fn can_transition(self, event: EventKind, next: FlowState) -> bool {
        TRANSITIONS
            .iter()
            .any(|(from, kind, to)| *from == self && *kind == event && *to == next)
    }
}

/// Per-chat conversation state. Lives only in process memory; a restart drops
/// in-flight conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    /// Registration: waiting for a digit query.
    AwaitingSearch,
    /// Registration: a button list of matching plates is on screen.
    AwaitingChoice { matches: Vec<String> },
    /// Inspection: waiting for the first photo. `plate` is pre-filled from
    /// the caller's directory assignment when one exists.
    AwaitingPhotoOne { plate: Option<String> },
    /// Inspection: first photo collected, waiting for the second.
    AwaitingPhotoTwo { plate: Option<String>, photo_one: String },
    /// Inspection: both photos collected, no assignment to auto-fill from.
    AwaitingPlateNumber { photo_one: String, photo_two: String },
}

impl Flow {
    pub fn state(&self) -> FlowState {
        match self {
            Flow::AwaitingSearch => FlowState::AwaitingSearch,
            Flow::AwaitingChoice { .. } => FlowState::AwaitingChoice,
            Flow::AwaitingPhotoOne { .. } => FlowState::AwaitingPhotoOne,
            Flow::AwaitingPhotoTwo { .. } => FlowState::AwaitingPhotoTwo,
            Flow::AwaitingPlateNumber { .. } => FlowState::AwaitingPlateNumber,
        }
    }

    /// Whether the current state accepts the event kind. Handlers re-prompt
    /// in place when this is false.
    pub fn accepts(&self, event: EventKind) -> bool {
        self.state().accepts(event)
    }

    /// Guarded transition: errors unless `(state, event, next)` is in the
    /// transition table.
    pub fn advance(&self, event: EventKind, next: Flow) -> Result<Flow> {
        if self.state().can_transition(event, next.state()) {
            Ok(next)
        } else {
            Err(FleetCheckError::InvalidStateTransition {
                from: format!("{:?}", self.state()),
                to: format!("{:?}", next.state()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn photo_states_reject_text() {
        let flow = Flow::AwaitingPhotoOne { plate: None };
        assert!(!flow.accepts(EventKind::Text));
        assert!(flow.accepts(EventKind::Photo));

        let flow = Flow::AwaitingPhotoTwo {
            plate: None,
            photo_one: "p1".to_string(),
        };
        assert!(!flow.accepts(EventKind::Text));
        assert!(!flow.accepts(EventKind::Choice));
    }

    #[test]
    fn search_accepts_only_text() {
        let flow = Flow::AwaitingSearch;
        assert!(flow.accepts(EventKind::Text));
        assert!(!flow.accepts(EventKind::Photo));
        assert!(!flow.accepts(EventKind::Choice));
    }

    #[test]
    fn legal_registration_path() {
        let flow = Flow::AwaitingSearch;
        let flow = flow
            .advance(
                EventKind::Text,
                Flow::AwaitingChoice {
                    matches: vec!["A333BC".to_string()],
                },
            )
            .unwrap();
        let flow = flow
            .advance(
                EventKind::Choice,
                Flow::AwaitingPhotoOne {
                    plate: Some("A333BC".to_string()),
                },
            )
            .unwrap();
        assert_eq!(flow.state(), FlowState::AwaitingPhotoOne);
    }

    #[test]
    fn claim_conflict_returns_to_search() {
        let flow = Flow::AwaitingChoice {
            matches: vec!["A333BC".to_string()],
        };
        let flow = flow.advance(EventKind::Choice, Flow::AwaitingSearch).unwrap();
        assert_eq!(flow.state(), FlowState::AwaitingSearch);
    }

    #[test]
    fn illegal_transition_is_an_error() {
        let flow = Flow::AwaitingSearch;
        let result = flow.advance(
            EventKind::Text,
            Flow::AwaitingPlateNumber {
                photo_one: "p1".to_string(),
                photo_two: "p2".to_string(),
            },
        );
        assert_matches!(result, Err(FleetCheckError::InvalidStateTransition { .. }));
    }

    #[test]
    fn self_loop_on_search_is_legal() {
        let flow = Flow::AwaitingSearch;
        assert!(flow.advance(EventKind::Text, Flow::AwaitingSearch).is_ok());
    }
}
