//! Comment reaction state machine
//!
//! Each (user, comment) pair is in one of three states. A reaction intent
//! moves the pair to its next state and yields the store mutation and the
//! counter delta that must be applied together:
//!
//! | Current  | Intent  | Next     | Delta                  |
//! |----------|---------|----------|------------------------|
//! | None     | Like    | Liked    | likes +1               |
//! | None     | Dislike | Disliked | dislikes +1            |
//! | Liked    | Like    | None     | likes -1               |
//! | Liked    | Dislike | Disliked | likes -1, dislikes +1  |
//! | Disliked | Dislike | None     | dislikes -1            |
//! | Disliked | Like    | Liked    | dislikes -1, likes +1  |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a stored reaction, and the intent a user submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Database representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Dislike => "DISLIKE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LIKE" => Some(Self::Like),
            "DISLIKE" => Some(Self::Dislike),
            _ => None,
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reaction state of one (user, comment) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionState {
    #[default]
    None,
    Liked,
    Disliked,
}

/// Change to apply to the reaction store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMutation {
    Create(ReactionKind),
    Update(ReactionKind),
    Delete,
}

/// Change to apply to a comment's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub likes: i32,
    pub dislikes: i32,
}

impl CounterDelta {
    pub const fn new(likes: i32, dislikes: i32) -> Self {
        Self { likes, dislikes }
    }
}

/// Outcome of applying an intent to a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionTransition {
    pub from: ReactionState,
    pub to: ReactionState,
    pub mutation: StoreMutation,
    pub delta: CounterDelta,
}

impl ReactionState {
    /// State implied by the stored reaction of a pair, if any
    pub fn from_kind(kind: Option<ReactionKind>) -> Self {
        match kind {
            None => Self::None,
            Some(ReactionKind::Like) => Self::Liked,
            Some(ReactionKind::Dislike) => Self::Disliked,
        }
    }

    /// Stored reaction kind for this state
    pub fn kind(self) -> Option<ReactionKind> {
        match self {
            Self::None => None,
            Self::Liked => Some(ReactionKind::Like),
            Self::Disliked => Some(ReactionKind::Dislike),
        }
    }

    #[inline]
    pub fn is_liked(self) -> bool {
        self == Self::Liked
    }

    #[inline]
    pub fn is_disliked(self) -> bool {
        self == Self::Disliked
    }

    /// Apply a reaction intent
    pub fn react(self, intent: ReactionKind) -> ReactionTransition {
        use ReactionKind::{Dislike, Like};

        let (to, mutation, delta) = match (self, intent) {
            (Self::None, Like) => (Self::Liked, StoreMutation::Create(Like), CounterDelta::new(1, 0)),
            (Self::None, Dislike) => {
                (Self::Disliked, StoreMutation::Create(Dislike), CounterDelta::new(0, 1))
            }
            (Self::Liked, Like) => (Self::None, StoreMutation::Delete, CounterDelta::new(-1, 0)),
            (Self::Liked, Dislike) => {
                (Self::Disliked, StoreMutation::Update(Dislike), CounterDelta::new(-1, 1))
            }
            (Self::Disliked, Dislike) => {
                (Self::None, StoreMutation::Delete, CounterDelta::new(0, -1))
            }
            (Self::Disliked, Like) => {
                (Self::Liked, StoreMutation::Update(Like), CounterDelta::new(1, -1))
            }
        };

        ReactionTransition {
            from: self,
            to,
            mutation,
            delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ReactionKind::{Dislike, Like};

    #[test]
    fn test_transition_table() {
        let cases = [
            (ReactionState::None, Like, ReactionState::Liked, StoreMutation::Create(Like), (1, 0)),
            (ReactionState::None, Dislike, ReactionState::Disliked, StoreMutation::Create(Dislike), (0, 1)),
            (ReactionState::Liked, Like, ReactionState::None, StoreMutation::Delete, (-1, 0)),
            (ReactionState::Liked, Dislike, ReactionState::Disliked, StoreMutation::Update(Dislike), (-1, 1)),
            (ReactionState::Disliked, Dislike, ReactionState::None, StoreMutation::Delete, (0, -1)),
            (ReactionState::Disliked, Like, ReactionState::Liked, StoreMutation::Update(Like), (1, -1)),
        ];

        for (from, intent, to, mutation, (likes, dislikes)) in cases {
            let t = from.react(intent);
            assert_eq!(t.from, from);
            assert_eq!(t.to, to, "{from:?} x {intent:?}");
            assert_eq!(t.mutation, mutation, "{from:?} x {intent:?}");
            assert_eq!(t.delta, CounterDelta::new(likes, dislikes), "{from:?} x {intent:?}");
        }
    }

    #[test]
    fn test_same_intent_twice_returns_to_none() {
        for intent in [Like, Dislike] {
            let first = ReactionState::None.react(intent);
            let second = first.to.react(intent);
            assert_eq!(second.to, ReactionState::None);
            assert_eq!(first.delta.likes + second.delta.likes, 0);
            assert_eq!(first.delta.dislikes + second.delta.dislikes, 0);
        }
    }

    #[test]
    fn test_switch_moves_one_unit() {
        let switched = ReactionState::Liked.react(Dislike);
        assert_eq!(switched.delta.likes + switched.delta.dislikes, 0);
        assert_eq!(switched.delta.dislikes, 1);
    }

    #[test]
    fn test_state_kind_round_trip() {
        for state in [ReactionState::None, ReactionState::Liked, ReactionState::Disliked] {
            assert_eq!(ReactionState::from_kind(state.kind()), state);
        }
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ReactionKind::parse("LIKE"), Some(Like));
        assert_eq!(ReactionKind::parse("DISLIKE"), Some(Dislike));
        assert_eq!(ReactionKind::parse("like"), None);
        assert_eq!(Dislike.to_string(), "DISLIKE");
    }
}
