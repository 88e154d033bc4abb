//! Round evaluation: choice lookup and running-state accumulation.
use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_TAG;
use crate::data::Event;

/// The values a chosen option contributes to the running state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOutcome {
    pub fate_delta: f64,
    pub moral_delta: i32,
    pub tag: String,
}

/// Look up the chosen option's deltas and tag, verbatim.
///
/// Pure lookup with no side effects; the caller is responsible for
/// restricting `key` to the event's declared key set. A foreign key
/// yields `None` rather than a panic. The tag falls back to the
/// `"unknown"` sentinel when the choice declares none.
#[must_use]
pub fn evaluate(event: &Event, key: &str) -> Option<ChoiceOutcome> {
    let choice = event.choice(key)?;
    Some(ChoiceOutcome {
        fate_delta: choice.fate,
        moral_delta: choice.moral,
        tag: choice
            .tag
            .clone()
            .unwrap_or_else(|| UNKNOWN_TAG.to_string()),
    })
}

/// The two accumulators mutated once per played round.
///
/// Both are unbounded on purpose: a run of extreme choices may push the
/// raw fate modifier far outside [0, 1] before the final clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RunningState {
    pub fate_mod: f64,
    pub moral_score: i32,
}

impl RunningState {
    pub fn apply(&mut self, outcome: &ChoiceOutcome) {
        self.fate_mod += outcome.fate_delta;
        self.moral_score += outcome.moral_delta;
    }
}

/// Durable log entry for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecisionRecord {
    Played {
        round: u32,
        event_id: String,
        title: String,
        choice: String,
        text: String,
        tag: String,
    },
    /// No event was available; the round contributed nothing.
    Skipped { round: u32 },
}

impl DecisionRecord {
    #[must_use]
    pub fn played(round: u32, event: &Event, key: &str, outcome: &ChoiceOutcome) -> Self {
        let text = event
            .choice(key)
            .map(|choice| choice.label.clone())
            .unwrap_or_default();
        Self::Played {
            round,
            event_id: event.id.clone(),
            title: event.title.clone(),
            choice: key.to_uppercase(),
            text,
            tag: outcome.tag.clone(),
        }
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        match self {
            Self::Played { round, .. } | Self::Skipped { round } => *round,
        }
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Event id and chosen key, when the round was played.
    #[must_use]
    pub fn event_and_choice(&self) -> Option<(&str, &str)> {
        match self {
            Self::Played {
                event_id, choice, ..
            } => Some((event_id, choice)),
            Self::Skipped { .. } => None,
        }
    }

    /// Tag collected by this round, if it was played.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Played { tag, .. } => Some(tag),
            Self::Skipped { .. } => None,
        }
    }
}
