use serde::{Deserialize, Serialize};

/// A single selectable option within an event.
///
/// Deltas and the trait tag live on the choice itself, so every declared
/// key carries a fate delta, a moral delta and (optionally) a tag — the
/// three lookups can never disagree on their key set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub fate: f64,
    #[serde(default)]
    pub moral: i32,
    #[serde(default)]
    pub tag: Option<String>,
    /// Event id to prefer next round when this choice is taken.
    #[serde(default)]
    pub followup: Option<String>,
}

/// A narrative event presented during one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub choices: Vec<EventChoice>,
}

fn default_weight() -> u32 {
    5
}

impl Event {
    /// Look up a choice by its key, case-insensitively.
    #[must_use]
    pub fn choice(&self, key: &str) -> Option<&EventChoice> {
        self.choices
            .iter()
            .find(|choice| choice.key.eq_ignore_ascii_case(key))
    }

    /// Declared option keys in catalog order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.choices.iter().map(|choice| choice.key.as_str()).collect()
    }
}

/// Container for the full event catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventData {
    pub events: Vec<Event>,
}

const DEFAULT_EVENT_DATA: &str = include_str!("../assets/events.json");

impl EventData {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Load the event catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid event data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a catalog from pre-parsed events.
    #[must_use]
    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Load the catalog shipped with the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_EVENT_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
