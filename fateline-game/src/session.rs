use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::constants::ROUND_COUNT;
use crate::data::{Event, EventData};
use crate::events::{EventRequest, pick_event};
use crate::outcome::{VoyageSummary, resolve};
use crate::roles::{Role, base_survival_prob};
use crate::round::{ChoiceOutcome, DecisionRecord, RunningState, evaluate};

/// High-level session binding a role and event catalog to the ten-round
/// decision loop. The front end drives it one round at a time.
#[derive(Debug, Clone)]
pub struct VoyageSession {
    role: Role,
    base_prob: f64,
    state: RunningState,
    log: Vec<DecisionRecord>,
    data: EventData,
    rng: ChaCha20Rng,
    round: u32,
    seed: u64,
}

impl VoyageSession {
    /// Construct a fresh session from a sampled role, catalog, and seed.
    #[must_use]
    pub fn new(role: Role, data: EventData, seed: u64) -> Self {
        let base_prob = base_survival_prob(&role);
        Self {
            role,
            base_prob,
            state: RunningState::default(),
            log: Vec::with_capacity(ROUND_COUNT as usize),
            data,
            rng: ChaCha20Rng::seed_from_u64(seed),
            round: 1,
            seed,
        }
    }

    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub const fn base_prob(&self) -> f64 {
        self.base_prob
    }

    #[must_use]
    pub const fn running_state(&self) -> RunningState {
        self.state
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The 1-based round about to be played.
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.round > ROUND_COUNT
    }

    #[must_use]
    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.log
    }

    /// Select the event for the round about to be played.
    ///
    /// Returns `None` when no event is available; the caller should then
    /// record the round as skipped.
    pub fn next_event(&mut self) -> Option<Event> {
        if self.is_over() {
            return None;
        }
        let request = EventRequest {
            round: self.round,
            data: &self.data,
            history: &self.log,
        };
        pick_event(&request, &mut self.rng)
    }

    /// Apply the chosen option: accumulate its deltas, log the decision,
    /// and advance to the next round.
    ///
    /// A key outside the event's declared set returns `None` and leaves
    /// the session untouched.
    pub fn choose(&mut self, event: &Event, key: &str) -> Option<ChoiceOutcome> {
        if self.is_over() {
            return None;
        }
        let outcome = evaluate(event, key)?;
        self.state.apply(&outcome);
        self.log
            .push(DecisionRecord::played(self.round, event, key, &outcome));
        self.round += 1;
        Some(outcome)
    }

    /// Record the current round as skipped and advance.
    pub fn skip_round(&mut self) {
        if self.is_over() {
            return;
        }
        self.log.push(DecisionRecord::Skipped { round: self.round });
        self.round += 1;
    }

    /// Tags collected across played rounds, in order. Skipped rounds
    /// contribute nothing.
    #[must_use]
    pub fn collected_tags(&self) -> Vec<String> {
        self.log
            .iter()
            .filter_map(|record| record.tag().map(str::to_string))
            .collect()
    }

    /// Resolve the final outcome from the accumulated state.
    #[must_use]
    pub fn finish(&self) -> VoyageSummary {
        resolve(
            self.base_prob,
            self.state.fate_mod,
            self.state.moral_score,
            &self.collected_tags(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EventChoice;

    fn neutral_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            weight: 5,
            choices: vec![EventChoice {
                key: "A".to_string(),
                label: "Hold steady".to_string(),
                fate: 0.0,
                moral: 0,
                tag: None,
                followup: None,
            }],
        }
    }

    fn survivor_role() -> Role {
        Role {
            name: "101".to_string(),
            survived: true,
            class: 1,
            sex: "female".to_string(),
            age: 29.0,
            siblings_spouses: 0,
            parents_children: 0,
            fare: 211.34,
            embarked: Some("S".to_string()),
        }
    }

    fn catalog(n: usize) -> EventData {
        EventData::from_events((0..n).map(|i| neutral_event(&format!("e{i}"))).collect())
    }

    #[test]
    fn ten_neutral_rounds_keep_the_base_prior() {
        let mut session = VoyageSession::new(survivor_role(), catalog(10), 42);
        while !session.is_over() {
            match session.next_event() {
                Some(event) => {
                    session.choose(&event, "A").unwrap();
                }
                None => session.skip_round(),
            }
        }
        assert_eq!(session.decisions().len(), 10);
        let summary = session.finish();
        assert!((summary.final_prob - 0.7).abs() < f64::EPSILON);
        assert!(summary.survived);
        assert_eq!(summary.moral_score, 0);
    }

    #[test]
    fn exhausted_catalog_produces_skips() {
        let mut session = VoyageSession::new(survivor_role(), catalog(4), 7);
        while !session.is_over() {
            match session.next_event() {
                Some(event) => {
                    session.choose(&event, "A").unwrap();
                }
                None => session.skip_round(),
            }
        }
        let skipped = session
            .decisions()
            .iter()
            .filter(|record| record.is_skipped())
            .count();
        assert_eq!(skipped, 6);
        assert_eq!(session.collected_tags().len(), 4);
    }

    #[test]
    fn foreign_key_leaves_session_untouched() {
        let mut session = VoyageSession::new(survivor_role(), catalog(1), 1);
        let event = session.next_event().unwrap();
        assert!(session.choose(&event, "Z").is_none());
        assert_eq!(session.current_round(), 1);
        assert!(session.decisions().is_empty());
    }

    #[test]
    fn session_is_deterministic_for_a_seed() {
        let run = |seed| {
            let mut session = VoyageSession::new(survivor_role(), catalog(12), seed);
            let mut ids = Vec::new();
            while !session.is_over() {
                match session.next_event() {
                    Some(event) => {
                        ids.push(event.id.clone());
                        session.choose(&event, "A").unwrap();
                    }
                    None => session.skip_round(),
                }
            }
            ids
        };
        assert_eq!(run(1337), run(1337));
    }
}
