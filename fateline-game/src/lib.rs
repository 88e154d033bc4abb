//! Fateline Game Engine
//!
//! Platform-agnostic core logic for Fateline, a data-seeded maritime
//! disaster narrative. This crate provides the full round/decision/ending
//! pipeline without UI or platform-specific dependencies.

pub mod constants;
pub mod data;
pub mod events;
pub mod outcome;
pub mod roles;
pub mod round;
pub mod session;

// Re-export commonly used types
pub use data::{Event, EventChoice, EventData};
pub use events::{EventRequest, pick_event};
pub use outcome::{
    MoralLabel, VoyageSummary, ending_text, personality_text, resolve, tally_tags,
};
pub use roles::{DataError, PassengerTable, Role, base_survival_prob, class_name};
pub use round::{ChoiceOutcome, DecisionRecord, RunningState, evaluate};
pub use session::VoyageSession;

/// Trait for abstracting data loading operations.
/// Platform-specific implementations should provide this.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the cleaned passenger table from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded or cleaned.
    fn load_passenger_table(&self) -> Result<PassengerTable, Self::Error>;

    /// Load the event catalog from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_event_data(&self) -> Result<EventData, Self::Error>;
}

/// Main engine wiring a data loader to session construction.
pub struct GameEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> GameEngine<L>
where
    L: DataLoader,
{
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Sample a role from the chosen cabin class and start a session.
    ///
    /// Returns `Ok(None)` when the class has no passengers to sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the passenger table or event catalog cannot
    /// be loaded.
    pub fn create_session(&self, class: u8, seed: u64) -> Result<Option<VoyageSession>, L::Error> {
        use rand::SeedableRng;
        let table = self.data_loader.load_passenger_table()?;
        let data = self.data_loader.load_event_data()?;
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
        Ok(table
            .sample_role(class, &mut rng)
            .map(|role| VoyageSession::new(role, data, seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct StaticLoader;

    impl DataLoader for StaticLoader {
        type Error = Infallible;

        fn load_passenger_table(&self) -> Result<PassengerTable, Self::Error> {
            Ok(PassengerTable::load_from_static().expect("embedded table is valid"))
        }

        fn load_event_data(&self) -> Result<EventData, Self::Error> {
            Ok(EventData::load_from_static())
        }
    }

    #[test]
    fn engine_creates_a_session_for_each_class() {
        let engine = GameEngine::new(StaticLoader);
        for class in 1..=3 {
            let session = engine
                .create_session(class, 0xABCD)
                .unwrap()
                .expect("class has passengers");
            assert_eq!(session.role().class, class);
            assert_eq!(session.seed(), 0xABCD);
        }
    }

    #[test]
    fn engine_returns_none_for_an_empty_class() {
        let engine = GameEngine::new(StaticLoader);
        assert!(engine.create_session(9, 1).unwrap().is_none());
    }

    #[test]
    fn engine_sampling_is_deterministic_per_seed() {
        let engine = GameEngine::new(StaticLoader);
        let first = engine.create_session(3, 99).unwrap().unwrap();
        let second = engine.create_session(3, 99).unwrap().unwrap();
        assert_eq!(first.role(), second.role());
    }
}
