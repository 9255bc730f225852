//! Participant data structures and the seeded-entrant source.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in slots and lookups).
pub type ParticipantId = Uuid;

/// An entrant in the tournament. Immutable once the tournament starts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Seed number, 1..=N, unique within the tournament.
    pub seed: u32,
}

impl Participant {
    /// Create a new participant with the given name and seed.
    pub fn new(name: impl Into<String>, seed: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seed,
        }
    }
}

/// Source of the ordered entrant list, consulted once at topology-build time.
/// Implementations must return exactly `count` participants seeded 1..=count.
pub trait ParticipantRegistry {
    fn list_seeded_participants(&self, count: usize) -> Vec<Participant>;
}

/// Default registry: generates placeholder names in seed order.
pub struct GeneratedParticipants;

impl ParticipantRegistry for GeneratedParticipants {
    fn list_seeded_participants(&self, count: usize) -> Vec<Participant> {
        (1..=count as u32)
            .map(|seed| Participant::new(format!("Player {seed}"), seed))
            .collect()
    }
}
