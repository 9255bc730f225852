//! Data structures for the bracket engine: participants, matches, tournaments.

mod bracket_match;
mod events;
mod participant;
mod registry;
mod tournament;

pub use bracket_match::{
    Bracket, BracketMatch, FeederRef, FeederRole, GroupTag, MatchId, MatchState, Slot, SlotIndex,
};
pub use events::EngineEvent;
pub use participant::{GeneratedParticipants, Participant, ParticipantId, ParticipantRegistry};
pub use registry::MatchRegistry;
pub use tournament::{
    EngineError, ErrorKind, Format, Tournament, TournamentId, TournamentStatus,
};
