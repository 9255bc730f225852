//! Tournament bracket advancement engine: topology generation, result
//! submission, and winner/loser propagation for double-elimination events.

pub mod logic;
pub mod models;

pub use logic::{
    apply_effects, check_consistency, create_tournament, resolve, submit_result, CascadeOutcome,
    Effect, SlotAssignment, SubmitOutcome,
};
pub use models::{
    Bracket, BracketMatch, EngineError, EngineEvent, ErrorKind, FeederRef, FeederRole, Format,
    GeneratedParticipants, GroupTag, MatchId, MatchRegistry, MatchState, Participant,
    ParticipantId, ParticipantRegistry, Slot, SlotIndex, Tournament, TournamentId,
    TournamentStatus,
};
