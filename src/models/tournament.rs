//! Tournament aggregate, format, status, and the engine error taxonomy.

use crate::models::bracket_match::{Bracket, BracketMatch, GroupTag, MatchId, MatchState};
use crate::models::participant::{Participant, ParticipantId};
use crate::models::registry::MatchRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Broad class of an engine error, for surfacing/transport mapping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input, rejected before any state change.
    Validation,
    /// Operation against a match in the wrong state (or missing).
    State,
    /// The pre-built feeder graph is internally inconsistent; fatal at build.
    Topology,
    /// A runtime invariant broke during cascade; submission rolled back.
    Consistency,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// Participant count must be a power of two and at least 4.
    InvalidParticipantCount { count: usize },
    /// Scores must not be equal (no draws).
    InvalidScore { score1: u32, score2: u32 },
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// Match is not ready for a result (slots unresolved, or already completed).
    MatchNotReady(MatchId),
    /// The feeder graph produced an impossible assignment (construction bug).
    TopologyViolation(String),
    /// A cascade broke a runtime invariant; the submission was rolled back.
    ConsistencyViolation(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidParticipantCount { .. } | EngineError::InvalidScore { .. } => {
                ErrorKind::Validation
            }
            EngineError::MatchNotFound(_) | EngineError::MatchNotReady(_) => ErrorKind::State,
            EngineError::TopologyViolation(_) => ErrorKind::Topology,
            EngineError::ConsistencyViolation(_) => ErrorKind::Consistency,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidParticipantCount { count } => {
                write!(f, "Participant count {count} must be a power of two and at least 4")
            }
            EngineError::InvalidScore { score1, score2 } => {
                write!(f, "Invalid score {score1}-{score2}: draws are not allowed")
            }
            EngineError::MatchNotFound(id) => write!(f, "Match {id} not found"),
            EngineError::MatchNotReady(id) => {
                write!(f, "Match {id} is not ready for a result")
            }
            EngineError::TopologyViolation(msg) => write!(f, "Topology violation: {msg}"),
            EngineError::ConsistencyViolation(msg) => write!(f, "Consistency violation: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Bracket layout of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// One double-elimination bracket ending in a grand final.
    #[default]
    SingleGroup,
    /// Two double-elimination groups feeding a 4-player cross bracket.
    GroupStage,
}

/// Whether the tournament is still running.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    InProgress,
    Finished,
}

/// One tournament: immutable topology plus the mutable match states.
///
/// All mutation flows through result submission; no field is edited directly
/// after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub format: Format,
    pub participant_count: usize,
    pub participants: Vec<Participant>,
    pub registry: MatchRegistry,
    pub status: TournamentStatus,
    /// Winner of the terminal match, once `Finished`.
    pub champion: Option<ParticipantId>,
    /// Set when a consistency violation forced a rollback; cleared only by
    /// manual review outside the engine.
    pub needs_review: bool,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Assemble a tournament from a built registry. Used by the topology
    /// builder; not a public construction path.
    pub(crate) fn from_parts(
        format: Format,
        participants: Vec<Participant>,
        registry: MatchRegistry,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            format,
            participant_count: participants.len(),
            participants,
            registry,
            status: TournamentStatus::InProgress,
            champion: None,
            needs_review: false,
            created_at: Utc::now(),
        }
    }

    /// Full match set in creation order (read-only projection for display).
    pub fn bracket_view(&self) -> Vec<&BracketMatch> {
        self.registry.iter().collect()
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Look up a participant by seed number.
    pub fn participant_by_seed(&self, seed: u32) -> Option<&Participant> {
        self.participants.iter().find(|p| p.seed == seed)
    }

    /// Matches of one bracket (and group), ordered by round then sequence.
    pub fn matches_in(&self, bracket: Bracket, group: Option<GroupTag>) -> Vec<&BracketMatch> {
        let mut out: Vec<&BracketMatch> = self.registry.matches_in(bracket, group).collect();
        out.sort_by_key(|m| (m.round, m.sequence));
        out
    }

    /// Matches currently playable.
    pub fn ready_matches(&self) -> Vec<&BracketMatch> {
        let mut out: Vec<&BracketMatch> = self
            .registry
            .iter()
            .filter(|m| m.state == MatchState::Ready)
            .collect();
        out.sort_by_key(|m| (m.round, m.sequence));
        out
    }
}
