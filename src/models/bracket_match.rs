//! Match, Slot, and feeder-edge data structures for the bracket graph.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which bracket a match belongs to.
///
/// `LosersBranchA` rounds pair up freshly dropped losers (or losers-bracket
/// survivors); `LosersBranchB` rounds pit a branch-A winner against the loser
/// dropping from the next winners round. Single-group tournaments terminate in
/// `Final`; group-stage tournaments terminate each group in `GroupFinal` and
/// the event in `CrossFinal`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Winners,
    LosersBranchA,
    LosersBranchB,
    Final,
    GroupFinal,
    CrossSemifinal,
    CrossFinal,
}

impl Bracket {
    /// Losers of matches in these brackets are eliminated (no outgoing loser edge).
    pub fn eliminates_loser(self) -> bool {
        matches!(
            self,
            Bracket::LosersBranchA
                | Bracket::LosersBranchB
                | Bracket::CrossSemifinal
                | Bracket::CrossFinal
        )
    }

    /// Terminal brackets end the tournament when their deciding match completes.
    pub fn is_terminal(self) -> bool {
        matches!(self, Bracket::Final | Bracket::CrossFinal)
    }
}

/// Group tag for group-stage tournaments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupTag {
    A,
    B,
}

/// Which outcome of a source match a feeder edge carries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeederRole {
    Winner,
    Loser,
}

/// Unresolved pointer from a source match's outcome to a downstream slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FeederRef {
    pub source: MatchId,
    pub role: FeederRole,
}

/// One of a match's two slots: empty (bye), waiting on a feeder, or bound.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Empty,
    Feeder(FeederRef),
    Player(ParticipantId),
}

impl Slot {
    /// Concrete participant bound into this slot, if any.
    pub fn participant(&self) -> Option<ParticipantId> {
        match self {
            Slot::Player(id) => Some(*id),
            _ => None,
        }
    }

    /// Feeder reference waiting on a source match, if any.
    pub fn feeder(&self) -> Option<FeederRef> {
        match self {
            Slot::Feeder(f) => Some(*f),
            _ => None,
        }
    }
}

/// Which of a match's two slots an assignment targets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotIndex {
    One,
    Two,
}

/// Lifecycle of a match: slots fill, then a result is submitted exactly once.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    AwaitingSlots,
    Ready,
    Completed,
}

/// A single match slot in the bracket graph.
///
/// Created once by the topology builder; slots are mutated exactly once
/// (feeder -> participant) by the cascade, and `state`/`score*`/`winner`/
/// `loser` exactly once by result submission.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub bracket: Bracket,
    pub group: Option<GroupTag>,
    /// Round number, monotonically increasing within a bracket (1-based).
    pub round: u32,
    /// Position within the round, used for ordering and tie-breaking (1-based).
    pub sequence: u32,
    pub slot1: Slot,
    pub slot2: Slot,
    pub state: MatchState,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub winner: Option<ParticipantId>,
    pub loser: Option<ParticipantId>,
}

impl BracketMatch {
    /// Create a match in its initial state; `Ready` only if both slots are
    /// already concrete participants (first-round matches).
    pub fn new(
        bracket: Bracket,
        group: Option<GroupTag>,
        round: u32,
        sequence: u32,
        slot1: Slot,
        slot2: Slot,
    ) -> Self {
        let state = if slot1.participant().is_some() && slot2.participant().is_some() {
            MatchState::Ready
        } else {
            MatchState::AwaitingSlots
        };
        Self {
            id: Uuid::new_v4(),
            bracket,
            group,
            round,
            sequence,
            slot1,
            slot2,
            state,
            score1: None,
            score2: None,
            winner: None,
            loser: None,
        }
    }

    pub fn slot(&self, index: SlotIndex) -> &Slot {
        match index {
            SlotIndex::One => &self.slot1,
            SlotIndex::Two => &self.slot2,
        }
    }

    pub fn slot_mut(&mut self, index: SlotIndex) -> &mut Slot {
        match index {
            SlotIndex::One => &mut self.slot1,
            SlotIndex::Two => &mut self.slot2,
        }
    }

    /// Both slots bound to concrete participants.
    pub fn is_fully_populated(&self) -> bool {
        self.slot1.participant().is_some() && self.slot2.participant().is_some()
    }
}
