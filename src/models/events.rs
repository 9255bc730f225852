//! State-change events emitted to the notification sink (fire-and-forget).

use crate::models::bracket_match::MatchId;
use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// One event per state-changed match, plus the terminal event.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EngineEvent {
    MatchReady { match_id: MatchId },
    MatchCompleted { match_id: MatchId },
    TournamentFinished { champion: ParticipantId },
}
