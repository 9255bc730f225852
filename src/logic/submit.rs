//! Result submission: validates an outcome, records it, and runs the cascade.

use crate::logic::{advancement, cascade, guard};
use crate::models::{
    EngineError, EngineEvent, ErrorKind, MatchId, MatchState, Tournament,
};

/// Everything one accepted submission changed.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    /// The submitted match plus every match the cascade touched.
    pub updated: Vec<MatchId>,
    /// State-change events for the notification sink.
    pub events: Vec<EngineEvent>,
}

/// Record a match result and synchronously propagate winners and losers.
///
/// Scores must differ (no draws); the higher score's slot wins. On a topology
/// or consistency violation the registry is restored to its pre-submission
/// state, the tournament is flagged for manual review, and the error is
/// returned.
pub fn submit_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score1: u32,
    score2: u32,
) -> Result<SubmitOutcome, EngineError> {
    if tournament.needs_review {
        return Err(EngineError::ConsistencyViolation(
            "tournament is flagged for manual review".to_string(),
        ));
    }

    {
        let m = tournament
            .registry
            .get(match_id)
            .ok_or(EngineError::MatchNotFound(match_id))?;
        if m.state != MatchState::Ready {
            return Err(EngineError::MatchNotReady(match_id));
        }
    }
    if score1 == score2 {
        return Err(EngineError::InvalidScore { score1, score2 });
    }

    // Snapshot for rollback; everything past this point mutates state.
    let registry_snapshot = tournament.registry.clone();
    let status_snapshot = tournament.status;
    let champion_snapshot = tournament.champion;

    let completed = {
        let m = tournament
            .registry
            .get_mut(match_id)
            .ok_or(EngineError::MatchNotFound(match_id))?;
        m.score1 = Some(score1);
        m.score2 = Some(score2);
        let (winner_slot, loser_slot) = if score1 > score2 {
            (&m.slot1, &m.slot2)
        } else {
            (&m.slot2, &m.slot1)
        };
        m.winner = winner_slot.participant();
        m.loser = loser_slot.participant();
        m.state = MatchState::Completed;
        m.clone()
    };

    let cascaded = advancement::resolve(&completed, &tournament.registry)
        .and_then(|effects| cascade::apply_effects(tournament, &effects))
        .and_then(|outcome| guard::check(tournament).map(|()| outcome));

    match cascaded {
        Ok(outcome) => {
            let mut updated = vec![match_id];
            updated.extend(outcome.updated);
            updated.dedup();
            let mut events = vec![EngineEvent::MatchCompleted { match_id }];
            events.extend(outcome.events);
            Ok(SubmitOutcome { updated, events })
        }
        Err(err) => match err.kind() {
            ErrorKind::Topology | ErrorKind::Consistency => {
                log::error!(
                    "cascade failed for match {match_id}, rolling submission back: {err}"
                );
                tournament.registry = registry_snapshot;
                tournament.status = status_snapshot;
                tournament.champion = champion_snapshot;
                tournament.needs_review = true;
                Err(err)
            }
            _ => Err(err),
        },
    }
}
