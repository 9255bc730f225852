//! Cascade coordinator: applies resolver effects to the match registry.

use crate::logic::advancement::{Effect, SlotAssignment};
use crate::models::{
    BracketMatch, EngineError, EngineEvent, MatchState, Slot, SlotIndex, Tournament,
    TournamentStatus,
};

/// What one cascade pass changed.
#[derive(Clone, Debug, Default)]
pub struct CascadeOutcome {
    /// Matches whose slots or state changed (including a created reset final).
    pub updated: Vec<crate::models::MatchId>,
    pub events: Vec<EngineEvent>,
}

/// Apply resolver effects in order. Idempotent: re-applying the same effects
/// changes nothing the second time.
pub fn apply_effects(
    tournament: &mut Tournament,
    effects: &[Effect],
) -> Result<CascadeOutcome, EngineError> {
    let mut outcome = CascadeOutcome::default();
    for effect in effects {
        match effect {
            Effect::Assign(assignment) => bind_slot(tournament, *assignment, &mut outcome)?,
            Effect::CreateResetFinal {
                bracket,
                group,
                first_final,
                winners_side,
                losers_side,
            } => {
                // No-op if the reset final already exists with the same pair.
                let existing = tournament
                    .registry
                    .matches_in(*bracket, *group)
                    .find(|m| m.round == 2)
                    .map(|m| (m.id, m.slot1.participant(), m.slot2.participant()));
                if let Some((id, s1, s2)) = existing {
                    if s1 == Some(*winners_side) && s2 == Some(*losers_side) {
                        continue;
                    }
                    return Err(EngineError::ConsistencyViolation(format!(
                        "reset final {id} already exists with different participants"
                    )));
                }
                let reset = BracketMatch::new(
                    *bracket,
                    *group,
                    2,
                    1,
                    Slot::Player(*winners_side),
                    Slot::Player(*losers_side),
                );
                let reset_id = reset.id;
                tournament.registry.insert(reset);
                // Anything waiting on "champion of this bracket" now waits on
                // the reset final instead.
                tournament.registry.retarget_feeders(*first_final, reset_id);
                outcome.updated.push(reset_id);
                outcome.events.push(EngineEvent::MatchReady { match_id: reset_id });
            }
            Effect::Finish { champion } => {
                if tournament.status == TournamentStatus::Finished {
                    if tournament.champion == Some(*champion) {
                        continue;
                    }
                    return Err(EngineError::ConsistencyViolation(
                        "tournament already finished with a different champion".to_string(),
                    ));
                }
                tournament.status = TournamentStatus::Finished;
                tournament.champion = Some(*champion);
                outcome
                    .events
                    .push(EngineEvent::TournamentFinished { champion: *champion });
            }
        }
    }
    Ok(outcome)
}

/// Bind a participant into a destination slot, flipping the match to `Ready`
/// when both slots become concrete.
fn bind_slot(
    tournament: &mut Tournament,
    assignment: SlotAssignment,
    outcome: &mut CascadeOutcome,
) -> Result<(), EngineError> {
    let SlotAssignment {
        dest,
        slot,
        participant,
    } = assignment;
    let m = tournament
        .registry
        .get_mut(dest)
        .ok_or_else(|| {
            EngineError::ConsistencyViolation(format!("assignment targets unknown match {dest}"))
        })?;

    match m.slot(slot) {
        // At-least-once delivery of the same completion: no-op.
        Slot::Player(existing) if *existing == participant => return Ok(()),
        Slot::Player(existing) => {
            return Err(EngineError::ConsistencyViolation(format!(
                "slot {slot:?} of match {dest} already bound to {existing}, refusing {participant}"
            )));
        }
        Slot::Empty | Slot::Feeder(_) => {}
    }

    if m.state != MatchState::AwaitingSlots {
        return Err(EngineError::ConsistencyViolation(format!(
            "match {dest} is {:?}, slots can no longer be bound",
            m.state
        )));
    }

    let other = match slot {
        SlotIndex::One => &m.slot2,
        SlotIndex::Two => &m.slot1,
    };
    if other.participant() == Some(participant) {
        // Duplicate-player-in-bracket: a topology construction bug, never a
        // runtime race. Fail loudly instead of assigning.
        return Err(EngineError::TopologyViolation(format!(
            "participant {participant} would occupy both slots of match {dest}"
        )));
    }

    *m.slot_mut(slot) = Slot::Player(participant);
    outcome.updated.push(dest);
    if m.is_fully_populated() {
        m.state = MatchState::Ready;
        outcome.events.push(EngineEvent::MatchReady { match_id: dest });
    }
    Ok(())
}
