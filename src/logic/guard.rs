//! Consistency guard: invariant checks run after every cascade.
//!
//! Violations are reported, never repaired; the caller rolls the triggering
//! submission back and flags the tournament for manual review.

use crate::models::{
    Bracket, EngineError, MatchState, ParticipantId, Slot, Tournament,
};
use std::collections::HashMap;

/// Qualifier slots feeding the cross bracket (group-stage format).
const CROSS_QUALIFIERS: usize = 4;

/// Scan the tournament and assert the cascade left it consistent.
pub fn check(tournament: &Tournament) -> Result<(), EngineError> {
    no_duplicate_live_participants(tournament)?;
    no_stale_awaiting_slots(tournament)?;
    cross_qualifier_count(tournament)?;
    Ok(())
}

/// No participant may be concretely bound into two matches that are both
/// `Ready` at once, and never into both slots of one match.
fn no_duplicate_live_participants(tournament: &Tournament) -> Result<(), EngineError> {
    let mut ready_holder: HashMap<ParticipantId, crate::models::MatchId> = HashMap::new();
    for m in tournament.registry.iter() {
        if m.slot1.participant().is_some() && m.slot1 == m.slot2 {
            return Err(EngineError::ConsistencyViolation(format!(
                "match {} holds the same participant in both slots",
                m.id
            )));
        }
        if m.state != MatchState::Ready {
            continue;
        }
        for slot in [&m.slot1, &m.slot2] {
            let Some(p) = slot.participant() else { continue };
            if let Some(first) = ready_holder.insert(p, m.id) {
                return Err(EngineError::ConsistencyViolation(format!(
                    "participant {p} is in two ready matches at once ({first} and {})",
                    m.id
                )));
            }
        }
    }
    Ok(())
}

/// A match whose feeders have all completed must not still be awaiting slots
/// at the end of the cascade pass (no stale TBD).
fn no_stale_awaiting_slots(tournament: &Tournament) -> Result<(), EngineError> {
    for m in tournament.registry.iter() {
        if m.state != MatchState::AwaitingSlots {
            continue;
        }
        let all_feeders_done = [&m.slot1, &m.slot2].into_iter().all(|slot| match slot {
            Slot::Player(_) => true,
            Slot::Empty => false,
            Slot::Feeder(f) => tournament
                .registry
                .get(f.source)
                .map(|source| source.state == MatchState::Completed)
                .unwrap_or(false),
        });
        if all_feeders_done {
            return Err(EngineError::ConsistencyViolation(format!(
                "match {} is still awaiting slots although all feeders completed",
                m.id
            )));
        }
    }
    Ok(())
}

/// At most four distinct champions/runners-up may feed the cross bracket.
fn cross_qualifier_count(tournament: &Tournament) -> Result<(), EngineError> {
    let mut qualifiers: Vec<ParticipantId> = Vec::new();
    for m in tournament.registry.matches_in(Bracket::CrossSemifinal, None) {
        for slot in [&m.slot1, &m.slot2] {
            if let Some(p) = slot.participant() {
                if !qualifiers.contains(&p) {
                    qualifiers.push(p);
                }
            }
        }
    }
    if qualifiers.len() > CROSS_QUALIFIERS {
        return Err(EngineError::ConsistencyViolation(format!(
            "{} distinct participants feed the cross bracket (maximum {CROSS_QUALIFIERS})",
            qualifiers.len()
        )));
    }
    Ok(())
}
