//! Advancement resolver: pure computation of downstream effects for one
//! completed match.

use crate::models::{
    Bracket, BracketMatch, EngineError, FeederRole, GroupTag, MatchId, MatchRegistry,
    ParticipantId, SlotIndex,
};

/// One downstream slot to fill.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotAssignment {
    pub dest: MatchId,
    pub slot: SlotIndex,
    pub participant: ParticipantId,
}

/// Effect of a completed match on the rest of the tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    Assign(SlotAssignment),
    /// The losers-path finalist won the first final: a second final between
    /// the same two participants decides the bracket.
    CreateResetFinal {
        bracket: Bracket,
        group: Option<GroupTag>,
        first_final: MatchId,
        winners_side: ParticipantId,
        losers_side: ParticipantId,
    },
    Finish {
        champion: ParticipantId,
    },
}

/// Compute the effects of `completed` against the current topology.
///
/// Reads the registry, never writes it. Unresolved downstream slots are found
/// through the reverse feeder index; the role on each slot decides whether the
/// winner or the loser fills it.
pub fn resolve(
    completed: &BracketMatch,
    registry: &MatchRegistry,
) -> Result<Vec<Effect>, EngineError> {
    let (winner, loser) = match (completed.winner, completed.loser) {
        (Some(w), Some(l)) => (w, l),
        _ => {
            return Err(EngineError::ConsistencyViolation(format!(
                "resolve called on match {} without a recorded outcome",
                completed.id
            )))
        }
    };

    match completed.bracket {
        Bracket::Winners
        | Bracket::LosersBranchA
        | Bracket::LosersBranchB
        | Bracket::CrossSemifinal => advance_along_edges(completed, registry, winner, loser),
        Bracket::Final | Bracket::GroupFinal => {
            if completed.round == 1 && winner_came_from_losers_path(completed, winner) {
                // Bracket not yet decided: the winners-path finalist has now
                // lost exactly once too.
                Ok(vec![Effect::CreateResetFinal {
                    bracket: completed.bracket,
                    group: completed.group,
                    first_final: completed.id,
                    winners_side: loser,
                    losers_side: winner,
                }])
            } else {
                finalize_bracket(completed, registry, winner, loser)
            }
        }
        Bracket::CrossFinal => Ok(vec![Effect::Finish { champion: winner }]),
    }
}

/// Follow the declared feeder edges out of `completed`.
fn advance_along_edges(
    completed: &BracketMatch,
    registry: &MatchRegistry,
    winner: ParticipantId,
    loser: ParticipantId,
) -> Result<Vec<Effect>, EngineError> {
    let mut effects = Vec::new();
    for (dest, slot) in registry.dependents_of(completed.id) {
        let feeder = registry
            .get(dest)
            .and_then(|m| m.slot(slot).feeder())
            .ok_or_else(|| {
                EngineError::ConsistencyViolation(format!(
                    "feeder index on match {} is stale",
                    completed.id
                ))
            })?;
        let participant = match feeder.role {
            FeederRole::Winner => winner,
            FeederRole::Loser => {
                if completed.bracket.eliminates_loser() {
                    return Err(EngineError::TopologyViolation(format!(
                        "{:?} match {} has a loser edge but its losers are eliminated",
                        completed.bracket, completed.id
                    )));
                }
                loser
            }
        };
        effects.push(Effect::Assign(SlotAssignment {
            dest,
            slot,
            participant,
        }));
    }
    Ok(effects)
}

/// The deciding final completed: the champion (and, for group finals, the
/// runner-up) flows to whatever the final chain feeds.
fn finalize_bracket(
    completed: &BracketMatch,
    registry: &MatchRegistry,
    champion: ParticipantId,
    runner_up: ParticipantId,
) -> Result<Vec<Effect>, EngineError> {
    match completed.bracket {
        Bracket::Final => Ok(vec![Effect::Finish { champion }]),
        Bracket::GroupFinal => {
            // Validate against the declared graph; assign only slots still
            // unresolved, so re-resolving a delivered completion is a no-op.
            let declared = registry.declared_edges_of(completed.id);
            if declared.len() != 2 {
                return Err(EngineError::TopologyViolation(format!(
                    "group final {} feeds {} cross-bracket slots (expected 2)",
                    completed.id,
                    declared.len()
                )));
            }
            let mut effects = Vec::new();
            for (dest, slot) in registry.dependents_of(completed.id) {
                let feeder = registry
                    .get(dest)
                    .and_then(|m| m.slot(slot).feeder())
                    .ok_or_else(|| {
                        EngineError::ConsistencyViolation(format!(
                            "feeder index on group final {} is stale",
                            completed.id
                        ))
                    })?;
                let participant = match feeder.role {
                    FeederRole::Winner => champion,
                    FeederRole::Loser => runner_up,
                };
                effects.push(Effect::Assign(SlotAssignment {
                    dest,
                    slot,
                    participant,
                }));
            }
            Ok(effects)
        }
        other => Err(EngineError::TopologyViolation(format!(
            "finalize on non-final bracket {other:?}"
        ))),
    }
}

/// Reset rule input: did the winner arrive through the losers bracket?
/// Final-chain matches bind the losers-path finalist into slot2 by
/// construction.
fn winner_came_from_losers_path(final_match: &BracketMatch, winner: ParticipantId) -> bool {
    final_match.slot2.participant() == Some(winner)
}
