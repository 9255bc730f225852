//! Topology builder: generates the full match set and feeder wiring for a
//! tournament, then validates the graph before handing it over.

use crate::logic::loser_map::loser_drops;
use crate::models::{
    Bracket, BracketMatch, EngineError, FeederRef, FeederRole, Format, GroupTag, MatchId,
    MatchRegistry, Participant, Slot, SlotIndex, Tournament,
};
use std::collections::HashMap;

/// Build a tournament from the seeded entrant list.
///
/// `participants` must carry unique seeds 1..=N; N must be a power of two and
/// at least 4. Group-stage splits the field into two groups of N/2 (seeds
/// alternate between groups) and wires a 4-player cross bracket behind them.
pub fn create_tournament(
    participants: Vec<Participant>,
    format: Format,
) -> Result<Tournament, EngineError> {
    let count = participants.len();
    if count < 4 || !count.is_power_of_two() {
        return Err(EngineError::InvalidParticipantCount { count });
    }
    let bracket_size = match format {
        Format::SingleGroup => count,
        Format::GroupStage => count / 2,
    };
    if loser_drops(bracket_size).is_none() {
        return Err(EngineError::InvalidParticipantCount { count });
    }

    let mut ordered = participants;
    ordered.sort_by_key(|p| p.seed);
    for (i, p) in ordered.iter().enumerate() {
        if p.seed != i as u32 + 1 {
            return Err(EngineError::TopologyViolation(format!(
                "participant registry returned seed {} at position {}",
                p.seed,
                i + 1
            )));
        }
    }

    let mut registry = MatchRegistry::new();
    match format {
        Format::SingleGroup => {
            build_double_elim(&mut registry, &ordered, None, Bracket::Final)?;
        }
        Format::GroupStage => {
            // Seeds alternate between groups so the two halves are balanced.
            let group_a: Vec<Participant> = ordered.iter().step_by(2).cloned().collect();
            let group_b: Vec<Participant> = ordered.iter().skip(1).step_by(2).cloned().collect();
            let a_final = build_double_elim(
                &mut registry,
                &group_a,
                Some(GroupTag::A),
                Bracket::GroupFinal,
            )?;
            let b_final = build_double_elim(
                &mut registry,
                &group_b,
                Some(GroupTag::B),
                Bracket::GroupFinal,
            )?;
            build_cross_bracket(&mut registry, a_final, b_final);
        }
    }

    validate_topology(&registry)?;
    Ok(Tournament::from_parts(format, ordered, registry))
}

fn winner_of(source: MatchId) -> Slot {
    Slot::Feeder(FeederRef {
        source,
        role: FeederRole::Winner,
    })
}

fn loser_of(source: MatchId) -> Slot {
    Slot::Feeder(FeederRef {
        source,
        role: FeederRole::Loser,
    })
}

/// Build one double-elimination bracket over `entrants` (ordered strongest
/// first) and its terminal final; returns the final's match id.
fn build_double_elim(
    registry: &mut MatchRegistry,
    entrants: &[Participant],
    group: Option<GroupTag>,
    final_bracket: Bracket,
) -> Result<MatchId, EngineError> {
    let size = entrants.len();
    let rounds = size.trailing_zeros();
    let drops = loser_drops(size)
        .ok_or(EngineError::InvalidParticipantCount { count: size })?;

    // Where each losers-bracket slot pulls its dropping loser from, keyed by
    // (branch, losers round, losers index, slot). Filled from the winners
    // matches as they are created.
    let mut drop_source: HashMap<(Bracket, u32, u32, SlotIndex), MatchId> = HashMap::new();

    // Winners bracket: round r has size / 2^r matches.
    let positions = seed_positions(size);
    let mut winners: Vec<Vec<MatchId>> = Vec::new();
    let mut round1 = Vec::new();
    for j in 0..size / 2 {
        let a = &entrants[positions[j * 2] as usize - 1];
        let b = &entrants[positions[j * 2 + 1] as usize - 1];
        let id = registry.insert(BracketMatch::new(
            Bracket::Winners,
            group,
            1,
            j as u32 + 1,
            Slot::Player(a.id),
            Slot::Player(b.id),
        ));
        round1.push(id);
    }
    winners.push(round1);
    for r in 2..=rounds {
        let prev = &winners[r as usize - 2];
        let mut ids = Vec::new();
        for j in 0..prev.len() / 2 {
            let id = registry.insert(BracketMatch::new(
                Bracket::Winners,
                group,
                r,
                j as u32 + 1,
                winner_of(prev[j * 2]),
                winner_of(prev[j * 2 + 1]),
            ));
            ids.push(id);
        }
        winners.push(ids);
    }

    for d in drops {
        let source = winners
            .get(d.winners_round as usize - 1)
            .and_then(|round| round.get(d.winners_index as usize - 1))
            .copied()
            .ok_or_else(|| {
                EngineError::TopologyViolation(format!(
                    "loser table for size {size} references winners round {} match {}",
                    d.winners_round, d.winners_index
                ))
            })?;
        let key = (d.branch, d.losers_round, d.losers_index, d.slot);
        if drop_source.insert(key, source).is_some() {
            return Err(EngineError::TopologyViolation(format!(
                "loser table for size {size} targets {:?} round {} match {} slot {:?} twice",
                d.branch, d.losers_round, d.losers_index, d.slot
            )));
        }
    }

    let table_slot = |drop_source: &HashMap<(Bracket, u32, u32, SlotIndex), MatchId>,
                      branch: Bracket,
                      round: u32,
                      index: u32,
                      slot: SlotIndex|
     -> Result<Slot, EngineError> {
        drop_source
            .get(&(branch, round, index, slot))
            .copied()
            .map(loser_of)
            .ok_or_else(|| {
                EngineError::TopologyViolation(format!(
                    "loser table for size {size} missing entry for {branch:?} round {round} match {index}"
                ))
            })
    };

    // Losers bracket: branch-A round k pairs up survivors, branch-B round k
    // adds the loser dropping from winners round k+1.
    let mut b_rounds: Vec<Vec<MatchId>> = Vec::new();
    for k in 1..rounds {
        let count = size >> (k + 1);
        let mut a_ids = Vec::new();
        for j in 1..=count as u32 {
            let (slot1, slot2) = if k == 1 {
                (
                    table_slot(&drop_source, Bracket::LosersBranchA, 1, j, SlotIndex::One)?,
                    table_slot(&drop_source, Bracket::LosersBranchA, 1, j, SlotIndex::Two)?,
                )
            } else {
                let prev = &b_rounds[k as usize - 2];
                (
                    winner_of(prev[(j as usize - 1) * 2]),
                    winner_of(prev[(j as usize - 1) * 2 + 1]),
                )
            };
            let id = registry.insert(BracketMatch::new(
                Bracket::LosersBranchA,
                group,
                k,
                j,
                slot1,
                slot2,
            ));
            a_ids.push(id);
        }
        let mut b_ids = Vec::new();
        for j in 1..=count as u32 {
            let slot2 =
                table_slot(&drop_source, Bracket::LosersBranchB, k, j, SlotIndex::Two)?;
            let id = registry.insert(BracketMatch::new(
                Bracket::LosersBranchB,
                group,
                k,
                j,
                winner_of(a_ids[j as usize - 1]),
                slot2,
            ));
            b_ids.push(id);
        }
        b_rounds.push(b_ids);
    }

    let winners_final = *winners
        .last()
        .and_then(|round| round.first())
        .ok_or_else(|| EngineError::TopologyViolation("empty winners bracket".to_string()))?;

    // With no losers rounds (bracket of 2) the final is a direct rematch.
    let losers_champion = match b_rounds.last().and_then(|round| round.first()) {
        Some(id) => winner_of(*id),
        None => loser_of(winners_final),
    };

    // Final slot convention: slot1 is the winners-path finalist, slot2 the
    // losers-path finalist. The bracket-reset rule depends on this.
    let final_id = registry.insert(BracketMatch::new(
        final_bracket,
        group,
        1,
        1,
        winner_of(winners_final),
        losers_champion,
    ));
    Ok(final_id)
}

/// Cross bracket: each group's champion meets the other group's runner-up.
fn build_cross_bracket(registry: &mut MatchRegistry, a_final: MatchId, b_final: MatchId) {
    let semi1 = registry.insert(BracketMatch::new(
        Bracket::CrossSemifinal,
        None,
        1,
        1,
        winner_of(a_final),
        loser_of(b_final),
    ));
    let semi2 = registry.insert(BracketMatch::new(
        Bracket::CrossSemifinal,
        None,
        1,
        2,
        winner_of(b_final),
        loser_of(a_final),
    ));
    registry.insert(BracketMatch::new(
        Bracket::CrossFinal,
        None,
        1,
        1,
        winner_of(semi1),
        winner_of(semi2),
    ));
}

/// Standard bracket seeding order: 1 vs N, 2 vs N-1, recursively per half.
/// Returns 1-based seed positions; adjacent pairs meet in round 1.
fn seed_positions(size: usize) -> Vec<u32> {
    let mut seeds = vec![1u32];
    while seeds.len() < size {
        let n = seeds.len() as u32;
        let mut next = Vec::with_capacity(seeds.len() * 2);
        for seed in seeds {
            next.push(seed);
            next.push(n * 2 + 1 - seed);
        }
        seeds = next;
    }
    seeds
}

/// Post-build graph check: every outcome feeds exactly the number of
/// destinations its bracket allows. Failing here aborts tournament creation.
fn validate_topology(registry: &MatchRegistry) -> Result<(), EngineError> {
    for m in registry.iter() {
        let mut winner_edges = 0usize;
        let mut loser_edges = 0usize;
        for (dest, slot) in registry.declared_edges_of(m.id) {
            let feeder = registry
                .get(dest)
                .and_then(|d| d.slot(slot).feeder())
                .ok_or_else(|| {
                    EngineError::TopologyViolation(format!(
                        "edge index on match {} points at a non-feeder slot",
                        m.id
                    ))
                })?;
            match feeder.role {
                FeederRole::Winner => winner_edges += 1,
                FeederRole::Loser => loser_edges += 1,
            }
        }
        let (want_winner, want_loser) = match m.bracket {
            Bracket::Final | Bracket::CrossFinal => (0, 0),
            Bracket::GroupFinal => (1, 1),
            Bracket::Winners => (1, 1),
            Bracket::LosersBranchA | Bracket::LosersBranchB | Bracket::CrossSemifinal => (1, 0),
        };
        if winner_edges != want_winner || loser_edges != want_loser {
            return Err(EngineError::TopologyViolation(format!(
                "{:?} round {} match {} has {} winner / {} loser edges (expected {}/{})",
                m.bracket, m.round, m.sequence, winner_edges, loser_edges, want_winner, want_loser
            )));
        }
    }
    Ok(())
}
