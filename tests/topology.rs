//! Integration tests for topology generation: shape, seeding, and validation.

use bracket_engine::{
    create_tournament, Bracket, EngineError, FeederRole, Format, GeneratedParticipants, GroupTag,
    MatchState, ParticipantRegistry, Slot, Tournament,
};
use std::collections::HashMap;

fn tournament(count: usize, format: Format) -> Tournament {
    let participants = GeneratedParticipants.list_seeded_participants(count);
    create_tournament(participants, format).unwrap()
}

/// Outgoing (winner, loser) edge counts per source match, scanned from slots.
fn edge_counts(t: &Tournament) -> HashMap<bracket_engine::MatchId, (usize, usize)> {
    let mut counts = HashMap::new();
    for m in t.bracket_view() {
        for slot in [&m.slot1, &m.slot2] {
            if let Slot::Feeder(f) = slot {
                let entry = counts.entry(f.source).or_insert((0, 0));
                match f.role {
                    FeederRole::Winner => entry.0 += 1,
                    FeederRole::Loser => entry.1 += 1,
                }
            }
        }
    }
    counts
}

#[test]
fn rejects_non_power_of_two_and_tiny_fields() {
    for count in [0, 2, 3, 6, 12, 20] {
        let participants = GeneratedParticipants.list_seeded_participants(count);
        assert!(matches!(
            create_tournament(participants, Format::SingleGroup),
            Err(EngineError::InvalidParticipantCount { .. })
        ));
    }
}

#[test]
fn every_supported_size_has_exactly_one_terminal_match() {
    for count in [4, 8, 16, 32] {
        for format in [Format::SingleGroup, Format::GroupStage] {
            let t = tournament(count, format);
            let terminals = t
                .bracket_view()
                .iter()
                .filter(|m| m.bracket.is_terminal())
                .count();
            assert_eq!(terminals, 1, "count={count} format={format:?}");
        }
    }
}

#[test]
fn every_outcome_has_the_right_number_of_destinations() {
    for count in [4, 8, 16, 32] {
        for format in [Format::SingleGroup, Format::GroupStage] {
            let t = tournament(count, format);
            let counts = edge_counts(&t);
            for m in t.bracket_view() {
                let (winners, losers) = counts.get(&m.id).copied().unwrap_or((0, 0));
                let (want_w, want_l) = match m.bracket {
                    Bracket::Final | Bracket::CrossFinal => (0, 0),
                    Bracket::Winners | Bracket::GroupFinal => (1, 1),
                    _ => (1, 0),
                };
                assert_eq!(
                    (winners, losers),
                    (want_w, want_l),
                    "count={count} format={format:?} bracket={:?} round={} seq={}",
                    m.bracket,
                    m.round,
                    m.sequence
                );
            }
        }
    }
}

#[test]
fn winners_round_sizes_follow_halving() {
    let t = tournament(16, Format::SingleGroup);
    for (round, expected) in [(1u32, 8usize), (2, 4), (3, 2), (4, 1)] {
        let count = t
            .matches_in(Bracket::Winners, None)
            .iter()
            .filter(|m| m.round == round)
            .count();
        assert_eq!(count, expected, "winners round {round}");
    }
}

#[test]
fn round_one_uses_standard_bracket_seeding() {
    let t = tournament(8, Format::SingleGroup);
    let round1 = t.matches_in(Bracket::Winners, None);
    let first = round1[0];
    let seed = |slot: &Slot| {
        t.participant(slot.participant().unwrap()).unwrap().seed
    };
    // Seed 1 meets seed 8 in round 1 match 1.
    assert_eq!(seed(&first.slot1), 1);
    assert_eq!(seed(&first.slot2), 8);
    // Every round-1 pairing sums to P + 1.
    for m in round1.iter().filter(|m| m.round == 1) {
        assert_eq!(seed(&m.slot1) + seed(&m.slot2), 9);
    }
}

#[test]
fn only_round_one_matches_start_ready() {
    let t = tournament(16, Format::SingleGroup);
    for m in t.bracket_view() {
        let expected = if m.bracket == Bracket::Winners && m.round == 1 {
            MatchState::Ready
        } else {
            MatchState::AwaitingSlots
        };
        assert_eq!(m.state, expected, "{:?} round {}", m.bracket, m.round);
    }
}

#[test]
fn group_stage_builds_two_tagged_groups_and_a_cross_bracket() {
    let t = tournament(32, Format::GroupStage);
    for group in [GroupTag::A, GroupTag::B] {
        assert_eq!(t.matches_in(Bracket::Winners, Some(group)).len(), 15);
        assert_eq!(t.matches_in(Bracket::GroupFinal, Some(group)).len(), 1);
    }
    let semis = t.matches_in(Bracket::CrossSemifinal, None);
    assert_eq!(semis.len(), 2);
    assert_eq!(t.matches_in(Bracket::CrossFinal, None).len(), 1);
    // Each semi pairs one group's champion feeder with the other's runner-up.
    for semi in semis {
        let f1 = semi.slot1.feeder().unwrap();
        let f2 = semi.slot2.feeder().unwrap();
        assert_eq!(f1.role, FeederRole::Winner);
        assert_eq!(f2.role, FeederRole::Loser);
        let g1 = t.registry.get(f1.source).unwrap().group.unwrap();
        let g2 = t.registry.get(f2.source).unwrap().group.unwrap();
        assert_ne!(g1, g2);
    }
}

#[test]
fn group_stage_of_four_degenerates_to_rematch_finals() {
    // Groups of two: a single winners match whose loser feeds the group final.
    let t = tournament(4, Format::GroupStage);
    for group in [GroupTag::A, GroupTag::B] {
        assert_eq!(t.matches_in(Bracket::Winners, Some(group)).len(), 1);
        assert_eq!(t.matches_in(Bracket::LosersBranchA, Some(group)).len(), 0);
        let final_match = t.matches_in(Bracket::GroupFinal, Some(group))[0];
        assert_eq!(
            final_match.slot2.feeder().unwrap().role,
            FeederRole::Loser
        );
    }
}

#[test]
fn total_match_counts_match_double_elimination_math() {
    // P entrants: P-1 winners-path matches (incl. final) + P-2 losers matches.
    let t = tournament(8, Format::SingleGroup);
    assert_eq!(t.bracket_view().len(), 7 + 6 + 1);

    let t = tournament(32, Format::SingleGroup);
    assert_eq!(t.bracket_view().len(), 31 + 30 + 1);
}
