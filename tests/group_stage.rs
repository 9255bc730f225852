//! Integration tests for the group-stage format: two double-elimination
//! groups feeding the cross bracket.

use bracket_engine::{
    create_tournament, resolve, submit_result, Bracket, Format, GeneratedParticipants, GroupTag,
    MatchState, ParticipantRegistry, Tournament, TournamentStatus,
};
use std::collections::HashSet;

fn tournament(count: usize) -> Tournament {
    let participants = GeneratedParticipants.list_seeded_participants(count);
    create_tournament(participants, Format::GroupStage).unwrap()
}

fn seed_of(t: &Tournament, slot: &bracket_engine::Slot) -> Option<u32> {
    slot.participant().map(|id| t.participant(id).unwrap().seed)
}

/// Submit the next ready match passing `filter`, lower seed winning.
/// Returns false when no such match is ready.
fn play_one_favorite(t: &mut Tournament, filter: impl Fn(&bracket_engine::BracketMatch) -> bool) -> bool {
    let next = t
        .ready_matches()
        .iter()
        .filter(|m| filter(m))
        .map(|m| (m.id, seed_of(t, &m.slot1).unwrap(), seed_of(t, &m.slot2).unwrap()))
        .next();
    let Some((id, s1, s2)) = next else {
        return false;
    };
    if s1 < s2 {
        submit_result(t, id, 3, 1).unwrap();
    } else {
        submit_result(t, id, 1, 3).unwrap();
    }
    true
}

#[test]
fn cross_semis_populate_once_both_group_finals_resolve() {
    let mut t = tournament(32);

    // Play out both groups; leave the cross bracket untouched.
    let in_groups = |m: &bracket_engine::BracketMatch| m.group.is_some();
    while play_one_favorite(&mut t, in_groups) {}

    let semis = t.matches_in(Bracket::CrossSemifinal, None);
    assert_eq!(semis.len(), 2);
    let mut qualifiers = HashSet::new();
    for semi in &semis {
        assert_eq!(semi.state, MatchState::Ready);
        qualifiers.insert(semi.slot1.participant().unwrap());
        qualifiers.insert(semi.slot2.participant().unwrap());
    }
    // Exactly 4 distinct qualifiers across both semifinals.
    assert_eq!(qualifiers.len(), 4);

    // Seeds alternate between groups, so with favorites winning everywhere:
    // group A sends global seeds 1 and 3, group B sends 2 and 4, and each
    // semi pairs one group's champion with the other group's runner-up.
    let semi1 = semis.iter().find(|m| m.sequence == 1).unwrap();
    let semi2 = semis.iter().find(|m| m.sequence == 2).unwrap();
    assert_eq!(seed_of(&t, &semi1.slot1), Some(1));
    assert_eq!(seed_of(&t, &semi1.slot2), Some(4));
    assert_eq!(seed_of(&t, &semi2.slot1), Some(2));
    assert_eq!(seed_of(&t, &semi2.slot2), Some(3));

    assert_eq!(t.status, TournamentStatus::InProgress);

    // Finish the cross bracket: the overall favorite takes the event.
    while play_one_favorite(&mut t, |_| true) {}
    assert_eq!(t.status, TournamentStatus::Finished);
    assert_eq!(t.participant(t.champion.unwrap()).unwrap().seed, 1);
}

#[test]
fn group_reset_defers_cross_population_until_the_second_final() {
    let mut t = tournament(8);

    // Play group A up to (not including) its group final.
    let before_final =
        |m: &bracket_engine::BracketMatch| m.group == Some(GroupTag::A) && m.bracket != Bracket::GroupFinal;
    while play_one_favorite(&mut t, before_final) {}

    let final_a = t.matches_in(Bracket::GroupFinal, Some(GroupTag::A))[0].id;
    assert_eq!(t.registry.get(final_a).unwrap().state, MatchState::Ready);

    // Losers-path qualifier (slot 2) wins the first group final.
    submit_result(&mut t, final_a, 1, 3).unwrap();

    // Group A is not decided: a reset final exists and the cross semis are
    // still waiting.
    let finals_a = t.matches_in(Bracket::GroupFinal, Some(GroupTag::A));
    assert_eq!(finals_a.len(), 2);
    let reset = finals_a.iter().find(|m| m.round == 2).unwrap();
    assert_eq!(reset.state, MatchState::Ready);
    let reset_id = reset.id;
    for semi in t.matches_in(Bracket::CrossSemifinal, None) {
        assert_eq!(semi.state, MatchState::AwaitingSlots);
        for slot in [&semi.slot1, &semi.slot2] {
            if let Some(feeder) = slot.feeder() {
                // Qualifier feeders now wait on the reset final, never on the
                // completed-but-undecided first final.
                let source = t.registry.get(feeder.source).unwrap();
                assert_ne!(source.id, final_a);
                if source.group == Some(GroupTag::A) {
                    assert_eq!(source.id, reset_id);
                }
            }
        }
    }

    // The reset decides the group; its winner and loser qualify.
    submit_result(&mut t, reset_id, 3, 2).unwrap();
    let decided = t.registry.get(reset_id).unwrap().clone();
    let semi1 = t.matches_in(Bracket::CrossSemifinal, None)[0];
    let semi2 = t.matches_in(Bracket::CrossSemifinal, None)[1];
    assert_eq!(semi1.slot1.participant(), decided.winner);
    assert_eq!(semi2.slot2.participant(), decided.loser);
}

#[test]
fn re_resolving_a_settled_group_final_yields_nothing() {
    let mut t = tournament(8);

    // Play both groups out; the cross semis are now populated.
    let in_groups = |m: &bracket_engine::BracketMatch| m.group.is_some();
    while play_one_favorite(&mut t, in_groups) {}

    // Redelivery of the deciding final's completion has nothing left to do:
    // both qualifier slots are already bound.
    let final_a = t.matches_in(Bracket::GroupFinal, Some(GroupTag::A))[0].clone();
    assert_eq!(final_a.state, MatchState::Completed);
    assert_eq!(resolve(&final_a, &t.registry).unwrap(), Vec::new());
}

#[test]
fn full_group_stage_run_produces_a_champion() {
    let mut t = tournament(16);
    while play_one_favorite(&mut t, |_| true) {}

    assert_eq!(t.status, TournamentStatus::Finished);
    assert_eq!(t.participant(t.champion.unwrap()).unwrap().seed, 1);
    assert!(!t.needs_review);

    // Every match that ever became ready was completed; nothing is stale.
    for m in t.bracket_view() {
        assert_ne!(m.state, MatchState::Ready, "{:?} left unplayed", m.bracket);
    }
}
