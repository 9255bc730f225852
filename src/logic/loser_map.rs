//! Fixed loser-destination mapping tables, per supported bracket size.
//!
//! Which losers-bracket slot a winners-round loser drops into is combinatorial
//! format data, not logic: each supported size carries its own table, keyed by
//! (winners round, match index). Entries for rounds past the first use
//! cross-over permutations (reversed or half-swapped order) so participants
//! from the same winners-bracket path do not immediately rematch.

use crate::models::{Bracket, SlotIndex};

/// One table entry: the loser of winners-round `winners_round`, match
/// `winners_index` drops into the given losers-bracket slot. Indices are
/// 1-based sequence numbers within their round.
#[derive(Clone, Copy, Debug)]
pub struct LoserDrop {
    pub winners_round: u32,
    pub winners_index: u32,
    pub branch: Bracket,
    pub losers_round: u32,
    pub losers_index: u32,
    pub slot: SlotIndex,
}

const fn drop_to(
    winners_round: u32,
    winners_index: u32,
    branch: Bracket,
    losers_round: u32,
    losers_index: u32,
    slot: SlotIndex,
) -> LoserDrop {
    LoserDrop {
        winners_round,
        winners_index,
        branch,
        losers_round,
        losers_index,
        slot,
    }
}

use Bracket::{LosersBranchA as A, LosersBranchB as B};
use SlotIndex::{One as S1, Two as S2};

/// Size 2: a single winners match and no losers bracket; the loser feeds the
/// final directly (wired by the builder, no table entries).
static DROPS_2: &[LoserDrop] = &[];

static DROPS_4: &[LoserDrop] = &[
    drop_to(1, 1, A, 1, 1, S1),
    drop_to(1, 2, A, 1, 1, S2),
    drop_to(2, 1, B, 1, 1, S2),
];

static DROPS_8: &[LoserDrop] = &[
    drop_to(1, 1, A, 1, 1, S1),
    drop_to(1, 2, A, 1, 1, S2),
    drop_to(1, 3, A, 1, 2, S1),
    drop_to(1, 4, A, 1, 2, S2),
    // W2 losers cross over (reversed order).
    drop_to(2, 1, B, 1, 2, S2),
    drop_to(2, 2, B, 1, 1, S2),
    drop_to(3, 1, B, 2, 1, S2),
];

static DROPS_16: &[LoserDrop] = &[
    drop_to(1, 1, A, 1, 1, S1),
    drop_to(1, 2, A, 1, 1, S2),
    drop_to(1, 3, A, 1, 2, S1),
    drop_to(1, 4, A, 1, 2, S2),
    drop_to(1, 5, A, 1, 3, S1),
    drop_to(1, 6, A, 1, 3, S2),
    drop_to(1, 7, A, 1, 4, S1),
    drop_to(1, 8, A, 1, 4, S2),
    // W2 losers reversed.
    drop_to(2, 1, B, 1, 4, S2),
    drop_to(2, 2, B, 1, 3, S2),
    drop_to(2, 3, B, 1, 2, S2),
    drop_to(2, 4, B, 1, 1, S2),
    // W3 losers half-swapped.
    drop_to(3, 1, B, 2, 2, S2),
    drop_to(3, 2, B, 2, 1, S2),
    drop_to(4, 1, B, 3, 1, S2),
];

static DROPS_32: &[LoserDrop] = &[
    drop_to(1, 1, A, 1, 1, S1),
    drop_to(1, 2, A, 1, 1, S2),
    drop_to(1, 3, A, 1, 2, S1),
    drop_to(1, 4, A, 1, 2, S2),
    drop_to(1, 5, A, 1, 3, S1),
    drop_to(1, 6, A, 1, 3, S2),
    drop_to(1, 7, A, 1, 4, S1),
    drop_to(1, 8, A, 1, 4, S2),
    drop_to(1, 9, A, 1, 5, S1),
    drop_to(1, 10, A, 1, 5, S2),
    drop_to(1, 11, A, 1, 6, S1),
    drop_to(1, 12, A, 1, 6, S2),
    drop_to(1, 13, A, 1, 7, S1),
    drop_to(1, 14, A, 1, 7, S2),
    drop_to(1, 15, A, 1, 8, S1),
    drop_to(1, 16, A, 1, 8, S2),
    // W2 losers reversed.
    drop_to(2, 1, B, 1, 8, S2),
    drop_to(2, 2, B, 1, 7, S2),
    drop_to(2, 3, B, 1, 6, S2),
    drop_to(2, 4, B, 1, 5, S2),
    drop_to(2, 5, B, 1, 4, S2),
    drop_to(2, 6, B, 1, 3, S2),
    drop_to(2, 7, B, 1, 2, S2),
    drop_to(2, 8, B, 1, 1, S2),
    // W3 losers half-swapped.
    drop_to(3, 1, B, 2, 3, S2),
    drop_to(3, 2, B, 2, 4, S2),
    drop_to(3, 3, B, 2, 1, S2),
    drop_to(3, 4, B, 2, 2, S2),
    // W4 losers reversed.
    drop_to(4, 1, B, 3, 2, S2),
    drop_to(4, 2, B, 3, 1, S2),
    drop_to(5, 1, B, 4, 1, S2),
];

/// Table for the given bracket size (entrants per bracket), if supported.
pub fn loser_drops(bracket_size: usize) -> Option<&'static [LoserDrop]> {
    match bracket_size {
        2 => Some(DROPS_2),
        4 => Some(DROPS_4),
        8 => Some(DROPS_8),
        16 => Some(DROPS_16),
        32 => Some(DROPS_32),
        _ => None,
    }
}
