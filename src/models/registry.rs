//! Match registry: keyed store of all matches for one tournament.

use crate::models::bracket_match::{
    Bracket, BracketMatch, FeederRef, GroupTag, MatchId, Slot, SlotIndex,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All matches of a tournament, with id lookup and a reverse feeder index.
///
/// The feeder index answers "which (match, slot) pairs hold an unresolved
/// feeder on source X" in O(outdegree), so the cascade never scans the whole
/// tournament to find downstream targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRegistry {
    matches: HashMap<MatchId, BracketMatch>,
    /// Creation order, for a stable bracket view.
    order: Vec<MatchId>,
    /// source match id -> slots waiting on its outcome.
    feeds: HashMap<MatchId, Vec<(MatchId, SlotIndex)>>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self {
            matches: HashMap::new(),
            order: Vec::new(),
            feeds: HashMap::new(),
        }
    }

    /// Insert a match, indexing any feeder slots it carries.
    pub fn insert(&mut self, m: BracketMatch) -> MatchId {
        let id = m.id;
        if let Some(f) = m.slot1.feeder() {
            self.feeds.entry(f.source).or_default().push((id, SlotIndex::One));
        }
        if let Some(f) = m.slot2.feeder() {
            self.feeds.entry(f.source).or_default().push((id, SlotIndex::Two));
        }
        self.order.push(id);
        self.matches.insert(id, m);
        id
    }

    pub fn get(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches.get(&id)
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut BracketMatch> {
        self.matches.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All matches in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &BracketMatch> {
        self.order.iter().filter_map(|id| self.matches.get(id))
    }

    /// Downstream slots still holding an unresolved feeder on `source`.
    pub fn dependents_of(&self, source: MatchId) -> Vec<(MatchId, SlotIndex)> {
        let Some(entries) = self.feeds.get(&source) else {
            return Vec::new();
        };
        entries
            .iter()
            .copied()
            .filter(|(dest, slot)| {
                self.matches
                    .get(dest)
                    .map(|m| m.slot(*slot).feeder().is_some())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Feeder edges (resolved or not) declared against `source` at build time.
    pub fn declared_edges_of(&self, source: MatchId) -> Vec<(MatchId, SlotIndex)> {
        self.feeds.get(&source).cloned().unwrap_or_default()
    }

    /// Retarget every feeder edge on `from` to `to` (used when an on-demand
    /// reset final replaces the first final as the bracket's deciding match).
    pub fn retarget_feeders(&mut self, from: MatchId, to: MatchId) {
        let entries = match self.feeds.remove(&from) {
            Some(e) => e,
            None => return,
        };
        for (dest, slot) in &entries {
            if let Some(m) = self.matches.get_mut(dest) {
                if let Slot::Feeder(FeederRef { source, .. }) = m.slot_mut(*slot) {
                    if *source == from {
                        *source = to;
                    }
                }
            }
        }
        self.feeds.entry(to).or_default().extend(entries);
    }

    /// Matches in a given bracket (and group, when tagged), in creation order.
    pub fn matches_in(
        &self,
        bracket: Bracket,
        group: Option<GroupTag>,
    ) -> impl Iterator<Item = &BracketMatch> {
        self.iter()
            .filter(move |m| m.bracket == bracket && m.group == group)
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
