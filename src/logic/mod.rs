//! Bracket engine logic: topology building, advancement, cascade, guards.

pub mod advancement;
pub mod cascade;
pub mod guard;
pub mod loser_map;
mod submit;
mod topology;

pub use advancement::{resolve, Effect, SlotAssignment};
pub use cascade::{apply_effects, CascadeOutcome};
pub use guard::check as check_consistency;
pub use submit::{submit_result, SubmitOutcome};
pub use topology::create_tournament;
