//! Per-field validation state.
//!
//! Every input field (start, end, each line of the stop list) owns a slot.
//! Each edit bumps the slot's [`Generation`]; a resolution result is only
//! committed when it carries the slot's current generation, so a slow reply
//! to an old edit can never overwrite the outcome of a newer one. The store
//! is plain data: whoever owns it applies edits and completions one at a
//! time, which is what makes it race-free without locks.

mod state;
mod store;

pub use state::{Generation, SlotId, ValidationState};
pub use store::{CommitOutcome, Edit, SlotSnapshot, ValidationStore};
