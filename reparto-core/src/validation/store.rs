//! The generation-guarded per-slot state map.

use std::collections::BTreeMap;

use log::debug;

use super::{Generation, SlotId, ValidationState};
use crate::{Address, GeoPoint, ResolveError};

/// Result of recording an edit with [`ValidationStore::record_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The edited slot.
    pub slot: SlotId,
    /// Generation assigned to this edit.
    pub generation: Generation,
    /// State the slot moved to: `Pending` or `Unknown`.
    pub state: ValidationState,
    /// The address to resolve, or `None` when the text is blank.
    pub address: Option<Address>,
}

/// Result of [`ValidationStore::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The result belonged to the current generation and is now visible.
    Committed(ValidationState),
    /// The result belonged to an older edit and was dropped.
    Stale {
        /// The slot's generation at the time of the commit attempt.
        current: Generation,
    },
}

/// Read-only view of a slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotSnapshot {
    /// The slot.
    pub slot: SlotId,
    /// Current generation.
    pub generation: Generation,
    /// Visible state.
    pub state: ValidationState,
    /// Last text entered into the slot.
    pub address: Address,
    /// Coordinate behind a `Valid` state.
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
struct SlotEntry {
    generation: Generation,
    state: ValidationState,
    address: Address,
    location: Option<GeoPoint>,
}

impl Default for SlotEntry {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            state: ValidationState::Unknown,
            address: Address::new(""),
            location: None,
        }
    }
}

/// Slot-to-state map with generation-guarded commits.
///
/// Entries are never removed: clearing a field is an edit to empty text, so
/// generations stay monotonic for the whole session and a late result for a
/// cleared field is still recognised as stale.
///
/// # Examples
/// ```
/// use reparto_core::{
///     CommitOutcome, GeoPoint, ResolveError, SlotId, ValidationState, ValidationStore,
/// };
///
/// let mut store = ValidationStore::new();
/// let first = store.record_edit(SlotId::Start, "Peru 10");
/// let second = store.record_edit(SlotId::Start, "Peru 100");
///
/// // The reply for the newer edit lands first...
/// let outcome = store.commit(SlotId::Start, second.generation, &Ok(GeoPoint::new(1.0, 2.0)));
/// assert_eq!(outcome, CommitOutcome::Committed(ValidationState::Valid));
///
/// // ...and the older reply is discarded.
/// let late = store.commit(
///     SlotId::Start,
///     first.generation,
///     &Err(ResolveError::NotFound { query: "Peru 10".into() }),
/// );
/// assert!(matches!(late, CommitOutcome::Stale { .. }));
/// assert_eq!(store.state(SlotId::Start), ValidationState::Valid);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationStore {
    slots: BTreeMap<SlotId, SlotEntry>,
}

impl ValidationStore {
    /// An empty store; every slot reads as `Unknown`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record new text for `slot`.
    ///
    /// Bumps the generation and moves the slot to `Pending` (non-blank text)
    /// or `Unknown` (blank text). The caller is responsible for cancelling
    /// any outstanding resolution for the slot and, when
    /// [`Edit::address`] is `Some`, starting a new one tagged with
    /// [`Edit::generation`].
    pub fn record_edit(&mut self, slot: SlotId, text: &str) -> Edit {
        let entry = self.slots.entry(slot).or_default();
        let address = Address::new(text);
        entry.generation = entry.generation.next();
        entry.location = None;
        entry.state = if address.is_blank() {
            ValidationState::Unknown
        } else {
            ValidationState::Pending
        };
        entry.address = address.clone();
        Edit {
            slot,
            generation: entry.generation,
            state: entry.state,
            address: (!address.is_blank()).then_some(address),
        }
    }

    /// Apply a resolution result for `generation` of `slot`.
    ///
    /// The result is committed only when `generation` is the slot's current
    /// generation and the slot is still waiting for it; otherwise it is
    /// discarded and the visible state is left untouched.
    pub fn commit(
        &mut self,
        slot: SlotId,
        generation: Generation,
        outcome: &Result<GeoPoint, ResolveError>,
    ) -> CommitOutcome {
        let Some(entry) = self.slots.get_mut(&slot) else {
            debug!("dropping result for untouched slot {slot} ({generation})");
            return CommitOutcome::Stale {
                current: Generation::default(),
            };
        };
        if entry.generation != generation || entry.state != ValidationState::Pending {
            debug!(
                "dropping stale result for {slot}: {generation} superseded by {}",
                entry.generation
            );
            return CommitOutcome::Stale {
                current: entry.generation,
            };
        }
        match outcome {
            Ok(point) => {
                entry.state = ValidationState::Valid;
                entry.location = Some(*point);
            }
            Err(_) => {
                entry.state = ValidationState::Invalid;
                entry.location = None;
            }
        }
        CommitOutcome::Committed(entry.state)
    }

    /// Visible state of `slot`.
    #[must_use]
    pub fn state(&self, slot: SlotId) -> ValidationState {
        self.slots
            .get(&slot)
            .map_or(ValidationState::Unknown, |entry| entry.state)
    }

    /// Current generation of `slot`; zero if never edited.
    #[must_use]
    pub fn generation(&self, slot: SlotId) -> Generation {
        self.slots
            .get(&slot)
            .map_or_else(Generation::default, |entry| entry.generation)
    }

    /// Last text recorded for `slot`.
    #[must_use]
    pub fn address(&self, slot: SlotId) -> Option<&Address> {
        self.slots.get(&slot).map(|entry| &entry.address)
    }

    /// Coordinate behind a `Valid` slot.
    #[must_use]
    pub fn location(&self, slot: SlotId) -> Option<GeoPoint> {
        self.slots.get(&slot).and_then(|entry| entry.location)
    }

    /// Snapshot of one slot.
    #[must_use]
    pub fn snapshot(&self, slot: SlotId) -> SlotSnapshot {
        let entry = self.slots.get(&slot).cloned().unwrap_or_default();
        SlotSnapshot {
            slot,
            generation: entry.generation,
            state: entry.state,
            address: entry.address,
            location: entry.location,
        }
    }

    /// Snapshots of every slot ever edited: start, stops by line, end.
    pub fn snapshots(&self) -> impl Iterator<Item = SlotSnapshot> + '_ {
        self.slots.keys().map(|slot| self.snapshot(*slot))
    }

    /// Whether no slot is `Pending`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.slots
            .values()
            .all(|entry| entry.state != ValidationState::Pending)
    }
}
