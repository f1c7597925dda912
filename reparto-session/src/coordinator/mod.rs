//! Debounced, cancellable per-slot address validation.
//!
//! Every edit bumps the slot's generation in the owned [`ValidationStore`]
//! and cancels the lookup still running for that slot. Lookups run as Tokio
//! tasks and report back over a channel; the coordinator applies those
//! reports one at a time, and the store drops any whose generation is no
//! longer current.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use reparto_core::{
    Address, CommitOutcome, GeoPoint, GeoResolver, Generation, ResolveError, SlotId,
    SlotSnapshot, ValidationState, ValidationStore,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::{CoordinatorBuildError, ValidationConfig};

/// A committed change to one slot's visible state.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotUpdate {
    /// Slot the update belongs to.
    pub slot: SlotId,
    /// Generation whose lookup produced the update.
    pub generation: Generation,
    /// `Valid` or `Invalid`.
    pub state: ValidationState,
    /// Resolved coordinate when valid.
    pub location: Option<GeoPoint>,
    /// Lookup failure when invalid.
    pub error: Option<ResolveError>,
}

#[derive(Debug)]
struct Completion {
    slot: SlotId,
    generation: Generation,
    outcome: Result<GeoPoint, ResolveError>,
}

#[derive(Debug)]
struct InFlight {
    generation: Generation,
    token: CancellationToken,
}

/// Drives per-field validation for one editing session.
///
/// The coordinator owns the state store; only `&mut self` methods mutate
/// it, so completions are applied serially. Call
/// [`next_update`](Self::next_update) (or [`settle`](Self::settle)) to pull
/// finished lookups into the store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use reparto_core::test_support::TableResolver;
/// use reparto_core::{GeoPoint, SlotId, ValidationState};
/// use reparto_session::{ValidationConfig, ValidationCoordinator};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let resolver = Arc::new(TableResolver::new().with_point("Depot", GeoPoint::new(1.0, 2.0)));
/// let mut coordinator = ValidationCoordinator::new(resolver, ValidationConfig::default()).unwrap();
///
/// coordinator.on_text_changed(SlotId::Start, "Depot");
/// assert_eq!(coordinator.state(SlotId::Start), ValidationState::Pending);
///
/// coordinator.settle().await;
/// assert_eq!(coordinator.state(SlotId::Start), ValidationState::Valid);
/// # });
/// ```
pub struct ValidationCoordinator<R: ?Sized> {
    resolver: Arc<R>,
    config: ValidationConfig,
    runtime: Handle,
    store: ValidationStore,
    in_flight: BTreeMap<SlotId, InFlight>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl<R: ?Sized> std::fmt::Debug for ValidationCoordinator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationCoordinator")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<R> ValidationCoordinator<R>
where
    R: GeoResolver + ?Sized + 'static,
{
    /// Create a coordinator that spawns lookups on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorBuildError::NoRuntime`] when called outside a
    /// Tokio runtime.
    pub fn new(resolver: Arc<R>, config: ValidationConfig) -> Result<Self, CoordinatorBuildError> {
        let runtime = Handle::try_current().map_err(|_| CoordinatorBuildError::NoRuntime)?;
        Ok(Self::with_handle(resolver, config, runtime))
    }

    /// Create a coordinator that spawns lookups on `runtime`.
    #[must_use]
    pub fn with_handle(resolver: Arc<R>, config: ValidationConfig, runtime: Handle) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            resolver,
            config,
            runtime,
            store: ValidationStore::new(),
            in_flight: BTreeMap::new(),
            completions_tx,
            completions_rx,
        }
    }

    /// Record new text for `slot` and schedule its lookup.
    ///
    /// The slot moves to `Pending` (or `Unknown` when the text is blank),
    /// any lookup still running for it is cancelled, and a new one starts
    /// after the debounce delay. Returns the slot's new generation.
    pub fn on_text_changed(&mut self, slot: SlotId, text: &str) -> Generation {
        let edit = self.store.record_edit(slot, text);
        self.cancel(slot);
        match edit.address {
            Some(address) => self.dispatch(slot, edit.generation, address),
            None => debug!("{slot} cleared at {}", edit.generation),
        }
        edit.generation
    }

    /// Record the whole intermediate list, one address per line.
    ///
    /// Line `i` feeds slot `Intermediate(i)`. Only lines whose trimmed text
    /// differs from the slot's current text start a new generation; slots
    /// beyond the last line are cleared. Returns the slots that changed.
    pub fn on_lines_changed(&mut self, text: &str) -> Vec<(SlotId, Generation)> {
        let lines: Vec<&str> = text.lines().collect();
        let mut changed = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let slot = SlotId::Intermediate(index);
            if self.current_text(slot) != line.trim() {
                changed.push((slot, self.on_text_changed(slot, line)));
            }
        }

        let line_count = lines.len();
        let orphaned: Vec<SlotId> = self
            .store
            .snapshots()
            .filter(|snapshot| {
                matches!(snapshot.slot, SlotId::Intermediate(index) if index >= line_count)
                    && !snapshot.address.is_blank()
            })
            .map(|snapshot| snapshot.slot)
            .collect();
        for slot in orphaned {
            changed.push((slot, self.on_text_changed(slot, "")));
        }
        changed
    }

    /// Wait for the next committed update.
    ///
    /// Stale completions are absorbed silently. Returns `None` once no slot
    /// is pending.
    pub async fn next_update(&mut self) -> Option<SlotUpdate> {
        while !self.store.is_settled() {
            let completion = self.completions_rx.recv().await?;
            if let Some(update) = self.apply(completion) {
                return Some(update);
            }
        }
        None
    }

    /// Wait until no slot is pending, returning every update committed on the way.
    pub async fn settle(&mut self) -> Vec<SlotUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }

    /// Apply completions that have already arrived, without waiting.
    pub fn drain_ready(&mut self) -> Vec<SlotUpdate> {
        let mut updates = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            updates.extend(self.apply(completion));
        }
        updates
    }

    fn dispatch(&mut self, slot: SlotId, generation: Generation, address: Address) {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let resolver = Arc::clone(&self.resolver);
        let completions = self.completions_tx.clone();
        let debounce = self.config.debounce;
        debug!(
            "dispatching {slot} at {generation} for {:?}",
            address.normalized()
        );

        self.runtime.spawn(async move {
            let lookup = async {
                if !debounce.is_zero() {
                    tokio::time::sleep(debounce).await;
                }
                resolver.resolve(&address).await
            };
            tokio::select! {
                biased;
                () = cancelled.cancelled() => {
                    debug!("cancelled lookup for {slot} at {generation}");
                }
                outcome = lookup => {
                    let completion = Completion { slot, generation, outcome };
                    if completions.send(completion).is_err() {
                        debug!("coordinator dropped before {slot} at {generation} finished");
                    }
                }
            }
        });
        self.in_flight.insert(slot, InFlight { generation, token });
    }

    fn cancel(&mut self, slot: SlotId) {
        if let Some(previous) = self.in_flight.remove(&slot) {
            debug!("superseding {slot} at {}", previous.generation);
            previous.token.cancel();
        }
    }

    fn apply(&mut self, completion: Completion) -> Option<SlotUpdate> {
        let Completion {
            slot,
            generation,
            outcome,
        } = completion;
        if self
            .in_flight
            .get(&slot)
            .is_some_and(|running| running.generation == generation)
        {
            self.in_flight.remove(&slot);
        }

        match self.store.commit(slot, generation, &outcome) {
            CommitOutcome::Committed(state) => Some(SlotUpdate {
                slot,
                generation,
                state,
                location: outcome.as_ref().ok().copied(),
                error: outcome.err(),
            }),
            CommitOutcome::Stale { .. } => None,
        }
    }
}

impl<R: ?Sized> ValidationCoordinator<R> {
    /// Visible state of `slot`.
    #[must_use]
    pub fn state(&self, slot: SlotId) -> ValidationState {
        self.store.state(slot)
    }

    /// Full view of `slot`.
    #[must_use]
    pub fn snapshot(&self, slot: SlotId) -> SlotSnapshot {
        self.store.snapshot(slot)
    }

    /// The underlying state store.
    #[must_use]
    pub const fn store(&self) -> &ValidationStore {
        &self.store
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> ValidationConfig {
        self.config
    }

    /// Number of lookups currently scheduled or running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether every slot has settled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.store.is_settled()
    }

    fn current_text(&self, slot: SlotId) -> &str {
        self.store.address(slot).map_or("", Address::normalized)
    }
}

impl<R: ?Sized> Drop for ValidationCoordinator<R> {
    fn drop(&mut self) {
        for running in std::mem::take(&mut self.in_flight).into_values() {
            running.token.cancel();
        }
    }
}
