//! Greedy route sequencing for reparto.
//!
//! This crate provides [`NearestNeighbourSequencer`], the default
//! implementation of the [`Sequencer`](reparto_core::Sequencer) trait. From
//! the start point it repeatedly visits the closest unvisited stop by
//! haversine distance, then finishes at the end point. It is a locally greedy
//! heuristic for hand-typed stop lists, not an optimal tour solver; the
//! O(n²) scan is fine for the handful of stops a driver enters.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod sequencer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use sequencer::{NearestNeighbourSequencer, nearest_neighbour_order};
