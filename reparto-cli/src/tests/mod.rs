//! Shared test harness modules for the Reparto CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod check_unit;
mod helpers;
