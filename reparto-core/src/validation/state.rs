//! Slot identifiers, visible states and generation counters.

use std::fmt;

use crate::RouteRole;

/// Identifies one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotId {
    /// The start address field.
    Start,
    /// A zero-based line of the intermediate stop list.
    Intermediate(usize),
    /// The end address field.
    End,
}

impl SlotId {
    /// The route role addresses in this slot will take.
    #[must_use]
    pub const fn role(self) -> RouteRole {
        match self {
            Self::Start => RouteRole::Start,
            Self::Intermediate(_) => RouteRole::Intermediate,
            Self::End => RouteRole::End,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Intermediate(line) => write!(f, "stop {}", line + 1),
            Self::End => f.write_str("end"),
        }
    }
}

/// Visible validation outcome of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValidationState {
    /// No text, or never edited.
    #[default]
    Unknown,
    /// A resolution for the current text is outstanding.
    Pending,
    /// The current text resolved to a coordinate.
    Valid,
    /// The current text did not resolve.
    Invalid,
}

impl ValidationState {
    /// Whether the state is final for its generation.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

/// Monotonic per-slot edit counter.
///
/// # Examples
/// ```
/// use reparto_core::Generation;
///
/// let first = Generation::default().next();
/// assert!(first.next() > first);
/// assert_eq!(first.get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Generation(u64);

impl Generation {
    /// The following generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}
