//! Tunables for the validation coordinator and the route planner.

use std::time::Duration;

/// Default quiet period before a field edit is geocoded.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Default number of intermediate lookups allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Settings for [`ValidationCoordinator`](crate::ValidationCoordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Delay between an edit and its lookup. Zero dispatches immediately.
    pub debounce: Duration,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl ValidationConfig {
    /// Set the debounce delay.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Settings for [`RoutePlanner`](crate::RoutePlanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Upper bound on concurrent intermediate lookups. Never below one.
    pub max_concurrent_lookups: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl PlannerConfig {
    /// Set the concurrency bound; zero is raised to one.
    #[must_use]
    pub const fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = if limit == 0 { 1 } else { limit };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults() {
        assert_eq!(
            ValidationConfig::default().debounce,
            Duration::from_millis(400)
        );
        assert_eq!(PlannerConfig::default().max_concurrent_lookups, 4);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(16, 16)]
    fn concurrency_limit_is_at_least_one(#[case] requested: usize, #[case] expected: usize) {
        let config = PlannerConfig::default().with_max_concurrent_lookups(requested);
        assert_eq!(config.max_concurrent_lookups, expected);
    }
}
