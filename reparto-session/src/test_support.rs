//! Test doubles for exercising the coordinator and planner with latency.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reparto_core::{Address, GeoPoint, GeoResolver, ResolveError};

#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    outcome: Result<GeoPoint, ResolveError>,
}

/// Resolver whose answers and latencies are scripted per address text.
///
/// Each lookup sleeps on the Tokio clock for its scripted delay, so tests
/// running with a paused clock control exactly when replies land. Unknown
/// text answers `NotFound` immediately.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    scripts: HashMap<String, Script>,
    started: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
}

impl ScriptedResolver {
    /// A resolver with no scripted answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `text` with `point` after `delay`.
    #[must_use]
    pub fn with_point(mut self, text: &str, point: GeoPoint, delay: Duration) -> Self {
        self.scripts.insert(
            text.trim().to_owned(),
            Script {
                delay,
                outcome: Ok(point),
            },
        );
        self
    }

    /// Answer `text` with `error` after `delay`.
    #[must_use]
    pub fn with_error(mut self, text: &str, error: ResolveError, delay: Duration) -> Self {
        self.scripts.insert(
            text.trim().to_owned(),
            Script {
                delay,
                outcome: Err(error),
            },
        );
        self
    }

    /// Texts whose lookup began, in order.
    #[must_use]
    pub fn started(&self) -> Vec<String> {
        self.started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts whose lookup ran to completion, in order.
    #[must_use]
    pub fn finished(&self) -> Vec<String> {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(log: &Mutex<Vec<String>>, text: &str) {
        log.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_owned());
    }
}

#[async_trait]
impl GeoResolver for ScriptedResolver {
    async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError> {
        if address.is_blank() {
            return Err(ResolveError::MalformedInput);
        }
        let text = address.normalized();
        Self::record(&self.started, text);
        let Some(script) = self.scripts.get(text).cloned() else {
            Self::record(&self.finished, text);
            return Err(ResolveError::NotFound {
                query: text.to_owned(),
            });
        };
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        Self::record(&self.finished, text);
        script.outcome
    }
}
