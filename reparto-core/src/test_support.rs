//! Test-only `GeoResolver` implementations used by unit and behaviour tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{Address, GeoPoint, GeoResolver, ResolveError};

/// In-memory resolver answering from a fixed table.
///
/// Lookups are keyed by normalized text. Unknown addresses yield
/// [`ResolveError::NotFound`]; blank ones yield
/// [`ResolveError::MalformedInput`] without counting as a request.
///
/// # Examples
/// ```
/// use reparto_core::test_support::TableResolver;
/// use reparto_core::{Address, GeoPoint, GeoResolver};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let resolver = TableResolver::new().with_point("Depot", GeoPoint::new(1.0, 2.0));
/// let point = resolver.resolve(&Address::new(" Depot ")).await;
/// assert_eq!(point, Ok(GeoPoint::new(1.0, 2.0)));
/// assert_eq!(resolver.requests(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct TableResolver {
    entries: HashMap<String, Result<GeoPoint, ResolveError>>,
    requests: AtomicUsize,
}

impl TableResolver {
    /// An empty table; every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `text` with `point`.
    #[must_use]
    pub fn with_point(mut self, text: &str, point: GeoPoint) -> Self {
        self.entries.insert(text.trim().to_owned(), Ok(point));
        self
    }

    /// Answer `text` with `error`.
    #[must_use]
    pub fn with_error(mut self, text: &str, error: ResolveError) -> Self {
        self.entries.insert(text.trim().to_owned(), Err(error));
        self
    }

    /// Number of non-blank lookups served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoResolver for TableResolver {
    async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError> {
        if address.is_blank() {
            return Err(ResolveError::MalformedInput);
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(address.normalized())
            .cloned()
            .unwrap_or_else(|| {
                Err(ResolveError::NotFound {
                    query: address.normalized().to_owned(),
                })
            })
    }
}
