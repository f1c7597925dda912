//! Memoising wrapper around any [`GeoResolver`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use log::debug;
use reparto_core::{Address, GeoPoint, GeoResolver, ResolveError, ResolveErrorKind};

type Entries = HashMap<String, Result<GeoPoint, ResolveError>>;

/// Caches settled lookups by normalized address text.
///
/// Successful points and `NotFound` answers are stored; transient failures
/// pass through uncached so a later lookup retries the service. Blank
/// addresses are rejected locally.
///
/// # Examples
/// ```
/// use reparto_core::test_support::TableResolver;
/// use reparto_core::{Address, GeoPoint, GeoResolver};
/// use reparto_geocode::CachingResolver;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let table = TableResolver::new().with_point("Depot", GeoPoint::new(1.0, 2.0));
/// let resolver = CachingResolver::new(table);
///
/// resolver.resolve(&Address::new("Depot")).await.unwrap();
/// resolver.resolve(&Address::new("  Depot  ")).await.unwrap();
/// assert_eq!(resolver.inner().requests(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    entries: Mutex<Entries>,
}

impl<R> CachingResolver<R> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped resolver.
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached answers.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Forget every cached answer.
    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        // Entries are plain values; a panic elsewhere cannot leave one half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<R> GeoResolver for CachingResolver<R>
where
    R: GeoResolver,
{
    async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError> {
        if address.is_blank() {
            return Err(ResolveError::MalformedInput);
        }

        let key = address.normalized();
        let cached = self.entries().get(key).cloned();
        if let Some(hit) = cached {
            debug!("geocode cache hit for {key:?}");
            return hit;
        }

        debug!("geocode cache miss for {key:?}");
        let outcome = self.inner.resolve(address).await;
        let cacheable = match &outcome {
            Ok(_) => true,
            Err(err) => err.kind() == ResolveErrorKind::NotFound,
        };
        if cacheable {
            self.entries().insert(key.to_owned(), outcome.clone());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reparto_core::test_support::TableResolver;

    fn timeout() -> ResolveError {
        ResolveError::Timeout {
            url: "http://geo.example.com/search".to_owned(),
            timeout_secs: 10,
        }
    }

    fn table() -> TableResolver {
        TableResolver::new()
            .with_point("Depot", GeoPoint::new(-34.6, -58.4))
            .with_error("Flaky 1", timeout())
    }

    #[tokio::test]
    async fn repeated_success_hits_service_once() {
        let resolver = CachingResolver::new(table());

        let first = resolver.resolve(&Address::new("Depot")).await;
        let second = resolver.resolve(&Address::new(" Depot ")).await;

        assert_eq!(first, second);
        assert_eq!(resolver.inner().requests(), 1);
        assert_eq!(resolver.len(), 1);
    }

    #[tokio::test]
    async fn not_found_is_cached() {
        let resolver = CachingResolver::new(table());

        for _ in 0..3 {
            let err = resolver
                .resolve(&Address::new("Nowhere"))
                .await
                .expect_err("should miss");
            assert_eq!(err.kind(), ResolveErrorKind::NotFound);
        }

        assert_eq!(resolver.inner().requests(), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let resolver = CachingResolver::new(table());

        for _ in 0..2 {
            let err = resolver
                .resolve(&Address::new("Flaky 1"))
                .await
                .expect_err("should fail");
            assert!(err.is_transient());
        }

        assert_eq!(resolver.inner().requests(), 2);
        assert!(resolver.is_empty());
    }

    #[tokio::test]
    async fn blank_input_is_local() {
        let resolver = CachingResolver::new(table());

        let err = resolver
            .resolve(&Address::new("\t"))
            .await
            .expect_err("should fail");

        assert_eq!(err, ResolveError::MalformedInput);
        assert_eq!(resolver.inner().requests(), 0);
        assert!(resolver.is_empty());
    }

    #[tokio::test]
    async fn clear_forgets_answers() {
        let resolver = CachingResolver::new(table());
        resolver
            .resolve(&Address::new("Depot"))
            .await
            .expect("should resolve");

        resolver.clear();
        resolver
            .resolve(&Address::new("Depot"))
            .await
            .expect("should resolve");

        assert_eq!(resolver.inner().requests(), 2);
    }
}
