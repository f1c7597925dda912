//! Test helpers: an in-memory geocoder and scratch stop files.

use std::fs;
use std::sync::Arc;

use camino::Utf8PathBuf;
use reparto_core::test_support::TableResolver;
use reparto_core::{GeoPoint, GeoResolver};
use tempfile::TempDir;

use crate::CliError;
use crate::geocoder::{GeocoderSettings, ResolverBuilder};

/// A, B, D and C along the equator, in increasing longitude.
pub(super) fn equator_resolver() -> TableResolver {
    TableResolver::new()
        .with_point("A", GeoPoint::new(0.0, 0.0))
        .with_point("B", GeoPoint::new(0.0, 0.010))
        .with_point("D", GeoPoint::new(0.0, 0.018))
        .with_point("C", GeoPoint::new(0.0, 0.050))
}

/// Hands out the same table resolver whatever the settings.
#[derive(Debug)]
pub(super) struct TableResolverBuilder {
    resolver: Arc<TableResolver>,
}

impl TableResolverBuilder {
    pub(super) fn new(resolver: TableResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    pub(super) fn requests(&self) -> usize {
        self.resolver.requests()
    }
}

impl ResolverBuilder for TableResolverBuilder {
    fn build(&self, _settings: &GeocoderSettings) -> Result<Arc<dyn GeoResolver>, CliError> {
        let resolver: Arc<dyn GeoResolver> = self.resolver.clone();
        Ok(resolver)
    }
}

/// A temporary directory holding a stops file.
pub(super) struct StopsFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl StopsFile {
    pub(super) fn new(contents: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let path = root.join("stops.txt");
        fs::write(&path, contents).expect("write stops file");
        Self { _dir: dir, path }
    }

    pub(super) fn path(&self) -> Utf8PathBuf {
        self.path.clone()
    }
}

pub(super) fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("stdout utf-8")
}
