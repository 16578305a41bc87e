//! Component store boundary consumed by the search core.
//!
//! The core only reads from a [`ComponentStore`]. Concrete stores resolve a
//! library name to a registered [`Fetcher`] which produces the records.

mod directory;
mod registry;
mod samples;

pub use directory::DirectoryFetcher;
pub use registry::{Fetcher, FetcherRegistry, StaticFetcher};
pub use samples::sample_catalog;

use crate::error::StoreError;
use crate::types::{ComponentRecord, LibraryInfo};
use futures::future::BoxFuture;

/// Read-only source of library metadata and component records.
pub trait ComponentStore: Send + Sync {
    /// All known libraries, in a stable order.
    fn list_libraries(&self) -> BoxFuture<'_, Result<Vec<LibraryInfo>, StoreError>>;

    /// The ordered records of one library version.
    ///
    /// Returns [`StoreError::NotFound`] when the library or version is unknown.
    fn get_components<'a>(
        &'a self,
        library: &'a str,
        version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>>;
}

/// Finds a library by name, case-insensitively.
pub fn find_library<'a>(libraries: &'a [LibraryInfo], name: &str) -> Option<&'a LibraryInfo> {
    libraries
        .iter()
        .find(|library| library.name.eq_ignore_ascii_case(name))
}
