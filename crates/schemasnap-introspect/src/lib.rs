//! Catalog readers and snapshot loading.

pub mod loader;
pub mod mysql;
pub mod options;
pub mod reader;

pub use loader::{LoadedCatalog, load_catalog};
pub use mysql::MySqlCatalog;
pub use options::IntrospectOptions;
pub use reader::CatalogReader;

pub use schemasnap_core::SchemaSnapshot;
