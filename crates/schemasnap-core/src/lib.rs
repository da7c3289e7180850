//! Core contracts for schemasnap.
//!
//! This crate defines the schema snapshot model, the relationship inference
//! engine, and the renderers that turn a snapshot into text artifacts. Nothing
//! here talks to a database or touches storage.

pub mod artifact;
pub mod error;
pub mod redaction;
pub mod relations;
pub mod render;
pub mod schema;
pub mod types;
pub mod validation;

pub use artifact::{ArtifactKind, ArtifactWriter};
pub use error::{Error, Result};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use relations::{
    InferenceAlgorithm, InferenceOptions, MatchStrategy, Relationship, RelationshipGroup,
    RelationshipSet, infer_relationships,
};
pub use render::{
    render_artifact, render_dbml_refs, render_dbml_structure, render_dbml_tables,
    render_relationship_list, render_structure, render_table_list,
};
pub use schema::{Column, ColumnRef, KeyRole, SchemaSnapshot, Table};
pub use types::normalize_type;
pub use validation::validate_snapshot;
