use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The six logical outputs of a run, in the order they are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// One `- <table>` line per table.
    TableList,
    /// Tables with their columns and raw types.
    Structure,
    /// Empty DBML table declarations.
    DbmlTables,
    /// DBML table declarations with normalized column types.
    DbmlStructure,
    /// Inferred relationships as plain text.
    RelationshipList,
    /// Inferred relationships as DBML `Ref:` lines.
    DbmlRefs,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::TableList,
        ArtifactKind::Structure,
        ArtifactKind::DbmlTables,
        ArtifactKind::DbmlStructure,
        ArtifactKind::RelationshipList,
        ArtifactKind::DbmlRefs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::TableList => "table_list",
            ArtifactKind::Structure => "structure",
            ArtifactKind::DbmlTables => "dbml_tables",
            ArtifactKind::DbmlStructure => "dbml_structure",
            ArtifactKind::RelationshipList => "relationship_list",
            ArtifactKind::DbmlRefs => "dbml_refs",
        }
    }

    /// Default file name when written to a directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ArtifactKind::TableList => "table.txt",
            ArtifactKind::Structure => "structure.txt",
            ArtifactKind::DbmlTables => "table_dbdiagram.dbml",
            ArtifactKind::DbmlStructure => "structure_dbdiagram.dbml",
            ArtifactKind::RelationshipList => "relation.txt",
            ArtifactKind::DbmlRefs => "relation_dbdiagram.dbml",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ArtifactKind::ALL.iter().map(|kind| kind.name()).collect();
                format!("unknown artifact: {s}. Valid options: {}", valid.join(", "))
            })
    }
}

/// Destination for rendered artifacts.
///
/// Each call either persists the whole content, replacing anything previously
/// stored for that artifact, or fails with [`crate::Error::Write`] naming the
/// artifact. Content is never partially written.
pub trait ArtifactWriter {
    fn write(&self, kind: ArtifactKind, content: &str) -> Result<()>;
}
