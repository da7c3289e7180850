//! Text renderers for a schema snapshot and its inferred relationships.
//!
//! Every renderer is a pure function of its input. Ordering comes only from
//! catalog order and relationship emission order.

use std::fmt::Write;

use crate::artifact::ArtifactKind;
use crate::relations::RelationshipSet;
use crate::schema::SchemaSnapshot;
use crate::types::normalize_type;

/// Render one artifact by kind.
pub fn render_artifact(
    kind: ArtifactKind,
    snapshot: &SchemaSnapshot,
    relationships: &RelationshipSet,
) -> String {
    match kind {
        ArtifactKind::TableList => render_table_list(snapshot),
        ArtifactKind::Structure => render_structure(snapshot),
        ArtifactKind::DbmlTables => render_dbml_tables(snapshot),
        ArtifactKind::DbmlStructure => render_dbml_structure(snapshot),
        ArtifactKind::RelationshipList => render_relationship_list(relationships),
        ArtifactKind::DbmlRefs => render_dbml_refs(relationships),
    }
}

/// One `- <table>` line per table, without a trailing newline.
pub fn render_table_list(snapshot: &SchemaSnapshot) -> String {
    snapshot
        .table_names()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_structure(snapshot: &SchemaSnapshot) -> String {
    let mut output = String::new();

    for table in snapshot.tables() {
        let _ = writeln!(output, "- Table: {}", table.name);
        for column in &table.columns {
            let _ = writeln!(output, "  -- {} ({})", column.name, column.declared_type);
        }
        output.push('\n');
    }

    output
}

pub fn render_dbml_tables(snapshot: &SchemaSnapshot) -> String {
    snapshot
        .table_names()
        .map(|name| format!("Table {name} {{}}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// DBML tables with normalized column types and `[pk]` markers.
pub fn render_dbml_structure(snapshot: &SchemaSnapshot) -> String {
    let mut output = String::new();

    for table in snapshot.tables() {
        let _ = writeln!(output, "Table {} {{", table.name);
        for column in &table.columns {
            let pk = if column.is_primary_key() { " [pk]" } else { "" };
            let _ = writeln!(
                output,
                "  {} {}{}",
                column.name,
                normalize_type(&column.declared_type),
                pk
            );
        }
        output.push_str("}\n\n");
    }

    output
}

/// Relationships grouped by origin table, groups separated by four blank lines.
pub fn render_relationship_list(relationships: &RelationshipSet) -> String {
    let mut output = String::new();

    for group in relationships.groups() {
        let _ = writeln!(output, "// Table: {}", group.table);
        for rel in &group.relationships {
            let _ = writeln!(output, "From: {} -> To: {}", rel.from, rel.to);
        }
        output.push_str("\n\n\n\n");
    }

    output
}

pub fn render_dbml_refs(relationships: &RelationshipSet) -> String {
    let mut output = String::new();

    for rel in relationships.iter() {
        let _ = writeln!(
            output,
            "Ref: {}.{} > {}.{}",
            rel.from.table, rel.from.column, rel.to.table, rel.to.column
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::{
        InferenceAlgorithm, InferenceOptions, MatchStrategy, Relationship, infer_relationships,
    };
    use crate::schema::{Column, ColumnRef, Table};

    fn shop() -> SchemaSnapshot {
        SchemaSnapshot::new(
            Some("shop".to_string()),
            vec![
                Table::new(
                    "customers",
                    vec![
                        Column::primary("id", "int(10) unsigned"),
                        Column::new("email", "varchar(255)"),
                        Column::new("is_active", "tinyint(1)"),
                    ],
                ),
                Table::new(
                    "orders",
                    vec![
                        Column::primary("id", "int(10) unsigned"),
                        Column::new("customer_id", "int(10) unsigned"),
                        Column::new("total", "decimal(10,2)"),
                    ],
                ),
            ],
        )
        .expect("valid snapshot")
    }

    fn suffix_relationships(snapshot: &SchemaSnapshot) -> RelationshipSet {
        let options = InferenceOptions {
            strategy: MatchStrategy::Suffix,
            algorithm: InferenceAlgorithm::Scan,
            ..InferenceOptions::default()
        };
        infer_relationships(&snapshot.column_refs(), &options).aligned_to(snapshot.table_names())
    }

    #[test]
    fn table_list_has_one_line_per_table() {
        assert_eq!(render_table_list(&shop()), "- customers\n- orders");
    }

    #[test]
    fn structure_keeps_raw_types_and_column_order() {
        let expected = "- Table: customers\n\
                        \x20 -- id (int(10) unsigned)\n\
                        \x20 -- email (varchar(255))\n\
                        \x20 -- is_active (tinyint(1))\n\
                        \n\
                        - Table: orders\n\
                        \x20 -- id (int(10) unsigned)\n\
                        \x20 -- customer_id (int(10) unsigned)\n\
                        \x20 -- total (decimal(10,2))\n\
                        \n";
        assert_eq!(render_structure(&shop()), expected);
    }

    #[test]
    fn dbml_tables_are_blank_line_separated() {
        assert_eq!(
            render_dbml_tables(&shop()),
            "Table customers {}\n\nTable orders {}"
        );
    }

    #[test]
    fn dbml_structure_normalizes_types_and_marks_keys() {
        let expected = "Table customers {\n  id int [pk]\n  email varchar\n  is_active boolean\n}\n\n\
                        Table orders {\n  id int [pk]\n  customer_id int\n  total decimal\n}\n\n";
        let rendered = render_dbml_structure(&shop());
        assert_eq!(rendered, expected);
        assert!(rendered.lines().any(|line| line.ends_with(" [pk]")));
    }

    #[test]
    fn relationship_list_groups_by_origin() {
        let snapshot = shop();
        let rendered = render_relationship_list(&suffix_relationships(&snapshot));

        let expected = "// Table: customers\n\
                        From: customers.id -> To: orders.id\n\
                        \n\n\n\n\
                        // Table: orders\n\
                        From: orders.id -> To: customers.id\n\
                        From: orders.customer_id -> To: customers.id\n\
                        \n\n\n\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn relationship_groups_are_separated_by_four_blank_lines() {
        let set = RelationshipSet::group(
            ["a", "b"],
            vec![
                Relationship {
                    from: ColumnRef::new("a", "x"),
                    to: ColumnRef::new("b", "x"),
                },
                Relationship {
                    from: ColumnRef::new("b", "x"),
                    to: ColumnRef::new("a", "x"),
                },
            ],
        );
        let rendered = render_relationship_list(&set);

        let lines: Vec<&str> = rendered.split('\n').collect();
        let last_of_a = lines
            .iter()
            .position(|line| *line == "From: a.x -> To: b.x")
            .expect("a relationship line");
        let header_b = lines
            .iter()
            .position(|line| *line == "// Table: b")
            .expect("b header");
        let blanks = &lines[last_of_a + 1..header_b];
        assert_eq!(blanks.len(), 4);
        assert!(blanks.iter().all(|line| line.is_empty()));
    }

    #[test]
    fn dbml_refs_follow_emission_order() {
        let snapshot = shop();
        assert_eq!(
            render_dbml_refs(&suffix_relationships(&snapshot)),
            "Ref: customers.id > orders.id\n\
             Ref: orders.id > customers.id\n\
             Ref: orders.customer_id > customers.id\n"
        );
    }

    #[test]
    fn empty_inputs_render_empty_or_headers_only() {
        let empty = SchemaSnapshot::new(None, Vec::new()).expect("valid snapshot");
        let none = RelationshipSet::default();
        for kind in ArtifactKind::ALL {
            assert_eq!(render_artifact(kind, &empty, &none), "");
        }

        let lonely = SchemaSnapshot::new(None, vec![Table::new("audit", Vec::new())])
            .expect("valid snapshot");
        let set = RelationshipSet::group(lonely.table_names(), Vec::new());
        assert_eq!(render_relationship_list(&set), "// Table: audit\n\n\n\n\n");
    }

    #[test]
    fn rendering_is_deterministic() {
        let snapshot = shop();
        let relationships = suffix_relationships(&snapshot);
        for kind in ArtifactKind::ALL {
            let first = render_artifact(kind, &snapshot, &relationships);
            let second = render_artifact(kind, &snapshot, &relationships);
            assert_eq!(first, second, "{kind} output differs between runs");
        }
    }

    #[test]
    fn suffix_end_to_end_scenario() {
        let snapshot = SchemaSnapshot::new(
            None,
            vec![
                Table::new(
                    "A",
                    vec![Column::primary("id", "int(11)"), Column::new("b_id", "int(11)")],
                ),
                Table::new("B", vec![Column::primary("id", "int(11)")]),
            ],
        )
        .expect("valid snapshot");
        let relationships = suffix_relationships(&snapshot);

        let a_group = &relationships.groups()[0];
        assert_eq!(a_group.table, "A");
        assert!(
            a_group
                .relationships
                .iter()
                .any(|rel| rel.from.to_string() == "A.b_id" && rel.to.to_string() == "B.id")
        );

        let b_group = &relationships.groups()[1];
        assert!(b_group.relationships.iter().all(|rel| rel.to.column != "b_id"));

        let rendered = render_relationship_list(&relationships);
        assert!(rendered.starts_with("// Table: A\n"));
        assert!(rendered.contains("From: A.b_id -> To: B.id\n"));
    }
}
