//! Relationship inference from column names.
//!
//! No constraint metadata is consulted. For every ordered pair of distinct
//! tables `(A, B)` and every column `c` of `A`, a relationship `A.c -> B.c'` is
//! emitted for each column `c'` of `B` accepted by the [`MatchStrategy`].
//! Symmetric pairs are kept: `A.x -> B.x` and `B.x -> A.x` are both emitted.
//!
//! Output order is fixed by the input order: origin table, then target table,
//! then origin column, then target column, each in catalog order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::schema::ColumnRef;

/// Schemas above this many tables use the indexed algorithm under
/// [`InferenceAlgorithm::Auto`].
pub const INDEXED_THRESHOLD: usize = 200;

/// Predicate deciding whether a source column plausibly references a target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Same column name on both tables.
    #[default]
    Exact,
    /// Exact match, or the source ends with `_` followed by the target name
    /// (`orders.customer_id` matches `customers.id`).
    Suffix,
}

impl MatchStrategy {
    pub fn matches(self, source: &str, target: &str) -> bool {
        match self {
            MatchStrategy::Exact => source == target,
            MatchStrategy::Suffix => source == target || is_suffix_reference(source, target),
        }
    }
}

fn is_suffix_reference(source: &str, target: &str) -> bool {
    !target.is_empty()
        && source.len() > target.len()
        && source.ends_with(target)
        && source.as_bytes()[source.len() - target.len() - 1] == b'_'
}

/// Which traversal to use. Both produce identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceAlgorithm {
    /// Indexed above [`INDEXED_THRESHOLD`] tables, scan otherwise.
    #[default]
    Auto,
    /// Nested comparison of every column pair, O(T^2 * C^2).
    Scan,
    /// Name -> positions multimap lookups, O(T * C * k) where k is the number
    /// of columns sharing a candidate name.
    Indexed,
}

/// Options for [`infer_relationships`].
#[derive(Debug, Clone, Default)]
pub struct InferenceOptions {
    pub strategy: MatchStrategy,
    pub algorithm: InferenceAlgorithm,
    /// Column names never used as the origin of a relationship.
    pub ignored_columns: BTreeSet<String>,
}

/// A directed candidate relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub from: ColumnRef,
    pub to: ColumnRef,
}

/// Relationships originating from one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipGroup {
    pub table: String,
    pub relationships: Vec<Relationship>,
}

/// Relationships grouped by origin table, groups in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipSet {
    groups: Vec<RelationshipGroup>,
}

impl RelationshipSet {
    /// Group a flat sequence by origin table.
    ///
    /// Every name in `tables` gets a group, even an empty one. Origins not
    /// listed in `tables` get trailing groups in first-seen order.
    pub fn group<'a>(
        tables: impl IntoIterator<Item = &'a str>,
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> Self {
        let mut groups: Vec<RelationshipGroup> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for table in tables {
            if positions.contains_key(table) {
                continue;
            }
            positions.insert(table.to_string(), groups.len());
            groups.push(RelationshipGroup {
                table: table.to_string(),
                relationships: Vec::new(),
            });
        }

        for relationship in relationships {
            let idx = match positions.get(&relationship.from.table) {
                Some(idx) => *idx,
                None => {
                    positions.insert(relationship.from.table.clone(), groups.len());
                    groups.push(RelationshipGroup {
                        table: relationship.from.table.clone(),
                        relationships: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            groups[idx].relationships.push(relationship);
        }

        Self { groups }
    }

    /// Regroup so that every table in `tables` has a group, in that order.
    pub fn aligned_to<'a>(self, tables: impl IntoIterator<Item = &'a str>) -> Self {
        Self::group(tables, self.flatten())
    }

    pub fn groups(&self) -> &[RelationshipGroup] {
        &self.groups
    }

    /// Relationships in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.groups.iter().flat_map(|group| group.relationships.iter())
    }

    pub fn flatten(self) -> Vec<Relationship> {
        self.groups
            .into_iter()
            .flat_map(|group| group.relationships)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.relationships.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Infer candidate relationships from a flattened (table, column) list.
///
/// Tables are ordered by first appearance in `columns`, and columns keep
/// their relative order within a table.
pub fn infer_relationships(columns: &[ColumnRef], options: &InferenceOptions) -> RelationshipSet {
    let tables = group_columns(columns);

    let use_index = match options.algorithm {
        InferenceAlgorithm::Scan => false,
        InferenceAlgorithm::Indexed => true,
        InferenceAlgorithm::Auto => tables.len() > INDEXED_THRESHOLD,
    };

    let relationships = if use_index {
        indexed(&tables, options)
    } else {
        scan(&tables, options)
    };

    RelationshipSet::group(tables.iter().map(|table| table.name), relationships)
}

struct TableColumns<'a> {
    name: &'a str,
    columns: Vec<&'a str>,
}

fn group_columns(columns: &[ColumnRef]) -> Vec<TableColumns<'_>> {
    let mut tables: Vec<TableColumns<'_>> = Vec::new();
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();

    for column in columns {
        let idx = *positions.entry(column.table.as_str()).or_insert_with(|| {
            tables.push(TableColumns {
                name: column.table.as_str(),
                columns: Vec::new(),
            });
            tables.len() - 1
        });
        tables[idx].columns.push(column.column.as_str());
    }

    tables
}

fn relationship(from_table: &str, from: &str, to_table: &str, to: &str) -> Relationship {
    Relationship {
        from: ColumnRef::new(from_table, from),
        to: ColumnRef::new(to_table, to),
    }
}

fn scan(tables: &[TableColumns<'_>], options: &InferenceOptions) -> Vec<Relationship> {
    let mut out = Vec::new();

    for (origin_idx, origin) in tables.iter().enumerate() {
        for (target_idx, target) in tables.iter().enumerate() {
            if origin_idx == target_idx {
                continue;
            }

            for source in &origin.columns {
                if options.ignored_columns.contains(*source) {
                    continue;
                }
                for candidate in &target.columns {
                    if options.strategy.matches(source, candidate) {
                        out.push(relationship(origin.name, source, target.name, candidate));
                    }
                }
            }
        }
    }

    out
}

fn indexed(tables: &[TableColumns<'_>], options: &InferenceOptions) -> Vec<Relationship> {
    let mut by_name: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
    for (table_idx, table) in tables.iter().enumerate() {
        for (column_idx, column) in table.columns.iter().enumerate() {
            by_name.entry(*column).or_default().push((table_idx, column_idx));
        }
    }

    let mut out = Vec::new();

    for (origin_idx, origin) in tables.iter().enumerate() {
        // (target table, source column, target column), sorted into scan order.
        let mut hits: Vec<(usize, usize, usize)> = Vec::new();

        for (source_idx, source) in origin.columns.iter().enumerate() {
            if options.ignored_columns.contains(*source) {
                continue;
            }

            let mut lookup = |name: &str| {
                if let Some(positions) = by_name.get(name) {
                    hits.extend(
                        positions
                            .iter()
                            .filter(|(table_idx, _)| *table_idx != origin_idx)
                            .map(|(table_idx, column_idx)| (*table_idx, source_idx, *column_idx)),
                    );
                }
            };

            lookup(*source);
            if options.strategy == MatchStrategy::Suffix {
                for (pos, _) in source.match_indices('_') {
                    let tail = &source[pos + 1..];
                    if !tail.is_empty() {
                        lookup(tail);
                    }
                }
            }
        }

        hits.sort_unstable();
        hits.dedup();

        for (target_idx, source_idx, column_idx) in hits {
            let target = &tables[target_idx];
            out.push(relationship(
                origin.name,
                origin.columns[source_idx],
                target.name,
                target.columns[column_idx],
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each entry is a table name and its space-separated columns.
    fn columns(layout: &[(&str, &str)]) -> Vec<ColumnRef> {
        layout
            .iter()
            .flat_map(|(table, cols)| {
                cols.split_whitespace()
                    .map(move |col| ColumnRef::new(*table, col))
            })
            .collect()
    }

    fn pairs(set: &RelationshipSet) -> Vec<(String, String)> {
        set.iter()
            .map(|rel| (rel.from.to_string(), rel.to.to_string()))
            .collect()
    }

    fn options(strategy: MatchStrategy, algorithm: InferenceAlgorithm) -> InferenceOptions {
        InferenceOptions {
            strategy,
            algorithm,
            ..InferenceOptions::default()
        }
    }

    #[test]
    fn suffix_matches_foreign_key_style_names() {
        let cols = columns(&[("orders", "id customer_id"), ("customers", "id")]);
        let set = infer_relationships(
            &cols,
            &options(MatchStrategy::Suffix, InferenceAlgorithm::Scan),
        );

        assert!(pairs(&set).contains(&("orders.customer_id".into(), "customers.id".into())));
    }

    #[test]
    fn exact_emits_both_directions() {
        let cols = columns(&[("a", "x y"), ("b", "x")]);
        let set = infer_relationships(&cols, &InferenceOptions::default());

        assert_eq!(
            pairs(&set),
            vec![
                ("a.x".to_string(), "b.x".to_string()),
                ("b.x".to_string(), "a.x".to_string()),
            ]
        );
        assert_eq!(set.groups()[0].table, "a");
        assert_eq!(set.groups()[1].table, "b");
    }

    #[test]
    fn never_emits_self_relationships() {
        let cols = columns(&[
            ("users", "id parent_id user_id"),
            ("posts", "id user_id"),
        ]);

        for strategy in [MatchStrategy::Exact, MatchStrategy::Suffix] {
            for algorithm in [InferenceAlgorithm::Scan, InferenceAlgorithm::Indexed] {
                let set = infer_relationships(&cols, &options(strategy, algorithm));
                assert!(set.iter().all(|rel| rel.from.table != rel.to.table));
            }
        }
    }

    #[test]
    fn exact_is_subset_of_suffix() {
        let cols = columns(&[
            ("orders", "id customer_id status"),
            ("customers", "id status account_id"),
            ("accounts", "id"),
        ]);

        let exact = pairs(&infer_relationships(
            &cols,
            &options(MatchStrategy::Exact, InferenceAlgorithm::Scan),
        ));
        let suffix = pairs(&infer_relationships(
            &cols,
            &options(MatchStrategy::Suffix, InferenceAlgorithm::Scan),
        ));

        assert!(!exact.is_empty());
        for pair in &exact {
            assert!(suffix.contains(pair), "{pair:?} missing under suffix matching");
        }
        assert!(suffix.len() > exact.len());
    }

    #[test]
    fn suffix_requires_underscore_boundary() {
        assert!(MatchStrategy::Suffix.matches("user_id", "id"));
        assert!(MatchStrategy::Suffix.matches("id", "id"));
        assert!(!MatchStrategy::Suffix.matches("userid", "id"));
        assert!(!MatchStrategy::Suffix.matches("_id", "_id_"));
        assert!(!MatchStrategy::Suffix.matches("id", "user_id"));
        assert!(!MatchStrategy::Exact.matches("user_id", "id"));
    }

    #[test]
    fn indexed_matches_scan_order() {
        let cols = columns(&[
            ("orders", "id customer_id shop_id created_at"),
            ("customers", "id shop_id created_at"),
            ("shops", "id owner__id created_at"),
            ("owners", "id _id"),
            ("empty_ish", "note"),
        ]);

        for strategy in [MatchStrategy::Exact, MatchStrategy::Suffix] {
            let scanned = infer_relationships(&cols, &options(strategy, InferenceAlgorithm::Scan));
            let indexed =
                infer_relationships(&cols, &options(strategy, InferenceAlgorithm::Indexed));
            assert_eq!(scanned, indexed, "algorithms disagree for {strategy:?}");
        }
    }

    #[test]
    fn auto_above_threshold_matches_scan() {
        let cols: Vec<ColumnRef> = (0..=INDEXED_THRESHOLD)
            .flat_map(|idx| {
                let table = format!("t{idx:03}");
                let parent = format!("t{:03}_id", (idx + 1) % (INDEXED_THRESHOLD + 1));
                vec![
                    ColumnRef::new(table.as_str(), "id"),
                    ColumnRef::new(table.as_str(), parent),
                    ColumnRef::new(table.as_str(), "created_at"),
                ]
            })
            .collect();

        let mut opts = options(MatchStrategy::Suffix, InferenceAlgorithm::Scan);
        opts.ignored_columns.insert("created_at".to_string());
        let scanned = infer_relationships(&cols, &opts);

        opts.algorithm = InferenceAlgorithm::Auto;
        let auto = infer_relationships(&cols, &opts);

        assert_eq!(auto.groups().len(), INDEXED_THRESHOLD + 1);
        assert_eq!(auto, scanned);
        assert!(!auto.is_empty());
    }

    #[test]
    fn ignored_columns_are_not_origins() {
        let cols = columns(&[("a", "id b_id"), ("b", "id")]);
        let mut opts = options(MatchStrategy::Suffix, InferenceAlgorithm::Scan);
        opts.ignored_columns.insert("id".to_string());

        let set = infer_relationships(&cols, &opts);
        assert_eq!(pairs(&set), vec![("a.b_id".to_string(), "b.id".to_string())]);
        assert!(set.groups()[1].relationships.is_empty());
    }

    #[test]
    fn grouping_round_trips_flat_form() {
        let cols = columns(&[("a", "id b_id"), ("b", "id"), ("c", "id")]);
        let set = infer_relationships(
            &cols,
            &options(MatchStrategy::Suffix, InferenceAlgorithm::Scan),
        );
        let flat = set.clone().flatten();

        let regrouped = RelationshipSet::group(["a", "b", "c"], flat.clone());
        assert_eq!(regrouped, set);
        assert_eq!(regrouped.len(), flat.len());
    }

    #[test]
    fn aligned_groups_include_tables_without_columns() {
        let cols = columns(&[("a", "id"), ("b", "id")]);
        let set = infer_relationships(&cols, &InferenceOptions::default())
            .aligned_to(["a", "audit_log", "b"]);

        let tables: Vec<&str> = set.groups().iter().map(|g| g.table.as_str()).collect();
        assert_eq!(tables, vec!["a", "audit_log", "b"]);
        assert!(set.groups()[1].relationships.is_empty());
    }
}
