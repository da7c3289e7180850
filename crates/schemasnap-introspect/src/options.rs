/// Options that control how introspection behaves.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    pub include_views: bool,
    /// Only these tables, when set.
    pub tables: Option<Vec<String>>,
    pub exclude_tables: Vec<String>,
    /// Maximum number of `describe_table` calls in flight.
    pub concurrency: usize,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            include_views: false,
            tables: None,
            exclude_tables: Vec::new(),
            concurrency: 4,
        }
    }
}

impl IntrospectOptions {
    pub fn table_enabled(&self, name: &str) -> bool {
        let allowed = match &self.tables {
            Some(list) => list.iter().any(|item| item == name),
            None => true,
        };
        allowed && !self.exclude_tables.iter().any(|item| item == name)
    }

    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_allow_and_deny_lists() {
        let opts = IntrospectOptions {
            tables: Some(vec!["users".to_string(), "orders".to_string()]),
            exclude_tables: vec!["orders".to_string()],
            ..IntrospectOptions::default()
        };
        assert!(opts.table_enabled("users"));
        assert!(!opts.table_enabled("orders"));
        assert!(!opts.table_enabled("payments"));
        assert!(IntrospectOptions::default().table_enabled("payments"));
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let opts = IntrospectOptions {
            concurrency: 0,
            ..IntrospectOptions::default()
        };
        assert_eq!(opts.effective_concurrency(), 1);
    }
}
