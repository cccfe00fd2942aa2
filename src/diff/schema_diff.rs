//! Column-set reconciliation

use indexmap::IndexSet;

/// Columns added and removed between two header lists.
///
/// Purely informational: it never gates or alters row comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDiff {
    /// In the new header list but not the old one
    pub added: IndexSet<String>,
    /// In the old header list but not the new one
    pub removed: IndexSet<String>,
}

impl ColumnDiff {
    /// Compute both set differences, in header order, without duplicates
    pub fn compare(old_headers: &[String], new_headers: &[String]) -> Self {
        let old: IndexSet<&String> = old_headers.iter().collect();
        let new: IndexSet<&String> = new_headers.iter().collect();

        let removed = old
            .iter()
            .filter(|name| !new.contains(*name))
            .map(|name| (*name).clone())
            .collect();
        let added = new
            .iter()
            .filter(|name| !old.contains(*name))
            .map(|name| (*name).clone())
            .collect();

        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Union of both header lists, old order first, without duplicates
pub fn all_columns<'a>(old_headers: &'a [String], new_headers: &'a [String]) -> IndexSet<&'a str> {
    old_headers
        .iter()
        .chain(new_headers)
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_added_and_removed() {
        let diff = ColumnDiff::compare(&strings(&["id", "name", "age"]), &strings(&["id", "email", "name"]));
        assert_eq!(diff.added.iter().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(diff.removed.iter().collect::<Vec<_>>(), vec!["age"]);
    }

    #[test]
    fn test_duplicates_and_order_ignored() {
        let diff = ColumnDiff::compare(&strings(&["a", "b", "b"]), &strings(&["b", "a", "c", "c"]));
        assert!(diff.removed.is_empty());
        assert_eq!(diff.added.len(), 1);
        assert!(diff.added.contains("c"));
    }

    #[test]
    fn test_identical_headers() {
        let headers = strings(&["id", "name"]);
        assert!(ColumnDiff::compare(&headers, &headers).is_empty());
    }

    #[test]
    fn test_all_columns_union() {
        let old = strings(&["id", "name"]);
        let new = strings(&["id", "email"]);
        let all: Vec<_> = all_columns(&old, &new).into_iter().collect();
        assert_eq!(all, vec!["id", "name", "email"]);
    }
}
