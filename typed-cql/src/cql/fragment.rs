/// An immutable, appendable CQL text fragment.
///
/// Fragments are value types: every operation allocates a new fragment and
/// leaves the source untouched, so a fragment may be freely shared across
/// chained builder calls and across concurrent query construction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryFragment {
    query: String,
    terminated: bool,
}

impl QueryFragment {
    /// Creates a fragment from initial statement text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            query: text.into(),
            terminated: false,
        }
    }

    /// Returns a new fragment with `text` appended.
    pub fn append(&self, text: impl AsRef<str>) -> Self {
        Self {
            query: format!("{}{}", self.query, text.as_ref()),
            terminated: self.terminated,
        }
    }

    /// Returns a new fragment guaranteed to end with exactly one space.
    pub fn force_pad(&self) -> Self {
        if self.query.ends_with(' ') {
            self.clone()
        } else {
            self.append(" ")
        }
    }

    /// Returns a new fragment with `text` appended as a single-quoted CQL
    /// string literal, escaping embedded quotes by doubling them.
    pub fn append_single_quote(&self, text: impl AsRef<str>) -> Self {
        let escaped = text.as_ref().replace('\'', "''");
        self.append(format!("'{escaped}'"))
    }

    /// Returns a new fragment with a terminating semicolon appended.
    ///
    /// Terminating an already-terminated fragment yields the same string.
    pub fn terminate(&self) -> Self {
        if self.terminated {
            self.clone()
        } else {
            Self {
                query: format!("{};", self.query),
                terminated: true,
            }
        }
    }

    /// Whether the terminating semicolon has been appended.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The rendered statement text.
    pub fn query_string(&self) -> &str {
        &self.query
    }
}

impl std::fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_append_without_mutating_source() {
        let base = QueryFragment::new("SELECT *");
        let extended = base.append(" FROM ks.tbl");

        assert_eq!(base.query_string(), "SELECT *");
        assert_eq!(extended.query_string(), "SELECT * FROM ks.tbl");
    }

    #[test]
    fn test_should_force_single_pad() {
        let fragment = QueryFragment::new("SELECT").force_pad().force_pad();
        assert_eq!(fragment.query_string(), "SELECT ");
    }

    #[test]
    fn test_should_append_single_quoted_text() {
        let fragment = QueryFragment::new("comment = ").append_single_quote("it's a test");
        assert_eq!(fragment.query_string(), "comment = 'it''s a test'");
    }

    #[test]
    fn test_should_terminate_idempotently() {
        let fragment = QueryFragment::new("SELECT * FROM ks.tbl");
        let once = fragment.terminate();
        let twice = once.terminate();

        assert_eq!(once.query_string(), "SELECT * FROM ks.tbl;");
        assert_eq!(once, twice);
        assert!(twice.is_terminated());
    }
}
