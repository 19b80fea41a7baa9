use std::fmt;

use serde::{Deserialize, Serialize};

/// Consistency level applied to a statement through the `USING CONSISTENCY`
/// clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    LocalQuorum,
    EachQuorum,
    LocalOne,
    All,
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
            ConsistencyLevel::All => "ALL",
        };
        write!(f, "{text}")
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_render_consistency_levels() {
        assert_eq!(ConsistencyLevel::Any.to_string(), "ANY");
        assert_eq!(ConsistencyLevel::LocalQuorum.to_string(), "LOCAL_QUORUM");
        assert_eq!(ConsistencyLevel::EachQuorum.to_string(), "EACH_QUORUM");
        assert_eq!(ConsistencyLevel::All.to_string(), "ALL");
    }
}
