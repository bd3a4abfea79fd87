//! Dashboard filter state
//!
//! Lives exactly as long as the dashboard view. Setters replace the value
//! unconditionally; any combination of level and search is valid.

use crate::api::{LevelFilter, LogQuery};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub level: LevelFilter,
    pub search: String,
}

impl FilterState {
    pub fn set_level(&mut self, level: LevelFilter) {
        self.level = level;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Log query for `user` under this filter
    pub fn query_for(&self, user: &str) -> LogQuery {
        LogQuery {
            user: user.to_string(),
            level: self.level,
            search: self.search.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_all_levels_and_empty_search() {
        let filter = FilterState::default();
        assert_eq!(filter.level, LevelFilter::All);
        assert!(filter.search.is_empty());
    }

    #[test]
    fn test_query_carries_current_values() {
        let mut filter = FilterState::default();
        filter.set_level(LevelFilter::Warning);
        filter.set_search("payment");

        let query = filter.query_for("client_user");
        assert_eq!(query.user, "client_user");
        assert_eq!(query.level, LevelFilter::Warning);
        assert_eq!(query.search, "payment");
    }
}
