//! `[search]` section configuration.
//!
//! ```toml
//! [search]
//! debounce_ms = 300   # Quiet period before a query edit is searched
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Longest accepted quiet period.
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl SearchConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            diag.error(
                FieldPath::new("search.debounce_ms"),
                format!("must be at most {MAX_DEBOUNCE_MS}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_search_config() {
        assert_eq!(test_parse_config("").search.debounce_ms, 300);
        assert_eq!(
            test_parse_config("[search]\ndebounce_ms = 50").search.debounce_ms,
            50
        );
    }
}
