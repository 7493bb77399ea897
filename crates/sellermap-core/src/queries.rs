use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_limit() -> u32 {
    20
}

/// One category of listings to fetch: a category label plus the request
/// filters sent to the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryProfile {
    /// Tag stamped onto every entity fetched by this profile
    /// (e.g. `"accommodation"`, `"restaurant"`).
    pub category: String,
    /// Business type codes (`businessType` in the request body).
    #[serde(default)]
    pub business_types: Vec<String>,
    /// Region filter (`province` in the request body). Empty means "all".
    #[serde(default)]
    pub provinces: Vec<String>,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl QueryProfile {
    /// A profile with no business types is kept in the file for reference
    /// but never fetched.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.business_types.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct QueriesFile {
    pub queries: Vec<QueryProfile>,
}

impl QueriesFile {
    /// Profiles that should actually be fetched, in file order.
    pub fn enabled(&self) -> impl Iterator<Item = &QueryProfile> {
        self.queries.iter().filter(|q| q.is_enabled())
    }
}

/// Load and validate the query profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_queries(path: &Path) -> Result<QueriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::QueriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let queries_file: QueriesFile = serde_yaml::from_str(&content)?;

    validate_queries(&queries_file)?;

    Ok(queries_file)
}

fn validate_queries(queries_file: &QueriesFile) -> Result<(), ConfigError> {
    let mut seen_categories = HashSet::new();

    for query in &queries_file.queries {
        let category = query.category.trim();
        if category.is_empty() {
            return Err(ConfigError::Validation(
                "query category must be non-empty".to_string(),
            ));
        }

        if query.limit == 0 {
            return Err(ConfigError::Validation(format!(
                "query '{category}' has limit 0; page size must be positive"
            )));
        }

        if query.business_types.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "query '{category}' contains a blank business type code"
            )));
        }

        if !seen_categories.insert(category.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate query category: '{category}'"
            )));
        }
    }

    Ok(())
}
