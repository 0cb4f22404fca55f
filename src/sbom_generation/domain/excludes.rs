use crate::shared::Result;
use serde::{Deserialize, Serialize};

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// Excludes a project whose definition file path matches `pattern`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathExclude {
    pub pattern: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub comment: String,
}

/// Excludes every scope whose unqualified name matches `pattern`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeExclude {
    pub pattern: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub comment: String,
}

/// Path and scope excludes of a run
///
/// Patterns support `*` as a wildcard for zero or more characters and are
/// matched case-sensitively against the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excludes {
    #[serde(default)]
    pub paths: Vec<PathExclude>,
    #[serde(default)]
    pub scopes: Vec<ScopeExclude>,
}

impl Excludes {
    /// Validates all patterns
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Empty, overlong or wildcard-only patterns, or disallowed characters
    pub fn validate(&self) -> Result<()> {
        let total = self.paths.len() + self.scopes.len();
        if total > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                total,
                MAX_EXCLUDE_PATTERNS
            );
        }

        self.paths
            .iter()
            .map(|exclude| exclude.pattern.as_str())
            .chain(self.scopes.iter().map(|exclude| exclude.pattern.as_str()))
            .try_for_each(validate_pattern)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.scopes.is_empty()
    }

    /// Whether a project defined at `definition_file_path` is excluded
    pub fn is_path_excluded(&self, definition_file_path: &str) -> bool {
        self.paths
            .iter()
            .any(|exclude| wildcard_match(&exclude.pattern, definition_file_path))
    }

    /// Whether the unqualified `scope_name` is excluded
    pub fn is_scope_excluded(&self, scope_name: &str) -> bool {
        self.scopes
            .iter()
            .any(|exclude| wildcard_match(&exclude.pattern, scope_name))
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if let Some(ch) = pattern.chars().find(|&c| !is_valid_pattern_char(c)) {
        anyhow::bail!(
            "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
             Only alphanumeric, '-', '_', '.', '/', '@', and '*' are allowed.",
            ch,
            pattern
        );
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '@' | '*')
}

/// Anchored wildcard match where `*` matches zero or more characters
fn wildcard_match(pattern: &str, value: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == value;
    }

    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return false,
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return false,
    };

    if !value.starts_with(first) {
        return false;
    }
    let mut remaining = &value[first.len()..];

    for part in middle.iter().filter(|part| !part.is_empty()) {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    remaining.len() >= last.len() && remaining.ends_with(last)
}
