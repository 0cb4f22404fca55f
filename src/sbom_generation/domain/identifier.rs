use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Identifier value object naming a project or package
///
/// Two identifiers are equal when all four components are equal. Ordering
/// follows the coordinates string so that sorted output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    id_type: String,
    namespace: String,
    name: String,
    version: String,
}

impl Identifier {
    pub fn new(
        id_type: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id_type: id_type.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn id_type(&self) -> &str {
        &self.id_type
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The `type:namespace:name:version` form used for sorting and lookups
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.id_type, self.namespace, self.name, self.version
        )
    }

    /// Package URL for this identifier, e.g. `pkg:npm/%40babel/core@7.0.0`
    pub fn to_purl(&self) -> String {
        let purl_type = self.id_type.to_lowercase();
        let namespace = self.namespace.replace('@', "%40");
        let name_part = if namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", namespace, self.name)
        };

        if self.version.is_empty() {
            format!("pkg:{}/{}", purl_type, name_part)
        } else {
            format!("pkg:{}/{}@{}", purl_type, name_part, self.version)
        }
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ties only happen when a component itself contains ':'; fall back to the
        // components so that Ord stays consistent with Eq.
        self.coordinates()
            .cmp(&other.coordinates())
            .then_with(|| self.id_type.cmp(&other.id_type))
            .then_with(|| self.namespace.cmp(&other.namespace))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinates())
    }
}

impl FromStr for Identifier {
    type Err = anyhow::Error;

    /// Parses the coordinates form; the version is everything after the third colon
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(4, ':').collect();
        if parts.len() != 4 {
            anyhow::bail!(
                "Invalid identifier '{}': expected 'type:namespace:name:version'",
                s
            );
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates() {
        let id = Identifier::new("NPM", "@babel", "core", "7.22.0");
        assert_eq!(id.coordinates(), "NPM:@babel:core:7.22.0");
        assert_eq!(id.to_string(), "NPM:@babel:core:7.22.0");
    }

    #[test]
    fn test_from_str_roundtrip_with_colon_in_version() {
        let id: Identifier = "NPM::left-pad:1.0.0:beta".parse().unwrap();
        assert_eq!(id.namespace(), "");
        assert_eq!(id.name(), "left-pad");
        assert_eq!(id.version(), "1.0.0:beta");
    }

    #[test]
    fn test_from_str_invalid() {
        let result = "NPM:left-pad".parse::<Identifier>();
        assert!(result.unwrap_err().to_string().contains("Invalid identifier"));
    }

    #[test]
    fn test_ordering_follows_coordinates() {
        let project = Identifier::new("PNPM", "", "app", "1.0.0");
        let scoped = Identifier::new("NPM", "@types", "node", "20.0.0");
        let plain = Identifier::new("NPM", "", "zod", "3.0.0");

        let mut ids = vec![project.clone(), plain.clone(), scoped.clone()];
        ids.sort();

        assert_eq!(ids, vec![plain, scoped, project]);
    }

    #[test]
    fn test_to_purl_scoped() {
        let id = Identifier::new("NPM", "@babel", "core", "7.22.0");
        assert_eq!(id.to_purl(), "pkg:npm/%40babel/core@7.22.0");
    }

    #[test]
    fn test_to_purl_without_version() {
        let id = Identifier::new("NPM", "", "local-lib", "");
        assert_eq!(id.to_purl(), "pkg:npm/local-lib");
    }
}
