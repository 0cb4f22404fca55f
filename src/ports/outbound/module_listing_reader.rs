use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// One module of a pnpm listing (`pnpm list --json --depth Infinity --recursive`)
///
/// Top-level entries describe workspace projects and carry `name`; nested
/// entries describe dependencies and carry `from` and `resolved`. The same
/// module can occur many times in a listing, once per position in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, ModuleInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub optional_dependencies: BTreeMap<String, ModuleInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: BTreeMap<String, ModuleInfo>,
}

// Equality stays structural; hashing the identifying fields is enough and
// keeps hashing of deep trees cheap.
impl Hash for ModuleInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.from.hash(state);
        self.version.hash(state);
        self.resolved.hash(state);
    }
}

/// Which dependencies a listing should contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingScope {
    /// `dependencies` and `optionalDependencies`
    Production,
    /// `devDependencies`
    Development,
}

impl ListingScope {
    /// The pnpm command line flag selecting this scope
    pub fn pnpm_flag(&self) -> &'static str {
        match self {
            ListingScope::Production => "--prod",
            ListingScope::Development => "--dev",
        }
    }
}

/// ModuleListingReader port producing the module tree of a workspace
#[async_trait]
pub trait ModuleListingReader: Send + Sync {
    /// Lists all workspace projects below `working_dir` with their dependency trees
    ///
    /// # Arguments
    /// * `working_dir` - Root directory of the workspace
    /// * `scope` - Dependencies to include in the listing
    ///
    /// # Errors
    /// Returns an error if the listing cannot be produced or parsed.
    async fn list_modules(&self, working_dir: &Path, scope: ListingScope)
        -> Result<Vec<ModuleInfo>>;
}
