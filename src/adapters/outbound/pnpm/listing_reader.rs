use crate::ports::outbound::{ListingScope, ModuleInfo, ModuleListingReader};
use crate::shared::error::SbomError;
use crate::shared::security::read_to_string_checked;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Parses the JSON printed by `pnpm list --json`
///
/// Relative module paths are resolved against `working_dir`.
///
/// # Errors
/// Returns `SbomError::ListingParseError` if `content` is not a listing.
pub fn parse_listing(content: &str, source: &Path, working_dir: &Path) -> Result<Vec<ModuleInfo>> {
    let mut modules: Vec<ModuleInfo> =
        serde_json::from_str(content).map_err(|e| SbomError::ListingParseError {
            path: source.to_path_buf(),
            details: e.to_string(),
        })?;

    for module in &mut modules {
        resolve_paths(module, working_dir);
    }

    Ok(modules)
}

fn resolve_paths(module: &mut ModuleInfo, working_dir: &Path) {
    if module.path.is_relative() {
        module.path = working_dir.join(&module.path);
    }

    for child in module
        .dependencies
        .values_mut()
        .chain(module.optional_dependencies.values_mut())
        .chain(module.dev_dependencies.values_mut())
    {
        resolve_paths(child, working_dir);
    }
}

/// Keeps only the dependency maps of the project entries that belong to `scope`
fn retain_scope(modules: &mut [ModuleInfo], scope: ListingScope) {
    for module in modules {
        match scope {
            ListingScope::Production => module.dev_dependencies.clear(),
            ListingScope::Development => {
                module.dependencies.clear();
                module.optional_dependencies.clear();
            }
        }
    }
}

/// PnpmCommandListingReader adapter running `pnpm list` in the workspace
pub struct PnpmCommandListingReader {
    program: PathBuf,
}

impl PnpmCommandListingReader {
    pub fn new() -> Self {
        Self::with_program("pnpm")
    }

    /// Uses a specific pnpm executable instead of the one on `PATH`
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PnpmCommandListingReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModuleListingReader for PnpmCommandListingReader {
    async fn list_modules(
        &self,
        working_dir: &Path,
        scope: ListingScope,
    ) -> Result<Vec<ModuleInfo>> {
        let output = Command::new(&self.program)
            .args(["list", "--json", "--depth", "Infinity", "--recursive"])
            .arg(scope.pnpm_flag())
            .current_dir(working_dir)
            .output()
            .await
            .with_context(|| {
                format!(
                    "Failed to run '{}'. Is pnpm installed and on PATH?",
                    self.program.display()
                )
            })?;

        if !output.status.success() {
            anyhow::bail!(
                "'{} list' exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut modules = parse_listing(&stdout, working_dir, working_dir)?;
        retain_scope(&mut modules, scope);
        Ok(modules)
    }
}

/// JsonFileListingReader adapter reading a listing saved from
/// `pnpm list --json --depth Infinity --recursive`
///
/// The saved listing is expected to contain all scopes; each call keeps only
/// the requested one.
pub struct JsonFileListingReader {
    listing_path: PathBuf,
}

impl JsonFileListingReader {
    pub fn new(listing_path: PathBuf) -> Self {
        Self { listing_path }
    }
}

#[async_trait]
impl ModuleListingReader for JsonFileListingReader {
    async fn list_modules(
        &self,
        working_dir: &Path,
        scope: ListingScope,
    ) -> Result<Vec<ModuleInfo>> {
        if !self.listing_path.exists() {
            return Err(SbomError::ListingNotFound {
                path: self.listing_path.clone(),
                suggestion: "Save a listing with `pnpm list --json --depth Infinity --recursive > listing.json`, or omit --listing to run pnpm directly".to_string(),
            }
            .into());
        }

        let content = read_to_string_checked(&self.listing_path, "pnpm listing")?;
        let mut modules = parse_listing(&content, &self.listing_path, working_dir)?;
        retain_scope(&mut modules, scope);
        Ok(modules)
    }
}
