use async_trait::async_trait;
use pnpm_sbom::prelude::*;
use std::path::Path;

/// Mock ModuleListingReader returning fixed listings per scope
#[derive(Default)]
pub struct MockListingReader {
    production: Vec<ModuleInfo>,
    development: Vec<ModuleInfo>,
}

impl MockListingReader {
    pub fn new(production: Vec<ModuleInfo>, development: Vec<ModuleInfo>) -> Self {
        Self {
            production,
            development,
        }
    }
}

#[async_trait]
impl ModuleListingReader for MockListingReader {
    async fn list_modules(
        &self,
        _working_dir: &Path,
        scope: ListingScope,
    ) -> Result<Vec<ModuleInfo>> {
        Ok(match scope {
            ListingScope::Production => self.production.clone(),
            ListingScope::Development => self.development.clone(),
        })
    }
}
