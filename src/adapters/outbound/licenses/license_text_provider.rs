use crate::ports::outbound::LicenseTextProvider;
use crate::shared::error::SbomError;
use crate::shared::security::read_to_string_checked;
use crate::shared::Result;
use std::path::PathBuf;

/// DirectoryLicenseTextProvider adapter looking up license texts in directories
///
/// A text for `LicenseRef-acme` is the file `LicenseRef-acme` or
/// `LicenseRef-acme.txt` in the first directory that has one.
pub struct DirectoryLicenseTextProvider {
    directories: Vec<PathBuf>,
}

impl DirectoryLicenseTextProvider {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }
}

impl LicenseTextProvider for DirectoryLicenseTextProvider {
    fn license_text(&self, license_id: &str) -> Result<Option<String>> {
        if license_id.is_empty()
            || license_id.starts_with('.')
            || license_id.contains(['/', '\\'])
        {
            return Ok(None);
        }

        for directory in &self.directories {
            for file_name in [license_id.to_string(), format!("{}.txt", license_id)] {
                let path = directory.join(file_name);
                if !path.exists() && !path.is_symlink() {
                    continue;
                }

                let text = read_to_string_checked(&path, "license text").map_err(|e| {
                    SbomError::LicenseTextError {
                        license_id: license_id.to_string(),
                        details: e.to_string(),
                    }
                })?;
                return Ok(Some(text.trim_end().to_string()));
            }
        }

        Ok(None)
    }
}
