use crate::sbom_generation::domain::Excludes;
use crate::sbom_generation::services::SpdxDocumentParams;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::path::PathBuf;

/// SbomRequest - Internal request DTO for the SBOM generation use case
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Root directory of the pnpm workspace
    pub project_path: PathBuf,
    /// Path and scope excludes
    pub excludes: Excludes,
    /// Document name, comments, creators and file information switch
    pub document_params: SpdxDocumentParams,
}

impl SbomRequest {
    pub fn builder() -> SbomRequestBuilder {
        SbomRequestBuilder::default()
    }
}

/// Builder for [`SbomRequest`]
#[derive(Debug, Default)]
pub struct SbomRequestBuilder {
    project_path: Option<PathBuf>,
    excludes: Excludes,
    document_params: SpdxDocumentParams,
}

impl SbomRequestBuilder {
    pub fn project_path(mut self, project_path: impl Into<PathBuf>) -> Self {
        self.project_path = Some(project_path.into());
        self
    }

    pub fn excludes(mut self, excludes: Excludes) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn document_params(mut self, document_params: SpdxDocumentParams) -> Self {
        self.document_params = document_params;
        self
    }

    /// Builds the request
    ///
    /// # Errors
    /// Returns a validation error when no project path was set or the
    /// excludes are invalid.
    pub fn build(self) -> Result<SbomRequest> {
        let project_path = self.project_path.ok_or_else(|| SbomError::Validation {
            message: "A project path is required".to_string(),
        })?;

        self.excludes.validate()?;

        Ok(SbomRequest {
            project_path,
            excludes: self.excludes,
            document_params: self.document_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::ScopeExclude;

    #[test]
    fn test_builder_defaults() {
        let request = SbomRequest::builder().project_path("/ws").build().unwrap();

        assert_eq!(request.project_path, PathBuf::from("/ws"));
        assert!(request.excludes.is_empty());
        assert!(!request.document_params.file_information_enabled);
    }

    #[test]
    fn test_builder_requires_project_path() {
        let result = SbomRequest::builder().build();
        assert!(result.unwrap_err().to_string().contains("project path"));
    }

    #[test]
    fn test_builder_validates_excludes() {
        let excludes = Excludes {
            scopes: vec![ScopeExclude {
                pattern: "*".to_string(),
                reason: String::new(),
                comment: String::new(),
            }],
            ..Excludes::default()
        };

        let result = SbomRequest::builder()
            .project_path("/ws")
            .excludes(excludes)
            .build();

        assert!(result.is_err());
    }
}
