use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::SpdxDocument;
use crate::shared::Result;

/// SpdxYamlFormatter adapter producing SPDX 2.2 YAML
pub struct SpdxYamlFormatter;

impl SpdxYamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpdxYamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for SpdxYamlFormatter {
    fn format(&self, document: &SpdxDocument) -> Result<String> {
        serde_yaml_ng::to_string(document)
            .map_err(|e| anyhow::anyhow!("Failed to serialize SPDX YAML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::formatters::test_fixtures::sample_document;

    #[test]
    fn test_format_yaml_keys() {
        let output = SpdxYamlFormatter::new().format(&sample_document()).unwrap();

        assert!(output.contains("SPDXID: SPDXRef-DOCUMENT"));
        assert!(output.contains("spdxVersion: SPDX-2.2"));
        assert!(output.contains("relationshipType: DEPENDS_ON"));
        assert!(!output.contains("hasExtractedLicensingInfos"));
    }

    #[test]
    fn test_format_yaml_parses_back() {
        let document = sample_document();
        let output = SpdxYamlFormatter::new().format(&document).unwrap();
        let parsed: SpdxDocument = serde_yaml_ng::from_str(&output).unwrap();
        assert_eq!(parsed, document);
    }
}
