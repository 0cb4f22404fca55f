//! SPDX 2.2 document model
//!
//! Field names follow the SPDX JSON schema so that the model can be serialized
//! as-is to JSON or YAML.

use serde::{Deserialize, Serialize};

pub const SPDX_VERSION: &str = "SPDX-2.2";
pub const DATA_LICENSE: &str = "CC0-1.0";
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";
pub const NOASSERTION: &str = "NOASSERTION";
pub const NONE: &str = "NONE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub spdx_version: String,
    pub data_license: String,
    pub name: String,
    pub document_namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub creation_info: SpdxCreationInfo,
    #[serde(default)]
    pub document_describes: Vec<String>,
    #[serde(default)]
    pub packages: Vec<SpdxPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<SpdxFile>,
    #[serde(default)]
    pub relationships: Vec<SpdxRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_extracted_licensing_infos: Vec<SpdxExtractedLicenseInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxCreationInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub created: String,
    pub creators: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license_list_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_info: String,
    pub download_location: String,
    pub files_analyzed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<SpdxChecksum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<SpdxExternalReference>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub homepage: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub supplier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    pub license_concluded: String,
    pub license_declared: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub license_info_from_files: Vec<String>,
    pub copyright_text: String,
}

impl SpdxPackage {
    /// Whether file analysis attached at least one file to this package
    pub fn has_analyzed_files(&self) -> bool {
        self.files_analyzed && !self.has_files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxFile {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub file_name: String,
    #[serde(default)]
    pub checksums: Vec<SpdxChecksum>,
    pub license_concluded: String,
    #[serde(default)]
    pub license_info_in_files: Vec<String>,
    pub copyright_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxChecksum {
    pub algorithm: String,
    pub checksum_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxExternalReference {
    pub reference_category: String,
    pub reference_type: String,
    pub reference_locator: String,
}

impl SpdxExternalReference {
    pub fn purl(locator: impl Into<String>) -> Self {
        Self {
            reference_category: "PACKAGE-MANAGER".to_string(),
            reference_type: "purl".to_string(),
            reference_locator: locator.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxRelationship {
    pub spdx_element_id: String,
    pub relationship_type: SpdxRelationshipType,
    pub related_spdx_element: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpdxRelationshipType {
    DependsOn,
    Describes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxExtractedLicenseInfo {
    pub license_id: String,
    pub extracted_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Replaces every character SPDX does not allow in element ids with `-`
pub fn sanitize_spdx_id(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_spdx_id() {
        assert_eq!(sanitize_spdx_id("NPM:@babel:core:7.0.0"), "NPM--babel-core-7.0.0");
        assert_eq!(sanitize_spdx_id("plain-1.0"), "plain-1.0");
    }

    #[test]
    fn test_relationship_serialization() {
        let relationship = SpdxRelationship {
            spdx_element_id: "SPDXRef-Project-a".to_string(),
            relationship_type: SpdxRelationshipType::DependsOn,
            related_spdx_element: "SPDXRef-Package-b".to_string(),
        };

        let json = serde_json::to_value(&relationship).unwrap();
        assert_eq!(json["relationshipType"], "DEPENDS_ON");
        assert_eq!(json["spdxElementId"], "SPDXRef-Project-a");
        assert_eq!(json["relatedSpdxElement"], "SPDXRef-Package-b");
    }

    #[test]
    fn test_package_serialization_skips_empty_fields() {
        let package = SpdxPackage {
            spdx_id: "SPDXRef-Package-x".to_string(),
            name: "x".to_string(),
            version_info: "1.0.0".to_string(),
            download_location: NONE.to_string(),
            files_analyzed: false,
            has_files: vec![],
            checksums: vec![],
            external_refs: vec![SpdxExternalReference::purl("pkg:npm/x@1.0.0")],
            homepage: String::new(),
            supplier: String::new(),
            summary: String::new(),
            license_concluded: NOASSERTION.to_string(),
            license_declared: NOASSERTION.to_string(),
            license_info_from_files: vec![],
            copyright_text: NONE.to_string(),
        };

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["SPDXID"], "SPDXRef-Package-x");
        assert!(json.get("hasFiles").is_none());
        assert!(json.get("homepage").is_none());
        assert_eq!(json["externalRefs"][0]["referenceCategory"], "PACKAGE-MANAGER");
        assert!(!package.has_analyzed_files());
    }
}
