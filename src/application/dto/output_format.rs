/// Output format enumeration for SPDX documents
///
/// Both the CLI and the formatter factory need to understand it, so it lives
/// in the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// SPDX JSON (default)
    #[default]
    Json,
    /// SPDX YAML
    Yaml,
}

impl OutputFormat {
    /// File extension conventionally used for this format
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "spdx.json",
            OutputFormat::Yaml => "spdx.yml",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json' or 'yaml'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}
