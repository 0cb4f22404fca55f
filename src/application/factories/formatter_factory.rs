use crate::adapters::outbound::formatters::{SpdxJsonFormatter, SpdxYamlFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::SbomFormatter;

/// Factory selecting the SPDX serialization for an output format
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use pnpm_sbom::application::dto::OutputFormat;
    /// use pnpm_sbom::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Yaml);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn SbomFormatter> {
        match format {
            OutputFormat::Json => Box::new(SpdxJsonFormatter::new()),
            OutputFormat::Yaml => Box::new(SpdxYamlFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use pnpm_sbom::application::dto::OutputFormat;
    /// use pnpm_sbom::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating SPDX 2.2 JSON output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating SPDX 2.2 JSON output...",
            OutputFormat::Yaml => "📝 Generating SPDX 2.2 YAML output...",
        }
    }
}
