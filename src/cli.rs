use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::OutputFormat;

/// Generate SPDX 2.2 SBOMs for pnpm workspaces
#[derive(Parser, Debug)]
#[command(name = "pnpm-sbom")]
#[command(version)]
#[command(about = "Generate SPDX 2.2 SBOMs for pnpm workspaces", long_about = None)]
pub struct Args {
    /// Output format: json or yaml [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Path to the workspace root (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Read the module listing from a file saved with
    /// `pnpm list --json --depth Infinity --recursive` instead of running pnpm
    #[arg(short, long, value_name = "FILE")]
    pub listing: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file path (defaults to pnpm-sbom.config.yml in the workspace root)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the SPDX document (defaults to the workspace directory name)
    #[arg(long, value_name = "NAME")]
    pub document_name: Option<String>,

    /// Emit SPDX file entries for license findings
    #[arg(long)]
    pub file_information: bool,

    /// Exclude scopes matching patterns (supports wildcards: *)
    /// Can be specified multiple times: -e devDependencies -e "test*"
    #[arg(short, long = "exclude-scope", value_name = "PATTERN")]
    pub exclude_scope: Vec<String>,

    /// Directory with license texts named after license ids
    /// Can be specified multiple times
    #[arg(long = "license-texts", value_name = "DIR")]
    pub license_texts: Vec<PathBuf>,

    /// YAML file with per-file license findings
    #[arg(long, value_name = "FILE")]
    pub findings: Option<PathBuf>,
}

impl Args {
    /// Parses the command line, leaving error handling to the caller
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pnpm-sbom"]).unwrap();
        assert!(args.format.is_none());
        assert!(args.path.is_none());
        assert!(args.listing.is_none());
        assert!(!args.file_information);
        assert!(args.exclude_scope.is_empty());
        assert!(args.license_texts.is_empty());
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "pnpm-sbom",
            "-f",
            "yaml",
            "-p",
            "ws",
            "--listing",
            "listing.json",
            "-o",
            "sbom.spdx.yml",
            "--document-name",
            "my-workspace",
            "--file-information",
            "-e",
            "devDependencies",
            "-e",
            "test*",
            "--license-texts",
            "licenses",
            "--findings",
            "findings.yml",
        ])
        .unwrap();

        assert_eq!(args.format, Some(OutputFormat::Yaml));
        assert_eq!(args.path, Some(PathBuf::from("ws")));
        assert_eq!(args.listing, Some(PathBuf::from("listing.json")));
        assert_eq!(args.output, Some(PathBuf::from("sbom.spdx.yml")));
        assert_eq!(args.document_name.as_deref(), Some("my-workspace"));
        assert!(args.file_information);
        assert_eq!(args.exclude_scope, vec!["devDependencies", "test*"]);
        assert_eq!(args.license_texts, vec![PathBuf::from("licenses")]);
        assert_eq!(args.findings, Some(PathBuf::from("findings.yml")));
    }

    #[test]
    fn test_invalid_format() {
        let result = Args::try_parse_from(["pnpm-sbom", "-f", "markdown"]);
        assert!(result.is_err());
    }
}
