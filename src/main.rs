mod adapters;
mod application;
mod cli;
mod config;
mod ports;
mod sbom_generation;
mod shared;

use adapters::outbound::console::StderrProgressReporter;
use adapters::outbound::filesystem::FileSystemReader;
use adapters::outbound::licenses::{DirectoryLicenseTextProvider, FindingsStore};
use adapters::outbound::pnpm::{JsonFileListingReader, PnpmCommandListingReader};
use application::dto::{OutputFormat, SbomRequest};
use application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use application::use_cases::GenerateSbomUseCase;
use cli::Args;
use config::ConfigFile;
use ports::outbound::ModuleListingReader;
use sbom_generation::domain::{Excludes, ScopeExclude};
use sbom_generation::services::SpdxDocumentParams;
use shared::error::{ExitCode, SbomError};
use shared::Result;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported through clap errors as well
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

/// Settings of one run after merging the config file with the command line
#[derive(Debug)]
struct Settings {
    format: OutputFormat,
    excludes: Excludes,
    document_params: SpdxDocumentParams,
    license_text_dirs: Vec<PathBuf>,
    findings_file: Option<PathBuf>,
}

async fn run(args: Args) -> Result<()> {
    let project_path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    validate_project_path(&project_path)?;

    let (config, config_dir) = match &args.config {
        Some(path) => (
            Some(config::load_config_from_path(path)?),
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => (config::discover_config(&project_path)?, project_path.clone()),
    };

    let settings = merge_settings(&args, config.unwrap_or_default(), &config_dir)?;

    match &args.listing {
        Some(listing_path) => {
            generate(
                JsonFileListingReader::new(listing_path.clone()),
                &project_path,
                settings,
                args.output,
            )
            .await
        }
        None => {
            generate(
                PnpmCommandListingReader::new(),
                &project_path,
                settings,
                args.output,
            )
            .await
        }
    }
}

async fn generate<LR: ModuleListingReader>(
    listing_reader: LR,
    project_path: &Path,
    settings: Settings,
    output: Option<PathBuf>,
) -> Result<()> {
    let findings = match &settings.findings_file {
        Some(path) => FindingsStore::load(path)?,
        None => FindingsStore::empty(),
    };

    // Create use case with injected dependencies
    let use_case = GenerateSbomUseCase::new(
        listing_reader,
        FileSystemReader::new(),
        findings,
        DirectoryLicenseTextProvider::new(settings.license_text_dirs),
        StderrProgressReporter::new(),
    );

    let request = SbomRequest::builder()
        .project_path(project_path)
        .excludes(settings.excludes)
        .document_params(settings.document_params)
        .build()?;

    let response = use_case.execute(request).await?;

    if response.issue_count > 0 {
        eprintln!(
            "⚠️  {} issue(s) were found while resolving packages",
            response.issue_count
        );
    }

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format);
    let formatted_output = formatter.format(&response.document)?;

    let presenter = PresenterFactory::create(PresenterType::from(output));
    presenter.present(&formatted_output)?;

    Ok(())
}

/// Command line values take precedence over config file values
fn merge_settings(args: &Args, config: ConfigFile, config_dir: &Path) -> Result<Settings> {
    let format = match (args.format, &config.format) {
        (Some(format), _) => format,
        (None, Some(format)) => format
            .parse()
            .map_err(|message: String| SbomError::Validation { message })?,
        (None, None) => OutputFormat::default(),
    };

    let mut excludes = config
        .excludes
        .as_ref()
        .map(|excludes| excludes.to_excludes())
        .unwrap_or_default();
    excludes
        .scopes
        .extend(args.exclude_scope.iter().map(|pattern| ScopeExclude {
            pattern: pattern.clone(),
            reason: String::new(),
            comment: "Excluded on the command line".to_string(),
        }));

    let document = config.document.unwrap_or_default();
    let document_params = SpdxDocumentParams {
        document_name: args
            .document_name
            .clone()
            .or(document.name)
            .unwrap_or_default(),
        document_comment: document.comment.unwrap_or_default(),
        creation_info_comment: document.creation_info_comment.unwrap_or_default(),
        creation_info_person: document.person.unwrap_or_default(),
        creation_info_organization: document.organization.unwrap_or_default(),
        file_information_enabled: args.file_information
            || config.file_information.unwrap_or(false),
    };

    let license_text_dirs = if args.license_texts.is_empty() {
        config
            .license_text_dirs
            .unwrap_or_default()
            .iter()
            .map(|dir| config_dir.join(dir))
            .collect()
    } else {
        args.license_texts.clone()
    };

    let findings_file = args
        .findings
        .clone()
        .or_else(|| config.findings_file.map(|path| config_dir.join(path)));

    Ok(Settings {
        format,
        excludes,
        document_params,
        license_text_dirs,
        findings_file,
    })
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| SbomError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
