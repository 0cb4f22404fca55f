/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (package manager, file system, console).
pub mod dependency_handler;
pub mod formatter;
pub mod license_info_resolver;
pub mod manifest_reader;
pub mod module_listing_reader;
pub mod output_presenter;
pub mod progress_reporter;

pub use dependency_handler::DependencyHandler;
pub use formatter::SbomFormatter;
pub use license_info_resolver::{LicenseInfoResolver, LicenseTextProvider};
pub use manifest_reader::{ManifestReader, PackageManifest, RepositoryInfo};
pub use module_listing_reader::{ListingScope, ModuleInfo, ModuleListingReader};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
