/// Mock implementations for testing
mod mock_listing_reader;
mod mock_manifest_reader;
mod mock_progress_reporter;

pub use mock_listing_reader::MockListingReader;
pub use mock_manifest_reader::MockManifestReader;
pub use mock_progress_reporter::MockProgressReporter;
