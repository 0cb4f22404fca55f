/// License adapters: recorded file findings and license texts on disk
mod findings_store;
mod license_text_provider;

pub use findings_store::FindingsStore;
pub use license_text_provider::DirectoryLicenseTextProvider;
