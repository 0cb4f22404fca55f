/// pnpm adapters: module listings and the dependency handler resolving them
mod dependency_handler;
mod listing_reader;
pub mod urls;

pub use crate::ports::outbound::ModuleInfo;
pub use dependency_handler::{
    PnpmDependencyHandler, NON_EXISTING_VERSION, PACKAGE_TYPE, PROJECT_TYPE,
};
pub use listing_reader::{parse_listing, JsonFileListingReader, PnpmCommandListingReader};
