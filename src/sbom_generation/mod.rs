/// SBOM generation core: domain model, policies and services
///
/// Nothing in here performs I/O; collaborators are reached through the
/// outbound ports.
pub mod domain;
pub mod policies;
pub mod services;
