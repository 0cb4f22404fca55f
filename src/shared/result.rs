/// Result alias used throughout the crate.
///
/// Fatal errors (invalid packages, unreadable manifests, failing license text
/// lookups) travel as `anyhow::Error`; recoverable anomalies are collected as
/// [`Issue`](crate::sbom_generation::domain::Issue)s instead.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
