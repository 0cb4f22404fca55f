/// Application layer - Use cases, DTOs and factories
///
/// Orchestrates the SBOM generation services and reaches listings, manifests
/// and license data only through the outbound ports.
pub mod dto;
pub mod factories;
pub mod use_cases;
