/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// pnpm listings, manifests on disk, license data, formatters and the console.
pub mod outbound;
