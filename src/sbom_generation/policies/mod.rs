mod declared_license;
mod spdx_package_variant;

pub use declared_license::DeclaredLicenseProcessor;
pub use spdx_package_variant::SpdxPackageVariant;
