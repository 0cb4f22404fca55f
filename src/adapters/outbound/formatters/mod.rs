/// Formatter adapters for the supported SPDX serializations
mod spdx_json_formatter;
mod spdx_yaml_formatter;

pub use spdx_json_formatter::SpdxJsonFormatter;
pub use spdx_yaml_formatter::SpdxYamlFormatter;
