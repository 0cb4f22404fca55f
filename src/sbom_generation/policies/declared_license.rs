use crate::sbom_generation::domain::ProcessedDeclaredLicense;
use spdx::expression::{ExprNode, Operator};
use std::collections::BTreeSet;

/// DeclaredLicenseProcessor policy mapping free-form declared licenses to SPDX
///
/// Each declared string is parsed as an SPDX expression in lax mode, which
/// also accepts imprecise license names like `Apache 2`. Parsed expressions are
/// rendered in canonical form and joined with `AND`. Strings that cannot be
/// parsed are reported as unmapped.
pub struct DeclaredLicenseProcessor;

impl DeclaredLicenseProcessor {
    pub fn process(declared_licenses: &BTreeSet<String>) -> ProcessedDeclaredLicense {
        let mut mapped: BTreeSet<String> = BTreeSet::new();
        let mut unmapped: BTreeSet<String> = BTreeSet::new();

        for declared in declared_licenses {
            let declared = declared.trim();
            if declared.is_empty() {
                continue;
            }

            match Self::canonicalize(declared) {
                Some(expression) => {
                    mapped.insert(expression);
                }
                None => {
                    unmapped.insert(declared.to_string());
                }
            }
        }

        let spdx_expression = match mapped.len() {
            0 => None,
            1 => mapped.into_iter().next(),
            _ => Some(
                mapped
                    .iter()
                    .map(|expression| {
                        if expression.contains(' ') {
                            format!("({})", expression)
                        } else {
                            expression.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" AND "),
            ),
        };

        ProcessedDeclaredLicense::new(spdx_expression, unmapped)
    }

    /// Parses `expression` leniently and renders it in canonical SPDX form
    pub fn canonicalize(expression: &str) -> Option<String> {
        let parsed = spdx::Expression::parse_mode(expression, spdx::ParseMode::LAX).ok()?;

        // Nodes are stored in postfix order
        let mut stack: Vec<(String, bool)> = Vec::new();
        for node in parsed.iter() {
            match node {
                ExprNode::Req(req) => stack.push((req.req.to_string(), false)),
                ExprNode::Op(op) => {
                    let right = stack.pop()?;
                    let left = stack.pop()?;
                    let keyword = match op {
                        Operator::And => "AND",
                        Operator::Or => "OR",
                    };
                    stack.push((
                        format!("{} {} {}", wrap(left), keyword, wrap(right)),
                        true,
                    ));
                }
            }
        }

        match stack.len() {
            1 => stack.pop().map(|(rendered, _)| rendered),
            _ => None,
        }
    }

    /// License references (`LicenseRef-...`) used by `expression`
    pub fn license_refs(expression: &str) -> BTreeSet<String> {
        let Ok(parsed) = spdx::Expression::parse_mode(expression, spdx::ParseMode::LAX) else {
            return BTreeSet::new();
        };

        parsed
            .requirements()
            .filter_map(|req| match &req.req.license {
                spdx::LicenseItem::Other { lic_ref, .. } => Some(format!("LicenseRef-{}", lic_ref)),
                _ => None,
            })
            .collect()
    }
}

fn wrap((rendered, compound): (String, bool)) -> String {
    if compound {
        format!("({})", rendered)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_process_single_license() {
        let processed = DeclaredLicenseProcessor::process(&declared(&["MIT"]));
        assert_eq!(processed.spdx_expression.as_deref(), Some("MIT"));
        assert!(processed.unmapped.is_empty());
    }

    #[test]
    fn test_process_multiple_licenses_joined_with_and() {
        let processed = DeclaredLicenseProcessor::process(&declared(&["MIT", "Apache-2.0"]));
        assert_eq!(
            processed.spdx_expression.as_deref(),
            Some("Apache-2.0 AND MIT")
        );
    }

    #[test]
    fn test_process_compound_expression_is_parenthesized() {
        let processed =
            DeclaredLicenseProcessor::process(&declared(&["(MIT OR Apache-2.0)", "ISC"]));
        assert_eq!(
            processed.spdx_expression.as_deref(),
            Some("ISC AND (MIT OR Apache-2.0)")
        );
    }

    #[test]
    fn test_process_unmapped() {
        let processed =
            DeclaredLicenseProcessor::process(&declared(&["SEE LICENSE IN LICENSE.md", ""]));
        assert!(processed.spdx_expression.is_none());
        assert_eq!(
            processed.unmapped,
            declared(&["SEE LICENSE IN LICENSE.md"])
        );
    }

    #[test]
    fn test_process_empty() {
        assert!(DeclaredLicenseProcessor::process(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_canonicalize_nested() {
        assert_eq!(
            DeclaredLicenseProcessor::canonicalize("MIT AND (Apache-2.0 OR BSD-3-Clause)")
                .as_deref(),
            Some("MIT AND (Apache-2.0 OR BSD-3-Clause)")
        );
    }

    #[test]
    fn test_license_refs() {
        let refs = DeclaredLicenseProcessor::license_refs("MIT AND LicenseRef-acme-eula");
        assert_eq!(refs, declared(&["LicenseRef-acme-eula"]));
        assert!(DeclaredLicenseProcessor::license_refs("MIT OR ISC").is_empty());
        assert!(DeclaredLicenseProcessor::license_refs("not an expression ((").is_empty());
    }
}
