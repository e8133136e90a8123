//! Disabled-algorithm lists
//!
//! Parses the comma-separated list format used by the JDK's
//! `jdk.certpath.disabledAlgorithms` security property, restricted to the
//! two entry shapes this crate has rules for:
//!
//! ```text
//! MD2, MD4, MD5, EC keySize < 160, RSA keySize < 2048, DSA keySize < 2048
//! ```
//!
//! A bare name becomes [`Rule::DisabledToken`]; `FAMILY keySize < N` becomes
//! [`Rule::MinimumKeySize`]. Anything else is refused rather than ignored.

use crate::policy::AlgorithmPolicy;
use crate::rule::Rule;
use hardline_core::{Error, KeyFamily, MatchCase, Result};

/// Parse a disabled-algorithm list into rules, in list order
pub fn parse_disabled_algorithms(list: &str, case: MatchCase) -> Result<Vec<Rule>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_entry(entry, case))
        .collect()
}

/// Build a policy from a disabled-algorithm list
pub fn policy_from_disabled_algorithms(list: &str, case: MatchCase) -> Result<AlgorithmPolicy> {
    parse_disabled_algorithms(list, case).map(AlgorithmPolicy::from_rules)
}

fn parse_entry(entry: &str, case: MatchCase) -> Result<Rule> {
    let Some((family, constraint)) = entry.split_once("keySize") else {
        if entry.split_whitespace().count() != 1 {
            return Err(Error::Config(format!(
                "Unsupported disabled-algorithm entry: '{entry}'"
            )));
        }
        return Ok(Rule::DisabledToken {
            token: entry.to_string(),
            case,
        });
    };

    let family_name = family.trim();
    let family = KeyFamily::from_algorithm(family_name);
    if family == KeyFamily::Other {
        return Err(Error::Config(format!(
            "Unknown key family '{family_name}' in '{entry}'"
        )));
    }

    let constraint = constraint.trim();
    let bits = match constraint.strip_prefix('<') {
        Some(rest) if !rest.starts_with('=') => rest.trim(),
        _ => {
            return Err(Error::Config(format!(
                "Only 'keySize < N' constraints are supported, got '{entry}'"
            )))
        }
    };

    let bits = bits
        .parse::<u32>()
        .map_err(|e| Error::Config(format!("Invalid key size in '{entry}': {e}")))?;

    Ok(Rule::MinimumKeySize { family, bits })
}
