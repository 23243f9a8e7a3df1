//! Normalization of `pragma solidity` constraint text.
//!
//! Pragma text is whitespace-separated clauses (`>=0.8.0 <0.9.0`), optionally
//! split into alternatives with `||`. Each clause is normalized into the form
//! accepted by [`semver::Comparator`]:
//! - a bare operator is glued to the version after it (`>= 0.8.0` becomes `>=0.8.0`)
//! - a bare version is an exact match (`0.8.4` becomes `=0.8.4`)

use semver::Comparator;

/// A parsed version pragma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    /// Normalized clauses of each `||` alternative.
    pub alternatives: Vec<Vec<String>>,
}

impl Pragma {
    /// Parses pragma text, returning a human-readable reason on failure.
    pub fn parse(text: &str) -> Result<Self, String> {
        let alternatives = text
            .split("||")
            .map(normalize_clauses)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    /// Returns `true` if the pragma has `||` alternatives.
    pub fn is_alternation(&self) -> bool {
        self.alternatives.len() > 1
    }
}

/// Splits one alternative into normalized clauses and checks that each is
/// a valid comparator.
pub fn normalize_clauses(text: &str) -> Result<Vec<String>, String> {
    let mut clauses = Vec::new();
    let mut tokens = text.split_whitespace();

    while let Some(token) = tokens.next() {
        let clause = if is_operator(token) {
            match tokens.next() {
                Some(version) => format!("{token}{version}"),
                None => return Err(format!("operator '{token}' has no version")),
            }
        } else if token.starts_with(|c: char| c.is_ascii_digit()) {
            format!("={token}")
        } else {
            token.to_string()
        };

        Comparator::parse(&clause).map_err(|e| format!("clause '{clause}': {e}"))?;
        clauses.push(clause);
    }

    if clauses.is_empty() {
        return Err("empty constraint".to_string());
    }
    Ok(clauses)
}

fn is_operator(token: &str) -> bool {
    token.chars().all(|c| matches!(c, '<' | '>' | '=' | '^' | '~'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clause() {
        assert_eq!(normalize_clauses(">=0.8.0").unwrap(), vec![">=0.8.0"]);
    }

    #[test]
    fn range_splits_on_whitespace() {
        assert_eq!(
            normalize_clauses(">=0.8.0 <0.9.0").unwrap(),
            vec![">=0.8.0", "<0.9.0"]
        );
    }

    #[test]
    fn detached_operator_is_glued() {
        assert_eq!(
            normalize_clauses(">= 0.8.0 < 0.9.0").unwrap(),
            vec![">=0.8.0", "<0.9.0"]
        );
    }

    #[test]
    fn bare_version_is_exact() {
        assert_eq!(normalize_clauses("0.8.4").unwrap(), vec!["=0.8.4"]);
    }

    #[test]
    fn caret_and_tilde_pass_through() {
        assert_eq!(normalize_clauses("^0.8.0").unwrap(), vec!["^0.8.0"]);
        assert_eq!(normalize_clauses("~0.7.6").unwrap(), vec!["~0.7.6"]);
    }

    #[test]
    fn dangling_operator_rejected() {
        assert!(normalize_clauses(">=").unwrap_err().contains("no version"));
    }

    #[test]
    fn garbage_rejected() {
        assert!(normalize_clauses("latest").is_err());
        assert!(normalize_clauses("").is_err());
    }

    #[test]
    fn alternation() {
        let p = Pragma::parse("^0.7.0 || ^0.8.0").unwrap();
        assert!(p.is_alternation());
        assert_eq!(p.alternatives, vec![vec!["^0.7.0"], vec!["^0.8.0"]]);
    }

    #[test]
    fn empty_alternative_rejected() {
        assert!(Pragma::parse("^0.8.0 ||").is_err());
    }
}
