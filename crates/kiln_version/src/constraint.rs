//! Intersection of the version pragmas of a component.

use std::fmt;

use semver::{Comparator, Version, VersionReq};

use crate::error::VersionError;
use crate::pragma::Pragma;

/// The logical AND of every distinct clause declared by a set of sources.
///
/// Pragmas without `||` contribute their clauses to one flat comparator list.
/// A pragma with `||` is kept as a group that must have at least one
/// satisfied alternative.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    clauses: Vec<String>,
    req: VersionReq,
    alternations: Vec<Vec<VersionReq>>,
    alternation_text: Vec<String>,
}

impl VersionConstraint {
    /// Builds the constraint from `(source path, pragma text)` pairs.
    ///
    /// Identical pragma texts and identical clauses are counted once.
    pub fn from_pragmas<'a>(
        pragmas: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, VersionError> {
        let mut seen_pragmas: Vec<&str> = Vec::new();
        let mut clauses: Vec<String> = Vec::new();
        let mut alternations = Vec::new();
        let mut alternation_text = Vec::new();

        for (path, text) in pragmas {
            let text = text.trim();
            if seen_pragmas.contains(&text) {
                continue;
            }
            seen_pragmas.push(text);

            let invalid = |reason: String| VersionError::InvalidPragma {
                path: path.to_string(),
                pragma: text.to_string(),
                reason,
            };
            let pragma = Pragma::parse(text).map_err(invalid)?;

            if pragma.is_alternation() {
                let reqs = pragma
                    .alternatives
                    .iter()
                    .map(|alt| to_req(alt))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                alternations.push(reqs);
                alternation_text.push(
                    pragma
                        .alternatives
                        .iter()
                        .map(|alt| alt.join(" "))
                        .collect::<Vec<_>>()
                        .join(" || "),
                );
            } else {
                for clause in pragma.alternatives.into_iter().flatten() {
                    if !clauses.contains(&clause) {
                        clauses.push(clause);
                    }
                }
            }
        }

        let req = to_req(&clauses).map_err(|reason| VersionError::InvalidPragma {
            path: String::new(),
            pragma: clauses.join(", "),
            reason,
        })?;

        Ok(Self {
            clauses,
            req,
            alternations,
            alternation_text,
        })
    }

    /// Returns `true` if `version` satisfies every clause.
    pub fn matches(&self, version: &Version) -> bool {
        self.req.matches(version)
            && self
                .alternations
                .iter()
                .all(|alts| alts.iter().any(|r| r.matches(version)))
    }

    /// Returns the distinct flat clauses, in first-seen order.
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.clauses.clone();
        parts.extend(self.alternation_text.iter().map(|t| format!("({t})")));
        if parts.is_empty() {
            f.write_str("*")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

fn to_req(clauses: &[String]) -> Result<VersionReq, String> {
    let comparators = clauses
        .iter()
        .map(|c| Comparator::parse(c).map_err(|e| format!("clause '{c}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VersionReq { comparators })
}

/// Intersects the pragmas of a component and checks `version` against it.
///
/// `pragmas` yields `(source path, first pragma text)` for every member.
/// Returns the combined constraint when `version` satisfies it.
pub fn resolve_constraint<'a>(
    pragmas: impl IntoIterator<Item = (&'a str, &'a str)>,
    version: &Version,
) -> Result<VersionConstraint, VersionError> {
    let pragmas: Vec<(&str, &str)> = pragmas.into_iter().collect();
    let constraint = VersionConstraint::from_pragmas(pragmas.iter().copied())?;

    if !constraint.matches(version) {
        return Err(VersionError::Unsatisfied {
            version: version.to_string(),
            constraint: constraint.to_string(),
            sources: pragmas.iter().map(|(p, _)| p.to_string()).collect(),
        });
    }

    tracing::debug!(%version, constraint = %constraint, "version constraint satisfied");
    Ok(constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn lower_and_upper_bounds_intersect() {
        let c = VersionConstraint::from_pragmas([("A.sol", ">=0.8.0"), ("B.sol", "<0.9.0")])
            .unwrap();
        assert!(c.matches(&v("0.8.4")));
        assert!(!c.matches(&v("0.9.0")));
        assert!(!c.matches(&v("0.7.6")));
        assert_eq!(c.to_string(), ">=0.8.0, <0.9.0");
    }

    #[test]
    fn duplicate_clauses_counted_once() {
        let c = VersionConstraint::from_pragmas([
            ("A.sol", "^0.8.0"),
            ("B.sol", "^0.8.0"),
            ("C.sol", ">=0.8.0 ^0.8.0"),
        ])
        .unwrap();
        assert_eq!(c.clauses(), &["^0.8.0".to_string(), ">=0.8.0".to_string()]);
    }

    #[test]
    fn caret_follows_minor_for_zero_major() {
        let c = VersionConstraint::from_pragmas([("A.sol", "^0.8.0")]).unwrap();
        assert!(c.matches(&v("0.8.19")));
        assert!(!c.matches(&v("0.9.0")));
    }

    #[test]
    fn exact_version() {
        let c = VersionConstraint::from_pragmas([("A.sol", "0.8.4")]).unwrap();
        assert!(c.matches(&v("0.8.4")));
        assert!(!c.matches(&v("0.8.5")));
    }

    #[test]
    fn alternation_needs_one_branch() {
        let c = VersionConstraint::from_pragmas([("A.sol", "^0.7.0 || ^0.8.0"), ("B.sol", ">=0.7.5")])
            .unwrap();
        assert!(c.matches(&v("0.7.6")));
        assert!(c.matches(&v("0.8.4")));
        assert!(!c.matches(&v("0.7.4")));
        assert!(!c.matches(&v("0.6.12")));
        assert_eq!(c.to_string(), ">=0.7.5, (^0.7.0 || ^0.8.0)");
    }

    #[test]
    fn invalid_pragma_names_source() {
        let err = VersionConstraint::from_pragmas([("ok.sol", "^0.8.0"), ("bad.sol", "latest")])
            .unwrap_err();
        match err {
            VersionError::InvalidPragma { path, pragma, .. } => {
                assert_eq!(path, "bad.sol");
                assert_eq!(pragma, "latest");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolve_accepts_matching_version() {
        let c = resolve_constraint([("A.sol", ">=0.8.0"), ("B.sol", "<0.9.0")], &v("0.8.4"))
            .unwrap();
        assert!(c.matches(&v("0.8.4")));
    }

    #[test]
    fn resolve_rejects_mismatched_version() {
        let err = resolve_constraint([("A.sol", ">=0.8.0"), ("B.sol", "<0.9.0")], &v("0.9.0"))
            .unwrap_err();
        match err {
            VersionError::Unsatisfied {
                version, sources, ..
            } => {
                assert_eq!(version, "0.9.0");
                assert_eq!(sources, vec!["A.sol", "B.sol"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_component_is_unconstrained() {
        let c = VersionConstraint::from_pragmas(std::iter::empty()).unwrap();
        assert!(c.matches(&v("0.8.4")));
        assert_eq!(c.to_string(), "*");
    }
}
