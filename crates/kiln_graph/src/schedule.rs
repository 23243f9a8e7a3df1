//! Selection of the components that must be rebuilt.

use crate::graph::Component;

/// Outcome of rebuild selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Components containing at least one changed source, in input order.
    pub rebuild: Vec<Component>,
    /// Number of components left untouched.
    pub skipped: usize,
}

/// Keeps the components that contain at least one of `dirty` (the added or
/// modified source paths of this run).
///
/// Selection is by membership only: a component whose sources did not change
/// is skipped even if a dependency's interface changed in an earlier run.
pub fn schedule(components: Vec<Component>, dirty: &[String]) -> Schedule {
    let total = components.len();
    let rebuild: Vec<Component> = components
        .into_iter()
        .filter(|c| dirty.iter().any(|d| c.contains(d)))
        .collect();
    let skipped = total - rebuild.len();

    tracing::debug!(rebuild = rebuild.len(), skipped, "scheduled components");
    Schedule { rebuild, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(paths: &[&str]) -> Component {
        let mut sources: Vec<String> = paths.iter().map(|s| s.to_string()).collect();
        sources.sort();
        Component { sources }
    }

    #[test]
    fn selects_only_dirty_components() {
        let comps = vec![comp(&["A.sol", "B.sol"]), comp(&["C.sol"]), comp(&["D.sol"])];
        let s = schedule(comps, &["B.sol".to_string()]);
        assert_eq!(s.rebuild, vec![comp(&["A.sol", "B.sol"])]);
        assert_eq!(s.skipped, 2);
    }

    #[test]
    fn component_selected_once_for_many_dirty_members() {
        let comps = vec![comp(&["A.sol", "B.sol"])];
        let s = schedule(comps, &["A.sol".to_string(), "B.sol".to_string()]);
        assert_eq!(s.rebuild.len(), 1);
    }

    #[test]
    fn nothing_dirty_nothing_rebuilt() {
        let comps = vec![comp(&["A.sol"]), comp(&["B.sol"])];
        let s = schedule(comps, &[]);
        assert!(s.rebuild.is_empty());
        assert_eq!(s.skipped, 2);
    }

    #[test]
    fn deleted_path_not_in_graph_selects_nothing() {
        let comps = vec![comp(&["A.sol"])];
        let s = schedule(comps, &["Gone.sol".to_string()]);
        assert!(s.rebuild.is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let comps = vec![comp(&["Z.sol"]), comp(&["A.sol"])];
        let s = schedule(comps, &["A.sol".to_string(), "Z.sol".to_string()]);
        assert_eq!(s.rebuild[0], comp(&["Z.sol"]));
        assert_eq!(s.rebuild[1], comp(&["A.sol"]));
    }
}
