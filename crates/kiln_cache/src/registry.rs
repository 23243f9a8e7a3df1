//! In-memory store of known sources and compiled units.

use std::collections::BTreeMap;

use kiln_source::{split_qualified_name, Contract, Source};

/// Registry of every known [`Source`] and [`Contract`].
///
/// Sources are keyed by their relative path and contracts by
/// (source path, contract name). Upsert is the only way to add or change an
/// entry; iteration is in key order so every consumer sees the same order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    sources: BTreeMap<String, Source>,
    contracts: BTreeMap<(String, String), Contract>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `source`, replacing any source with the same path.
    pub fn upsert_source(&mut self, source: Source) {
        self.sources.insert(source.path(), source);
    }

    /// Inserts `contract`, replacing any contract with the same identity.
    pub fn upsert_contract(&mut self, contract: Contract) {
        let key = (contract.source.clone(), contract.name.clone());
        self.contracts.insert(key, contract);
    }

    /// Returns the source at `path`.
    pub fn source(&self, path: &str) -> Option<&Source> {
        self.sources.get(path)
    }

    /// Returns the source at `path` for in-place updates.
    pub fn source_mut(&mut self, path: &str) -> Option<&mut Source> {
        self.sources.get_mut(path)
    }

    /// Returns `true` if a source is registered at `path`.
    pub fn contains_source(&self, path: &str) -> bool {
        self.sources.contains_key(path)
    }

    /// Iterates over all sources in path order.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    /// Returns the number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Returns the contract `name` defined in `source`.
    pub fn contract(&self, source: &str, name: &str) -> Option<&Contract> {
        self.contracts.get(&(source.to_string(), name.to_string()))
    }

    /// Returns the contract for a `source:name` qualified name.
    pub fn contract_by_qualified_name(&self, qualified: &str) -> Option<&Contract> {
        let (source, name) = split_qualified_name(qualified)?;
        self.contract(source, name)
    }

    /// Iterates over all contracts in (source, name) order.
    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    /// Iterates over the contracts defined in `source`.
    pub fn contracts_for_source<'a>(
        &'a self,
        source: &'a str,
    ) -> impl Iterator<Item = &'a Contract> + 'a {
        self.contracts.values().filter(move |c| c.source == source)
    }

    /// Returns the number of registered contracts.
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }

    /// Removes and returns the contract `name` defined in `source`.
    pub fn remove_contract(&mut self, source: &str, name: &str) -> Option<Contract> {
        self.contracts.remove(&(source.to_string(), name.to_string()))
    }

    /// Removes and returns the contracts defined in `source`.
    pub fn remove_contracts_for_source(&mut self, source: &str) -> Vec<Contract> {
        let keys: Vec<_> = self
            .contracts
            .keys()
            .filter(|(s, _)| s == source)
            .cloned()
            .collect();
        keys.into_iter()
            .filter_map(|k| self.contracts.remove(&k))
            .collect()
    }

    /// Removes the source at `path` together with its contracts.
    ///
    /// Returns the removed source, if any.
    pub fn remove_source(&mut self, path: &str) -> Option<Source> {
        self.remove_contracts_for_source(path);
        self.sources.remove(path)
    }
}
