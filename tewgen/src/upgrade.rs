//! Which countries can be formed from which.
//!
//! A country with `sons` can be formed by any of its descendants: its sons,
//! their sons, and so on.

use crate::config::{Country, CountryTable};
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub struct UpgradeGraph<'a> {
    table: &'a CountryTable,
    /// Upgradeable countries with their descendants, in table order.
    upgradeable: Vec<(&'a Country, Vec<String>)>,
    /// Descendant tag -> upgradeable countries it can form, in table order.
    ancestors: HashMap<String, Vec<String>>,
}

impl<'a> UpgradeGraph<'a> {
    pub fn new(table: &'a CountryTable) -> Self {
        let mut graph = UpgradeGraph {
            table,
            upgradeable: Vec::new(),
            ancestors: HashMap::new(),
        };
        for country in table.iter().filter(|c| c.is_upgradeable()) {
            let descendants = graph.descendants(&country.id);
            for tag in &descendants {
                let parents = graph.ancestors.entry(tag.clone()).or_default();
                if !parents.contains(&country.id) {
                    parents.push(country.id.clone());
                }
            }
            graph.upgradeable.push((country, descendants));
        }
        graph
    }

    /// Every known country reachable through `sons` from `tag`, deepest first,
    /// without duplicates. Cycles are cut and `tag` itself is never included.
    pub fn descendants(&self, tag: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut visiting = HashSet::new();
        self.collect(tag, &mut visiting, &mut out);
        out.retain(|t| t != tag);
        out
    }

    fn collect(&self, tag: &str, visiting: &mut HashSet<String>, out: &mut Vec<String>) {
        let Some(country) = self.table.get(tag) else {
            return;
        };
        if !visiting.insert(tag.to_string()) {
            return;
        }
        for son in &country.sons {
            self.collect(son, visiting, out);
            if self.table.get(son).is_some() && !out.contains(son) {
                out.push(son.clone());
            }
        }
        visiting.remove(tag);
    }

    pub fn upgradeable(&self) -> impl Iterator<Item = &(&'a Country, Vec<String>)> {
        self.upgradeable.iter()
    }

    /// Upgradeable countries `tag` can take part in forming.
    pub fn ancestors(&self, tag: &str) -> &[String] {
        self.ancestors.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Other upgradeable countries that compete with `country` for one of its
    /// descendants. Countries that are themselves descendants do not count.
    pub fn conflicts(&self, country: &str, descendants: &[String]) -> Vec<String> {
        let mut conflicts: Vec<String> = Vec::new();
        for tag in descendants {
            for parent in self.ancestors(tag) {
                if parent == country
                    || descendants.contains(parent)
                    || conflicts.contains(parent)
                {
                    continue;
                }
                conflicts.push(parent.clone());
            }
        }
        conflicts
    }
}
