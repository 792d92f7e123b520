//! Upgrade graph: node states, pricing and purchases
//!
//! Purchases are transactional against the coin balance: either the cost is
//! deducted and the level bumped, or the progress record is left untouched.

use serde::{Deserialize, Serialize};

use super::catalog::{CATALOG, UpgradeDef, UpgradeKey};
use crate::error::{CatalogError, PurchaseError};
use crate::persistence::{Progress, ProgressStore};

/// Derived purchasability of one upgrade node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeNodeState {
    /// Prerequisites not yet bought
    Locked,
    /// Prerequisites met, nothing bought yet
    Available,
    /// Bought at least once, more levels remain
    Unlocked,
    /// At max level
    Maxed,
}

/// State of a prerequisite edge (source must be bought before target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeState {
    /// Neither end bought
    Dormant,
    /// Source bought, target still open
    Ready,
    /// Both ends bought
    Active,
}

/// Price of buying the next level when currently at `level`
pub fn cost(def: &UpgradeDef, level: u32) -> u64 {
    (def.base_cost as f64 * def.cost_scale.powi(level as i32)).floor() as u64
}

/// Node state rule, as a pure function of its inputs
pub fn node_state(level: u32, max_level: u32, prereqs_met: bool) -> UpgradeNodeState {
    if level >= max_level {
        UpgradeNodeState::Maxed
    } else if level > 0 {
        UpgradeNodeState::Unlocked
    } else if prereqs_met {
        UpgradeNodeState::Available
    } else {
        UpgradeNodeState::Locked
    }
}

/// A validated prerequisite graph over a catalog
#[derive(Debug, Clone)]
pub struct UpgradeGraph {
    defs: &'static [UpgradeDef],
}

impl UpgradeGraph {
    /// Validate a catalog: unique keys, known prerequisites, sane pricing, no cycles
    pub fn new(defs: &'static [UpgradeDef]) -> Result<Self, CatalogError> {
        for (i, def) in defs.iter().enumerate() {
            if defs[..i].iter().any(|other| other.key == def.key) {
                return Err(CatalogError::DuplicateKey(def.key));
            }
            if def.cost_scale <= 1.0 || def.max_level == 0 {
                return Err(CatalogError::InvalidPricing(def.key));
            }
            for &prereq in def.prerequisites {
                if !defs.iter().any(|other| other.key == prereq) {
                    return Err(CatalogError::UnknownPrerequisite {
                        upgrade: def.key,
                        missing: prereq,
                    });
                }
            }
        }

        let graph = Self { defs };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// The built-in catalog
    ///
    /// Panics if the built-in data is malformed; covered by tests.
    pub fn standard() -> Self {
        match Self::new(CATALOG) {
            Ok(graph) => graph,
            Err(e) => panic!("built-in upgrade catalog is invalid: {e}"),
        }
    }

    pub fn defs(&self) -> &'static [UpgradeDef] {
        self.defs
    }

    pub fn def(&self, key: UpgradeKey) -> Option<&'static UpgradeDef> {
        self.defs.iter().find(|def| def.key == key)
    }

    fn index_of(&self, key: UpgradeKey) -> Option<usize> {
        self.defs.iter().position(|def| def.key == key)
    }

    /// Depth-first search with grey/black marking
    fn check_acyclic(&self) -> Result<(), CatalogError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit(
            graph: &UpgradeGraph,
            idx: usize,
            marks: &mut [Mark],
        ) -> Result<(), CatalogError> {
            match marks[idx] {
                Mark::Done => return Ok(()),
                Mark::InProgress => return Err(CatalogError::Cycle(graph.defs[idx].key)),
                Mark::Unvisited => {}
            }
            marks[idx] = Mark::InProgress;
            for &prereq in graph.defs[idx].prerequisites {
                if let Some(next) = graph.index_of(prereq) {
                    visit(graph, next, marks)?;
                }
            }
            marks[idx] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.defs.len()];
        for idx in 0..self.defs.len() {
            visit(self, idx, &mut marks)?;
        }
        Ok(())
    }

    pub fn prereqs_met(&self, progress: &Progress, def: &UpgradeDef) -> bool {
        def.prerequisites
            .iter()
            .all(|&prereq| progress.level_of(prereq) >= 1)
    }

    /// Current state of a node; keys outside the catalog read as locked
    pub fn node_state(&self, progress: &Progress, key: UpgradeKey) -> UpgradeNodeState {
        match self.def(key) {
            Some(def) => node_state(
                progress.level_of(key),
                def.max_level,
                self.prereqs_met(progress, def),
            ),
            None => UpgradeNodeState::Locked,
        }
    }

    /// Cost of the next level, or `None` once maxed
    pub fn next_cost(&self, progress: &Progress, key: UpgradeKey) -> Option<u64> {
        let def = self.def(key)?;
        let level = progress.level_of(key);
        (level < def.max_level).then(|| cost(def, level))
    }

    pub fn can_afford(&self, progress: &Progress, key: UpgradeKey) -> bool {
        self.next_cost(progress, key)
            .is_some_and(|price| progress.coins >= price)
    }

    /// Buy one level of `key`, returning the new level
    pub fn purchase(&self, progress: &mut Progress, key: UpgradeKey) -> Result<u32, PurchaseError> {
        let def = self.def(key).ok_or(PurchaseError::UnknownUpgrade(key))?;
        let level = progress.level_of(key);

        match node_state(level, def.max_level, self.prereqs_met(progress, def)) {
            UpgradeNodeState::Maxed => return Err(PurchaseError::MaxLevelReached(key)),
            UpgradeNodeState::Locked => return Err(PurchaseError::PrerequisiteUnmet(key)),
            UpgradeNodeState::Available | UpgradeNodeState::Unlocked => {}
        }

        let price = cost(def, level);
        if progress.coins < price {
            return Err(PurchaseError::InsufficientFunds {
                cost: price,
                coins: progress.coins,
            });
        }

        progress.coins -= price;
        progress.set_level(key, level + 1);
        log::debug!("Bought {} level {} for {} coins", key, level + 1, price);
        Ok(level + 1)
    }

    /// Load progress, purchase, and persist the result
    pub fn purchase_and_save<S: ProgressStore + ?Sized>(
        &self,
        store: &mut S,
        key: UpgradeKey,
    ) -> Result<u32, PurchaseError> {
        let mut progress = store.load();
        let level = self.purchase(&mut progress, key)?;
        store
            .save(&progress)
            .map_err(|e| PurchaseError::NotSaved(e.to_string()))?;
        log::info!("{} upgraded to level {} ({} coins left)", key, level, progress.coins);
        Ok(level)
    }

    /// All prerequisite edges as (source, target)
    pub fn edges(&self) -> Vec<(UpgradeKey, UpgradeKey)> {
        self.defs
            .iter()
            .flat_map(|def| def.prerequisites.iter().map(move |&prereq| (prereq, def.key)))
            .collect()
    }

    pub fn edge_state(
        &self,
        progress: &Progress,
        source: UpgradeKey,
        target: UpgradeKey,
    ) -> EdgeState {
        match (progress.level_of(source) > 0, progress.level_of(target) > 0) {
            (true, true) => EdgeState::Active,
            (true, false) => EdgeState::Ready,
            _ => EdgeState::Dormant,
        }
    }
}
