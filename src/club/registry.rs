//! Runner registry and badge assignment.
//!
//! Registry lookups are by cap-number or trimmed name. A miss is `None`,
//! never an error.

use serde::Serialize;
use std::collections::HashMap;

use super::types::{default_badge_tiers, BadgeTier, Runner};

/// Registry of club members keyed by cap-number and name.
#[derive(Debug, Clone, Default)]
pub struct RunnerRegistry {
    runners: Vec<Runner>,
    by_cap: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl RunnerRegistry {
    /// Build a registry. Later duplicates of a cap-number or name are ignored.
    pub fn new(runners: impl IntoIterator<Item = Runner>) -> Self {
        let mut registry = Self::default();
        for runner in runners {
            registry.insert(runner);
        }
        registry
    }

    /// Insert a runner, returning `false` if the cap-number or name is taken.
    pub fn insert(&mut self, runner: Runner) -> bool {
        let runner = Runner::new(&runner.name, runner.capnumber);
        if self.by_cap.contains_key(&runner.capnumber) || self.by_name.contains_key(&runner.name) {
            return false;
        }
        let index = self.runners.len();
        self.by_cap.insert(runner.capnumber, index);
        self.by_name.insert(runner.name.clone(), index);
        self.runners.push(runner);
        true
    }

    pub fn by_cap_number(&self, capnumber: u32) -> Option<&Runner> {
        self.by_cap.get(&capnumber).map(|&i| &self.runners[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&Runner> {
        self.by_name.get(name.trim()).map(|&i| &self.runners[i])
    }

    /// Resolve free-text cap-number input (as typed by a runner).
    pub fn lookup_input(&self, input: &str) -> Result<&Runner, LookupError> {
        let capnumber = parse_cap_number(input)?;
        self.by_cap_number(capnumber)
            .ok_or(LookupError::NotFound(capnumber))
    }

    /// The most recently registered runner (highest cap-number).
    pub fn newest(&self) -> Option<&Runner> {
        self.runners.iter().max_by_key(|r| r.capnumber)
    }

    pub fn runners(&self) -> &[Runner] {
        &self.runners
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

/// Parse a cap-number typed by a user.
pub fn parse_cap_number(input: &str) -> Result<u32, LookupError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| LookupError::InvalidCapNumber(input.trim().to_string()))
}

/// Step function from lifetime run count to the best badge earned.
#[derive(Debug, Clone)]
pub struct BadgeTable {
    /// Sorted ascending by threshold.
    tiers: Vec<BadgeTier>,
}

impl BadgeTable {
    pub fn new(mut tiers: Vec<BadgeTier>) -> Self {
        tiers.sort_by_key(|t| t.threshold);
        tiers.dedup_by_key(|t| t.threshold);
        Self { tiers }
    }

    /// Best badge for a count, checking the highest threshold first.
    pub fn badge_for(&self, count: u32) -> Option<&BadgeTier> {
        self.tiers.iter().rev().find(|t| count >= t.threshold)
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> Vec<u32> {
        self.tiers.iter().map(|t| t.threshold).collect()
    }

    pub fn tier(&self, threshold: u32) -> Option<&BadgeTier> {
        self.tiers.iter().find(|t| t.threshold == threshold)
    }

    pub fn tiers(&self) -> &[BadgeTier] {
        &self.tiers
    }
}

impl Default for BadgeTable {
    fn default() -> Self {
        Self::new(default_badge_tiers())
    }
}

/// Registry row with lifetime count and badge, for the sidebar listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryEntry {
    pub name: String,
    pub capnumber: u32,
    pub runs: u32,
    pub badge: Option<BadgeTier>,
}

/// Pair every registered runner with their run count and badge.
pub fn registry_with_badges(
    registry: &RunnerRegistry,
    run_count: impl Fn(&str) -> u32,
    badges: &BadgeTable,
) -> Vec<RegistryEntry> {
    registry
        .runners()
        .iter()
        .map(|runner| {
            let runs = run_count(&runner.name);
            RegistryEntry {
                name: runner.name.clone(),
                capnumber: runner.capnumber,
                runs,
                badge: badges.badge_for(runs).cloned(),
            }
        })
        .collect()
}

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("capnumber must be a number: {0:?}")]
    InvalidCapNumber(String),

    #[error("capnumber not found: {0}")]
    NotFound(u32),
}
