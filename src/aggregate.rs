use std::collections::BTreeMap;

use crate::week::WeekLabel;

pub type WeekTotals = BTreeMap<String, f64>;
pub type GroupWeeks = BTreeMap<WeekLabel, WeekTotals>;

/// Running totals keyed by group, week and entity. Payroll groups by year,
/// job orders use `()` as a single group.
#[derive(Debug, Clone)]
pub struct Aggregate<G: Ord> {
    groups: BTreeMap<G, GroupWeeks>,
}

impl<G: Ord> Default for Aggregate<G> {
    fn default() -> Self {
        Self { groups: BTreeMap::new() }
    }
}

impl<G: Ord> Aggregate<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the (group, week, entity) total, starting from zero.
    pub fn add(&mut self, group: G, week: &WeekLabel, entity: &str, amount: f64) {
        *self
            .groups
            .entry(group)
            .or_default()
            .entry(week.clone())
            .or_default()
            .entry(entity.to_string())
            .or_insert(0.0) += amount;
    }

    /// Register a week column for `group` even if no entity lands in it.
    pub fn touch_week(&mut self, group: G, week: &WeekLabel) {
        self.groups.entry(group).or_default().entry(week.clone()).or_default();
    }

    #[cfg(test)]
    pub fn get(&self, group: &G, week: &WeekLabel, entity: &str) -> Option<f64> {
        self.groups.get(group)?.get(week)?.get(entity).copied()
    }

    /// True when no entity total has been recorded in any group.
    pub fn is_empty(&self) -> bool {
        self.groups
            .values()
            .all(|weeks| weeks.values().all(|totals| totals.is_empty()))
    }

    pub fn groups(&self) -> impl Iterator<Item = (&G, &GroupWeeks)> {
        self.groups.iter()
    }
}
