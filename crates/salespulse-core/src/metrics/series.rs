//! Ordered key -> value mappings and the shared grouping helpers.
//!
//! A `Series` serializes as a JSON object whose key order is the order the
//! entries were pushed, so rankings survive the trip to the client.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dataset::{Dimension, SalesDataset};
use crate::error::Result;

/// Ordered mapping from a group key to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Series<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> Series<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: V) {
        self.entries.push((key.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> FromIterator<(String, V)> for Series<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<V: Serialize> Serialize for Series<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Round half away from zero to 2 decimal places, so exact halves grow in
/// magnitude (0.125 -> 0.13) where banker's rounding would give 0.12.
/// Non-finite input reports 0.
pub fn round2(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let scaled = v * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        // too large to carry cents
        v
    }
}

/// `num / den`, or 0 when the denominator is 0 or the quotient overflows.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let q = num / den;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Percent change from `prior` to `current`; 0 when `prior` is 0 or the
/// change is not finite.
pub fn pct_change(prior: f64, current: f64) -> f64 {
    if prior == 0.0 {
        return 0.0;
    }
    let change = (current - prior) / prior * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Running totals for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupTotals {
    pub revenue: f64,
    pub units: f64,
    pub orders: u64,
}

/// Group cleaned orders by `dim`, ascending key order.
/// Orders with a blank key are left out.
pub fn group_by(dataset: &SalesDataset, dim: Dimension) -> Result<BTreeMap<String, GroupTotals>> {
    dataset.require(dim)?;

    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for order in dataset.orders() {
        let Some(key) = order.key(dim) else { continue };
        let g = groups.entry(key.to_string()).or_default();
        g.revenue += order.revenue;
        g.units += order.quantity;
        g.orders += 1;
    }
    Ok(groups)
}

/// Rank groups by `value` descending, keep at most `limit`, round to 2 dp.
/// The sort is stable: ties keep ascending key order.
pub fn ranked(
    groups: &BTreeMap<String, GroupTotals>,
    value: impl Fn(&GroupTotals) -> f64,
    limit: Option<usize>,
) -> Series<f64> {
    let mut entries: Vec<(&String, f64)> = groups.iter().map(|(k, g)| (k, value(g))).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(k, v)| (k.clone(), round2(v)))
        .collect()
}
