//! Group-wise mean and count of a value column.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::data::{GroupKey, HousingTable, TableError};

/// Order of groups in an [`Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum SortOrder {
    /// Natural key order.
    #[default]
    Key,
    /// Highest mean first; equal means keep key order.
    MeanDescending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: GroupKey,
    pub mean: f64,
    pub count: usize,
}

/// Summary per distinct key. Every key appears once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub key_column: String,
    pub order: SortOrder,
    pub groups: Vec<GroupStats>,
}

impl Aggregate {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&GroupStats> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Group with the highest mean; the first by key on ties.
    pub fn best(&self) -> Option<&GroupStats> {
        self.groups.iter().reduce(|best, g| {
            if g.mean > best.mean || (g.mean == best.mean && g.key < best.key) {
                g
            } else {
                best
            }
        })
    }

    /// Group with the lowest mean; the first by key on ties.
    pub fn worst(&self) -> Option<&GroupStats> {
        self.groups.iter().reduce(|worst, g| {
            if g.mean < worst.mean || (g.mean == worst.mean && g.key < worst.key) {
                g
            } else {
                worst
            }
        })
    }

    /// First `n` groups in the current order.
    pub fn top(&self, n: usize) -> &[GroupStats] {
        &self.groups[..n.min(self.groups.len())]
    }

    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    /// Same groups in another order.
    pub fn sorted(&self, order: SortOrder) -> Aggregate {
        let mut groups = self.groups.clone();
        match order {
            SortOrder::Key => groups.sort_by(|a, b| a.key.cmp(&b.key)),
            SortOrder::MeanDescending => groups.sort_by(|a, b| {
                b.mean.total_cmp(&a.mean).then_with(|| a.key.cmp(&b.key))
            }),
        }
        Aggregate {
            key_column: self.key_column.clone(),
            order,
            groups,
        }
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Group `table` by exact value of `key_column` and average `value_column`.
    ///
    /// Rows with a missing key or value are skipped. With `min_count`, groups
    /// that have fewer rows are left out.
    pub fn group_mean(
        table: &HousingTable,
        key_column: &str,
        value_column: &str,
        min_count: Option<usize>,
        order: SortOrder,
    ) -> Result<Aggregate, TableError> {
        let keys = table.keys(key_column)?;
        let values = table.values_f64(value_column)?;

        let mut sums: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();
        for (key, value) in keys.into_iter().zip(values) {
            if let (Some(key), Some(value)) = (key, value) {
                let entry = sums.entry(key).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let total_groups = sums.len();
        let groups = sums
            .into_iter()
            .filter(|(_, (_, count))| min_count.map_or(true, |min| *count >= min))
            .map(|(key, (sum, count))| GroupStats {
                key,
                mean: sum / count as f64,
                count,
            })
            .collect();

        let aggregate = Aggregate {
            key_column: key_column.to_string(),
            order: SortOrder::Key,
            groups,
        }
        .sorted(order);

        debug!(
            "Grouped '{}' by '{}': {} of {} groups kept",
            value_column,
            key_column,
            aggregate.len(),
            total_groups
        );
        Ok(aggregate)
    }

    /// Mean of `value_column` over rows whose integer key is in `keys`.
    pub fn mean_for_keys(
        table: &HousingTable,
        key_column: &str,
        value_column: &str,
        keys: &[i64],
    ) -> Result<f64, TableError> {
        let row_keys = table.keys(key_column)?;
        let values = table.values_f64(value_column)?;

        let (sum, count) = row_keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| match (key?, value?) {
                (GroupKey::Int(k), v) if keys.contains(&k) => Some(v),
                _ => None,
            })
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

        Ok(if count == 0 { f64::NAN } else { sum / count as f64 })
    }
}
