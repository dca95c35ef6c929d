use anyhow::{anyhow, Result};
use qks_utils::{dejsonify, load_json_file};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

/// A 0/1 knapsack instance as read from disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instance {
    pub weights: Vec<f64>,
    #[serde(rename = "profits")]
    pub values: Vec<f64>,
    #[serde(rename = "max_wgt")]
    pub max_weight: f64,
}

impl Instance {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json_file::<Instance, _>(path)
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        dejsonify::<Instance>(json_str).map_err(|e| anyhow!("Failed to parse instance: {}", e))
    }

    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    /// Checks a selection of item indices and returns its total value.
    pub fn verify_selection(&self, items: &[usize]) -> Result<f64> {
        let selected_items: HashSet<usize> = items.iter().cloned().collect();
        if selected_items.len() != items.len() {
            return Err(anyhow!("Duplicate items selected."));
        }

        let mut total_weight = 0.0;
        let mut total_value = 0.0;
        for &item in items {
            if item >= self.weights.len() || item >= self.values.len() {
                return Err(anyhow!("Item ({}) is out of bounds", item));
            }
            total_weight += self.weights[item];
            total_value += self.values[item];
        }

        if total_weight > self.max_weight {
            return Err(anyhow!(
                "Total weight ({}) exceeded max weight ({})",
                total_weight,
                self.max_weight
            ));
        }
        Ok(total_value)
    }

    pub fn total_weight(&self, items: &[usize]) -> f64 {
        items.iter().filter_map(|&i| self.weights.get(i)).sum()
    }
}
