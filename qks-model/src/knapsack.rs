use crate::{
    cqm::{ConstrainedQuadraticModel, Expression, Sense, Variable},
    instance::Instance,
    sampleset::Sample,
};
use anyhow::{anyhow, Result};

pub const WEIGHT_LIMIT_LABEL: &str = "weight_limit";
pub const KNAPSACK_LABEL: &str = "Knapsack Problem Solution";

pub fn item_label(index: usize) -> String {
    format!("x_{}", index)
}

pub fn item_index(label: &str) -> Option<usize> {
    label.strip_prefix("x_")?.parse::<usize>().ok()
}

/// Builds the CQM for `instance`:
///
/// minimize  -sum(values[i] * x_i)
/// subject to sum(weights[i] * x_i) <= max_weight
pub fn knapsack_model(instance: &Instance) -> Result<ConstrainedQuadraticModel> {
    if instance.values.len() != instance.weights.len() {
        return Err(anyhow!(
            "Instance has {} weights but {} profits",
            instance.weights.len(),
            instance.values.len()
        ));
    }

    let mut cqm = ConstrainedQuadraticModel::new();
    for i in 0..instance.num_items() {
        cqm.add_variable(Variable::binary(item_label(i)))?;
    }

    // the service minimizes, so maximizing value means minimizing its negation
    let total_value = Expression::linear(
        instance
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| (item_label(i), v)),
    );
    cqm.set_objective(-total_value)?;

    let total_weight = Expression::linear(
        instance
            .weights
            .iter()
            .enumerate()
            .map(|(i, &w)| (item_label(i), w)),
    );
    cqm.add_constraint(
        total_weight,
        Sense::Le,
        instance.max_weight,
        WEIGHT_LIMIT_LABEL,
    )?;

    Ok(cqm)
}

/// Indices of the items switched on in `sample`, in variable order.
pub fn selected_items(sample: &Sample) -> Result<Vec<usize>> {
    sample
        .iter()
        .filter(|(_, value)| *value != 0)
        .map(|(label, _)| {
            item_index(label).ok_or_else(|| anyhow!("Unexpected variable label '{}'", label))
        })
        .collect()
}
