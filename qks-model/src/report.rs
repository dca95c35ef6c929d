use crate::{instance::Instance, knapsack::selected_items, sampleset::Sample};
use anyhow::{anyhow, Result};
use std::io::Write;

pub const NO_SOLUTION_MESSAGE: &str = "No feasible solution found.";

/// Writes the items picked by `best`, or the no-solution message when there is none.
pub fn write_report<W: Write>(
    out: &mut W,
    instance: &Instance,
    best: Option<&Sample>,
) -> Result<()> {
    let best = match best {
        Some(best) => best,
        None => {
            writeln!(out, "{}", NO_SOLUTION_MESSAGE)?;
            return Ok(());
        }
    };

    // resolve every item before printing so a bad index leaves no partial report
    let lines = selected_items(best)?
        .into_iter()
        .map(|idx| match (instance.weights.get(idx), instance.values.get(idx)) {
            (Some(w), Some(v)) => Ok(format!("Item {}: Weight = {}, Value = {}", idx + 1, w, v)),
            _ => Err(anyhow!("Item ({}) is out of bounds", idx)),
        })
        .collect::<Result<Vec<_>>>()?;

    writeln!(out, "Best solution found:")?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
