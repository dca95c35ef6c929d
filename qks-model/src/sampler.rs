use crate::{
    cqm::{ConstrainedQuadraticModel, FEASIBILITY_TOLERANCE},
    instance::Instance,
    knapsack::{knapsack_model, selected_items},
    report::write_report,
    sampleset::{Sample, SampleSet},
};
use anyhow::Result;
use std::io::Write;
use tracing::{info, warn};

/// A service that samples constrained quadratic models.
///
/// Callers await a single request/response; implementations must not return
/// until the sample set is complete.
#[allow(async_fn_in_trait)]
pub trait CqmSampler {
    async fn sample_cqm(&self, cqm: &ConstrainedQuadraticModel, label: &str) -> Result<SampleSet>;
}

/// Builds the model for `instance`, samples it and writes the report to `out`.
///
/// Returns the selected item indices, or `None` when no feasible sample came back.
pub async fn solve_and_report<S, W>(
    sampler: &S,
    instance: &Instance,
    label: &str,
    out: &mut W,
) -> Result<Option<Vec<usize>>>
where
    S: CqmSampler,
    W: Write,
{
    let cqm = knapsack_model(instance)?;
    info!(
        "built model with {} variables and {} constraint(s)",
        cqm.num_variables(),
        cqm.num_constraints()
    );

    let sampleset = sampler.sample_cqm(&cqm, label).await?;
    info!(
        "received {} samples ({} feasible)",
        sampleset.len(),
        sampleset.feasible().count()
    );

    let best = sampleset.best_feasible();
    if let Some(best) = &best {
        check_sample(&cqm, instance, best);
    }
    write_report(out, instance, best.as_ref())?;
    best.map(|b| selected_items(&b)).transpose()
}

/// Logs the selection totals and any disagreement between the service and a local evaluation.
fn check_sample(cqm: &ConstrainedQuadraticModel, instance: &Instance, sample: &Sample) {
    let assignment = sample.assignment();
    match cqm.is_feasible(&assignment) {
        Ok(true) => {}
        Ok(false) => warn!("sample reported feasible by the solver violates a constraint locally"),
        Err(e) => warn!("could not evaluate sample feasibility: {}", e),
    }
    match cqm.energy(&assignment) {
        Ok(energy) if !energies_match(energy, sample.energy()) => warn!(
            "solver energy ({}) differs from local energy ({})",
            sample.energy(),
            energy
        ),
        Ok(_) => {}
        Err(e) => warn!("could not evaluate sample energy: {}", e),
    }
    match selected_items(sample).and_then(|items| {
        let value = instance.verify_selection(&items)?;
        Ok((instance.total_weight(&items), value))
    }) {
        Ok((weight, value)) => info!(
            "best sample: energy {}, total weight {} / {}, total value {}",
            sample.energy(),
            weight,
            instance.max_weight,
            value
        ),
        Err(e) => warn!("best sample failed verification: {}", e),
    }
}

fn energies_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= FEASIBILITY_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}
