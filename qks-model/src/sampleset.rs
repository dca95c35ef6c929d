use crate::cqm::Assignment;
use anyhow::{anyhow, Result};
use qks_structs::api::SampleSetData;

#[derive(Debug, Clone, PartialEq)]
struct SampleRecord {
    values: Vec<u8>,
    energy: f64,
    num_occurrences: u64,
    is_feasible: bool,
}

/// Samples returned by a solver, all sharing one variable ordering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSet {
    variables: Vec<String>,
    records: Vec<SampleRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    variables: &'a [String],
    record: &'a SampleRecord,
}

impl SampleSet {
    pub fn new(variables: Vec<String>) -> Self {
        Self {
            variables,
            records: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        values: Vec<u8>,
        energy: f64,
        num_occurrences: u64,
        is_feasible: bool,
    ) -> Result<()> {
        if values.len() != self.variables.len() {
            return Err(anyhow!(
                "Sample has {} values but there are {} variables",
                values.len(),
                self.variables.len()
            ));
        }
        if let Some(v) = values.iter().find(|&&v| v > 1) {
            return Err(anyhow!("Sample value ({}) is not binary", v));
        }
        self.records.push(SampleRecord {
            values,
            energy,
            num_occurrences,
            is_feasible,
        });
        Ok(())
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample<'_>> {
        self.records.iter().map(move |record| Sample {
            variables: &self.variables,
            record,
        })
    }

    pub fn feasible(&self) -> impl Iterator<Item = Sample<'_>> {
        self.iter().filter(|s| s.is_feasible())
    }

    /// Lowest-energy feasible sample. On ties the earliest sample wins.
    pub fn best_feasible(&self) -> Option<Sample<'_>> {
        self.feasible()
            .min_by(|a, b| a.energy().total_cmp(&b.energy()))
    }
}

impl TryFrom<SampleSetData> for SampleSet {
    type Error = anyhow::Error;

    fn try_from(data: SampleSetData) -> Result<Self> {
        let num_samples = data.samples.len();
        let num_occurrences = data
            .num_occurrences
            .unwrap_or_else(|| vec![1; num_samples]);
        if data.energies.len() != num_samples
            || data.is_feasible.len() != num_samples
            || num_occurrences.len() != num_samples
        {
            return Err(anyhow!(
                "Malformed sample set: {} samples, {} energies, {} num_occurrences, {} is_feasible",
                num_samples,
                data.energies.len(),
                num_occurrences.len(),
                data.is_feasible.len()
            ));
        }

        let mut sampleset = SampleSet::new(data.variables);
        for (((values, energy), occurrences), is_feasible) in data
            .samples
            .into_iter()
            .zip(data.energies)
            .zip(num_occurrences)
            .zip(data.is_feasible)
        {
            sampleset.push(values, energy, occurrences, is_feasible)?;
        }
        Ok(sampleset)
    }
}

impl<'a> Sample<'a> {
    pub fn energy(&self) -> f64 {
        self.record.energy
    }

    pub fn num_occurrences(&self) -> u64 {
        self.record.num_occurrences
    }

    pub fn is_feasible(&self) -> bool {
        self.record.is_feasible
    }

    pub fn values(&self) -> &'a [u8] {
        &self.record.values
    }

    pub fn get(&self, label: &str) -> Option<u8> {
        self.variables
            .iter()
            .position(|v| v == label)
            .map(|i| self.record.values[i])
    }

    /// `(label, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, u8)> {
        self.variables
            .iter()
            .map(String::as_str)
            .zip(self.record.values.iter().copied())
    }

    pub fn assignment(&self) -> Assignment<'a> {
        self.iter().map(|(label, value)| (label, value as f64)).collect()
    }
}
