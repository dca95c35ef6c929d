use qks_model::*;
use qks_structs::api::SampleSetData;

fn labels(n: usize) -> Vec<String> {
    (0..n).map(item_label).collect()
}

fn data(samples: Vec<Vec<u8>>, energies: Vec<f64>, is_feasible: Vec<bool>) -> SampleSetData {
    SampleSetData {
        variables: labels(samples.first().map_or(0, |s| s.len())),
        samples,
        energies,
        num_occurrences: None,
        is_feasible,
    }
}

#[test]
fn test_best_feasible_is_minimum_energy() {
    let sampleset = SampleSet::try_from(data(
        vec![vec![1, 0, 0], vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 1]],
        vec![-5.0, -9.0, -20.0, -6.0],
        vec![true, true, false, true],
    ))
    .unwrap();
    let best = sampleset.best_feasible().unwrap();
    assert_eq!(best.energy(), -9.0);
    assert_eq!(best.values(), &[1, 1, 0]);
    for sample in sampleset.feasible() {
        assert!(best.energy() <= sample.energy());
    }
}

#[test]
fn test_best_feasible_ties_take_first() {
    let sampleset = SampleSet::try_from(data(
        vec![vec![0, 1], vec![1, 0], vec![1, 1]],
        vec![-4.0, -4.0, -4.0],
        vec![false, true, true],
    ))
    .unwrap();
    assert_eq!(sampleset.best_feasible().unwrap().values(), &[1, 0]);
}

#[test]
fn test_best_feasible_none() {
    let sampleset = SampleSet::try_from(data(
        vec![vec![1, 1]],
        vec![-100.0],
        vec![false],
    ))
    .unwrap();
    assert_eq!(sampleset.len(), 1);
    assert!(sampleset.best_feasible().is_none());
    assert!(SampleSet::default().best_feasible().is_none());
}

#[test]
fn test_num_occurrences_default_to_one() {
    let sampleset =
        SampleSet::try_from(data(vec![vec![1], vec![0]], vec![-1.0, 0.0], vec![true, true]))
            .unwrap();
    assert!(sampleset.iter().all(|s| s.num_occurrences() == 1));

    let mut with_counts = data(vec![vec![1]], vec![-1.0], vec![true]);
    with_counts.num_occurrences = Some(vec![7]);
    let sampleset = SampleSet::try_from(with_counts).unwrap();
    assert_eq!(sampleset.iter().next().unwrap().num_occurrences(), 7);
}

#[test]
fn test_malformed_columns() {
    assert!(SampleSet::try_from(data(vec![vec![1]], vec![], vec![true])).is_err());
    assert!(SampleSet::try_from(data(vec![vec![1]], vec![1.0], vec![])).is_err());

    let mut bad_counts = data(vec![vec![1]], vec![-1.0], vec![true]);
    bad_counts.num_occurrences = Some(vec![1, 2]);
    assert!(SampleSet::try_from(bad_counts).is_err());

    let mut ragged = data(vec![vec![1, 0], vec![1]], vec![0.0, 0.0], vec![true, true]);
    ragged.variables = labels(2);
    assert!(SampleSet::try_from(ragged).is_err());

    assert!(SampleSet::try_from(data(vec![vec![2]], vec![0.0], vec![true])).is_err());
}

#[test]
fn test_sample_accessors() {
    let mut sampleset = SampleSet::new(labels(3));
    sampleset.push(vec![0, 1, 1], -3.5, 2, true).unwrap();
    let sample = sampleset.iter().next().unwrap();
    assert_eq!(sample.get("x_1"), Some(1));
    assert_eq!(sample.get("x_9"), None);
    assert_eq!(
        sample.iter().collect::<Vec<_>>(),
        vec![("x_0", 0), ("x_1", 1), ("x_2", 1)]
    );
    assert_eq!(sample.assignment().get("x_2"), Some(&1.0));
    assert_eq!(selected_items(&sample).unwrap(), vec![1, 2]);
}

#[test]
fn test_selected_items_rejects_foreign_labels() {
    let mut sampleset = SampleSet::new(vec!["x_0".to_string(), "slack".to_string()]);
    sampleset.push(vec![1, 0], 0.0, 1, true).unwrap();
    sampleset.push(vec![1, 1], 0.0, 1, true).unwrap();
    let samples: Vec<Sample> = sampleset.iter().collect();
    assert_eq!(selected_items(&samples[0]).unwrap(), vec![0]);
    assert!(selected_items(&samples[1]).is_err());
}
