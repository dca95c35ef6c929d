use qks_model::*;

fn instance(weights: Vec<f64>, values: Vec<f64>, max_weight: f64) -> Instance {
    Instance {
        weights,
        values,
        max_weight,
    }
}

#[test]
fn test_knapsack_model_shape() {
    let inst = instance(vec![3.0, 4.0, 5.0], vec![30.0, 50.0, 60.0], 8.0);
    let cqm = knapsack_model(&inst).unwrap();

    let labels: Vec<&str> = cqm.variables.iter().map(|v| v.label.as_str()).collect();
    assert_eq!(labels, vec!["x_0", "x_1", "x_2"]);
    assert!(cqm.variables.iter().all(|v| v.vartype == Vartype::Binary));

    assert!(cqm.objective.is_linear());
    assert_eq!(
        cqm.objective.linear,
        vec![
            ("x_0".to_string(), -30.0),
            ("x_1".to_string(), -50.0),
            ("x_2".to_string(), -60.0),
        ]
    );
    assert_eq!(cqm.objective.offset, 0.0);

    assert_eq!(cqm.num_constraints(), 1);
    let c = cqm.constraint(WEIGHT_LIMIT_LABEL).unwrap();
    assert_eq!(c.sense, Sense::Le);
    assert_eq!(c.rhs, 8.0);
    assert_eq!(
        c.lhs.linear,
        vec![
            ("x_0".to_string(), 3.0),
            ("x_1".to_string(), 4.0),
            ("x_2".to_string(), 5.0),
        ]
    );
}

#[test]
fn test_knapsack_model_energy_and_feasibility() {
    let inst = instance(vec![3.0, 4.0, 5.0], vec![30.0, 50.0, 60.0], 8.0);
    let cqm = knapsack_model(&inst).unwrap();

    let pick = |bits: [f64; 3]| -> Assignment<'static> {
        vec![("x_0", bits[0]), ("x_1", bits[1]), ("x_2", bits[2])]
            .into_iter()
            .collect()
    };
    assert_eq!(cqm.energy(&pick([1.0, 0.0, 1.0])).unwrap(), -90.0);
    assert!(cqm.is_feasible(&pick([1.0, 0.0, 1.0])).unwrap());
    assert!(cqm.is_feasible(&pick([1.0, 1.0, 0.0])).unwrap());
    assert!(!cqm.is_feasible(&pick([0.0, 1.0, 1.0])).unwrap());
}

#[test]
fn test_knapsack_model_empty_instance() {
    let cqm = knapsack_model(&instance(vec![], vec![], 10.0)).unwrap();
    assert_eq!(cqm.num_variables(), 0);
    assert_eq!(cqm.num_constraints(), 1);
}

#[test]
fn test_knapsack_model_length_mismatch() {
    assert!(knapsack_model(&instance(vec![1.0, 2.0], vec![1.0], 3.0)).is_err());
    assert!(knapsack_model(&instance(vec![1.0], vec![1.0, 2.0], 3.0)).is_err());
}

#[test]
fn test_knapsack_model_serializes() {
    let cqm = knapsack_model(&instance(vec![2.0], vec![7.0], 2.0)).unwrap();
    let value = serde_json::to_value(&cqm).unwrap();
    assert_eq!(value["variables"][0]["label"], "x_0");
    assert_eq!(value["variables"][0]["vartype"], "BINARY");
    assert_eq!(value["constraints"][0]["sense"], "<=");
    assert_eq!(value["constraints"][0]["label"], "weight_limit");
    let back: ConstrainedQuadraticModel = serde_json::from_value(value).unwrap();
    assert_eq!(back, cqm);
}
