use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fmt,
    ops::Neg,
};

/// Absolute tolerance used when checking constraint satisfaction.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

pub type Assignment<'a> = HashMap<&'a str, f64>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Vartype {
    Binary,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Variable {
    pub label: String,
    pub vartype: Vartype,
}

impl Variable {
    pub fn binary(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vartype: Vartype::Binary,
        }
    }
}

/// Polynomial of degree at most two over model variables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Expression {
    pub linear: Vec<(String, f64)>,
    pub quadratic: Vec<(String, String, f64)>,
    pub offset: f64,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linear<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            linear: terms.into_iter().map(|(v, b)| (v.into(), b)).collect(),
            ..Self::default()
        }
    }

    pub fn add_linear(&mut self, variable: impl Into<String>, bias: f64) -> &mut Self {
        self.linear.push((variable.into(), bias));
        self
    }

    pub fn add_quadratic(
        &mut self,
        u: impl Into<String>,
        v: impl Into<String>,
        bias: f64,
    ) -> &mut Self {
        self.quadratic.push((u.into(), v.into(), bias));
        self
    }

    pub fn is_linear(&self) -> bool {
        self.quadratic.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.linear.iter().map(|(v, _)| v.as_str()).chain(
            self.quadratic
                .iter()
                .flat_map(|(u, v, _)| [u.as_str(), v.as_str()]),
        )
    }

    pub fn evaluate(&self, assignment: &Assignment) -> Result<f64> {
        let value_of = |v: &str| {
            assignment
                .get(v)
                .copied()
                .ok_or_else(|| anyhow!("Variable '{}' is not assigned", v))
        };
        let mut total = self.offset;
        for (v, bias) in &self.linear {
            total += bias * value_of(v)?;
        }
        for (u, v, bias) in &self.quadratic {
            total += bias * value_of(u)? * value_of(v)?;
        }
        Ok(total)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression {
            linear: self.linear.into_iter().map(|(v, b)| (v, -b)).collect(),
            quadratic: self
                .quadratic
                .into_iter()
                .map(|(u, v, b)| (u, v, -b))
                .collect(),
            offset: -self.offset,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "==",
        };
        write!(f, "{}", s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Constraint {
    pub label: String,
    pub lhs: Expression,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    /// Signed amount by which the constraint is broken; zero or less when satisfied.
    pub fn violation(&self, assignment: &Assignment) -> Result<f64> {
        let lhs = self.lhs.evaluate(assignment)?;
        Ok(match self.sense {
            Sense::Le => lhs - self.rhs,
            Sense::Ge => self.rhs - lhs,
            Sense::Eq => (lhs - self.rhs).abs(),
        })
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> Result<bool> {
        Ok(self.violation(assignment)? <= FEASIBILITY_TOLERANCE)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ConstrainedQuadraticModel {
    pub variables: Vec<Variable>,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
}

impl ConstrainedQuadraticModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn add_variable(&mut self, variable: Variable) -> Result<()> {
        if self.variables.iter().any(|v| v.label == variable.label) {
            return Err(anyhow!("Variable '{}' is already declared", variable.label));
        }
        self.variables.push(variable);
        Ok(())
    }

    pub fn set_objective(&mut self, objective: Expression) -> Result<()> {
        self.check_declared(&objective)?;
        self.objective = objective;
        Ok(())
    }

    pub fn add_constraint(
        &mut self,
        lhs: Expression,
        sense: Sense,
        rhs: f64,
        label: impl Into<String>,
    ) -> Result<()> {
        let label = label.into();
        if self.constraints.iter().any(|c| c.label == label) {
            return Err(anyhow!("Constraint '{}' is already declared", label));
        }
        self.check_declared(&lhs)?;
        self.constraints.push(Constraint {
            label,
            lhs,
            sense,
            rhs,
        });
        Ok(())
    }

    pub fn constraint(&self, label: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.label == label)
    }

    pub fn energy(&self, assignment: &Assignment) -> Result<f64> {
        self.objective.evaluate(assignment)
    }

    pub fn is_feasible(&self, assignment: &Assignment) -> Result<bool> {
        for constraint in &self.constraints {
            if !constraint.is_satisfied(assignment)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn check_declared(&self, expression: &Expression) -> Result<()> {
        let declared: HashSet<&str> = self.variables.iter().map(|v| v.label.as_str()).collect();
        match expression.variables().find(|v| !declared.contains(v)) {
            Some(v) => Err(anyhow!("Variable '{}' is not declared", v)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_model() -> ConstrainedQuadraticModel {
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.add_variable(Variable::binary("a")).unwrap();
        cqm.add_variable(Variable::binary("b")).unwrap();
        let mut objective = Expression::linear(vec![("a", 1.0), ("b", 2.0)]);
        objective.add_quadratic("a", "b", -4.0);
        objective.offset = 0.5;
        cqm.set_objective(objective).unwrap();
        cqm.add_constraint(
            Expression::linear(vec![("a", 1.0), ("b", 1.0)]),
            Sense::Le,
            1.0,
            "at_most_one",
        )
        .unwrap();
        cqm
    }

    #[test]
    fn test_energy() {
        let cqm = two_var_model();
        let both: Assignment = vec![("a", 1.0), ("b", 1.0)].into_iter().collect();
        let only_b: Assignment = vec![("a", 0.0), ("b", 1.0)].into_iter().collect();
        assert_eq!(cqm.energy(&both).unwrap(), -0.5);
        assert_eq!(cqm.energy(&only_b).unwrap(), 2.5);
    }

    #[test]
    fn test_feasibility() {
        let cqm = two_var_model();
        let both: Assignment = vec![("a", 1.0), ("b", 1.0)].into_iter().collect();
        let none: Assignment = vec![("a", 0.0), ("b", 0.0)].into_iter().collect();
        assert!(!cqm.is_feasible(&both).unwrap());
        assert!(cqm.is_feasible(&none).unwrap());
        assert_eq!(
            cqm.constraint("at_most_one").unwrap().violation(&both).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_missing_assignment_is_error() {
        let cqm = two_var_model();
        let partial: Assignment = vec![("a", 1.0)].into_iter().collect();
        assert!(cqm.energy(&partial).is_err());
    }

    #[test]
    fn test_undeclared_and_duplicate() {
        let mut cqm = two_var_model();
        assert!(cqm.add_variable(Variable::binary("a")).is_err());
        assert!(cqm
            .set_objective(Expression::linear(vec![("c", 1.0)]))
            .is_err());
        assert!(cqm
            .add_constraint(Expression::new(), Sense::Ge, 0.0, "at_most_one")
            .is_err());
    }

    #[test]
    fn test_neg() {
        let mut e = Expression::linear(vec![("a", 3.0)]);
        e.add_quadratic("a", "b", 2.0);
        e.offset = 1.0;
        let n = -e;
        assert_eq!(n.linear, vec![("a".to_string(), -3.0)]);
        assert_eq!(n.quadratic, vec![("a".to_string(), "b".to_string(), -2.0)]);
        assert_eq!(n.offset, -1.0);
    }

    #[test]
    fn test_sense_wire_format() {
        assert_eq!(serde_json::to_string(&Sense::Le).unwrap(), r#""<=""#);
        assert_eq!(Sense::Ge.to_string(), ">=");
    }
}
