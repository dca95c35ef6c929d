use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const CQM_PROBLEM_TYPE: &str = "cqm";
pub const HYBRID_CATEGORY: &str = "hybrid";
pub const ONLINE_STATUS: &str = "ONLINE";

// Solvers
serializable_struct_with_getters! {
    SolverProperties {
        category: Option<String>,
        supported_problem_types: Option<Vec<String>>,
        minimum_time_limit_s: Option<f64>,
        maximum_number_of_variables: Option<u64>,
    }
}
serializable_struct_with_getters! {
    SolverDescription {
        id: String,
        status: Option<String>,
        description: Option<String>,
        properties: Option<SolverProperties>,
    }
}
pub type GetSolversResp = Vec<SolverDescription>;

impl SolverDescription {
    pub fn is_online(&self) -> bool {
        // solvers that omit a status are assumed usable
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case(ONLINE_STATUS))
    }

    pub fn is_hybrid(&self) -> bool {
        self.properties
            .as_ref()
            .and_then(|p| p.category.as_deref())
            .map_or(false, |c| c == HYBRID_CATEGORY)
    }

    pub fn supports(&self, problem_type: &str) -> bool {
        self.properties
            .as_ref()
            .and_then(|p| p.supported_problem_types.as_ref())
            .map_or(false, |types| types.iter().any(|t| t == problem_type))
    }

    pub fn minimum_time_limit(&self) -> Option<f64> {
        self.properties.as_ref().and_then(|p| p.minimum_time_limit_s)
    }
}

// Problems
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl ProblemStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProblemStatus::Completed | ProblemStatus::Failed | ProblemStatus::Cancelled
        )
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProblemStatus::Pending => "PENDING",
            ProblemStatus::InProgress => "IN_PROGRESS",
            ProblemStatus::Completed => "COMPLETED",
            ProblemStatus::Failed => "FAILED",
            ProblemStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

serializable_struct_with_getters! {
    ProblemData {
        format: String,
        data: Value,
    }
}
serializable_struct_with_getters! {
    ProblemParams {
        #[serde(skip_serializing_if = "Option::is_none")]
        time_limit: Option<f64>,
    }
}
serializable_struct_with_getters! {
    SubmitProblemReq {
        solver: String,
        label: String,
        #[serde(rename = "type")]
        problem_type: String,
        data: ProblemData,
        params: ProblemParams,
    }
}
pub type SubmitProblemsReq = Vec<SubmitProblemReq>;

// Answers
serializable_struct_with_getters! {
    SampleSetData {
        variables: Vec<String>,
        samples: Vec<Vec<u8>>,
        energies: Vec<f64>,
        num_occurrences: Option<Vec<u64>>,
        is_feasible: Vec<bool>,
    }
}
// `data` stays opaque until `format` says how to read it
serializable_struct_with_getters! {
    AnswerData {
        format: String,
        data: Value,
    }
}
serializable_struct_with_getters! {
    ProblemStatusResp {
        id: String,
        status: ProblemStatus,
        solver: Option<String>,
        label: Option<String>,
        submitted_on: Option<String>,
        solved_on: Option<String>,
        answer: Option<AnswerData>,
        error_message: Option<String>,
    }
}
pub type SubmitProblemsResp = Vec<ProblemStatusResp>;
