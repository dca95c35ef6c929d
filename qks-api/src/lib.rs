use anyhow::{anyhow, Result};
use qks_model::{ConstrainedQuadraticModel, CqmSampler, SampleSet};
pub use qks_structs::api::*;
use qks_structs::config::SolverConfig;
use qks_utils::{dejsonify, get, jsonify, post, sleep};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub const DATA_FORMAT: &str = "json";

pub struct Api {
    api_url: String,
    api_key: String,
    solver: Option<String>,
    time_limit: Option<f64>,
    poll_interval_ms: u64,
}

impl Api {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            solver: None,
            time_limit: None,
            poll_interval_ms: qks_structs::config::DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        let mut api = Self::new(config.endpoint_url(), config.require_token()?.to_string());
        api.solver = config.solver.clone();
        api.time_limit = config.time_limit;
        api.poll_interval_ms = config.poll_interval();
        Ok(api)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("x-auth-token".to_string(), self.api_key.clone()),
            ("user-agent".to_string(), "qks".to_string()),
            ("content-type".to_string(), "application/json".to_string()),
        ]
    }

    async fn get<T>(&self, path: String) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = get::<String>(
            format!("{}/{}", self.api_url, path).as_str(),
            Some(self.headers()),
        )
        .await?;
        dejsonify::<T>(&resp).map_err(|e| anyhow!("Failed to dejsonify: {}", e))
    }

    async fn post<T>(&self, path: String, body: String) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = post::<String>(
            format!("{}/{}", self.api_url, path).as_str(),
            body.as_str(),
            Some(self.headers()),
        )
        .await?;
        dejsonify::<T>(&resp).map_err(|e| anyhow!("Failed to dejsonify: {}", e))
    }

    pub async fn get_solvers(&self) -> Result<GetSolversResp> {
        self.get("solvers/remote/".to_string()).await
    }

    pub async fn submit_problems(&self, req: SubmitProblemsReq) -> Result<SubmitProblemsResp> {
        self.post("problems/".to_string(), jsonify(&req)).await
    }

    pub async fn get_problem(&self, id: &str) -> Result<ProblemStatusResp> {
        self.get(format!("problems/{}/", id)).await
    }

    /// Solvers that accept a CQM, newest first.
    pub async fn get_cqm_solvers(&self) -> Result<Vec<SolverDescription>> {
        let mut solvers: Vec<SolverDescription> = self
            .get_solvers()
            .await?
            .into_iter()
            .filter(|s| s.supports(CQM_PROBLEM_TYPE))
            .collect();
        solvers.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(solvers)
    }

    /// Polls until the problem reaches a terminal state.
    pub async fn wait_for_problem(
        &self,
        mut status: ProblemStatusResp,
    ) -> Result<ProblemStatusResp> {
        while !status.status.is_terminal() {
            debug!(
                "problem {} is {}, polling again in {}ms",
                status.id, status.status, self.poll_interval_ms
            );
            sleep(self.poll_interval_ms).await;
            status = self.get_problem(&status.id).await?;
        }
        Ok(status)
    }
}

/// Picks `requested` if given, otherwise the newest online hybrid solver that accepts a CQM.
pub fn choose_cqm_solver(
    solvers: &[SolverDescription],
    requested: Option<&str>,
) -> Result<SolverDescription> {
    if let Some(id) = requested {
        let solver = solvers
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("Solver '{}' is not available", id))?;
        if !solver.supports(CQM_PROBLEM_TYPE) {
            return Err(anyhow!("Solver '{}' does not accept {} problems", id, CQM_PROBLEM_TYPE));
        }
        return Ok(solver.clone());
    }
    solvers
        .iter()
        .filter(|s| s.is_online() && s.is_hybrid() && s.supports(CQM_PROBLEM_TYPE))
        .max_by(|a, b| a.id.cmp(&b.id))
        .cloned()
        .ok_or_else(|| anyhow!("No online hybrid solver accepts {} problems", CQM_PROBLEM_TYPE))
}

pub fn resolve_time_limit(configured: Option<f64>, solver: &SolverDescription) -> Option<f64> {
    configured.or_else(|| solver.minimum_time_limit())
}

pub fn build_submission(
    cqm: &ConstrainedQuadraticModel,
    label: &str,
    solver: &SolverDescription,
    time_limit: Option<f64>,
) -> Result<SubmitProblemReq> {
    Ok(SubmitProblemReq {
        solver: solver.id.clone(),
        label: label.to_string(),
        problem_type: CQM_PROBLEM_TYPE.to_string(),
        data: ProblemData {
            format: DATA_FORMAT.to_string(),
            data: serde_json::to_value(cqm)?,
        },
        params: ProblemParams {
            time_limit: resolve_time_limit(time_limit, solver),
        },
    })
}

/// Converts a terminal problem status into its sample set.
pub fn into_sampleset(status: ProblemStatusResp) -> Result<SampleSet> {
    match status.status {
        ProblemStatus::Completed => {}
        ProblemStatus::Failed | ProblemStatus::Cancelled => {
            return Err(anyhow!(
                "Problem {} {}: {}",
                status.id,
                status.status,
                status
                    .error_message
                    .as_deref()
                    .unwrap_or("no error message given")
            ))
        }
        s => return Err(anyhow!("Problem {} has not finished (status: {})", status.id, s)),
    }
    let answer = status
        .answer
        .ok_or_else(|| anyhow!("Problem {} completed without an answer", status.id))?;
    if answer.format != DATA_FORMAT {
        return Err(anyhow!(
            "Unsupported answer format '{}' (expected '{}')",
            answer.format,
            DATA_FORMAT
        ));
    }
    let data = serde_json::from_value::<SampleSetData>(answer.data)
        .map_err(|e| anyhow!("Malformed answer for problem {}: {}", status.id, e))?;
    SampleSet::try_from(data)
}

impl CqmSampler for Api {
    async fn sample_cqm(&self, cqm: &ConstrainedQuadraticModel, label: &str) -> Result<SampleSet> {
        let solvers = self.get_solvers().await?;
        let solver = choose_cqm_solver(&solvers, self.solver.as_deref())?;
        info!("using solver {}", solver.id);

        let req = build_submission(cqm, label, &solver, self.time_limit)?;
        let mut resp = self.submit_problems(vec![req]).await?;
        if resp.len() != 1 {
            return Err(anyhow!("Expected 1 problem status, got {}", resp.len()));
        }
        let status = resp.remove(0);
        info!("submitted problem {} ({})", status.id, status.status);

        let status = self.wait_for_problem(status).await?;
        info!("problem {} finished with status {}", status.id, status.status);
        into_sampleset(status)
    }
}
