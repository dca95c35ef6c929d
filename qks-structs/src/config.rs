use crate::serializable_struct_with_getters;
use anyhow::{anyhow, Result};
use qks_utils::load_json_arg;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/sapi/v2";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

pub const ENDPOINT_ENV: &str = "QKS_API_ENDPOINT";
pub const TOKEN_ENV: &str = "QKS_API_TOKEN";
pub const SOLVER_ENV: &str = "QKS_API_SOLVER";

serializable_struct_with_getters! {
    SolverConfig {
        endpoint: Option<String>,
        token: Option<String>,
        solver: Option<String>,
        time_limit: Option<f64>,
        poll_interval_ms: Option<u64>,
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            solver: None,
            time_limit: None,
            poll_interval_ms: None,
        }
    }
}

impl SolverConfig {
    /// Loads a config from a json string or a path to a json file.
    pub fn load(arg: &str) -> Result<Self> {
        load_json_arg::<SolverConfig>(arg).map_err(|e| anyhow!("Invalid solver config: {}", e))
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            endpoint: non_empty(ENDPOINT_ENV),
            token: non_empty(TOKEN_ENV),
            solver: non_empty(SOLVER_ENV),
            time_limit: None,
            poll_interval_ms: None,
        }
    }

    /// Fields set on `self` win over those of `fallback`.
    pub fn merge(self, fallback: SolverConfig) -> SolverConfig {
        SolverConfig {
            endpoint: self.endpoint.or(fallback.endpoint),
            token: self.token.or(fallback.token),
            solver: self.solver.or(fallback.solver),
            time_limit: self.time_limit.or(fallback.time_limit),
            poll_interval_ms: self.poll_interval_ms.or(fallback.poll_interval_ms),
        }
    }

    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn poll_interval(&self) -> u64 {
        self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn require_token(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(anyhow!(
                "No API token configured. Pass --token, set {} or add \"token\" to the config file",
                TOKEN_ENV
            )),
        }
    }
}
