use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::{BillingError, Result};
use crate::storage::{CsvInputs, JsonStatements};

/// Names the config file when `--config` is not given.
pub const CONFIG_ENV: &str = "WATER_BILLING_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "water_billing.json";

/// Where a billing run reads its tables and writes its statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub customers: PathBuf,
    pub business: PathBuf,
    pub cycles: PathBuf,
    pub payments: PathBuf,
    pub statements_dir: PathBuf,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            customers: "users.csv".into(),
            business: "business.csv".into(),
            cycles: "cycles.csv".into(),
            payments: "payments.csv".into(),
            statements_dir: "statements".into(),
        }
    }
}

/// Per-field replacements given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub customers: Option<PathBuf>,
    pub business: Option<PathBuf>,
    pub cycles: Option<PathBuf>,
    pub payments: Option<PathBuf>,
    pub statements_dir: Option<PathBuf>,
}

impl BillingConfig {
    /// `$WATER_BILLING_CONFIG`, or `water_billing.json` in the working directory.
    pub fn default_path() -> PathBuf {
        env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Reads `path`, falling back to defaults when it does not exist.
    ///
    /// Relative paths resolve against the directory holding `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let data = fs::read_to_string(path).map_err(|source| BillingError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|err| {
                BillingError::Config(format!("{}: {err}", path.display()))
            })?
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            BillingConfig::default()
        };
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    pub fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            customers: resolve(self.customers),
            business: resolve(self.business),
            cycles: resolve(self.cycles),
            payments: resolve(self.payments),
            statements_dir: resolve(self.statements_dir),
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            customers,
            business,
            cycles,
            payments,
            statements_dir,
        } = overrides;
        if let Some(path) = customers {
            self.customers = path;
        }
        if let Some(path) = business {
            self.business = path;
        }
        if let Some(path) = cycles {
            self.cycles = path;
        }
        if let Some(path) = payments {
            self.payments = path;
        }
        if let Some(path) = statements_dir {
            self.statements_dir = path;
        }
    }

    pub fn inputs(&self) -> CsvInputs {
        CsvInputs {
            customers: self.customers.clone(),
            business: self.business.clone(),
            cycles: self.cycles.clone(),
            payments: self.payments.clone(),
        }
    }

    pub fn statements(&self) -> JsonStatements {
        JsonStatements::new(&self.statements_dir)
    }
}
