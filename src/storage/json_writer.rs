use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::{BillingResult, CycleStatement};
use crate::domain::Business;
use crate::errors::Result;

use super::StatementSink;

const EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// The document written for one cycle.
#[derive(Debug, Serialize)]
pub struct StatementFile<'a> {
    pub business: &'a Business,
    #[serde(flatten)]
    pub cycle: &'a CycleStatement,
}

/// Writes each cycle as pretty-printed JSON named after its invoice.
#[derive(Debug, Clone)]
pub struct JsonStatements {
    root: PathBuf,
}

impl JsonStatements {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn statement_path(&self, invoice_name: &str) -> PathBuf {
        self.root.join(format!("{invoice_name}.{EXTENSION}"))
    }

    fn write_cycle(&self, business: &Business, cycle: &CycleStatement) -> Result<PathBuf> {
        let path = self.statement_path(&cycle.invoice_name);
        let json = serde_json::to_string_pretty(&StatementFile { business, cycle })?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(path)
    }
}

impl StatementSink for JsonStatements {
    fn store(&self, result: &BillingResult) -> Result<Vec<String>> {
        ensure_dir(&self.root)?;
        let mut written = Vec::with_capacity(result.cycles.len());
        for cycle in &result.cycles {
            let path = self.write_cycle(&result.business, cycle)?;
            info!(path = %path.display(), statements = cycle.statements.len(), "wrote cycle");
            written.push(path.display().to_string());
        }
        Ok(written)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(())
}
