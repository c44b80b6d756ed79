use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Backend-assigned script identifier.
pub type ScriptId = i64;

/// One execution of a script, as reported by the backend. Immutable on the
/// client; the backend owns the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionRecord {
    pub id: i64,
    pub script_id: ScriptId,
    #[serde(default)]
    pub schedule_id: Option<i64>,
    pub filename: String,
    pub language: String,
    pub exit_code: i32,
    pub execution_time_seconds: f64,
    pub stdout: String,
    pub stderr: String,
    /// Naive UTC: the backend reports timestamps without an offset.
    pub executed_at: NaiveDateTime,
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default = "default_triggered_by")]
    pub triggered_by: String,
}

fn default_triggered_by() -> String {
    "manual".to_string()
}

/// A script known to the backend (the `/scripts/db/` listing).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptInfo {
    pub id: ScriptId,
    pub filename: String,
    pub language: String,
    pub upload_time: NaiveDateTime,
    #[serde(default)]
    pub description: Option<String>,
}

/// Aggregate execution statistics (`/executions/stats/`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutionStats {
    pub total_executions: u64,
    pub successful_executions: u64,
    pub failed_executions: u64,
    pub success_rate: f64,
    pub average_execution_time_seconds: f64,
    #[serde(default)]
    pub most_executed_scripts: Vec<ScriptUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptUsage {
    pub filename: String,
    pub count: u64,
}
