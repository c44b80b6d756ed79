//! Terminal rendering of the script table: the `UiSink` collaborator the
//! core streams into.

use std::collections::HashMap;
use std::sync::Mutex;

use runwatch_core::refresh::UiSink;
use runwatch_core::types::{ExecutionRecord, ExecutionStats, ScriptId, ScriptInfo};

pub struct TableSink {
    // id -> filename for scripts with a visible row.
    rows: Mutex<HashMap<ScriptId, String>>,
}

impl TableSink {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for TableSink {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSink for TableSink {
    fn last_run(&self, script_id: ScriptId, record: Option<&ExecutionRecord>) {
        let rows = self.rows.lock().unwrap();
        // A result landing after its row is gone is a no-op, not an error.
        let Some(filename) = rows.get(&script_id) else {
            return;
        };
        match record {
            Some(r) => {
                let status = if r.success { "ok" } else { "failed" };
                println!(
                    "{:<30} {:>8} {} ({:.2}s, exit {})",
                    filename, status, r.executed_at, r.execution_time_seconds, r.exit_code
                );
            }
            None => println!("{filename:<30} {:>8}", "Never"),
        }
    }

    fn stats(&self, stats: &ExecutionStats) {
        println!(
            "-- executions: {} total, {} ok, {} failed ({:.1}% success, avg {:.2}s)",
            stats.total_executions,
            stats.successful_executions,
            stats.failed_executions,
            stats.success_rate,
            stats.average_execution_time_seconds,
        );
    }

    fn script_listed(&self, scripts: &[ScriptInfo]) {
        let mut rows = self.rows.lock().unwrap();
        rows.clear();
        for script in scripts {
            rows.insert(script.id, script.filename.clone());
        }
        println!("{} scripts", scripts.len());
    }

    fn script_removed(&self, script_id: ScriptId) {
        self.rows.lock().unwrap().remove(&script_id);
    }
}
