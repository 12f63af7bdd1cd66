//! Audit trail of destructive operations
//!
//! Writes JSON lines to `<state_dir>/pkgcache/audit.log` so that removed
//! workspaces and uninstalled packages can be traced afterwards.

use crate::cache::{failed_count, EntryOutcome};
use crate::config::{Config, ConfigManager};
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// File-based audit logger that appends JSON lines
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.general.audit_log,
            path: ConfigManager::audit_log_path(),
        }
    }

    /// Log an audit event as a JSON line.
    ///
    /// IO failures are reported through tracing and otherwise dropped.
    pub async fn log(&self, event: &str, data: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write audit log: {}", e);
        }
    }

    /// Log the result of a disposal pass, listing only entries that changed
    pub async fn log_outcomes(&self, event: &str, outcomes: &[EntryOutcome]) {
        let touched: Vec<&EntryOutcome> = outcomes
            .iter()
            .filter(|o| o.outcome.is_removed() || o.outcome.is_failed())
            .collect();

        self.log(
            event,
            &serde_json::json!({
                "total": outcomes.len(),
                "failed": failed_count(outcomes),
                "entries": touched,
            }),
        )
        .await;
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
