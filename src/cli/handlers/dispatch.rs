//! Dispatch command handler
//!
//! Loads a directory fixture and a request from JSON, dispatches the request
//! and prints the delivery report.

use std::path::Path;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::models::{DeliveryReport, NotificationRequest};
use crate::repositories::DirectorySnapshot;
use crate::state::AppState;

pub struct DispatchCommandHandler {
    config: Settings,
}

impl DispatchCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Dispatches and prints the report as pretty JSON on stdout
    ///
    /// Requests rejected before dispatch are returned as errors so the
    /// caller can print their code and message key.
    pub async fn execute(&self, directory: &Path, request: &Path) -> AppResult<()> {
        let report = self.run(directory, request).await?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::from(anyhow::Error::new(e)))?;
        println!("{}", json);

        Ok(())
    }

    pub async fn run(&self, directory: &Path, request: &Path) -> AppResult<DeliveryReport> {
        let repos = DirectorySnapshot::from_path(directory)?.into_repositories()?;
        let request = read_request(request)?;

        let state = AppState::from_settings(&self.config, repos)?;
        let report = state.services.notifications.dispatch(&request).await?;

        for entry in state.digest_queue.entries() {
            tracing::info!(
                user_id = %entry.user_id,
                channel = %entry.channel,
                tag = entry.tag(),
                queued_at = %entry.queued_at,
                "message held for digest"
            );
        }

        tracing::info!(
            user_id = %request.user_id,
            delivered = report.values().filter(|o| o.is_delivered()).count(),
            digested = state.digest_queue.len(),
            skipped = report.values().filter(|o| o.is_skipped()).count(),
            failed = report.values().filter(|o| o.is_failed()).count(),
            "dispatch completed"
        );

        Ok(report)
    }
}

fn read_request(path: &Path) -> AppResult<NotificationRequest> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::Validation {
        field: "request".to_string(),
        reason: format!("Cannot read {}: {}", path.display(), e),
    })?;

    serde_json::from_str(&content).map_err(|e| AppError::Validation {
        field: "request".to_string(),
        reason: format!("Invalid notification request: {}", e),
    })
}
