//! Headless walk-through of the dialog contract

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::modal::{DialogInput, DialogKind, ModalController, ModalError};

/// Walk through the dialog scenarios without a terminal
#[derive(Debug, Args)]
pub struct DemoCommand {
    /// Print one JSON object per scenario
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub description: &'static str,
    pub outcome: String,
    /// Time from the qualifying input until the future settled
    pub settled_after_ms: Option<u128>,
}

impl DemoCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let modal = ModalController::with_settings(config.fade_out(), config.supersede);
        info!(policy = ?modal.policy(), fade_ms = config.fade_out_ms, "Running dialog scenarios");

        for report in run_scenarios(&modal).await {
            if self.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                let timing = report
                    .settled_after_ms
                    .map(|ms| format!(" (after {} ms)", ms))
                    .unwrap_or_default();
                println!(
                    "{:<3} {:<55} -> {}{}",
                    report.name, report.description, report.outcome, timing
                );
            }
        }

        Ok(())
    }
}

fn describe(result: &Result<crate::modal::DialogOutcome, ModalError>) -> String {
    match result {
        Ok(outcome) => format!("{:?}", outcome),
        Err(e) => format!("error: {}", e),
    }
}

pub async fn run_scenarios(modal: &ModalController) -> Vec<ScenarioReport> {
    let mut reports = Vec::new();

    // A: backdrop click on a confirm
    let handle = modal.confirm("Delete item?", None);
    let started = Instant::now();
    modal.dispatch(DialogInput::Backdrop);
    let result = handle.await;
    reports.push(ScenarioReport {
        name: "A",
        description: "confirm(\"Delete item?\") + backdrop click",
        outcome: describe(&result),
        settled_after_ms: Some(started.elapsed().as_millis()),
    });

    // B: primary action on an error alert
    let handle = modal.notify(DialogKind::Error, "Network error", None);
    let started = Instant::now();
    modal.dispatch(DialogInput::Primary);
    let result = handle.await;
    reports.push(ScenarioReport {
        name: "B",
        description: "notify(error, \"Network error\") + OK",
        outcome: describe(&result),
        settled_after_ms: Some(started.elapsed().as_millis()),
    });

    // C: a second request while the first is showing
    let first = modal.notify(DialogKind::Info, "A", None);
    let second = modal.confirm("B", None);
    modal.dispatch(DialogInput::Primary);
    let second_result = second.await;
    let wait = modal.fade_out() * 2 + Duration::from_millis(50);
    let first_outcome = match tokio::time::timeout(wait, first).await {
        Ok(result) => describe(&result),
        Err(_) => "still pending (abandoned)".to_string(),
    };
    reports.push(ScenarioReport {
        name: "C",
        description: "notify(info, \"A\") then confirm(\"B\") + Confirm",
        outcome: format!("A: {}; B: {}", first_outcome, describe(&second_result)),
        settled_after_ms: None,
    });

    // D: only the first input counts
    let handle = modal.confirm("Proceed?", None);
    modal.dispatch(DialogInput::Primary);
    modal.dispatch(DialogInput::Secondary);
    let result = handle.await;
    reports.push(ScenarioReport {
        name: "D",
        description: "confirm(\"Proceed?\") + Confirm, then Cancel",
        outcome: describe(&result),
        settled_after_ms: None,
    });

    // E: Escape once nothing is showing
    let consumed = modal.dispatch(DialogInput::CancelKey);
    reports.push(ScenarioReport {
        name: "E",
        description: "Escape after every dialog was removed",
        outcome: if consumed { "observed" } else { "ignored" }.to_string(),
        settled_after_ms: None,
    });

    reports
}
