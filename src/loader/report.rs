//! Operator-facing progress output and the run summary

use colored::Colorize;
use log::{debug, error, info};
use serde::Serialize;
use uuid::Uuid;

use super::error::error_chain;
use super::stage::StageId;

/// Where progress and failures go. Every operator message is also logged.
pub trait Reporter: Send + Sync {
    /// A progress line for the operator
    fn info(&self, message: &str);

    /// Detail that only belongs in the log file
    fn detail(&self, message: &str);

    /// A one-line summary for the operator, full error chain to the log
    fn failure(&self, summary: &str, error: &dyn std::error::Error);

    /// Counts of a stage that ran to completion
    fn stage_finished(&self, report: &StageReport);
}

/// Prints to stdout and writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
        info!("{}", message);
    }

    fn detail(&self, message: &str) {
        debug!("{}", message);
    }

    fn failure(&self, summary: &str, error: &dyn std::error::Error) {
        println!(
            "{} {}, check log file for more information",
            "✗".red().bold(),
            summary
        );
        info!("{}", summary);
        error!("{}", error_chain(error));
    }

    fn stage_finished(&self, report: &StageReport) {
        println!("{}", stage_line(report));
        info!(
            "{}: built {}, submitted {}, created {}, failed {}",
            report.label(),
            report.built,
            report.submitted,
            report.created,
            report.failed
        );
    }
}

/// Counts for one executed stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: StageId,
    /// Records built from sheet rows (or settings)
    pub built: usize,
    pub submitted: usize,
    pub created: usize,
    pub failed: usize,
    /// Entries in the map the stage published, if it publishes one
    pub linked: Option<usize>,
}

impl StageReport {
    pub fn new(stage: StageId) -> Self {
        Self {
            stage,
            built: 0,
            submitted: 0,
            created: 0,
            failed: 0,
            linked: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.stage.label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub stages: Vec<StageReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            stages: Vec::new(),
        }
    }

    pub fn total_created(&self) -> usize {
        self.stages.iter().map(|s| s.created).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.stages.iter().map(|s| s.failed).sum()
    }

    pub fn stage(&self, id: StageId) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == id)
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion line for one stage, e.g. `✓ Parent Accounts: 3 created, 1 failed`
pub fn stage_line(report: &StageReport) -> String {
    let mark = if report.failed == 0 {
        "✓".green()
    } else {
        "!".yellow()
    };
    let mut line = format!("{} {}: {} created", mark, report.label(), report.created);
    if report.failed > 0 {
        line.push_str(&format!(", {} failed", report.failed).yellow().to_string());
    }
    line
}
