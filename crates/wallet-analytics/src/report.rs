//! Report Artifacts
//!
//! Rendering of trend reports to text and the sinks they are written to.
//! Every artifact is write-once: a sink refuses to replace an existing one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::{AnalyticsError, Result};
use crate::narrative::{format_changes, interpret_strategy};
use crate::trend::TrendReport;

/// A named report ready to be written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportArtifact {
    pub name: String,
    pub contents: String,
}

impl ReportArtifact {
    /// Name is `<wallet>_<kind>_<timestamp>.<ext>`
    pub fn new(
        kind: &str,
        wallet_address: &str,
        generated_at: DateTime<Utc>,
        extension: &str,
        contents: String,
    ) -> Self {
        let wallet: String = wallet_address
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        Self {
            name: format!("{wallet}_{kind}_{}.{extension}", generated_at.format("%Y%m%dT%H%M%SZ")),
            contents,
        }
    }
}

/// Plain-text trend report: one block per window, then the conclusion
pub fn render_trend_report(wallet_address: &str, report: &TrendReport, generated_at: DateTime<Utc>) -> String {
    let mut out = String::from("Historical Trend Analysis\n");
    out.push_str(&format!("Wallet: {wallet_address}\n"));
    out.push_str(&format!("Generated: {}\n", generated_at.to_rfc3339()));

    for (window, trend) in report.iter() {
        out.push_str(&format!("\n{} trend\n", window));
        out.push_str(&format!("Overall change: {}\n", trend.overall_change));

        let changes = if trend.notable_changes.is_empty() {
            "none".to_string()
        } else {
            format_changes(&trend.notable_changes, ", ")
        };
        out.push_str(&format!("Notable changes: {changes}\n"));

        let p = &trend.transaction_patterns;
        out.push_str(&format!(
            "Transaction patterns: send={}, receive={}, net={}\n",
            p.send_count, p.receive_count, p.net_activity
        ));
    }

    out.push_str("\nConclusion\n");
    out.push_str(&interpret_strategy(report));
    out.push('\n');
    out
}

/// Destination for finished reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Store the artifact, returning where it went
    async fn write(&self, artifact: &ReportArtifact) -> Result<String>;

    /// Store a batch in order, writing nothing when any name is taken
    async fn write_all(&self, artifacts: &[ReportArtifact]) -> Result<Vec<String>>;

    fn name(&self) -> &str;
}

fn duplicate_in_batch(artifacts: &[ReportArtifact]) -> Option<&str> {
    artifacts
        .iter()
        .enumerate()
        .find(|(i, a)| artifacts[..*i].iter().any(|b| b.name == a.name))
        .map(|(_, a)| a.name.as_str())
}

/// Writes each artifact as a new file under a directory
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn write(&self, artifact: &ReportArtifact) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&artifact.name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    AnalyticsError::Report(format!("{} already exists", path.display()))
                }
                _ => AnalyticsError::Io(e),
            })?;

        file.write_all(artifact.contents.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(path = %path.display(), bytes = artifact.contents.len(), "report written");
        Ok(path.display().to_string())
    }

    async fn write_all(&self, artifacts: &[ReportArtifact]) -> Result<Vec<String>> {
        if let Some(name) = duplicate_in_batch(artifacts) {
            return Err(AnalyticsError::Report(format!("{name} appears twice in one batch")));
        }
        for artifact in artifacts {
            let path = self.dir.join(&artifact.name);
            if tokio::fs::try_exists(&path).await? {
                return Err(AnalyticsError::Report(format!("{} already exists", path.display())));
            }
        }

        let mut locations = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            locations.push(self.write(artifact).await?);
        }
        Ok(locations)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Keeps artifacts in memory
#[derive(Default)]
pub struct MemoryReportSink {
    artifacts: RwLock<BTreeMap<String, String>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<String> {
        self.artifacts.read().await.get(name).cloned()
    }

    pub async fn names(&self) -> Vec<String> {
        self.artifacts.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn write(&self, artifact: &ReportArtifact) -> Result<String> {
        let mut artifacts = self.artifacts.write().await;
        if artifacts.contains_key(&artifact.name) {
            return Err(AnalyticsError::Report(format!("{} already exists", artifact.name)));
        }
        artifacts.insert(artifact.name.clone(), artifact.contents.clone());
        Ok(format!("memory://{}", artifact.name))
    }

    async fn write_all(&self, batch: &[ReportArtifact]) -> Result<Vec<String>> {
        if let Some(name) = duplicate_in_batch(batch) {
            return Err(AnalyticsError::Report(format!("{name} appears twice in one batch")));
        }

        let mut artifacts = self.artifacts.write().await;
        if let Some(taken) = batch.iter().find(|a| artifacts.contains_key(&a.name)) {
            return Err(AnalyticsError::Report(format!("{} already exists", taken.name)));
        }
        Ok(batch
            .iter()
            .map(|a| {
                artifacts.insert(a.name.clone(), a.contents.clone());
                format!("memory://{}", a.name)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
