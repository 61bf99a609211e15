//! Orchestrates a full polling run.

use crate::config::Settings;
use crate::diff::new_full_names;
use crate::listing::list_public_repos;
use crate::readme::fetch_readme_snippet;
use crate::snapshot::{DiscoveryRecord, Snapshot};
use crate::store::{Store, StoreError};
use crate::summary::RunSummary;
use chrono::Utc;
use octocrab::Octocrab;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for a polling run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Validated startup settings.
    settings: Settings,
    /// Directory for the snapshot and history files.
    data_dir: PathBuf,
    /// Directory for viewer-facing artifacts.
    docs_dir: PathBuf,
    /// Whether to preview discoveries without writing artifacts.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(settings: Settings, data_dir: PathBuf, docs_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            settings,
            data_dir,
            docs_dir,
            dry_run,
        }
    }

    /// Returns the validated startup settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the data output directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the docs output directory.
    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Errors that can occur while running the poller.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Artifact read/write errors.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}

/// Orchestrates one full poll: list, diff, enrich, persist.
pub struct Runner {
    config: RunnerConfig,
    octocrab: Octocrab,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let octocrab = Octocrab::builder()
            .personal_token(config.settings.token.clone())
            .build()?;
        Ok(Self { config, octocrab })
    }

    /// Executes the full polling flow, fully sequentially.
    ///
    /// Per-account listing failures and per-repository README failures are
    /// downgraded inside their components; the only errors surfacing here
    /// are artifact I/O failures.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run);
        let store = Store::new(self.config.data_dir.clone(), self.config.docs_dir.clone());

        let previous = store.load_previous_snapshot()?;
        info!(
            accounts = ?self.config.settings.accounts,
            known = previous.len(),
            "Checking public repositories"
        );

        let mut current = Snapshot::new();
        for account in &self.config.settings.accounts {
            let records = list_public_repos(&self.octocrab, account).await;
            info!(account = %account, count = records.len(), "Listed public repositories");
            summary.accounts_checked += 1;
            current.extend(records);
        }
        summary.repositories_seen = current.len();

        let discovered = new_full_names(&previous, &current);
        summary.new_repositories = discovered.len();
        info!(count = discovered.len(), "New public repositories found");

        let mut discoveries = Vec::with_capacity(discovered.len());
        for full_name in &discovered {
            // Discovered names come from the current snapshot's own keys.
            let Some(record) = current.get(full_name) else {
                continue;
            };
            let snippet = fetch_readme_snippet(&self.octocrab, &record.owner, &record.name).await;
            summary.record_snippet(&snippet);
            discoveries.push(DiscoveryRecord::from_record(record, snippet.into_text()));
        }

        if self.config.dry_run {
            preview_discoveries(&discoveries);
            return Ok(summary);
        }

        let today = Utc::now().date_naive().to_string();
        store.persist_run(&current, &discoveries, &today)?;

        Ok(summary)
    }
}

fn preview_discoveries(discoveries: &[DiscoveryRecord]) {
    println!(
        "\n[DRY RUN] {} new public repositories, nothing written:",
        discoveries.len()
    );
    for (i, discovery) in discoveries.iter().enumerate() {
        println!("  [{}/{}] {}", i + 1, discoveries.len(), discovery.full_name);
        if let Some(description) = &discovery.description {
            println!("    {description}");
        }
    }
}
