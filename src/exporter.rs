//! Export orchestration.
//!
//! An [`Exporter`] resolves the configured project, then for each configured kind
//! lists the project's items and runs fetch → flatten → write for every item.
//! Items of one kind go through a bounded stream of `concurrency` in-flight
//! exports; results come back in listing order.
//!
//! Run-level errors (configuration, project resolution, listing) end the run.
//! Item-level errors follow [`FailurePolicy`]: with `Continue` they are logged and
//! collected into the [`ExportSummary`]; with `AbortOnFirst` the first one is
//! returned as the run's error.

use crate::client::ApiClient;
use crate::config::{Config, FailurePolicy};
use crate::error::{Error, Result};
use crate::flatten::{RESERVED_COLUMNS, flatten_events};
use crate::types::{ExportKind, ExportSummary, ExportedItem, Item, ItemFailure, Project};
use crate::writer;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Items written and items failed for one kind
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KindReport {
    /// Successfully written files, in listing order
    pub exported: Vec<ExportedItem>,
    /// Failed items, in listing order
    pub failures: Vec<ItemFailure>,
}

/// Exports one project's experiments and datasets to CSV files
#[derive(Clone, Debug)]
pub struct Exporter {
    config: Config,
    client: ApiClient,
}

impl Exporter {
    /// Create an exporter from a configuration
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// The configuration this exporter runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory the given project's files are written to
    pub fn project_dir(&self, project: &Project) -> PathBuf {
        writer::project_dir(&self.config.output_dir, &project.name)
    }

    /// Run a complete export
    ///
    /// Returns a summary when every run-level step succeeded; the summary lists any
    /// item failures collected under [`FailurePolicy::Continue`].
    pub async fn run(&self) -> Result<ExportSummary> {
        let project = self.resolve_project().await?;
        let mut summary = ExportSummary {
            directory: self.project_dir(&project),
            project: Some(project.clone()),
            ..Default::default()
        };
        info!(
            project = %project.name,
            directory = %summary.directory.display(),
            "Exporting experiments and datasets"
        );

        for &kind in &self.config.kinds {
            let report = self.export_kind(&project, kind).await?;
            summary.exported.extend(report.exported);
            summary.failures.extend(report.failures);
        }

        if summary.is_success() {
            info!(
                directory = %summary.directory.display(),
                files = summary.exported.len(),
                "Export complete"
            );
        } else {
            error!(
                directory = %summary.directory.display(),
                files = summary.exported.len(),
                failed = summary.failures.len(),
                "Export finished with failures"
            );
        }
        Ok(summary)
    }

    /// Look up the configured project and create its output directory
    ///
    /// # Errors
    /// - [`Error::ProjectNotFound`] if no project matches
    /// - [`Error::RemoteRequest`] if the lookup call fails
    /// - [`Error::Write`] if the directory cannot be created
    pub async fn resolve_project(&self) -> Result<Project> {
        info!(project = %self.config.project_name, "Searching for project");

        let project = match self.client.find_project(&self.config.project_name).await {
            Ok(project) => project,
            Err(e) => {
                match &e {
                    Error::ProjectNotFound { name } => {
                        error!(project = %name, "Project was not found")
                    }
                    other => error!(error = %other, "Project lookup failed"),
                }
                return Err(e);
            }
        };
        info!(project = %project.name, id = %project.id, "Found project");

        let dir = self.project_dir(&project);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::Write { path: dir, source })?;

        Ok(project)
    }

    /// Export every item of one kind
    ///
    /// # Errors
    /// Returns the listing error, or under [`FailurePolicy::AbortOnFirst`] the first
    /// item error.
    pub async fn export_kind(&self, project: &Project, kind: ExportKind) -> Result<KindReport> {
        info!(project = %project.name, kind = %kind, "Listing {}", kind.plural());
        let items = self.client.list_items(kind, &project.name).await?;
        debug!(kind = %kind, count = items.len(), "Items to export");

        let mut report = KindReport::default();
        let mut results = stream::iter(items.iter())
            .map(move |item| async move { (item, self.export_item(project, kind, item).await) })
            .buffered(self.config.concurrency);

        while let Some((item, result)) = results.next().await {
            match result {
                Ok(exported) => report.exported.push(exported),
                Err(e) => {
                    error!(kind = %kind, item = %item.name, error = %e, "Error exporting item");
                    if self.config.failure_policy == FailurePolicy::AbortOnFirst
                        || !e.is_item_level()
                    {
                        return Err(e);
                    }
                    report.failures.push(ItemFailure {
                        kind,
                        name: item.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            kind = %kind,
            exported = report.exported.len(),
            failed = report.failures.len(),
            "Finished {}",
            kind.plural()
        );
        Ok(report)
    }

    /// Fetch, flatten and write a single item
    pub async fn export_item(
        &self,
        project: &Project,
        kind: ExportKind,
        item: &Item,
    ) -> Result<ExportedItem> {
        info!(kind = %kind, item = %item.name, "Exporting item");

        let payload = self.client.fetch_payload(kind, item).await?;
        let events = payload.events.len();
        let table = flatten_events(&payload.events, &RESERVED_COLUMNS);
        debug!(
            item = %item.name,
            events,
            columns = table.columns.len(),
            "Flattened events"
        );

        let path = writer::output_path(&self.config.output_dir, &project.name, kind, &item.name);
        let target = path.clone();
        let rows = tokio::task::spawn_blocking(move || writer::write_table(&table, &target))
            .await
            .map_err(|e| Error::ExportItem {
                kind,
                name: item.name.clone(),
                reason: format!("writer task failed: {e}"),
            })??;

        info!(kind = %kind, item = %item.name, path = %path.display(), rows, "Wrote file");
        Ok(ExportedItem {
            kind,
            name: item.name.clone(),
            path,
            rows,
        })
    }
}
