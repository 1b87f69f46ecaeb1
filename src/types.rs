//! Core types for braintrust-export

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// A project as returned by the project lookup call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned project id
    pub id: String,
    /// Display name, used for the output subdirectory
    pub name: String,
}

/// An experiment or dataset descriptor as returned by a listing call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Server-assigned object id, used to fetch the payload
    pub id: String,
    /// Display name, used for the output filename
    pub name: String,
}

/// Envelope of every lookup/listing response: `{"objects": [...]}`
#[derive(Clone, Debug, Deserialize)]
pub struct ObjectList<T> {
    /// Matching objects, in server order
    pub objects: Vec<T>,
}

/// One event: a record whose schema varies from item to item
pub type Event = Map<String, Value>;

/// Full payload of one experiment/dataset: `{"events": [...]}`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Payload {
    /// Events in the order the server returned them
    pub events: Vec<Event>,
}

/// Which kind of object a pipeline exports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// Experiment runs
    Experiment,
    /// Datasets
    Dataset,
}

impl ExportKind {
    /// All kinds, in export order
    pub const ALL: [ExportKind; 2] = [ExportKind::Experiment, ExportKind::Dataset];

    /// API path segment, also used as the output filename prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Experiment => "experiment",
            ExportKind::Dataset => "dataset",
        }
    }

    /// Plural label for log lines
    pub fn plural(&self) -> &'static str {
        match self {
            ExportKind::Experiment => "experiments",
            ExportKind::Dataset => "datasets",
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file written for one item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedItem {
    /// Experiment or dataset
    pub kind: ExportKind,
    /// Item name as listed by the server
    pub name: String,
    /// Path of the written CSV file
    pub path: PathBuf,
    /// Number of data rows written
    pub rows: usize,
}

/// An item that could not be exported
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemFailure {
    /// Experiment or dataset
    pub kind: ExportKind,
    /// Item name as listed by the server
    pub name: String,
    /// Rendered error, including the underlying cause
    pub error: String,
}

/// Outcome of a complete export run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Resolved project, if resolution succeeded
    pub project: Option<Project>,
    /// Project output directory
    pub directory: PathBuf,
    /// Successfully written files, in listing order
    pub exported: Vec<ExportedItem>,
    /// Failed items, in listing order
    pub failures: Vec<ItemFailure>,
}

impl ExportSummary {
    /// True when every listed item was written
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of items written for one kind
    pub fn exported_count(&self, kind: ExportKind) -> usize {
        self.exported.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of failed items for one kind
    pub fn failure_count(&self, kind: ExportKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}
