//! Test configuration helpers for pointing an exporter at a mock API server

use braintrust_export::{Config, Exporter, FailurePolicy};
use tempfile::TempDir;
use wiremock::MockServer;

/// API key the mock server expects in the Authorization header
pub const TEST_API_KEY: &str = "sk-test-key";

/// Build a configuration that targets `server` and writes into `temp_dir`
pub fn test_config(server: &MockServer, temp_dir: &TempDir, project: &str) -> Config {
    Config {
        api_url: format!("{}/v1", server.uri()),
        output_dir: temp_dir.path().join("braintrust_exports"),
        ..Config::new(TEST_API_KEY, project)
    }
}

/// Create an exporter with the default (continue) failure policy
///
/// Returns the exporter and temp directory (keep temp_dir alive for test duration)
pub fn create_test_exporter(server: &MockServer, project: &str) -> (Exporter, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = test_config(server, &temp_dir, project);
    let exporter = Exporter::new(config).expect("failed to create exporter");
    (exporter, temp_dir)
}

/// Create an exporter with a custom failure policy and concurrency
pub fn create_test_exporter_with(
    server: &MockServer,
    project: &str,
    failure_policy: FailurePolicy,
    concurrency: usize,
) -> (Exporter, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = Config {
        failure_policy,
        concurrency,
        ..test_config(server, &temp_dir, project)
    };
    let exporter = Exporter::new(config).expect("failed to create exporter");
    (exporter, temp_dir)
}
