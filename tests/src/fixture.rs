//! Backends for integration tests.

use rusqlite::Connection;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use wardbook_mutation::{DocumentPipeline, MutationPipeline, PipelineConfig, RelationalPipeline};
use wardbook_store::{MemoryDocumentStore, SqliteStore, StoreConfig};

use crate::error::ScenarioResult;
use crate::runner::Runner;
use crate::scenario::Scenario;

/// Install a test-writer subscriber once. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A relational pipeline over a database in a temporary directory.
pub struct RelationalFixture {
    pub pipeline: RelationalPipeline,
    dir: TempDir,
}

impl RelationalFixture {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SqliteStore::open(StoreConfig::new(dir.path().join("wardbook.db")))
            .expect("open relational store");
        Self {
            pipeline: RelationalPipeline::new(store, config),
            dir,
        }
    }

    pub fn store(&self) -> &SqliteStore {
        self.pipeline.store()
    }

    /// Make every insert into `table` abort, simulating a journal that
    /// cannot be written.
    pub fn fail_inserts_into(&self, table: &str) {
        let conn = Connection::open(&self.store().config().path).expect("open raw connection");
        conn.execute_batch(&format!(
            "CREATE TRIGGER {table}_offline BEFORE INSERT ON {table} \
             BEGIN SELECT RAISE(ABORT, '{table} offline'); END;"
        ))
        .expect("install failing trigger");
    }
}

impl Default for RelationalFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A document pipeline over the in-memory hospital collections.
pub fn document_pipeline() -> DocumentPipeline<MemoryDocumentStore> {
    init_tracing();
    let store = MemoryDocumentStore::hospital().expect("create document collections");
    DocumentPipeline::new(store, PipelineConfig::default())
}

/// One named backend.
pub struct Backend {
    pub name: &'static str,
    pub pipeline: Box<dyn MutationPipeline>,
    _dir: Option<TempDir>,
}

/// A fresh instance of every backend.
pub fn backends() -> Vec<Backend> {
    let relational = RelationalFixture::new();
    vec![
        Backend {
            name: "relational",
            pipeline: Box::new(relational.pipeline),
            _dir: Some(relational.dir),
        },
        Backend {
            name: "document",
            pipeline: Box::new(document_pipeline()),
            _dir: None,
        },
    ]
}

/// Replay a scenario against a fresh instance of every backend.
pub fn replay(scenario: &Scenario) -> ScenarioResult<()> {
    for backend in backends() {
        Runner::new(scenario, backend.name).run(backend.pipeline.as_ref())?;
    }
    Ok(())
}
