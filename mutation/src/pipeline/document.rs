//! Pipeline over a document store.
//!
//! Contracts come from the collections' declared schemas, fetched once per
//! collection and cached. Only shape checks run here: no business rules, no
//! audit records, no rejection records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use wardbook_constraint::validate_shape;
use wardbook_core::{EntityKind, Fields, RowKey};
use wardbook_registry::{parse_document_schema, EntityContract};
use wardbook_store::DocumentStore;

use super::{
    empty_patch, not_found, prepare_create, prepare_replace, rejected_missing_key, rejected_shape,
    replace_assignments, MutationPipeline,
};
use crate::config::PipelineConfig;
use crate::error::{MutationError, MutationResult};
use crate::patch::compile_patch;
use crate::request::{MutationRequest, WriteKind};
use crate::result::MutationOutcome;
use crate::state::{PipelineState, Progress};

/// Shape-checked writes to a document store.
pub struct DocumentPipeline<S: DocumentStore> {
    store: S,
    config: PipelineConfig,
    contracts: RwLock<HashMap<EntityKind, Arc<EntityContract>>>,
}

impl<S: DocumentStore> DocumentPipeline<S> {
    pub fn new(store: S, config: PipelineConfig) -> Self {
        Self {
            store,
            config,
            contracts: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether the contract for `kind` has been fetched.
    pub fn is_cached(&self, kind: EntityKind) -> bool {
        self.contracts
            .read()
            .map(|cache| cache.contains_key(&kind))
            .unwrap_or(false)
    }

    fn contract(&self, kind: EntityKind) -> MutationResult<Arc<EntityContract>> {
        {
            let cache = self
                .contracts
                .read()
                .map_err(|_| MutationError::poisoned("document contract cache"))?;
            if let Some(contract) = cache.get(&kind) {
                return Ok(Arc::clone(contract));
            }
        }

        let schema = self.store.fetch_schema(kind.table_name())?;
        let contract = Arc::new(parse_document_schema(kind, &schema)?);
        let mut cache = self
            .contracts
            .write()
            .map_err(|_| MutationError::poisoned("document contract cache"))?;
        debug!(collection = kind.table_name(), "document contract cached");
        Ok(Arc::clone(cache.entry(kind).or_insert(contract)))
    }

    fn create(
        &self,
        request: &MutationRequest,
        progress: &mut Progress,
    ) -> MutationResult<MutationOutcome> {
        let contract = self.contract(request.kind)?;
        let mut rng = rand::thread_rng();
        let candidate = prepare_create(&contract, &request.fields, &self.config, &mut rng);
        if let Err(err) = validate_shape(&contract, &candidate) {
            return Ok(rejected_shape(progress, &contract, err));
        }
        progress.advance(PipelineState::ShapeChecked);

        let key = self.store.insert_one(contract.table(), candidate)?;
        Ok(applied(progress, &contract, request.write, key))
    }

    fn replace(
        &self,
        request: &MutationRequest,
        progress: &mut Progress,
    ) -> MutationResult<MutationOutcome> {
        let Some(key) = &request.key else {
            return Ok(rejected_missing_key(progress, request.kind, request.write));
        };
        let contract = self.contract(request.kind)?;
        if self.store.find_one(contract.table(), key)?.is_none() {
            return Ok(not_found(request.kind, request.write, key));
        }

        let candidate = prepare_replace(&contract, &request.fields, key);
        if let Err(err) = validate_shape(&contract, &candidate) {
            return Ok(rejected_shape(progress, &contract, err));
        }
        progress.advance(PipelineState::ShapeChecked);

        let assignments = replace_assignments(&contract, &candidate);
        if !self.store.update_one(contract.table(), key, &assignments)? {
            return Ok(not_found(request.kind, request.write, key));
        }
        Ok(applied(progress, &contract, request.write, key.clone()))
    }

    fn patch(
        &self,
        request: &MutationRequest,
        progress: &mut Progress,
    ) -> MutationResult<MutationOutcome> {
        let Some(key) = &request.key else {
            return Ok(rejected_missing_key(progress, request.kind, request.write));
        };
        let contract = self.contract(request.kind)?;
        let Some(existing) = self.store.find_one(contract.table(), key)? else {
            return Ok(not_found(request.kind, request.write, key));
        };
        let Ok(compiled) = compile_patch(&contract, &existing, &request.fields) else {
            return Ok(empty_patch(request.kind, key));
        };

        if let Err(err) = validate_shape(&contract, &compiled.merged) {
            return Ok(rejected_shape(progress, &contract, err));
        }
        progress.advance(PipelineState::ShapeChecked);

        if !self.store.update_one(contract.table(), key, &compiled.assignments)? {
            return Ok(not_found(request.kind, request.write, key));
        }
        Ok(applied(progress, &contract, request.write, key.clone()))
    }

    fn delete(
        &self,
        request: &MutationRequest,
        progress: &mut Progress,
    ) -> MutationResult<MutationOutcome> {
        let Some(key) = &request.key else {
            return Ok(rejected_missing_key(progress, request.kind, request.write));
        };
        let contract = self.contract(request.kind)?;
        if !self.store.delete_one(contract.table(), key)? {
            return Ok(not_found(request.kind, request.write, key));
        }
        Ok(applied(progress, &contract, request.write, key.clone()))
    }
}

impl<S: DocumentStore> MutationPipeline for DocumentPipeline<S> {
    fn execute(&self, request: MutationRequest) -> MutationResult<MutationOutcome> {
        let mut progress = Progress::start(request.kind, request.write);
        let outcome = match request.write {
            WriteKind::Create => self.create(&request, &mut progress),
            WriteKind::Replace => self.replace(&request, &mut progress),
            WriteKind::Patch => self.patch(&request, &mut progress),
            WriteKind::Delete => self.delete(&request, &mut progress),
        }?;
        debug!(
            kind = %request.kind,
            write = %request.write,
            outcome = outcome.label(),
            "request finished"
        );
        Ok(outcome)
    }

    fn get(&self, kind: EntityKind, key: &RowKey) -> MutationResult<Option<Fields>> {
        Ok(self.store.find_one(kind.table_name(), key)?)
    }

    fn list(&self, kind: EntityKind) -> MutationResult<Vec<Fields>> {
        Ok(self.store.find(kind.table_name())?)
    }
}

fn applied(
    progress: &mut Progress,
    contract: &EntityContract,
    write: WriteKind,
    key: RowKey,
) -> MutationOutcome {
    progress.advance(PipelineState::Applied);
    info!(collection = contract.table(), write = %write, key = %key, "document mutation applied");
    MutationOutcome::Applied { key, audit_ref: None }
}
