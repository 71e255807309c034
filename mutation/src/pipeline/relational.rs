//! Pipeline over the relational store.
//!
//! Every write and its audit record share one unit of work. Rule failures
//! write a rejection record and commit it without touching business rows.

use tracing::{debug, info, warn};
use wardbook_constraint::{validate_rules, validate_shape, RuleError};
use wardbook_core::{EntityKind, Fields, RecordId, RowKey};
use wardbook_journal::{AuditRecorder, ErrorSink, Operation};
use wardbook_registry::EntityContract;
use wardbook_store::{SqliteStore, StoreError, UnitOfWork};

use super::{
    business_key, empty_patch, not_found, prepare_create, prepare_replace, rejected_missing_key,
    rejected_shape, replace_assignments, MutationPipeline,
};
use crate::config::PipelineConfig;
use crate::error::MutationResult;
use crate::patch::compile_patch;
use crate::request::{MutationRequest, WriteKind};
use crate::result::{MutationOutcome, Rejection};
use crate::state::{PipelineState, Progress};

/// Validated, audited writes to SQLite.
#[derive(Debug, Clone)]
pub struct RelationalPipeline {
    store: SqliteStore,
    config: PipelineConfig,
}

impl RelationalPipeline {
    pub fn new(store: SqliteStore, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn contract(&self, kind: EntityKind) -> MutationResult<&EntityContract> {
        Ok(self.store.registry().contract(kind)?)
    }

    fn actor<'a>(&'a self, request: &'a MutationRequest) -> &'a str {
        request.actor.as_deref().unwrap_or(&self.config.actor)
    }

    fn create(
        &self,
        request: &MutationRequest,
        progress: &mut Progress,
    ) -> MutationResult<MutationOutcome> {
        let contract = self.contract(request.kind)?;
        let mut rng = rand::thread_rng();
        let candidate = prepare_create(contract, &request.fields, &self.config, &mut rng);
        let key = business_key(contract, &candidate);

        if let Err(err) = validate_shape(contract, &candidate) {
            return Ok(rejected_shape(progress, contract, err));
        }
        progress.advance(PipelineState::ShapeChecked);

        if let Err(err) = validate_rules(request.kind, &candidate) {
            let unit = self.store.unit_of_work()?;
            return reject_rule(unit, progress, contract, key.as_ref(), err, &candidate);
        }
        progress.advance(PipelineState::RuleChecked);

        let mut unit = self.store.unit_of_work()?;
        let key = unit.insert(contract, &candidate)?;
        let stored = refetch(&unit, contract, &key)?;
        let audit = unit.record(
            contract.table(),
            &key,
            Operation::Insert,
            None,
            Some(&stored),
            self.actor(request),
        )?;
        unit.commit()?;
        Ok(applied(progress, contract, request.write, key, Some(audit)))
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
        let mut unit = self.store.unit_of_work()?;
        let Some(before) = unit.fetch(contract, key)? else {
            return Ok(not_found(request.kind, request.write, key));
        };

        let candidate = prepare_replace(contract, &request.fields, key);
        if let Err(err) = validate_shape(contract, &candidate) {
            return Ok(rejected_shape(progress, contract, err));
        }
        progress.advance(PipelineState::ShapeChecked);
        if let Err(err) = validate_rules(request.kind, &candidate) {
            return reject_rule(unit, progress, contract, Some(key), err, &candidate);
        }
        progress.advance(PipelineState::RuleChecked);

        let assignments = replace_assignments(contract, &candidate);
        unit.update(contract, key, &assignments)?;
        let after = refetch(&unit, contract, key)?;
        let audit = unit.record(
            contract.table(),
            key,
            Operation::Update,
            Some(&before),
            Some(&after),
            self.actor(request),
        )?;
        unit.commit()?;
        Ok(applied(progress, contract, request.write, key.clone(), Some(audit)))
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
        let mut unit = self.store.unit_of_work()?;
        let Some(before) = unit.fetch(contract, key)? else {
            return Ok(not_found(request.kind, request.write, key));
        };
        let Ok(compiled) = compile_patch(contract, &before, &request.fields) else {
            return Ok(empty_patch(request.kind, key));
        };

        if let Err(err) = validate_shape(contract, &compiled.merged) {
            return Ok(rejected_shape(progress, contract, err));
        }
        progress.advance(PipelineState::ShapeChecked);
        if let Err(err) = validate_rules(request.kind, &compiled.merged) {
            return reject_rule(unit, progress, contract, Some(key), err, &compiled.merged);
        }
        progress.advance(PipelineState::RuleChecked);

        unit.update(contract, key, &compiled.assignments)?;
        let after = refetch(&unit, contract, key)?;
        let audit = unit.record(
            contract.table(),
            key,
            Operation::Update,
            Some(&before),
            Some(&after),
            self.actor(request),
        )?;
        unit.commit()?;
        Ok(applied(progress, contract, request.write, key.clone(), Some(audit)))
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
        let unit = self.store.unit_of_work()?;
        if !unit.delete(contract, key)? {
            return Ok(not_found(request.kind, request.write, key));
        }
        unit.commit()?;
        Ok(applied(progress, contract, request.write, key.clone(), None))
    }
}

impl MutationPipeline for RelationalPipeline {
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
        Ok(self.store.get(kind, key)?)
    }

    fn list(&self, kind: EntityKind) -> MutationResult<Vec<Fields>> {
        Ok(self.store.list(kind)?)
    }
}

/// Re-read a row inside the unit so the audit snapshot matches storage.
fn refetch(unit: &UnitOfWork, contract: &EntityContract, key: &RowKey) -> MutationResult<Fields> {
    unit.fetch(contract, key)?.ok_or_else(|| {
        let message = format!("row {} vanished inside its unit of work", key);
        StoreError::invalid_row(contract.table(), message).into()
    })
}

/// Record a rule rejection and commit it on its own.
fn reject_rule(
    mut unit: UnitOfWork,
    progress: &mut Progress,
    contract: &EntityContract,
    key: Option<&RowKey>,
    error: RuleError,
    attempted: &Fields,
) -> MutationResult<MutationOutcome> {
    let message = error.message();
    let rejection_ref = unit.reject(contract.table(), key, &message, attempted)?;
    unit.commit()?;
    progress.advance(PipelineState::Rejected);
    warn!(
        table = contract.table(),
        reason = %message,
        rejection_ref = %rejection_ref,
        "rule check failed"
    );
    Ok(MutationOutcome::Rejected(Rejection::Rule {
        message,
        rejection_ref: Some(rejection_ref),
    }))
}

fn applied(
    progress: &mut Progress,
    contract: &EntityContract,
    write: WriteKind,
    key: RowKey,
    audit_ref: Option<RecordId>,
) -> MutationOutcome {
    progress.advance(PipelineState::Applied);
    info!(
        table = contract.table(),
        write = %write,
        key = %key,
        audit_ref = ?audit_ref,
        "mutation applied"
    );
    MutationOutcome::Applied { key, audit_ref }
}
