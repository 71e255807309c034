//! Scenario runner.

use std::collections::HashMap;
use wardbook_core::{EntityKind, RowKey};
use wardbook_mutation::{MutationPipeline, MutationRequest, WriteKind};

use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::{Action, Scenario, GHOST_KEY};

/// Runs a scenario against one pipeline.
pub struct Runner<'s> {
    scenario: &'s Scenario,
    backend: &'s str,
}

impl<'s> Runner<'s> {
    pub fn new(scenario: &'s Scenario, backend: &'s str) -> Self {
        Self { scenario, backend }
    }

    /// Run every step in order, stopping at the first failed assertion.
    pub fn run(&self, pipeline: &dyn MutationPipeline) -> ScenarioResult<()> {
        let mut aliases: HashMap<String, (EntityKind, RowKey)> = HashMap::new();

        for step in &self.scenario.steps {
            let request = match &step.action {
                Action::Create { kind, fields, .. } => {
                    MutationRequest::create(*kind, fields.clone())
                }
                Action::Replace { alias, fields } => {
                    let (kind, key) = self.resolve(&aliases, &step.name, alias)?;
                    MutationRequest::replace(kind, key, fields.clone())
                }
                Action::Patch { alias, fields } => {
                    let (kind, key) = self.resolve(&aliases, &step.name, alias)?;
                    MutationRequest::patch(kind, key, fields.clone())
                }
                Action::Delete { alias } => {
                    let (kind, key) = self.resolve(&aliases, &step.name, alias)?;
                    MutationRequest::delete(kind, key)
                }
                Action::Ghost { kind, write, fields } => match write {
                    WriteKind::Create => MutationRequest::create(*kind, fields.clone()),
                    WriteKind::Replace => {
                        MutationRequest::replace(*kind, GHOST_KEY, fields.clone())
                    }
                    WriteKind::Patch => MutationRequest::patch(*kind, GHOST_KEY, fields.clone()),
                    WriteKind::Delete => MutationRequest::delete(*kind, GHOST_KEY),
                },
            };

            let result = pipeline.execute(request);

            if let (Action::Create { alias, kind, .. }, Ok(outcome)) = (&step.action, &result) {
                if let Some(key) = outcome.key() {
                    aliases.insert(alias.clone(), (*kind, key.clone()));
                }
            }

            let stored = match step.action.alias().and_then(|alias| aliases.get(alias)) {
                Some((kind, key)) => pipeline.get(*kind, key).map_err(|e| {
                    ScenarioError::read_failed(self.backend, &step.name, e.to_string())
                })?,
                None => None,
            };

            step.assertion
                .verify(self.backend, &step.name, &result, stored.as_ref())?;
        }
        Ok(())
    }

    fn resolve(
        &self,
        aliases: &HashMap<String, (EntityKind, RowKey)>,
        step: &str,
        alias: &str,
    ) -> ScenarioResult<(EntityKind, RowKey)> {
        aliases
            .get(alias)
            .cloned()
            .ok_or_else(|| ScenarioError::unknown_alias(self.backend, step, alias))
    }
}
