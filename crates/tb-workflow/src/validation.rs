//! Configuration validation
//!
//! Runs once, at load time. Fatal defects (unknown stages, self-transitions,
//! duplicate or missing stages) are collected in full and returned together;
//! cosmetic findings are only logged.

use crate::config::{OverrideTable, WorkflowConfig};
use crate::error::{IntegrityIssue, WorkflowError};
use crate::graph::Workflow;
use crate::types::{Persona, Stage};
use indexmap::{IndexMap, IndexSet};

impl WorkflowConfig {
    /// Validate the tables and seal them into a [`Workflow`]
    ///
    /// # Errors
    /// `WorkflowError::DataIntegrity` listing every defect found.
    pub fn validate(self) -> Result<Workflow, WorkflowError> {
        let issues = collect_issues(&self);
        if !issues.is_empty() {
            tracing::error!(count = issues.len(), "workflow configuration rejected");
            return Err(WorkflowError::DataIntegrity(issues));
        }

        let workflow = Workflow::from_validated(self);
        report_findings(&workflow);
        tracing::debug!(
            stages = workflow.stage_count(),
            edges = workflow.edge_count(),
            "workflow configuration validated"
        );
        Ok(workflow)
    }
}

struct IssueCollector<'a> {
    canonical: IndexSet<&'a str>,
    issues: Vec<IntegrityIssue>,
}

impl<'a> IssueCollector<'a> {
    fn new(stages: &'a [Stage]) -> Self {
        let mut canonical = IndexSet::new();
        let mut issues = Vec::new();
        if stages.is_empty() {
            issues.push(IntegrityIssue::EmptyStageSet);
        }
        for stage in stages {
            if !canonical.insert(stage.as_str()) {
                issues.push(IntegrityIssue::DuplicateStage(stage.clone()));
            }
        }
        Self { canonical, issues }
    }

    fn check(&mut self, table: impl FnOnce() -> String, stage: &Stage) {
        if !self.canonical.contains(stage.as_str()) {
            self.issues.push(IntegrityIssue::unknown(table(), stage));
        }
    }

    fn check_edges(&mut self, name: &'static str, edges: &IndexMap<Stage, Vec<Stage>>) {
        for (from, targets) in edges {
            self.check(|| name.to_string(), from);
            for to in targets {
                self.check(|| format!("{name}['{from}']"), to);
                if to == from {
                    self.issues.push(IntegrityIssue::SelfTransition {
                        table: name,
                        stage: from.clone(),
                    });
                }
            }
        }
    }

    fn check_overrides(&mut self, name: &'static str, table: &OverrideTable) {
        for (persona, stages) in table {
            for (stage, targets) in stages {
                self.check(|| format!("{name}[{persona}]"), stage);
                for target in targets.keys() {
                    self.check(|| format!("{name}[{persona}]['{stage}']"), target);
                }
            }
        }
    }
}

fn collect_issues(config: &WorkflowConfig) -> Vec<IntegrityIssue> {
    let mut collector = IssueCollector::new(&config.stages);

    collector.check(|| "initial_stage".to_string(), &config.initial_stage);
    collector.check_edges("forward", &config.forward);
    collector.check_edges("backtrack", &config.backtrack);

    for stage in config.owners.keys() {
        collector.check(|| "owners".to_string(), stage);
    }
    for stage in config.stage_colors.keys() {
        collector.check(|| "stage_colors".to_string(), stage);
    }
    for stage in config.glyphs.special.keys() {
        collector.check(|| "glyphs.special".to_string(), stage);
    }
    for (persona, columns) in &config.columns {
        for (column, stages) in columns {
            for stage in stages {
                collector.check(|| format!("columns[{persona}]['{column}']"), stage);
            }
        }
    }

    collector.check_overrides("advance_overrides", &config.advance_overrides);
    collector.check_overrides("backtrack_overrides", &config.backtrack_overrides);

    collector.issues
}

/// Log non-fatal findings on an already valid workflow
fn report_findings(workflow: &Workflow) {
    let reachable = workflow.reachable_from(workflow.initial_stage().as_str());
    if reachable.len() < workflow.stage_count() {
        for stage in workflow.stages().filter(|s| !reachable.contains(s)) {
            tracing::warn!(stage = %stage, "stage is unreachable from the initial stage");
        }
    }

    for (persona, stages) in &workflow.advance_overrides {
        for (stage, targets) in stages {
            let legal = workflow.forward_targets(stage.as_str());
            for target in targets.keys().filter(|t| !legal.contains(t)) {
                tracing::warn!(
                    %persona,
                    stage = %stage,
                    to = %target,
                    "advance override names a target that is not a forward edge; it is never shown"
                );
            }
        }
    }

    for persona in Persona::VIEWERS {
        if workflow.columns_for(persona).next().is_none() {
            tracing::warn!(%persona, "persona has no column layout");
        }
    }
}
