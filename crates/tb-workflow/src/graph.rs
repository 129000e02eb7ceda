//! Validated workflow and stage graph lookups
//!
//! [`Workflow`] can ONLY be obtained through [`WorkflowConfig::validate`]; it
//! has no public constructor. Every stage it mentions is therefore a member
//! of the canonical stage set.
//!
//! Lookups never fail: an unknown stage yields an empty target list or the
//! `Default` owner.
//!
//! [`WorkflowConfig::validate`]: crate::WorkflowConfig::validate

use crate::config::{ColumnTable, Glyphs, OverrideTable, WorkflowConfig};
use crate::palette::Palette;
use crate::types::{Persona, Stage};
use indexmap::{IndexMap, IndexSet};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// Which edge table a transition comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionDirection {
    /// Forward ("advance") edge
    Advance,
    /// Correction ("backtrack") edge
    Backtrack,
}

/// Immutable, validated workflow configuration
#[derive(Debug, Clone)]
pub struct Workflow {
    pub(crate) stages: IndexSet<Stage>,
    pub(crate) initial_stage: Stage,
    pub(crate) forward: IndexMap<Stage, Vec<Stage>>,
    pub(crate) backtrack: IndexMap<Stage, Vec<Stage>>,
    pub(crate) owners: IndexMap<Stage, Persona>,
    pub(crate) palette: Palette,
    pub(crate) columns: ColumnTable,
    pub(crate) advance_overrides: OverrideTable,
    pub(crate) backtrack_overrides: OverrideTable,
    pub(crate) glyphs: Glyphs,
}

impl Workflow {
    /// Sealed constructor, only reachable from validation
    pub(crate) fn from_validated(config: WorkflowConfig) -> Self {
        Self {
            stages: config.stages.into_iter().collect(),
            initial_stage: config.initial_stage,
            forward: config.forward,
            backtrack: config.backtrack,
            owners: config.owners,
            palette: Palette::new(
                config.owner_colors,
                config.stage_colors,
                config.neutral_card_color,
            ),
            columns: config.columns,
            advance_overrides: config.advance_overrides,
            backtrack_overrides: config.backtrack_overrides,
            glyphs: config.glyphs,
        }
    }

    /// Load and validate the bundled production workflow
    ///
    /// # Errors
    /// Only if the bundled document is malformed.
    pub fn bundled() -> Result<Self, crate::WorkflowError> {
        WorkflowConfig::bundled()?.validate()
    }

    /// Canonical stages in display order
    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Number of canonical stages
    #[inline]
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Whether `stage` belongs to the canonical set
    #[inline]
    #[must_use]
    pub fn contains(&self, stage: &str) -> bool {
        self.stages.contains(stage)
    }

    /// Stage new tickets start in
    #[inline]
    #[must_use]
    pub fn initial_stage(&self) -> &Stage {
        &self.initial_stage
    }

    /// Advance targets of `stage`, in authoring order
    #[must_use]
    pub fn forward_targets(&self, stage: &str) -> &[Stage] {
        self.forward.get(stage).map_or(&[], Vec::as_slice)
    }

    /// Correction targets of `stage`, in authoring order
    #[must_use]
    pub fn backtrack_targets(&self, stage: &str) -> &[Stage] {
        self.backtrack.get(stage).map_or(&[], Vec::as_slice)
    }

    /// Targets of `stage` in the given direction
    #[must_use]
    pub fn targets(&self, stage: &str, direction: TransitionDirection) -> &[Stage] {
        match direction {
            TransitionDirection::Advance => self.forward_targets(stage),
            TransitionDirection::Backtrack => self.backtrack_targets(stage),
        }
    }

    /// Owning persona of `stage`, `Default` when unmapped
    #[must_use]
    pub fn owner_of(&self, stage: &str) -> Persona {
        self.owners.get(stage).copied().unwrap_or_default()
    }

    /// Color tables
    #[inline]
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Button glyphs
    #[inline]
    #[must_use]
    pub fn glyphs(&self) -> &Glyphs {
        &self.glyphs
    }

    /// Total number of edges across both tables
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum::<usize>()
            + self.backtrack.values().map(Vec::len).sum::<usize>()
    }

    /// Stages with no incoming advance edge
    #[must_use]
    pub fn entry_stages(&self) -> Vec<&Stage> {
        let g = self.forward_graph();
        self.stages
            .iter()
            .filter(|s| {
                g.neighbors_directed(s.as_str(), Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect()
    }

    /// Stages with no advance targets (terminal for forward motion)
    #[must_use]
    pub fn terminal_stages(&self) -> Vec<&Stage> {
        self.stages
            .iter()
            .filter(|s| self.forward_targets(s.as_str()).is_empty())
            .collect()
    }

    /// Stages reachable from `start` over advance and correction edges
    ///
    /// Includes `start` itself when it is a canonical stage. The graph is
    /// allowed to contain cycles.
    #[must_use]
    pub fn reachable_from(&self, start: &str) -> Vec<&Stage> {
        let g = self.transition_graph();
        let Some(start) = self.stages.get(start) else {
            return Vec::new();
        };
        let mut seen = IndexSet::new();
        let mut dfs = Dfs::new(&g, start.as_str());
        while let Some(node) = dfs.next(&g) {
            seen.insert(node);
        }
        self.stages
            .iter()
            .filter(|s| seen.contains(s.as_str()))
            .collect()
    }

    fn forward_graph(&self) -> DiGraphMap<&str, TransitionDirection> {
        self.edge_graph(&[TransitionDirection::Advance])
    }

    fn transition_graph(&self) -> DiGraphMap<&str, TransitionDirection> {
        self.edge_graph(&[TransitionDirection::Advance, TransitionDirection::Backtrack])
    }

    fn edge_graph(&self, directions: &[TransitionDirection]) -> DiGraphMap<&str, TransitionDirection> {
        let mut g = DiGraphMap::new();
        for stage in &self.stages {
            g.add_node(stage.as_str());
        }
        for &direction in directions {
            let table = match direction {
                TransitionDirection::Advance => &self.forward,
                TransitionDirection::Backtrack => &self.backtrack,
            };
            for (from, targets) in table {
                for to in targets {
                    g.add_edge(from.as_str(), to.as_str(), direction);
                }
            }
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow(yaml: &str) -> Workflow {
        WorkflowConfig::from_yaml_str(yaml).unwrap().validate().unwrap()
    }

    #[test]
    fn unknown_stage_lookups_are_silent() {
        let wf = Workflow::bundled().unwrap();
        assert!(wf.forward_targets("Nope").is_empty());
        assert!(wf.backtrack_targets("Nope").is_empty());
        assert_eq!(wf.owner_of("Nope"), Persona::Default);
    }

    #[test]
    fn bundled_terminal_and_reopen_paths() {
        let wf = Workflow::bundled().unwrap();
        assert!(wf.forward_targets("Done").is_empty());
        assert!(wf.backtrack_targets("Cancelled").is_empty());
        assert_eq!(wf.forward_targets("Cancelled"), [Stage::from("Backlog")]);
        let terminal: Vec<&str> = wf.terminal_stages().iter().map(|s| s.as_str()).collect();
        assert_eq!(terminal, ["Done"]);
    }

    #[test]
    fn bundled_graph_has_cycles_and_full_reachability() {
        let wf = Workflow::bundled().unwrap();
        assert!(wf
            .forward_targets("In Development")
            .contains(&Stage::from("Dev Blocked")));
        assert!(wf
            .forward_targets("Dev Blocked")
            .contains(&Stage::from("In Development")));
        assert_eq!(wf.reachable_from("Backlog").len(), wf.stage_count());
    }

    #[test]
    fn entry_stages_have_no_forward_predecessor() {
        let wf = workflow(
            "stages: [A, B, C]\ninitial_stage: A\nforward:\n  A: [B]\n  B: [C]\nbacktrack:\n  C: [A]\n",
        );
        let entries: Vec<&str> = wf.entry_stages().iter().map(|s| s.as_str()).collect();
        assert_eq!(entries, ["A"]);
    }

    #[test]
    fn reachability_follows_backtrack_edges() {
        let wf = workflow(
            "stages: [A, B, C, D]\ninitial_stage: A\nforward:\n  A: [B]\nbacktrack:\n  B: [C]\n",
        );
        let reach: Vec<&str> = wf.reachable_from("A").iter().map(|s| s.as_str()).collect();
        assert_eq!(reach, ["A", "B", "C"]);
        assert!(wf.reachable_from("Z").is_empty());
    }

    #[test]
    fn edge_count_sums_both_tables() {
        let wf = workflow("stages: [A, B]\nforward:\n  A: [B]\nbacktrack:\n  B: [A]\ninitial_stage: A\n");
        assert_eq!(wf.edge_count(), 2);
    }
}
