//! Transition option resolver
//!
//! Turns graph edges into display-ready buttons for a persona. Resolution is
//! two-tier: a persona override table is consulted first, graph-derived
//! defaults fill in whatever it does not specify. Overrides decorate; they
//! never change which advance targets are legal.
//!
//! The backtrack path differs on purpose: an override entry for
//! `(persona, stage)` owns the ENTIRE option set for that pair, replacing the
//! default correction targets.

use crate::config::{OptionOverride, OverrideTable};
use crate::graph::{TransitionDirection, Workflow};
use crate::palette::solid_style;
use crate::types::{Persona, Stage};
use indexmap::IndexMap;
use serde::Serialize;

/// A single transition button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOption {
    pub target: Stage,
    pub label: String,
    pub icon: String,
    pub style: String,
    pub autofocus: bool,
    pub direction: TransitionDirection,
}

/// Override entries for one persona/stage pair
fn overrides_at<'a>(
    table: &'a OverrideTable,
    persona: Persona,
    stage: &str,
) -> Option<&'a IndexMap<Stage, OptionOverride>> {
    table.get(&persona).and_then(|stages| stages.get(stage))
}

impl Workflow {
    /// Advance buttons for a ticket in `current`, as seen by `persona`
    ///
    /// One option per forward target, in graph order; a target equal to
    /// `current` is dropped. Empty when the stage has no forward edges.
    #[must_use]
    pub fn advance_options(&self, current: &str, persona: Persona) -> Vec<TransitionOption> {
        let overrides = overrides_at(&self.advance_overrides, persona, current);
        self.forward_targets(current)
            .iter()
            .filter(|target| *target != current)
            .map(|target| {
                let entry = overrides.and_then(|o| o.get(target.as_str()));
                let default_icon = self
                    .glyphs
                    .special
                    .get(target.as_str())
                    .unwrap_or(&self.glyphs.advance);
                self.decorate(target, entry, default_icon, TransitionDirection::Advance)
            })
            .collect()
    }

    /// Backtrack buttons for a ticket in `current`, as seen by `persona`
    ///
    /// A persona override entry for `current` replaces the default list with
    /// its own keys. There is no self-target filter here; validation rejects
    /// a stage listed as its own predecessor.
    #[must_use]
    pub fn backtrack_options(&self, current: &str, persona: Persona) -> Vec<TransitionOption> {
        if let Some(custom) = overrides_at(&self.backtrack_overrides, persona, current) {
            return custom
                .iter()
                .map(|(target, entry)| {
                    self.decorate(
                        target,
                        Some(entry),
                        &self.glyphs.backtrack_override,
                        TransitionDirection::Backtrack,
                    )
                })
                .collect();
        }

        self.backtrack_targets(current)
            .iter()
            .map(|target| {
                self.decorate(target, None, &self.glyphs.backtrack, TransitionDirection::Backtrack)
            })
            .collect()
    }

    /// Whether `target` is offered to `persona` from `current` in either group
    #[must_use]
    pub fn is_offered(&self, current: &str, target: &str, persona: Persona) -> bool {
        self.advance_options(current, persona)
            .iter()
            .chain(self.backtrack_options(current, persona).iter())
            .any(|option| option.target == target)
    }

    fn decorate(
        &self,
        target: &Stage,
        entry: Option<&OptionOverride>,
        default_icon: &str,
        direction: TransitionDirection,
    ) -> TransitionOption {
        let entry = entry.cloned().unwrap_or_default();
        let owner = self.owner_of(target.as_str());
        TransitionOption {
            target: target.clone(),
            label: entry.label.unwrap_or_else(|| target.to_string()),
            icon: entry.icon.unwrap_or_else(|| default_icon.to_string()),
            style: entry
                .style
                .unwrap_or_else(|| solid_style(self.palette.owner_color(owner))),
            autofocus: entry.autofocus.unwrap_or(false),
            direction,
        }
    }
}
