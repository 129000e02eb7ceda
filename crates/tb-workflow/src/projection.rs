//! Persona column projection
//!
//! Each persona groups the flat stage set into a smaller set of named
//! columns. A column's owner is the owner of the FIRST stage it lists; a
//! column spanning several owners is colored by that first stage alone.

use crate::graph::Workflow;
use crate::types::{Persona, Stage};

impl Workflow {
    /// Personas with a column layout, in authoring order
    pub fn personas(&self) -> impl Iterator<Item = Persona> + '_ {
        self.columns.keys().copied()
    }

    /// Columns of `persona` with their stages, in authoring order
    ///
    /// Empty for a persona without a layout.
    pub fn columns_for(&self, persona: Persona) -> impl Iterator<Item = (&str, &[Stage])> {
        self.columns
            .get(&persona)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(name, stages)| (name.as_str(), stages.as_slice())))
    }

    /// Stages rolled into one column (empty if the column does not exist)
    #[must_use]
    pub fn column_stages(&self, persona: Persona, column: &str) -> &[Stage] {
        self.columns
            .get(&persona)
            .and_then(|cols| cols.get(column))
            .map_or(&[], Vec::as_slice)
    }

    /// Owner of a column: the owner of its first listed stage, else `Default`
    #[must_use]
    pub fn column_owner(&self, persona: Persona, column: &str) -> Persona {
        self.column_stages(persona, column)
            .first()
            .map_or(Persona::Default, |first| self.owner_of(first.as_str()))
    }

    /// Column names to display
    ///
    /// With `show_all` every column is returned; otherwise only the lanes
    /// owned by `persona` itself. This is a display filter only.
    #[must_use]
    pub fn visible_columns(&self, persona: Persona, show_all: bool) -> Vec<&str> {
        self.columns_for(persona)
            .map(|(name, _)| name)
            .filter(|name| show_all || self.column_owner(persona, name) == persona)
            .collect()
    }

    /// Columns of `persona` that list `stage`
    #[must_use]
    pub fn columns_containing(&self, persona: Persona, stage: &str) -> Vec<&str> {
        self.columns_for(persona)
            .filter(|(_, stages)| stages.iter().any(|s| s == stage))
            .map(|(name, _)| name)
            .collect()
    }
}
