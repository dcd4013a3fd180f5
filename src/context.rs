// src/context.rs

use crate::{
    config::DashboardSettings,
    data::{Boundaries, NameTable},
};

/// Everything loaded at startup. Built once, then shared read-only by the
/// layout builder and every chart update.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    table: NameTable,
    boundaries: Boundaries,
    settings: DashboardSettings,
}

impl DashboardContext {
    pub fn new(table: NameTable, boundaries: Boundaries, settings: DashboardSettings) -> Self {
        Self {
            table,
            boundaries,
            settings,
        }
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }
}
