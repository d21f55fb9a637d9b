use thiserror::Error;

use crate::core::cost::engine::EngineProfile;
use crate::core::models::usage::{
    ConfTransform, LandingTable, Named, PbDashboard, PbReport, RawJob,
};

/// The kind of line item a session collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    LandingTable,
    RawJob,
    ConfTransform,
    PbDashboard,
    PbReport,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LandingTable => write!(f, "landing table"),
            Self::RawJob => write!(f, "RAW job"),
            Self::ConfTransform => write!(f, "CONF transformation"),
            Self::PbDashboard => write!(f, "PB dashboard"),
            Self::PbReport => write!(f, "PB report"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: ItemKind },
    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: ItemKind, name: String },
}

/// Check that every item has a non-empty name that no earlier item uses.
pub fn validate_names<T: Named>(items: &[T], kind: ItemKind) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        let name = item.name().trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName { kind });
        }
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn push_unique<T: Named>(items: &mut Vec<T>, item: T, kind: ItemKind) -> Result<(), ValidationError> {
    let name = item.name().trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName { kind });
    }
    if items.iter().any(|existing| existing.name().trim() == name) {
        return Err(ValidationError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    items.push(item);
    Ok(())
}

/// Advanced-mode line items for one user's estimate.
///
/// Owned by the caller and handed to the aggregators by reference. A
/// rejected add leaves the store exactly as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    landing_tables: Vec<LandingTable>,
    raw_jobs: Vec<RawJob>,
    conf_transforms: Vec<ConfTransform>,
    pb_dashboards: Vec<PbDashboard>,
    pb_reports: Vec<PbReport>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_landing_table(&mut self, table: LandingTable) -> Result<(), ValidationError> {
        push_unique(&mut self.landing_tables, table, ItemKind::LandingTable)
    }

    pub fn add_raw_job(&mut self, job: RawJob) -> Result<(), ValidationError> {
        push_unique(&mut self.raw_jobs, job, ItemKind::RawJob)
    }

    pub fn add_conf_transform(&mut self, transform: ConfTransform) -> Result<(), ValidationError> {
        push_unique(&mut self.conf_transforms, transform, ItemKind::ConfTransform)
    }

    /// Dashboard names are unique across all engines.
    pub fn add_pb_dashboard(&mut self, dashboard: PbDashboard) -> Result<(), ValidationError> {
        push_unique(&mut self.pb_dashboards, dashboard, ItemKind::PbDashboard)
    }

    pub fn add_pb_report(&mut self, report: PbReport) -> Result<(), ValidationError> {
        push_unique(&mut self.pb_reports, report, ItemKind::PbReport)
    }

    pub fn clear_landing_tables(&mut self) -> usize {
        std::mem::take(&mut self.landing_tables).len()
    }

    pub fn clear_raw_jobs(&mut self) -> usize {
        std::mem::take(&mut self.raw_jobs).len()
    }

    pub fn clear_conf_transforms(&mut self) -> usize {
        std::mem::take(&mut self.conf_transforms).len()
    }

    /// Remove only the dashboards tagged with `engine`; returns how many.
    pub fn clear_pb_dashboards(&mut self, engine: EngineProfile) -> usize {
        let before = self.pb_dashboards.len();
        self.pb_dashboards
            .retain(|d| EngineProfile::tagged(&d.engine) != engine);
        before - self.pb_dashboards.len()
    }

    /// Remove only the reports tagged with `engine`; returns how many.
    pub fn clear_pb_reports(&mut self, engine: EngineProfile) -> usize {
        let before = self.pb_reports.len();
        self.pb_reports
            .retain(|r| EngineProfile::tagged(&r.engine) != engine);
        before - self.pb_reports.len()
    }

    pub fn landing_tables(&self) -> &[LandingTable] {
        &self.landing_tables
    }

    pub fn raw_jobs(&self) -> &[RawJob] {
        &self.raw_jobs
    }

    pub fn conf_transforms(&self) -> &[ConfTransform] {
        &self.conf_transforms
    }

    /// All dashboards, every engine.
    pub fn pb_dashboards(&self) -> &[PbDashboard] {
        &self.pb_dashboards
    }

    /// All reports, every engine.
    pub fn pb_reports(&self) -> &[PbReport] {
        &self.pb_reports
    }

    pub fn has_pb_items_for(&self, engine: EngineProfile) -> bool {
        self.pb_dashboards
            .iter()
            .any(|d| EngineProfile::tagged(&d.engine) == engine)
            || self
                .pb_reports
                .iter()
                .any(|r| EngineProfile::tagged(&r.engine) == engine)
    }
}
