use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::config_dir;
use crate::core::cost::engine::EngineProfile;
use crate::core::cost::pricing::{Complexity, DbuType, InstanceType, StorageTier, Tier};
use crate::core::cost::retention::{Retention, RETENTION_LABELS};
use crate::core::cost::summary::compute_summary;
use crate::core::cost::{compute_layer_cost, LayerInput, PbUsage, Usage};
use crate::core::models::cost::{CostSummary, Layer};
use crate::core::models::usage::{
    ConfAdvanced, ConfAggregate, ConfTransform, LandingAdvanced, LandingAggregate, LandingTable,
    PbAdvanced, PbAggregate, PbDashboard, PbReport, RawAdvanced, RawAggregate, RawJob,
};
use crate::core::session::{Session, ValidationError};

#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("No workload file at {0}")]
    NotFound(PathBuf),
    #[error("Failed to read workload: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse workload: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize workload: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid workload: {0}")]
    Invalid(#[from] ValidationError),
}

/// `$XDG_CONFIG_HOME/lakecost/workload.toml`
pub fn default_path() -> PathBuf {
    config_dir().join("workload.toml")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Simple,
    Advanced,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingSection {
    pub mode: Mode,
    pub simple: LandingAggregate,
    pub advanced: LandingAdvanced,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<LandingTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSection {
    pub mode: Mode,
    pub simple: RawAggregate,
    pub advanced: RawAdvanced,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<RawJob>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfSection {
    pub mode: Mode,
    pub simple: ConfAggregate,
    pub advanced: ConfAdvanced,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<ConfTransform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PbSection {
    /// Engine profile the layer is priced under
    pub engine: String,
    pub mode: Mode,
    pub simple: PbAggregate,
    pub advanced: PbAdvanced,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dashboards: Vec<PbDashboard>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<PbReport>,
}

impl Default for PbSection {
    fn default() -> Self {
        Self {
            engine: EngineProfile::Sql.label().to_string(),
            mode: Mode::default(),
            simple: PbAggregate::default(),
            advanced: PbAdvanced::default(),
            dashboards: Vec::new(),
            reports: Vec::new(),
        }
    }
}

impl PbSection {
    pub fn engine(&self) -> EngineProfile {
        EngineProfile::resolve(&self.engine)
    }
}

/// On-disk shape of a workload. A missing section means the layer is not
/// part of the estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing: Option<LandingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<ConfSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pb: Option<PbSection>,
}

impl WorkloadFile {
    /// Simple-mode sections with default inputs for each requested layer.
    pub fn template(layers: &[Layer]) -> Self {
        let mut file = Self::default();
        for layer in layers {
            match layer {
                Layer::Landing => file.landing = Some(LandingSection::default()),
                Layer::Raw => file.raw = Some(RawSection::default()),
                Layer::Conf => file.conf = Some(ConfSection::default()),
                Layer::Pb => file.pb = Some(PbSection::default()),
            }
        }
        file
    }

    pub fn has_section(&self, layer: Layer) -> bool {
        match layer {
            Layer::Landing => self.landing.is_some(),
            Layer::Raw => self.raw.is_some(),
            Layer::Conf => self.conf.is_some(),
            Layer::Pb => self.pb.is_some(),
        }
    }
}

/// A loaded workload: layer sections plus a session holding every line item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
    sections: WorkloadFile,
    session: Session,
}

impl Workload {
    /// Move every item into a fresh session, so duplicate or empty names in
    /// the file surface as a `ValidationError`.
    pub fn from_file(mut file: WorkloadFile) -> Result<Self, ValidationError> {
        let mut session = Session::new();
        if let Some(section) = file.landing.as_mut() {
            for table in std::mem::take(&mut section.tables) {
                session.add_landing_table(table)?;
            }
        }
        if let Some(section) = file.raw.as_mut() {
            for job in std::mem::take(&mut section.jobs) {
                session.add_raw_job(job)?;
            }
        }
        if let Some(section) = file.conf.as_mut() {
            for transform in std::mem::take(&mut section.transforms) {
                session.add_conf_transform(transform)?;
            }
        }
        if let Some(section) = file.pb.as_mut() {
            for dashboard in std::mem::take(&mut section.dashboards) {
                session.add_pb_dashboard(dashboard)?;
            }
            for report in std::mem::take(&mut section.reports) {
                session.add_pb_report(report)?;
            }
        }
        Ok(Self {
            sections: file,
            session,
        })
    }

    /// Rebuild the on-disk shape. A layer that only has items gets a
    /// default section so nothing is dropped.
    pub fn to_file(&self) -> WorkloadFile {
        let mut file = self.sections.clone();
        let s = &self.session;
        if !s.landing_tables().is_empty() {
            file.landing.get_or_insert_with(Default::default).tables = s.landing_tables().to_vec();
        }
        if !s.raw_jobs().is_empty() {
            file.raw.get_or_insert_with(Default::default).jobs = s.raw_jobs().to_vec();
        }
        if !s.conf_transforms().is_empty() {
            file.conf.get_or_insert_with(Default::default).transforms = s.conf_transforms().to_vec();
        }
        if !s.pb_dashboards().is_empty() || !s.pb_reports().is_empty() {
            let pb = file.pb.get_or_insert_with(Default::default);
            pb.dashboards = s.pb_dashboards().to_vec();
            pb.reports = s.pb_reports().to_vec();
        }
        file
    }

    pub fn parse(content: &str) -> Result<Self, WorkloadError> {
        let file: WorkloadFile = toml::from_str(content)?;
        Ok(Self::from_file(file)?)
    }

    pub fn load(path: &Path) -> Result<Self, WorkloadError> {
        if !path.exists() {
            return Err(WorkloadError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let workload = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "workload loaded");
        Ok(workload)
    }

    pub fn to_toml(&self) -> Result<String, WorkloadError> {
        Ok(toml::to_string_pretty(&self.to_file())?)
    }

    pub fn save(&self, path: &Path) -> Result<(), WorkloadError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn sections(&self) -> &WorkloadFile {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut WorkloadFile {
        &mut self.sections
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Active PB engine; SQL when there is no PB section.
    pub fn pb_engine(&self) -> EngineProfile {
        self.sections
            .pb
            .as_ref()
            .map(PbSection::engine)
            .unwrap_or(EngineProfile::Sql)
    }

    /// Aggregator input for `layer`, or None when the layer is not
    /// configured: no section, or advanced mode with nothing to price.
    pub fn layer_input(&self, layer: Layer) -> Option<LayerInput<'_>> {
        let s = &self.session;
        match layer {
            Layer::Landing => {
                let section = self.sections.landing.as_ref()?;
                let usage = match section.mode {
                    Mode::Simple => Usage::Simple(&section.simple),
                    Mode::Advanced if s.landing_tables().is_empty() => return None,
                    Mode::Advanced => Usage::Advanced {
                        params: &section.advanced,
                        items: s.landing_tables(),
                    },
                };
                Some(LayerInput::Landing(usage))
            }
            Layer::Raw => {
                let section = self.sections.raw.as_ref()?;
                let usage = match section.mode {
                    Mode::Simple => Usage::Simple(&section.simple),
                    Mode::Advanced if s.raw_jobs().is_empty() => return None,
                    Mode::Advanced => Usage::Advanced {
                        params: &section.advanced,
                        items: s.raw_jobs(),
                    },
                };
                Some(LayerInput::Raw(usage))
            }
            Layer::Conf => {
                let section = self.sections.conf.as_ref()?;
                let usage = match section.mode {
                    Mode::Simple => Usage::Simple(&section.simple),
                    Mode::Advanced if s.conf_transforms().is_empty() => return None,
                    Mode::Advanced => Usage::Advanced {
                        params: &section.advanced,
                        items: s.conf_transforms(),
                    },
                };
                Some(LayerInput::Conf(usage))
            }
            Layer::Pb => {
                let section = self.sections.pb.as_ref()?;
                let engine = section.engine();
                let usage = match section.mode {
                    Mode::Simple => PbUsage::Simple(&section.simple),
                    Mode::Advanced if !s.has_pb_items_for(engine) => return None,
                    Mode::Advanced => PbUsage::Advanced {
                        params: &section.advanced,
                        dashboards: s.pb_dashboards(),
                        reports: s.pb_reports(),
                    },
                };
                Some(LayerInput::Pb { engine, usage })
            }
        }
    }

    pub fn configured_layers(&self) -> Vec<Layer> {
        Layer::all()
            .iter()
            .copied()
            .filter(|layer| self.layer_input(*layer).is_some())
            .collect()
    }

    /// Price every configured layer, or just `only` when given.
    pub fn estimate(&self, only: Option<Layer>) -> Result<CostSummary, ValidationError> {
        let mut layers = BTreeMap::new();
        for layer in Layer::all() {
            if only.is_some_and(|o| o != *layer) {
                continue;
            }
            if let Some(input) = self.layer_input(*layer) {
                layers.insert(*layer, compute_layer_cost(input)?);
            }
        }
        Ok(compute_summary(&layers))
    }

    /// Labels that will be priced through a fallback, and layers that will
    /// be skipped. Nothing here is fatal.
    pub fn check(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let s = &self.session;

        if let Some(section) = &self.sections.landing {
            check_tier::<StorageTier>(&mut issues, "landing.simple", &section.simple.storage_tier);
            check_retention(&mut issues, "landing.simple", &section.simple.retention);
            check_tier::<StorageTier>(&mut issues, "landing.advanced", &section.advanced.storage_tier);
            for t in s.landing_tables() {
                check_retention(&mut issues, &format!("landing table '{}'", t.name), &t.retention);
            }
        }
        if let Some(section) = &self.sections.raw {
            check_tier::<InstanceType>(&mut issues, "raw.simple", &section.simple.instance_type);
            check_tier::<StorageTier>(&mut issues, "raw.simple", &section.simple.storage_tier);
            check_tier::<StorageTier>(&mut issues, "raw.advanced", &section.advanced.storage_tier);
            for j in s.raw_jobs() {
                check_tier::<InstanceType>(&mut issues, &format!("RAW job '{}'", j.name), &j.instance_type);
            }
        }
        if let Some(section) = &self.sections.conf {
            check_tier::<DbuType>(&mut issues, "conf.simple", &section.simple.service_tier);
            check_tier::<StorageTier>(&mut issues, "conf.simple", &section.simple.storage_tier);
            if Complexity::from_label(&section.simple.complexity).is_none() {
                issues.push(format!(
                    "conf.simple: unknown complexity '{}' (using {})",
                    section.simple.complexity,
                    Complexity::Medium.label()
                ));
            }
            check_tier::<StorageTier>(&mut issues, "conf.advanced", &section.advanced.storage_tier);
            for t in s.conf_transforms() {
                check_tier::<DbuType>(&mut issues, &format!("CONF transformation '{}'", t.name), &t.service_tier);
            }
        }
        if let Some(section) = &self.sections.pb {
            check_engine(&mut issues, "pb", &section.engine);
            let engine = section.engine();
            if let Some(size) = &section.simple.compute_size {
                if engine.find_compute_dbus(size).is_none() {
                    issues.push(format!(
                        "pb.simple: unknown {} compute size '{}' (using 2 DBUs)",
                        engine.label(),
                        size
                    ));
                }
            }
            check_tier::<StorageTier>(&mut issues, "pb.simple", &section.simple.storage_tier);
            check_tier::<StorageTier>(&mut issues, "pb.advanced", &section.advanced.storage_tier);
            for d in s.pb_dashboards() {
                let owner = format!("PB dashboard '{}'", d.name);
                check_engine(&mut issues, &owner, &d.engine);
                let item_engine = EngineProfile::tagged(&d.engine);
                if item_engine.find_compute_dbus(&d.compute_size).is_none() {
                    issues.push(format!(
                        "{}: unknown {} compute size '{}' (using 2 DBUs)",
                        owner,
                        item_engine.label(),
                        d.compute_size
                    ));
                }
            }
            for r in s.pb_reports() {
                check_engine(&mut issues, &format!("PB report '{}'", r.name), &r.engine);
            }
        }

        for layer in Layer::all() {
            if self.sections.has_section(*layer) && self.layer_input(*layer).is_none() {
                issues.push(format!(
                    "{}: advanced mode with no items, layer will be skipped",
                    layer.display_name()
                ));
            }
        }
        issues
    }
}

fn check_tier<T: Tier>(issues: &mut Vec<String>, owner: &str, label: &str) {
    if T::from_label(label).is_none() {
        issues.push(format!(
            "{}: unknown {} '{}' (using {})",
            owner,
            T::KIND,
            label,
            T::fallback().label()
        ));
    }
}

fn check_retention(issues: &mut Vec<String>, owner: &str, label: &str) {
    if Retention::parse(label).is_none() {
        issues.push(format!(
            "{}: unknown retention '{}' (using 1 month; expected one of: {})",
            owner,
            label,
            RETENTION_LABELS.join(", ")
        ));
    }
}

fn check_engine(issues: &mut Vec<String>, owner: &str, label: &str) {
    if EngineProfile::from_label(label).is_none() {
        let known: Vec<&str> = EngineProfile::all().iter().map(|e| e.label()).collect();
        issues.push(format!(
            "{}: unknown engine '{}' (using SQL; expected one of: {})",
            owner,
            label,
            known.join(", ")
        ));
    }
}
