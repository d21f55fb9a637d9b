use serde::{Deserialize, Serialize};

// Categorical selectors are kept as the labels the user wrote; the cost
// engine resolves them (with fallback) when it prices them.

fn default_storage_tier() -> String {
    "Standard".to_string()
}
fn default_retention() -> String {
    "30 days".to_string()
}
fn default_instance_type() -> String {
    "r5.xlarge".to_string()
}
fn default_service_tier() -> String {
    "Databricks Jobs".to_string()
}
fn default_engine() -> String {
    "SQL".to_string()
}
fn default_true() -> bool {
    true
}

/// Something in a session collection that is identified by its name.
pub trait Named {
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

// ── Landing ───────────────────────────────────────────────────────────

/// N uniform landing tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingAggregate {
    pub num_tables: u32,
    pub avg_file_size_gb: f64,
    pub files_per_day: u32,
    /// Compound monthly growth, percent
    pub monthly_growth_pct: f64,
    pub retention: String,
    pub storage_tier: String,
}

impl Default for LandingAggregate {
    fn default() -> Self {
        Self {
            num_tables: 5,
            avg_file_size_gb: 2.0,
            files_per_day: 10,
            monthly_growth_pct: 5.0,
            retention: default_retention(),
            storage_tier: default_storage_tier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingTable {
    pub name: String,
    #[serde(default = "default_file_size")]
    pub avg_file_size_gb: f64,
    #[serde(default = "default_files_per_day")]
    pub files_per_day: u32,
    #[serde(default = "default_retention")]
    pub retention: String,
}

fn default_file_size() -> f64 {
    2.0
}
fn default_files_per_day() -> u32 {
    5
}

/// Layer-wide settings for itemized landing tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingAdvanced {
    pub storage_tier: String,
}

impl Default for LandingAdvanced {
    fn default() -> Self {
        Self {
            storage_tier: default_storage_tier(),
        }
    }
}

// ── RAW ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAggregate {
    pub num_jobs: u32,
    pub num_tables: u32,
    pub avg_runs_per_month: u32,
    pub avg_job_duration_min: f64,
    pub instance_type: String,
    pub photon: bool,
    pub storage_tier: String,
}

impl Default for RawAggregate {
    fn default() -> Self {
        Self {
            num_jobs: 3,
            num_tables: 10,
            avg_runs_per_month: 30,
            avg_job_duration_min: 45.0,
            instance_type: default_instance_type(),
            photon: true,
            storage_tier: default_storage_tier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawJob {
    pub name: String,
    #[serde(default = "default_instance_type")]
    pub instance_type: String,
    #[serde(default = "default_raw_duration")]
    pub avg_duration_min: f64,
    #[serde(default = "default_runs")]
    pub runs_per_month: u32,
    #[serde(default = "default_true")]
    pub photon: bool,
}

fn default_raw_duration() -> f64 {
    30.0
}
fn default_runs() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAdvanced {
    pub estimated_tables: u32,
    pub avg_table_size_gb: f64,
    pub storage_tier: String,
}

impl Default for RawAdvanced {
    fn default() -> Self {
        Self {
            estimated_tables: 10,
            avg_table_size_gb: 50.0,
            storage_tier: default_storage_tier(),
        }
    }
}

// ── CONF ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfAggregate {
    pub num_transforms: u32,
    pub dbu_per_hour: f64,
    pub service_tier: String,
    /// Low, Medium or High
    pub complexity: String,
    pub avg_duration_min: f64,
    pub avg_runs_per_month: u32,
    pub photon: bool,
    pub storage_tier: String,
}

impl Default for ConfAggregate {
    fn default() -> Self {
        Self {
            num_transforms: 4,
            dbu_per_hour: 4.0,
            service_tier: default_service_tier(),
            complexity: "Medium".to_string(),
            avg_duration_min: 60.0,
            avg_runs_per_month: 30,
            photon: true,
            storage_tier: default_storage_tier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfTransform {
    pub name: String,
    #[serde(default = "default_service_tier")]
    pub service_tier: String,
    #[serde(default = "default_conf_duration")]
    pub avg_duration_min: f64,
    #[serde(default = "default_runs")]
    pub runs_per_month: u32,
    #[serde(default = "default_conf_dbus")]
    pub dbu_per_hour: f64,
    #[serde(default = "default_conf_storage")]
    pub storage_gb: f64,
    #[serde(default = "default_true")]
    pub photon: bool,
}

fn default_conf_duration() -> f64 {
    60.0
}
fn default_conf_dbus() -> f64 {
    4.0
}
fn default_conf_storage() -> f64 {
    50.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfAdvanced {
    pub storage_tier: String,
}

impl Default for ConfAdvanced {
    fn default() -> Self {
        Self {
            storage_tier: default_storage_tier(),
        }
    }
}

// ── PB ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PbAggregate {
    pub num_dashboards: u32,
    pub num_reports: u32,
    pub active_users: u32,
    /// Engine-specific size label, e.g. "Small (2 DBUs)". Unset means the
    /// engine's default size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_size: Option<String>,
    pub queries_per_user_per_day: u32,
    pub query_duration_s: f64,
    pub report_runs_per_month: u32,
    pub report_duration_min: f64,
    pub photon: bool,
    pub storage_tier: String,
}

impl Default for PbAggregate {
    fn default() -> Self {
        Self {
            num_dashboards: 5,
            num_reports: 10,
            active_users: 20,
            compute_size: None,
            queries_per_user_per_day: 15,
            query_duration_s: 8.0,
            report_runs_per_month: 8,
            report_duration_min: 45.0,
            photon: true,
            storage_tier: default_storage_tier(),
        }
    }
}

/// An interactive dashboard (or materialized-view access pattern), tagged
/// with the engine it was created under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbDashboard {
    pub name: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_dashboard_size")]
    pub compute_size: String,
    #[serde(default = "default_dashboard_users")]
    pub active_users: u32,
    #[serde(default = "default_dashboard_queries")]
    pub queries_per_user_per_day: u32,
    #[serde(default = "default_dashboard_duration")]
    pub query_duration_s: f64,
    #[serde(default = "default_true")]
    pub photon: bool,
}

fn default_dashboard_size() -> String {
    "Small (2 DBUs)".to_string()
}
fn default_dashboard_users() -> u32 {
    10
}
fn default_dashboard_queries() -> u32 {
    10
}
fn default_dashboard_duration() -> f64 {
    10.0
}

/// A batch report (or MV refresh job), tagged with its engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbReport {
    pub name: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_report_runs")]
    pub runs_per_month: u32,
    #[serde(default = "default_report_duration")]
    pub duration_min: f64,
    #[serde(default = "default_report_dbus")]
    pub dbu_per_hour: f64,
    #[serde(default = "default_true")]
    pub photon: bool,
}

fn default_report_runs() -> u32 {
    4
}
fn default_report_duration() -> f64 {
    30.0
}
fn default_report_dbus() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PbAdvanced {
    /// Storage per dashboard before the engine multiplier
    pub per_dashboard_gb: f64,
    /// Storage per report before the engine multiplier
    pub per_report_gb: f64,
    pub storage_tier: String,
}

impl Default for PbAdvanced {
    fn default() -> Self {
        Self {
            per_dashboard_gb: 20.0,
            per_report_gb: 50.0,
            storage_tier: default_storage_tier(),
        }
    }
}

impl_named!(LandingTable, RawJob, ConfTransform, PbDashboard, PbReport);
