use super::pricing::{normalize_label, DbuType, Tier};

/// DBUs assumed when a compute size label is not recognized.
pub const DEFAULT_COMPUTE_DBUS: f64 = 2.0;

/// Discount applied to the Enterprise DBU rate for materialized views.
const MV_DBU_DISCOUNT: f64 = 0.8;

/// Query engine used by the PB layer. Each profile scales compute, storage
/// and Photon eligibility through a single lookup row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineProfile {
    Sql,
    PySpark,
    MaterializedView,
}

/// Per-engine multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineFactors {
    pub dbu_rate: f64,
    pub storage_multiplier: f64,
    pub performance_factor: f64,
    pub acceleration_allowed: bool,
}

impl EngineProfile {
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "sql" => Some(Self::Sql),
            "pyspark" => Some(Self::PySpark),
            "materialized view (mv)" | "materialized view" | "mv" => Some(Self::MaterializedView),
            _ => None,
        }
    }

    pub fn resolve(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| {
            tracing::warn!(label, fallback = "SQL", "unknown engine profile, using default");
            Self::Sql
        })
    }

    /// Engine an item is filed under. Unknown tags count as SQL without a
    /// warning; pricing reports them once.
    pub fn tagged(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::Sql)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sql => "SQL",
            Self::PySpark => "PySpark",
            Self::MaterializedView => "Materialized View (MV)",
        }
    }

    pub fn all() -> &'static [EngineProfile] {
        &[Self::Sql, Self::PySpark, Self::MaterializedView]
    }

    pub fn factors(&self) -> EngineFactors {
        match self {
            Self::Sql => EngineFactors {
                dbu_rate: DbuType::Enterprise.unit_price(),
                storage_multiplier: 1.0,
                performance_factor: 1.0,
                acceleration_allowed: true,
            },
            // Intermediate results cost storage, heavier clusters cost compute.
            Self::PySpark => EngineFactors {
                dbu_rate: DbuType::Jobs.unit_price(),
                storage_multiplier: 1.2,
                performance_factor: 1.5,
                acceleration_allowed: true,
            },
            // Precomputed results: cheaper queries, twice the storage, no Photon.
            Self::MaterializedView => EngineFactors {
                dbu_rate: DbuType::Enterprise.unit_price() * MV_DBU_DISCOUNT,
                storage_multiplier: 2.0,
                performance_factor: 0.5,
                acceleration_allowed: false,
            },
        }
    }

    /// Compute size choices for dashboards under this engine, with their DBUs.
    pub fn compute_sizes(&self) -> &'static [(&'static str, f64)] {
        match self {
            Self::Sql => &[
                ("Extra Small (1 DBU)", 1.0),
                ("Small (2 DBUs)", 2.0),
                ("Medium (4 DBUs)", 4.0),
                ("Large (8 DBUs)", 8.0),
            ],
            Self::PySpark => &[
                ("Small Cluster (2 DBUs)", 2.0),
                ("Medium Cluster (4 DBUs)", 4.0),
                ("Large Cluster (8 DBUs)", 8.0),
                ("X-Large Cluster (16 DBUs)", 16.0),
            ],
            Self::MaterializedView => &[
                ("Low Usage (1 DBU)", 1.0),
                ("Medium Usage (2 DBUs)", 2.0),
                ("High Usage (4 DBUs)", 4.0),
                ("Very High Usage (8 DBUs)", 8.0),
                ("Low Refresh (1 DBU)", 1.0),
                ("Medium Refresh (2 DBUs)", 2.0),
                ("High Refresh (4 DBUs)", 4.0),
                ("Very High Refresh (8 DBUs)", 8.0),
            ],
        }
    }

    /// Default compute size label for a new dashboard (second choice, as
    /// offered by the form).
    pub fn default_compute_size(&self) -> &'static str {
        self.compute_sizes()[1].0
    }

    /// Default compute size for the layer-wide estimate. MV sizes this
    /// form by refresh load rather than usage.
    pub fn default_aggregate_compute_size(&self) -> &'static str {
        match self {
            Self::MaterializedView => "Medium Refresh (2 DBUs)",
            _ => self.default_compute_size(),
        }
    }

    /// Default DBUs per hour for a new report under this engine.
    pub fn default_report_dbus(&self) -> f64 {
        match self {
            Self::PySpark => 4.0,
            _ => 2.0,
        }
    }

    pub fn find_compute_dbus(&self, size_label: &str) -> Option<f64> {
        let normalized = normalize_label(size_label);
        self.compute_sizes()
            .iter()
            .find(|(label, _)| normalize_label(label) == normalized)
            .map(|(_, dbus)| *dbus)
    }

    /// DBUs for a compute size label; unknown labels get `DEFAULT_COMPUTE_DBUS`.
    pub fn compute_dbus(&self, size_label: &str) -> f64 {
        self.find_compute_dbus(size_label).unwrap_or_else(|| {
            tracing::warn!(
                engine = self.label(),
                label = size_label,
                fallback = DEFAULT_COMPUTE_DBUS,
                "unknown compute size, using default"
            );
            DEFAULT_COMPUTE_DBUS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_rates_follow_dbu_prices() {
        assert!((EngineProfile::Sql.factors().dbu_rate - 0.75).abs() < 1e-12);
        assert!((EngineProfile::PySpark.factors().dbu_rate - 0.15).abs() < 1e-12);
        assert!((EngineProfile::MaterializedView.factors().dbu_rate - 0.6).abs() < 1e-12);
    }

    #[test]
    fn only_mv_disallows_acceleration() {
        assert!(EngineProfile::Sql.factors().acceleration_allowed);
        assert!(EngineProfile::PySpark.factors().acceleration_allowed);
        assert!(!EngineProfile::MaterializedView.factors().acceleration_allowed);
    }

    #[test]
    fn from_label_accepts_form_names() {
        assert_eq!(
            EngineProfile::from_label("Materialized View (MV)"),
            Some(EngineProfile::MaterializedView)
        );
        assert_eq!(EngineProfile::from_label("pyspark"), Some(EngineProfile::PySpark));
        assert_eq!(EngineProfile::resolve("Spark SQL"), EngineProfile::Sql);
    }

    #[test]
    fn compute_dbus_per_engine() {
        assert_eq!(EngineProfile::Sql.compute_dbus("Large (8 DBUs)"), 8.0);
        assert_eq!(EngineProfile::PySpark.compute_dbus("X-Large Cluster (16 DBUs)"), 16.0);
        assert_eq!(EngineProfile::MaterializedView.compute_dbus("High Refresh (4 DBUs)"), 4.0);
        assert_eq!(EngineProfile::MaterializedView.compute_dbus("High Usage (4 DBUs)"), 4.0);
    }

    #[test]
    fn find_compute_dbus_is_strict() {
        assert_eq!(EngineProfile::Sql.find_compute_dbus("medium (4 dbus)"), Some(4.0));
        assert_eq!(EngineProfile::Sql.find_compute_dbus("Small Cluster (2 DBUs)"), None);
    }

    #[test]
    fn compute_dbus_unknown_or_foreign_label_defaults() {
        // A SQL size is not a PySpark size.
        assert_eq!(EngineProfile::PySpark.compute_dbus("Large (8 DBUs)"), DEFAULT_COMPUTE_DBUS);
        assert_eq!(EngineProfile::Sql.compute_dbus("huge"), DEFAULT_COMPUTE_DBUS);
    }

    #[test]
    fn default_sizes_are_second_choice() {
        assert_eq!(EngineProfile::Sql.default_compute_size(), "Small (2 DBUs)");
        assert_eq!(EngineProfile::PySpark.default_compute_size(), "Medium Cluster (4 DBUs)");
        assert_eq!(
            EngineProfile::MaterializedView.default_compute_size(),
            "Medium Usage (2 DBUs)"
        );
        assert_eq!(
            EngineProfile::PySpark.default_aggregate_compute_size(),
            "Medium Cluster (4 DBUs)"
        );
        assert_eq!(
            EngineProfile::MaterializedView.default_aggregate_compute_size(),
            "Medium Refresh (2 DBUs)"
        );
    }
}
