use serde::{Deserialize, Serialize};

/// One of the four pipeline stages. Ordering is pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Landing,
    Raw,
    Conf,
    Pb,
}

impl Layer {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "landing" => Some(Self::Landing),
            "raw" => Some(Self::Raw),
            "conf" => Some(Self::Conf),
            "pb" => Some(Self::Pb),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Raw => "raw",
            Self::Conf => "conf",
            Self::Pb => "pb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Landing => "Landing",
            Self::Raw => "RAW",
            Self::Conf => "CONF",
            Self::Pb => "PB",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Landing => "inbound files, storage only",
            Self::Raw => "ingestion jobs on EC2 instances",
            Self::Conf => "transformations billed in DBUs",
            Self::Pb => "dashboards and reports per engine",
        }
    }

    pub fn all() -> &'static [Layer] {
        &[Self::Landing, Self::Raw, Self::Conf, Self::Pb]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Tables,
    Jobs,
    Transforms,
    Dashboards,
    Reports,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tables => write!(f, "Tables"),
            Self::Jobs => write!(f, "Jobs"),
            Self::Transforms => write!(f, "Transforms"),
            Self::Dashboards => write!(f, "Dashboards"),
            Self::Reports => write!(f, "Reports"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceTally {
    pub kind: ResourceKind,
    pub count: u32,
}

/// Monthly cost of one layer. Always rebuilt, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerCost {
    pub layer: Layer,
    pub storage_cost: f64,
    pub compute_cost: f64,
    /// Photon surcharge
    pub acceleration_cost: f64,
    pub total_cost: f64,
    pub storage_gb: f64,
    pub resource_count: u32,
    pub resources: Vec<ResourceTally>,
    pub acceleration_enabled: bool,
}

impl LayerCost {
    /// Assemble a layer cost, deriving the total and resource count.
    pub fn new(
        layer: Layer,
        storage_cost: f64,
        compute_cost: f64,
        acceleration_cost: f64,
        storage_gb: f64,
        resources: Vec<ResourceTally>,
        acceleration_enabled: bool,
    ) -> Self {
        let resource_count = resources.iter().map(|r| r.count).sum();
        Self {
            layer,
            storage_cost,
            compute_cost,
            acceleration_cost,
            total_cost: storage_cost + compute_cost + acceleration_cost,
            storage_gb,
            resource_count,
            resources,
            acceleration_enabled,
        }
    }

    /// "5 Dashboards / 10 Reports"
    pub fn resources_label(&self) -> String {
        self.resources
            .iter()
            .map(|r| format!("{} {}", r.count, r.kind))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// One row of the layer breakdown table. `layer` is None for the total row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub layer: Option<Layer>,
    pub storage_cost: Option<f64>,
    pub compute_cost: Option<f64>,
    pub acceleration_cost: Option<f64>,
    pub total_cost: f64,
    pub storage_gb: Option<f64>,
    pub resources: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Configured layers in pipeline order
    pub layers: Vec<LayerCost>,
    pub total_cost: f64,
    pub acceleration_cost: f64,
    pub acceleration_used: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_ids_round_trip() {
        for layer in Layer::all() {
            assert_eq!(Layer::from_id(layer.id()), Some(*layer));
        }
        assert_eq!(Layer::from_id("RAW"), Some(Layer::Raw));
        assert_eq!(Layer::from_id("gold"), None);
    }

    #[test]
    fn layers_order_by_pipeline_stage() {
        assert!(Layer::Landing < Layer::Raw);
        assert!(Layer::Raw < Layer::Conf);
        assert!(Layer::Conf < Layer::Pb);
    }

    #[test]
    fn new_derives_total_and_count() {
        let cost = LayerCost::new(
            Layer::Pb,
            10.0,
            20.0,
            4.0,
            350.0,
            vec![
                ResourceTally { kind: ResourceKind::Dashboards, count: 5 },
                ResourceTally { kind: ResourceKind::Reports, count: 10 },
            ],
            true,
        );
        assert!((cost.total_cost - 34.0).abs() < 1e-12);
        assert_eq!(cost.resource_count, 15);
        assert_eq!(cost.resources_label(), "5 Dashboards / 10 Reports");
    }
}
