pub mod conf;
pub mod engine;
pub mod formulas;
pub mod landing;
pub mod pb;
pub mod pricing;
pub mod raw;
pub mod retention;
pub mod summary;

use crate::core::models::cost::LayerCost;
use crate::core::models::usage::{
    ConfAdvanced, ConfAggregate, ConfTransform, LandingAdvanced, LandingAggregate, LandingTable,
    PbAdvanced, PbAggregate, PbDashboard, PbReport, RawAdvanced, RawAggregate, RawJob,
};
use crate::core::session::ValidationError;

use engine::EngineProfile;

/// Compute and Photon cost of one priced workload item. The surcharge is
/// always derived from this item's own compute.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemCost {
    pub compute: f64,
    pub acceleration: f64,
}

impl std::iter::Sum for ItemCost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, item| Self {
            compute: acc.compute + item.compute,
            acceleration: acc.acceleration + item.acceleration,
        })
    }
}

/// Input for one layer: either one aggregate record, or layer-wide
/// parameters plus the itemized records.
#[derive(Debug)]
pub enum Usage<'a, A, P, I> {
    Simple(&'a A),
    Advanced { params: &'a P, items: &'a [I] },
}

pub type LandingUsage<'a> = Usage<'a, LandingAggregate, LandingAdvanced, LandingTable>;
pub type RawUsage<'a> = Usage<'a, RawAggregate, RawAdvanced, RawJob>;
pub type ConfUsage<'a> = Usage<'a, ConfAggregate, ConfAdvanced, ConfTransform>;

/// PB carries two item collections, so it gets its own shape.
#[derive(Debug)]
pub enum PbUsage<'a> {
    Simple(&'a PbAggregate),
    Advanced {
        params: &'a PbAdvanced,
        dashboards: &'a [PbDashboard],
        reports: &'a [PbReport],
    },
}

#[derive(Debug)]
pub enum LayerInput<'a> {
    Landing(LandingUsage<'a>),
    Raw(RawUsage<'a>),
    Conf(ConfUsage<'a>),
    Pb {
        engine: EngineProfile,
        usage: PbUsage<'a>,
    },
}

/// Price one layer. Only advanced-mode item names can fail validation.
pub fn compute_layer_cost(input: LayerInput<'_>) -> Result<LayerCost, ValidationError> {
    let cost = match input {
        LayerInput::Landing(usage) => landing::compute(usage)?,
        LayerInput::Raw(usage) => raw::compute(usage)?,
        LayerInput::Conf(usage) => conf::compute(usage)?,
        LayerInput::Pb { engine, usage } => pb::compute(engine, usage)?,
    };
    tracing::debug!(
        layer = cost.layer.id(),
        storage = cost.storage_cost,
        compute = cost.compute_cost,
        acceleration = cost.acceleration_cost,
        total = cost.total_cost,
        "layer cost computed"
    );
    Ok(cost)
}
