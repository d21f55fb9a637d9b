use super::formulas::{dbu_compute_cost, photon_cost, storage_cost, DAYS_PER_MONTH};
use super::pricing::{Complexity, DbuType, StorageTier, Tier};
use super::{ConfUsage, ItemCost, Usage};
use crate::core::models::cost::{Layer, LayerCost, ResourceKind, ResourceTally};
use crate::core::models::usage::{ConfAggregate, ConfTransform};
use crate::core::session::{validate_names, ItemKind, ValidationError};

/// Storage per transformation before the complexity factor.
pub const GB_PER_TRANSFORM: f64 = 50.0;

fn dbu_cost(service_tier: &str, monthly_hours: f64, dbu_per_hour: f64) -> f64 {
    let rate = DbuType::resolve(service_tier).unit_price();
    dbu_compute_cost(
        rate,
        1.0,
        monthly_hours / DAYS_PER_MONTH,
        DAYS_PER_MONTH,
        dbu_per_hour,
    )
}

pub fn transform_cost(transform: &ConfTransform) -> ItemCost {
    let hours = (transform.avg_duration_min / 60.0) * transform.runs_per_month as f64;
    let compute = dbu_cost(&transform.service_tier, hours, transform.dbu_per_hour);
    ItemCost {
        compute,
        acceleration: photon_cost(compute, transform.photon),
    }
}

pub fn compute(usage: ConfUsage<'_>) -> Result<LayerCost, ValidationError> {
    match usage {
        Usage::Simple(agg) => Ok(compute_simple(agg)),
        Usage::Advanced { params, items } => {
            validate_names(items, ItemKind::ConfTransform)?;
            Ok(compute_advanced(items, &params.storage_tier))
        }
    }
}

fn compute_simple(agg: &ConfAggregate) -> LayerCost {
    let hours =
        (agg.avg_duration_min / 60.0) * agg.num_transforms as f64 * agg.avg_runs_per_month as f64;
    let compute = dbu_cost(&agg.service_tier, hours, agg.dbu_per_hour);
    let acceleration = photon_cost(compute, agg.photon);

    let factor = Complexity::resolve(&agg.complexity).storage_factor();
    let storage_gb = agg.num_transforms as f64 * GB_PER_TRANSFORM * factor;
    let storage = storage_cost(
        storage_gb,
        StorageTier::resolve(&agg.storage_tier).unit_price(),
        1.0,
    );

    LayerCost::new(
        Layer::Conf,
        storage,
        compute,
        acceleration,
        storage_gb,
        vec![ResourceTally {
            kind: ResourceKind::Transforms,
            count: agg.num_transforms,
        }],
        agg.photon,
    )
}

fn compute_advanced(transforms: &[ConfTransform], storage_tier: &str) -> LayerCost {
    let totals: ItemCost = transforms.iter().map(transform_cost).sum();
    let storage_gb: f64 = transforms.iter().map(|t| t.storage_gb).sum();
    let storage = storage_cost(
        storage_gb,
        StorageTier::resolve(storage_tier).unit_price(),
        1.0,
    );

    LayerCost::new(
        Layer::Conf,
        storage,
        totals.compute,
        totals.acceleration,
        storage_gb,
        vec![ResourceTally {
            kind: ResourceKind::Transforms,
            count: transforms.len() as u32,
        }],
        transforms.iter().any(|t| t.photon),
    )
}
