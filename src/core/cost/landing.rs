use super::formulas::{storage_cost, DAYS_PER_MONTH};
use super::pricing::{StorageTier, Tier};
use super::retention::retention_to_months;
use super::{LandingUsage, Usage};
use crate::core::models::cost::{Layer, LayerCost, ResourceKind, ResourceTally};
use crate::core::models::usage::{LandingAggregate, LandingTable};
use crate::core::session::{validate_names, ItemKind, ValidationError};

/// Storage-only cost of inbound data.
///
/// Growth compounds only in simple mode; itemized tables are priced at their
/// stated volume times retention with no growth factor.
pub fn compute(usage: LandingUsage<'_>) -> Result<LayerCost, ValidationError> {
    match usage {
        Usage::Simple(agg) => Ok(compute_simple(agg)),
        Usage::Advanced { params, items } => {
            validate_names(items, ItemKind::LandingTable)?;
            Ok(compute_advanced(items, &params.storage_tier))
        }
    }
}

fn compute_simple(agg: &LandingAggregate) -> LayerCost {
    let total_files = agg.files_per_day as f64 * DAYS_PER_MONTH;
    let base_gb = total_files * agg.avg_file_size_gb * agg.num_tables as f64;
    let retention_months = retention_to_months(&agg.retention);
    let growth = 1.0 + agg.monthly_growth_pct / 100.0;
    let projected_gb = base_gb * growth.powf(retention_months);

    let price = StorageTier::resolve(&agg.storage_tier).unit_price();
    let storage = storage_cost(projected_gb, price, 1.0);

    LayerCost::new(
        Layer::Landing,
        storage,
        0.0,
        0.0,
        projected_gb,
        vec![ResourceTally {
            kind: ResourceKind::Tables,
            count: agg.num_tables,
        }],
        false,
    )
}

/// Monthly volume of one itemized table, before retention.
pub fn table_gb(table: &LandingTable) -> f64 {
    table.files_per_day as f64 * DAYS_PER_MONTH * table.avg_file_size_gb
}

fn compute_advanced(tables: &[LandingTable], storage_tier: &str) -> LayerCost {
    let total_gb: f64 = tables
        .iter()
        .map(|t| table_gb(t) * retention_to_months(&t.retention))
        .sum();

    let price = StorageTier::resolve(storage_tier).unit_price();
    let storage = storage_cost(total_gb, price, 1.0);

    LayerCost::new(
        Layer::Landing,
        storage,
        0.0,
        0.0,
        total_gb,
        vec![ResourceTally {
            kind: ResourceKind::Tables,
            count: tables.len() as u32,
        }],
        false,
    )
}
