use super::formulas::{instance_compute_cost, photon_cost, storage_cost, DAYS_PER_MONTH};
use super::pricing::{InstanceType, StorageTier, Tier};
use super::{ItemCost, RawUsage, Usage};
use crate::core::models::cost::{Layer, LayerCost, ResourceKind, ResourceTally};
use crate::core::models::usage::{RawAggregate, RawJob};
use crate::core::session::{validate_names, ItemKind, ValidationError};

/// Storage assumed per RAW table in simple mode.
pub const GB_PER_RAW_TABLE: f64 = 50.0;

/// Monthly instance cost for `monthly_hours` spread evenly over the month.
fn instance_cost(instance_type: &str, monthly_hours: f64) -> f64 {
    let rate = InstanceType::resolve(instance_type).unit_price();
    instance_compute_cost(rate, 1.0, monthly_hours / DAYS_PER_MONTH, DAYS_PER_MONTH)
}

pub fn job_cost(job: &RawJob) -> ItemCost {
    let hours = (job.avg_duration_min / 60.0) * job.runs_per_month as f64;
    let compute = instance_cost(&job.instance_type, hours);
    ItemCost {
        compute,
        acceleration: photon_cost(compute, job.photon),
    }
}

pub fn compute(usage: RawUsage<'_>) -> Result<LayerCost, ValidationError> {
    match usage {
        Usage::Simple(agg) => Ok(compute_simple(agg)),
        Usage::Advanced { params, items } => {
            validate_names(items, ItemKind::RawJob)?;
            let storage_gb = params.estimated_tables as f64 * params.avg_table_size_gb;
            Ok(compute_advanced(items, storage_gb, &params.storage_tier))
        }
    }
}

fn compute_simple(agg: &RawAggregate) -> LayerCost {
    let hours =
        (agg.avg_job_duration_min / 60.0) * agg.num_jobs as f64 * agg.avg_runs_per_month as f64;
    let compute = instance_cost(&agg.instance_type, hours);
    let acceleration = photon_cost(compute, agg.photon);

    let storage_gb = agg.num_tables as f64 * GB_PER_RAW_TABLE;
    let storage = storage_cost(
        storage_gb,
        StorageTier::resolve(&agg.storage_tier).unit_price(),
        1.0,
    );

    LayerCost::new(
        Layer::Raw,
        storage,
        compute,
        acceleration,
        storage_gb,
        vec![ResourceTally {
            kind: ResourceKind::Jobs,
            count: agg.num_jobs,
        }],
        agg.photon,
    )
}

fn compute_advanced(jobs: &[RawJob], storage_gb: f64, storage_tier: &str) -> LayerCost {
    let totals: ItemCost = jobs.iter().map(job_cost).sum();

    let storage = storage_cost(
        storage_gb,
        StorageTier::resolve(storage_tier).unit_price(),
        1.0,
    );

    LayerCost::new(
        Layer::Raw,
        storage,
        totals.compute,
        totals.acceleration,
        storage_gb,
        vec![ResourceTally {
            kind: ResourceKind::Jobs,
            count: jobs.len() as u32,
        }],
        jobs.iter().any(|j| j.photon),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::usage::RawAdvanced;

    fn job(name: &str, instance: &str, duration: f64, runs: u32, photon: bool) -> RawJob {
        RawJob {
            name: name.to_string(),
            instance_type: instance.to_string(),
            avg_duration_min: duration,
            runs_per_month: runs,
            photon,
        }
    }

    #[test]
    fn simple_mode_scenario() {
        let agg = RawAggregate {
            num_jobs: 3,
            num_tables: 10,
            avg_runs_per_month: 30,
            avg_job_duration_min: 45.0,
            instance_type: "r5.xlarge".to_string(),
            photon: true,
            storage_tier: "Standard".to_string(),
        };
        let cost = compute(Usage::Simple(&agg)).unwrap();
        assert!((cost.compute_cost - 17.01).abs() < 1e-9);
        assert!((cost.acceleration_cost - 3.402).abs() < 1e-9);
        // 10 tables * 50 GB at 0.023
        assert!((cost.storage_gb - 500.0).abs() < 1e-9);
        assert!((cost.storage_cost - 11.5).abs() < 1e-9);
        assert!((cost.total_cost - (17.01 + 3.402 + 11.5)).abs() < 1e-9);
        assert_eq!(cost.resource_count, 3);
        assert!(cost.acceleration_enabled);
    }

    #[test]
    fn simple_mode_without_photon() {
        let agg = RawAggregate {
            photon: false,
            ..RawAggregate::default()
        };
        let cost = compute(Usage::Simple(&agg)).unwrap();
        assert_eq!(cost.acceleration_cost, 0.0);
        assert!(!cost.acceleration_enabled);
    }

    #[test]
    fn job_cost_uses_its_own_instance() {
        // 60 min * 30 runs = 30 h at i3.2xlarge
        let c = job_cost(&job("big", "i3.2xlarge", 60.0, 30, false));
        assert!((c.compute - 18.72).abs() < 1e-9);
        assert_eq!(c.acceleration, 0.0);
    }

    #[test]
    fn advanced_mode_is_additive() {
        let params = RawAdvanced::default();
        let a = job("a", "r5.xlarge", 30.0, 30, true);
        let b = job("b", "i3.4xlarge", 15.0, 60, false);

        let both = [a.clone(), b.clone()];
        let only_a = [a];
        let only_b = [b];
        let cost_ab = compute(Usage::Advanced { params: &params, items: &both }).unwrap();
        let cost_a = compute(Usage::Advanced { params: &params, items: &only_a }).unwrap();
        let cost_b = compute(Usage::Advanced { params: &params, items: &only_b }).unwrap();

        assert!((cost_ab.compute_cost - (cost_a.compute_cost + cost_b.compute_cost)).abs() < 1e-9);
        assert!(
            (cost_ab.acceleration_cost - (cost_a.acceleration_cost + cost_b.acceleration_cost))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn advanced_acceleration_only_on_flagged_jobs() {
        let params = RawAdvanced::default();
        let jobs = [
            job("a", "r5.xlarge", 60.0, 30, true),
            job("b", "r5.xlarge", 60.0, 30, false),
        ];
        let cost = compute(Usage::Advanced { params: &params, items: &jobs }).unwrap();
        // each job: 30 h * 0.252 = 7.56; only "a" accelerated
        assert!((cost.compute_cost - 15.12).abs() < 1e-9);
        assert!((cost.acceleration_cost - 1.512).abs() < 1e-9);
        assert!(cost.acceleration_enabled);
    }

    #[test]
    fn advanced_storage_uses_estimated_tables() {
        let params = RawAdvanced {
            estimated_tables: 4,
            avg_table_size_gb: 100.0,
            storage_tier: "Glacier".to_string(),
        };
        let jobs = [job("a", "r5.xlarge", 10.0, 1, false)];
        let cost = compute(Usage::Advanced { params: &params, items: &jobs }).unwrap();
        assert!((cost.storage_gb - 400.0).abs() < 1e-9);
        assert!((cost.storage_cost - 1.6).abs() < 1e-9);
    }

    #[test]
    fn unknown_instance_falls_back_to_r5_xlarge() {
        let a = job_cost(&job("x", "z9.mega", 60.0, 30, false));
        let b = job_cost(&job("y", "r5.xlarge", 60.0, 30, false));
        assert_eq!(a.compute, b.compute);
    }
}
