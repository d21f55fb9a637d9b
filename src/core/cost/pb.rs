use super::engine::{EngineFactors, EngineProfile};
use super::formulas::{
    dbu_compute_cost, photon_cost, storage_cost, DAYS_PER_MONTH, WORKING_DAYS_PER_MONTH,
};
use super::pricing::{StorageTier, Tier};
use super::{ItemCost, PbUsage};
use crate::core::models::cost::{Layer, LayerCost, ResourceKind, ResourceTally};
use crate::core::models::usage::{PbAdvanced, PbAggregate, PbDashboard, PbReport};
use crate::core::session::{validate_names, ItemKind, ValidationError};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Monthly query hours for interactive use, scaled by the engine's
/// performance factor.
fn query_hours(duration_s: f64, queries_per_user_per_day: u32, users: u32, performance: f64) -> f64 {
    (duration_s / SECONDS_PER_HOUR)
        * queries_per_user_per_day as f64
        * users as f64
        * WORKING_DAYS_PER_MONTH
        * performance
}

fn priced(factors: &EngineFactors, compute: f64, photon: bool) -> ItemCost {
    ItemCost {
        compute,
        acceleration: photon_cost(compute, factors.acceleration_allowed && photon),
    }
}

fn interactive_cost(factors: &EngineFactors, hours: f64, dbus: f64, photon: bool) -> ItemCost {
    let compute = dbu_compute_cost(
        factors.dbu_rate,
        1.0,
        hours / WORKING_DAYS_PER_MONTH,
        WORKING_DAYS_PER_MONTH,
        dbus,
    );
    priced(factors, compute, photon)
}

fn batch_cost(factors: &EngineFactors, hours: f64, dbus: f64, photon: bool) -> ItemCost {
    let compute = dbu_compute_cost(factors.dbu_rate, 1.0, hours / DAYS_PER_MONTH, DAYS_PER_MONTH, dbus);
    priced(factors, compute, photon)
}

/// Cost of one dashboard priced under `engine`. MV never carries a Photon
/// surcharge whatever the stored flag says.
pub fn dashboard_cost(engine: EngineProfile, dashboard: &PbDashboard) -> ItemCost {
    let factors = engine.factors();
    let hours = query_hours(
        dashboard.query_duration_s,
        dashboard.queries_per_user_per_day,
        dashboard.active_users,
        factors.performance_factor,
    );
    interactive_cost(
        &factors,
        hours,
        engine.compute_dbus(&dashboard.compute_size),
        dashboard.photon,
    )
}

pub fn report_cost(engine: EngineProfile, report: &PbReport) -> ItemCost {
    let factors = engine.factors();
    let hours = (report.duration_min / 60.0) * report.runs_per_month as f64;
    batch_cost(&factors, hours, report.dbu_per_hour, report.photon)
}

fn layer_storage(
    factors: &EngineFactors,
    dashboards: u32,
    reports: u32,
    per_dashboard_gb: f64,
    per_report_gb: f64,
    tier: &str,
) -> (f64, f64) {
    let gb = (dashboards as f64 * per_dashboard_gb + reports as f64 * per_report_gb)
        * factors.storage_multiplier;
    (gb, storage_cost(gb, StorageTier::resolve(tier).unit_price(), 1.0))
}

fn tallies(dashboards: u32, reports: u32) -> Vec<ResourceTally> {
    vec![
        ResourceTally {
            kind: ResourceKind::Dashboards,
            count: dashboards,
        },
        ResourceTally {
            kind: ResourceKind::Reports,
            count: reports,
        },
    ]
}

/// Price the PB layer for one engine profile.
///
/// In advanced mode only items tagged with `engine` contribute; the rest
/// are left for a recalculation under their own engine.
pub fn compute(engine: EngineProfile, usage: PbUsage<'_>) -> Result<LayerCost, ValidationError> {
    match usage {
        PbUsage::Simple(agg) => Ok(compute_simple(engine, agg)),
        PbUsage::Advanced {
            params,
            dashboards,
            reports,
        } => {
            validate_names(dashboards, ItemKind::PbDashboard)?;
            validate_names(reports, ItemKind::PbReport)?;
            Ok(compute_advanced(engine, params, dashboards, reports))
        }
    }
}

fn compute_simple(engine: EngineProfile, agg: &PbAggregate) -> LayerCost {
    let factors = engine.factors();
    let size = agg
        .compute_size
        .as_deref()
        .unwrap_or_else(|| engine.default_aggregate_compute_size());
    let dbus = engine.compute_dbus(size);

    let dashboard_hours = query_hours(
        agg.query_duration_s,
        agg.queries_per_user_per_day,
        agg.active_users,
        factors.performance_factor,
    );
    let interactive = interactive_cost(&factors, dashboard_hours, dbus, agg.photon);

    let report_hours =
        (agg.report_duration_min / 60.0) * agg.report_runs_per_month as f64 * agg.num_reports as f64;
    let batch = batch_cost(&factors, report_hours, dbus, agg.photon);

    let defaults = PbAdvanced::default();
    let (storage_gb, storage) = layer_storage(
        &factors,
        agg.num_dashboards,
        agg.num_reports,
        defaults.per_dashboard_gb,
        defaults.per_report_gb,
        &agg.storage_tier,
    );

    LayerCost::new(
        Layer::Pb,
        storage,
        interactive.compute + batch.compute,
        interactive.acceleration + batch.acceleration,
        storage_gb,
        tallies(agg.num_dashboards, agg.num_reports),
        factors.acceleration_allowed && agg.photon,
    )
}

fn compute_advanced(
    engine: EngineProfile,
    params: &PbAdvanced,
    dashboards: &[PbDashboard],
    reports: &[PbReport],
) -> LayerCost {
    let factors = engine.factors();
    let dashboards: Vec<&PbDashboard> = dashboards
        .iter()
        .filter(|d| EngineProfile::resolve(&d.engine) == engine)
        .collect();
    let reports: Vec<&PbReport> = reports
        .iter()
        .filter(|r| EngineProfile::resolve(&r.engine) == engine)
        .collect();

    let totals: ItemCost = dashboards
        .iter()
        .map(|d| dashboard_cost(engine, d))
        .chain(reports.iter().map(|r| report_cost(engine, r)))
        .sum();

    let (storage_gb, storage) = layer_storage(
        &factors,
        dashboards.len() as u32,
        reports.len() as u32,
        params.per_dashboard_gb,
        params.per_report_gb,
        &params.storage_tier,
    );

    let photon_requested =
        dashboards.iter().any(|d| d.photon) || reports.iter().any(|r| r.photon);

    LayerCost::new(
        Layer::Pb,
        storage,
        totals.compute,
        totals.acceleration,
        storage_gb,
        tallies(dashboards.len() as u32, reports.len() as u32),
        factors.acceleration_allowed && photon_requested,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(name: &str, engine: &str, photon: bool) -> PbDashboard {
        PbDashboard {
            name: name.to_string(),
            engine: engine.to_string(),
            compute_size: "Small (2 DBUs)".to_string(),
            active_users: 10,
            queries_per_user_per_day: 10,
            query_duration_s: 10.0,
            photon,
        }
    }

    fn report(name: &str, engine: &str, photon: bool) -> PbReport {
        PbReport {
            name: name.to_string(),
            engine: engine.to_string(),
            runs_per_month: 4,
            duration_min: 30.0,
            dbu_per_hour: 2.0,
            photon,
        }
    }

    fn advanced(
        engine: EngineProfile,
        dashboards: &[PbDashboard],
        reports: &[PbReport],
    ) -> LayerCost {
        let params = PbAdvanced::default();
        compute(
            engine,
            PbUsage::Advanced {
                params: &params,
                dashboards,
                reports,
            },
        )
        .unwrap()
    }

    #[test]
    fn simple_mode_sql_defaults() {
        let agg = PbAggregate::default();
        let cost = compute(EngineProfile::Sql, PbUsage::Simple(&agg)).unwrap();
        // dashboards: (8/3600)*15*20*22 h * 2 DBU * 0.75 = 22
        // reports: 0.75 h * 8 runs * 10 reports * 2 DBU * 0.75 = 90
        assert!((cost.compute_cost - 112.0).abs() < 1e-9);
        assert!((cost.acceleration_cost - 22.4).abs() < 1e-9);
        // (5*20 + 10*50) GB
        assert!((cost.storage_gb - 600.0).abs() < 1e-9);
        assert!((cost.storage_cost - 13.8).abs() < 1e-9);
        assert_eq!(cost.resources_label(), "5 Dashboards / 10 Reports");
    }

    #[test]
    fn simple_mode_mv_has_no_acceleration() {
        let agg = PbAggregate {
            compute_size: Some("Medium Usage (2 DBUs)".to_string()),
            ..PbAggregate::default()
        };
        let cost = compute(EngineProfile::MaterializedView, PbUsage::Simple(&agg)).unwrap();
        assert_eq!(cost.acceleration_cost, 0.0);
        assert!(!cost.acceleration_enabled);
        assert!((cost.storage_gb - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn simple_mode_pyspark_defaults_to_medium_cluster() {
        let agg = PbAggregate::default();
        let cost = compute(EngineProfile::PySpark, PbUsage::Simple(&agg)).unwrap();
        let explicit = PbAggregate {
            compute_size: Some("Medium Cluster (4 DBUs)".to_string()),
            ..PbAggregate::default()
        };
        let expected = compute(EngineProfile::PySpark, PbUsage::Simple(&explicit)).unwrap();
        assert_eq!(cost, expected);
        // dashboards: 14.67 h * 1.5 * 4 DBU * 0.15 = 13.2
        // reports: 60 h * 4 DBU * 0.15 = 36
        assert!((cost.compute_cost - 49.2).abs() < 1e-9);
    }

    #[test]
    fn simple_mode_mv_defaults_to_medium_refresh() {
        let agg = PbAggregate::default();
        let cost = compute(EngineProfile::MaterializedView, PbUsage::Simple(&agg)).unwrap();
        // dashboards: 14.67 h * 0.5 * 2 DBU * 0.6 = 8.8
        // reports: 60 h * 2 DBU * 0.6 = 72
        assert!((cost.compute_cost - 80.8).abs() < 1e-9);
        assert_eq!(cost.acceleration_cost, 0.0);
    }

    #[test]
    fn dashboard_cost_sql() {
        // (10/3600)*10*10*22 h * 2 DBU * 0.75
        let c = dashboard_cost(EngineProfile::Sql, &dashboard("d", "SQL", true));
        let expected = (10.0 / 3600.0) * 100.0 * 22.0 * 2.0 * 0.75;
        assert!((c.compute - expected).abs() < 1e-9);
        assert!((c.acceleration - expected * 0.2).abs() < 1e-9);
    }

    #[test]
    fn pyspark_scales_query_hours() {
        let sql = dashboard_cost(EngineProfile::Sql, &dashboard("d", "SQL", false));
        let mut d = dashboard("d", "PySpark", false);
        d.compute_size = "Small Cluster (2 DBUs)".to_string();
        let spark = dashboard_cost(EngineProfile::PySpark, &d);
        // same DBUs, 1.5x hours, 0.15/0.75 rate
        assert!((spark.compute - sql.compute * 1.5 * 0.2).abs() < 1e-9);
    }

    #[test]
    fn report_cost_uses_own_dbus() {
        // 0.5 h * 4 runs * 2 DBU * 0.75
        let c = report_cost(EngineProfile::Sql, &report("r", "SQL", false));
        assert!((c.compute - 3.0).abs() < 1e-9);
        assert_eq!(c.acceleration, 0.0);
    }

    #[test]
    fn mv_forces_acceleration_off() {
        let cost = advanced(
            EngineProfile::MaterializedView,
            &[dashboard("d", "MV", true)],
            &[report("r", "Materialized View (MV)", true)],
        );
        assert!(cost.compute_cost > 0.0);
        assert_eq!(cost.acceleration_cost, 0.0);
        assert!(!cost.acceleration_enabled);
    }

    #[test]
    fn advanced_only_counts_items_for_engine() {
        let dashboards = [
            dashboard("a", "SQL", true),
            dashboard("b", "PySpark", true),
            dashboard("c", "SQL", false),
        ];
        let reports = [report("r1", "PySpark", true), report("r2", "SQL", true)];

        let sql = advanced(EngineProfile::Sql, &dashboards, &reports);
        assert_eq!(sql.resources_label(), "2 Dashboards / 1 Reports");
        let only_sql = advanced(
            EngineProfile::Sql,
            &[dashboards[0].clone(), dashboards[2].clone()],
            &[reports[1].clone()],
        );
        assert_eq!(sql, only_sql);

        let spark = advanced(EngineProfile::PySpark, &dashboards, &reports);
        assert_eq!(spark.resource_count, 2);
        // (1*20 + 1*50) * 1.2
        assert!((spark.storage_gb - 84.0).abs() < 1e-9);
    }

    #[test]
    fn advanced_storage_per_item() {
        let cost = advanced(
            EngineProfile::Sql,
            &[dashboard("a", "SQL", false), dashboard("b", "SQL", false)],
            &[report("r", "SQL", false)],
        );
        assert!((cost.storage_gb - 90.0).abs() < 1e-9);
        assert!(!cost.acceleration_enabled);
    }

    #[test]
    fn advanced_with_no_matching_items_is_zero() {
        let cost = advanced(EngineProfile::PySpark, &[dashboard("a", "SQL", true)], &[]);
        assert_eq!(cost.total_cost, 0.0);
        assert_eq!(cost.resource_count, 0);
    }

    #[test]
    fn duplicate_report_names_rejected() {
        let params = PbAdvanced::default();
        let reports = [report("r", "SQL", false), report("r", "PySpark", false)];
        let err = compute(
            EngineProfile::Sql,
            PbUsage::Advanced {
                params: &params,
                dashboards: &[],
                reports: &reports,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateName { kind: ItemKind::PbReport, .. }));
    }
}
