//! Cost primitives. Every function is a plain product of its inputs; inputs
//! are expected to be non-negative and are not checked.

/// Photon surcharge as a fraction of the compute cost it accelerates.
pub const PHOTON_ACCELERATION_FACTOR: f64 = 0.2;

/// Billing days in a month for batch workloads.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Working days in a month for interactive (dashboard) workloads.
pub const WORKING_DAYS_PER_MONTH: f64 = 22.0;

/// `size_gb * unit_price * months`
pub fn storage_cost(size_gb: f64, unit_price_per_gb_month: f64, months: f64) -> f64 {
    size_gb * unit_price_per_gb_month * months
}

/// EC2-style compute: `hourly_rate * instances * hours/day * days/month`
pub fn instance_compute_cost(
    hourly_rate: f64,
    num_instances: f64,
    hours_per_day: f64,
    days_per_month: f64,
) -> f64 {
    hourly_rate * num_instances * hours_per_day * days_per_month
}

/// DBU-billed compute. `cluster_size` is normally 1 since sizing is already
/// carried by `dbu_per_hour`.
pub fn dbu_compute_cost(
    dbu_rate: f64,
    cluster_size: f64,
    hours_per_day: f64,
    days_per_month: f64,
    dbu_per_hour: f64,
) -> f64 {
    dbu_rate * cluster_size * hours_per_day * days_per_month * dbu_per_hour
}

/// Surcharge on an already-finalized compute cost.
pub fn acceleration_cost(base_compute_cost: f64, acceleration_factor: f64) -> f64 {
    base_compute_cost * acceleration_factor
}

/// Photon surcharge for one item, or zero when the item is not accelerated.
pub fn photon_cost(base_compute_cost: f64, enabled: bool) -> f64 {
    if enabled {
        acceleration_cost(base_compute_cost, PHOTON_ACCELERATION_FACTOR)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_cost_is_product() {
        assert!((storage_cost(100.0, 0.023, 1.0) - 2.3).abs() < 1e-9);
        assert!((storage_cost(250.0, 0.004, 3.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn storage_cost_zero_size_is_zero() {
        for price in [0.0, 0.00099, 0.023, 1.5] {
            for months in [0.0, 1.0, 12.0] {
                assert_eq!(storage_cost(0.0, price, months), 0.0);
            }
        }
    }

    #[test]
    fn instance_compute_cost_is_product() {
        // 2 instances, 8h/day, 22 days at r5.xlarge
        let cost = instance_compute_cost(0.252, 2.0, 8.0, 22.0);
        assert!((cost - 88.704).abs() < 1e-9);
    }

    #[test]
    fn dbu_compute_cost_is_product() {
        let cost = dbu_compute_cost(0.15, 1.0, 8.0, 30.0, 4.0);
        assert!((cost - 144.0).abs() < 1e-9);
    }

    #[test]
    fn acceleration_cost_default_factor() {
        assert!((acceleration_cost(17.01, PHOTON_ACCELERATION_FACTOR) - 3.402).abs() < 1e-9);
        assert!((acceleration_cost(50.0, 0.2) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn acceleration_of_zero_is_zero() {
        for factor in [0.0, 0.2, 0.5, 3.0] {
            assert_eq!(acceleration_cost(0.0, factor), 0.0);
        }
    }

    #[test]
    fn photon_cost_respects_flag() {
        assert_eq!(photon_cost(100.0, false), 0.0);
        assert!((photon_cost(100.0, true) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn primitives_are_deterministic() {
        let a = dbu_compute_cost(0.6, 1.0, 1.7, 22.0, 8.0);
        let b = dbu_compute_cost(0.6, 1.0, 1.7, 22.0, 8.0);
        assert_eq!(a.to_bits(), b.to_bits());
        let a = instance_compute_cost(4.992, 3.0, 2.25, 30.0);
        let b = instance_compute_cost(4.992, 3.0, 2.25, 30.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
