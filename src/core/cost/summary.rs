use std::collections::BTreeMap;

use crate::core::models::cost::{BreakdownRow, CostSummary, Layer, LayerCost};

/// Combine the configured layers into one summary. Layers missing from the
/// map contribute nothing; the map's ordering keeps pipeline order.
pub fn compute_summary(layers: &BTreeMap<Layer, LayerCost>) -> CostSummary {
    let layers: Vec<LayerCost> = layers.values().cloned().collect();
    let total_cost = layers.iter().map(|l| l.total_cost).sum();
    let acceleration_cost = layers.iter().map(|l| l.acceleration_cost).sum();
    let acceleration_used = layers
        .iter()
        .any(|l| l.acceleration_enabled && l.acceleration_cost > 0.0);

    CostSummary {
        layers,
        total_cost,
        acceleration_cost,
        acceleration_used,
    }
}

impl CostSummary {
    pub fn layer(&self, layer: Layer) -> Option<&LayerCost> {
        self.layers.iter().find(|l| l.layer == layer)
    }

    /// Share of the grand total in `[0, 1]`; zero when nothing is priced.
    pub fn share(&self, layer: Layer) -> f64 {
        match self.layer(layer) {
            Some(cost) if self.total_cost > 0.0 => cost.total_cost / self.total_cost,
            _ => 0.0,
        }
    }

    /// One row per configured layer followed by a TOTAL row.
    pub fn breakdown(&self) -> Vec<BreakdownRow> {
        let mut rows: Vec<BreakdownRow> = self
            .layers
            .iter()
            .map(|l| BreakdownRow {
                layer: Some(l.layer),
                storage_cost: Some(l.storage_cost),
                compute_cost: Some(l.compute_cost),
                acceleration_cost: Some(l.acceleration_cost),
                total_cost: l.total_cost,
                storage_gb: Some(l.storage_gb),
                resources: Some(l.resources_label()),
            })
            .collect();
        rows.push(BreakdownRow {
            layer: None,
            storage_cost: None,
            compute_cost: None,
            acceleration_cost: None,
            total_cost: self.total_cost,
            storage_gb: None,
            resources: None,
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::{ResourceKind, ResourceTally};

    fn cost(layer: Layer, storage: f64, compute: f64, accel: f64) -> LayerCost {
        LayerCost::new(
            layer,
            storage,
            compute,
            accel,
            100.0,
            vec![ResourceTally {
                kind: ResourceKind::Tables,
                count: 1,
            }],
            accel > 0.0,
        )
    }

    #[test]
    fn total_is_sum_of_configured_layers() {
        let mut layers = BTreeMap::new();
        layers.insert(Layer::Pb, cost(Layer::Pb, 1.0, 2.0, 0.4));
        layers.insert(Layer::Landing, cost(Layer::Landing, 72.45, 0.0, 0.0));
        let summary = compute_summary(&layers);

        assert_eq!(summary.layers.len(), 2);
        assert_eq!(summary.layers[0].layer, Layer::Landing);
        assert_eq!(summary.layers[1].layer, Layer::Pb);
        assert!((summary.total_cost - 75.85).abs() < 1e-9);
        assert!((summary.acceleration_cost - 0.4).abs() < 1e-9);
        assert!(summary.acceleration_used);
        assert!(summary.layer(Layer::Raw).is_none());
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = compute_summary(&BTreeMap::new());
        assert_eq!(summary.total_cost, 0.0);
        assert!(!summary.acceleration_used);
        assert_eq!(summary.share(Layer::Landing), 0.0);
        let rows = summary.breakdown();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].layer.is_none());
    }

    #[test]
    fn breakdown_ends_with_total_row() {
        let mut layers = BTreeMap::new();
        layers.insert(Layer::Raw, cost(Layer::Raw, 11.5, 17.01, 3.402));
        layers.insert(Layer::Conf, cost(Layer::Conf, 4.6, 72.0, 14.4));
        let summary = compute_summary(&layers);
        let rows = summary.breakdown();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].layer, Some(Layer::Raw));
        assert_eq!(rows[1].layer, Some(Layer::Conf));
        assert_eq!(rows[2].layer, None);
        assert_eq!(rows[2].total_cost, summary.total_cost);
        assert_eq!(rows[0].resources.as_deref(), Some("1 Tables"));
    }

    #[test]
    fn shares_add_up() {
        let mut layers = BTreeMap::new();
        layers.insert(Layer::Raw, cost(Layer::Raw, 30.0, 0.0, 0.0));
        layers.insert(Layer::Conf, cost(Layer::Conf, 10.0, 0.0, 0.0));
        let summary = compute_summary(&layers);
        assert!((summary.share(Layer::Raw) - 0.75).abs() < 1e-12);
        assert!((summary.share(Layer::Conf) - 0.25).abs() < 1e-12);
        assert_eq!(summary.share(Layer::Pb), 0.0);
    }
}
