use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::output::{self, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::formatter::round_cents;
use crate::core::models::cost::{BreakdownRow, CostSummary, Layer, LayerCost};
use crate::core::workload::{Workload, WorkloadError};

#[derive(Serialize)]
struct EstimatePayload<'a> {
    generated_at: DateTime<Utc>,
    workload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pb_engine: Option<&'static str>,
    #[serde(flatten)]
    summary: &'a CostSummary,
    breakdown: Vec<BreakdownRow>,
}

/// Load the workload at `path`, exiting with a hint when it is missing or
/// rejected.
pub fn load_or_exit(path: &Path) -> Result<Workload> {
    match Workload::load(path) {
        Ok(workload) => Ok(workload),
        Err(WorkloadError::NotFound(path)) => {
            eprintln!("No workload file found at {}", path.display());
            eprintln!("Run `lakecost workload init` to create one.");
            std::process::exit(1);
        }
        Err(WorkloadError::Invalid(e)) => {
            eprintln!("Invalid workload {}: {}", path.display(), e);
            std::process::exit(1);
        }
        Err(e) => Err(e).with_context(|| format!("loading {}", path.display())),
    }
}

/// Copy of `summary` with every amount and size rounded to two decimals.
fn rounded(summary: &CostSummary) -> CostSummary {
    CostSummary {
        layers: summary
            .layers
            .iter()
            .map(|l| LayerCost {
                storage_cost: round_cents(l.storage_cost),
                compute_cost: round_cents(l.compute_cost),
                acceleration_cost: round_cents(l.acceleration_cost),
                total_cost: round_cents(l.total_cost),
                storage_gb: round_cents(l.storage_gb),
                ..l.clone()
            })
            .collect(),
        total_cost: round_cents(summary.total_cost),
        acceleration_cost: round_cents(summary.acceleration_cost),
        acceleration_used: summary.acceleration_used,
    }
}

pub fn run(
    workload_path: &Path,
    layer_filter: Option<String>,
    show_all: bool,
    opts: &OutputOptions,
) -> Result<()> {
    let only = match layer_filter.as_deref() {
        None | Some("all") => None,
        Some(id) => match Layer::from_id(id) {
            Some(layer) => Some(layer),
            None => {
                eprintln!("Unknown layer: '{}' (expected landing|raw|conf|pb)", id);
                std::process::exit(1);
            }
        },
    };

    let workload = load_or_exit(workload_path)?;
    let summary = workload
        .estimate(only)
        .context("pricing workload")?;
    tracing::debug!(
        layers = summary.layers.len(),
        total = summary.total_cost,
        "estimate complete"
    );

    let pb_engine = workload
        .sections()
        .pb
        .as_ref()
        .map(|_| workload.pb_engine());

    match opts.format {
        OutputFormat::Text => {
            println!(
                "{}",
                renderer::render_summary(&summary, pb_engine, show_all, opts.use_color)
            );
        }
        OutputFormat::Json => {
            let summary = rounded(&summary);
            let payload = EstimatePayload {
                generated_at: Utc::now(),
                workload: workload_path.display().to_string(),
                pb_engine: pb_engine
                    .filter(|_| summary.layer(Layer::Pb).is_some())
                    .map(|e| e.label()),
                summary: &summary,
                breakdown: summary.breakdown(),
            };
            output::print_json(&payload, opts.pretty)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::workload::WorkloadFile;

    #[test]
    fn payload_flattens_summary() {
        let workload = Workload::from_file(WorkloadFile::template(&[Layer::Landing])).unwrap();
        let summary = workload.estimate(None).unwrap();
        let payload = EstimatePayload {
            generated_at: Utc::now(),
            workload: "workload.toml".to_string(),
            pb_engine: None,
            summary: &summary,
            breakdown: summary.breakdown(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!((value["total_cost"].as_f64().unwrap() - 72.45).abs() < 1e-9);
        assert_eq!(value["layers"][0]["layer"], "landing");
        assert_eq!(value["breakdown"].as_array().unwrap().len(), 2);
        assert!(value["breakdown"][1]["layer"].is_null());
        assert!(value.get("pb_engine").is_none());
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn rounded_summary_keeps_cents() {
        let workload = Workload::parse("[raw]
[conf]
").unwrap();
        let summary = rounded(&workload.estimate(None).unwrap());
        for layer in &summary.layers {
            assert_eq!(layer.total_cost, round_cents(layer.total_cost));
            assert_eq!(layer.acceleration_cost, round_cents(layer.acceleration_cost));
        }
        assert_eq!(summary.total_cost, round_cents(summary.total_cost));
        let row = summary.breakdown().pop().unwrap();
        assert_eq!(row.total_cost, summary.total_cost);
    }
}
