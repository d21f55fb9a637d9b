use colored::{control, Colorize};

use crate::core::cost::engine::EngineProfile;
use crate::core::cost::pricing::{PriceCategory, UnitPrice};
use crate::core::formatter::{format_gb, format_share, format_share_bar, format_usd};
use crate::core::models::cost::{CostSummary, Layer, LayerCost};

const BAR_WIDTH: usize = 12;

/// Render the layer breakdown as a colored (or plain) table.
///
/// Layout:
/// ```text
///  Monthly estimate
///   Layer      Storage      Compute       Photon        Total   Storage  Resources
///   Landing     $72.45        $0.00        $0.00       $72.45   3.08 TB  5 Tables
///   RAW         $11.50       $17.01        $3.40       $31.91  500.0 GB  3 Jobs
///   TOTAL                                             $104.36
///   Photon acceleration included ($3.40)
/// ```
pub fn render_summary(
    summary: &CostSummary,
    pb_engine: Option<EngineProfile>,
    show_detail: bool,
    use_color: bool,
) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(" Monthly estimate".bold().to_string());

    if summary.layers.is_empty() {
        lines.push(format!(
            "  {}",
            "No layers configured. Run `lakecost workload init` to create a workload.".dimmed()
        ));
        return lines.join("\n");
    }

    let header = format!(
        "  {:<8} {:>12} {:>12} {:>12} {:>12} {:>10}  {}",
        "Layer", "Storage", "Compute", "Photon", "Total", "Storage", "Resources"
    );
    lines.push(header.dimmed().to_string());

    for layer in &summary.layers {
        lines.push(format!(
            "  {} {:>12} {:>12} {:>12} {} {:>10}  {}",
            format!("{:<8}", layer.layer.display_name()).cyan(),
            format_usd(layer.storage_cost),
            format_usd(layer.compute_cost),
            format_usd(layer.acceleration_cost),
            format!("{:>12}", format_usd(layer.total_cost)).bold(),
            format_gb(layer.storage_gb),
            layer.resources_label()
        ));
    }

    lines.push(format!(
        "  {} {:>38} {}",
        format!("{:<8}", "TOTAL").bold(),
        "",
        format!("{:>12}", format_usd(summary.total_cost)).green().bold()
    ));

    if summary.acceleration_used {
        lines.push(format!(
            "  {}",
            format!(
                "Photon acceleration included ({})",
                format_usd(summary.acceleration_cost)
            )
            .yellow()
        ));
    }

    if let Some(engine) = pb_engine {
        if summary.layer(Layer::Pb).is_some() {
            lines.push(format!("  {} {}", "PB engine".cyan(), engine.label()));
        }
    }

    if show_detail {
        for layer in &summary.layers {
            lines.push(String::new());
            render_layer_detail(&mut lines, layer, summary.share(layer.layer));
        }
    }

    lines.join("\n")
}

fn render_layer_detail(lines: &mut Vec<String>, layer: &LayerCost, share: f64) {
    lines.push(format!(
        " {}  {} {}",
        layer.layer.display_name().bold(),
        format_share(share),
        format_share_bar(share, BAR_WIDTH).magenta()
    ));
    lines.push(format!(
        "  {}  {} ({})",
        "Storage".cyan(),
        format_usd(layer.storage_cost),
        format_gb(layer.storage_gb)
    ));
    if layer.compute_cost > 0.0 {
        lines.push(format!("  {}  {}", "Compute".cyan(), format_usd(layer.compute_cost)));
    }
    if layer.acceleration_enabled {
        lines.push(format!(
            "  {}   {}",
            "Photon".cyan(),
            format_usd(layer.acceleration_cost)
        ));
    }
    lines.push(format!("  {}    {}", "Total".cyan(), format_usd(layer.total_cost)));
    // 11 spaces to align under the values
    lines.push(format!("           {}", layer.layer.description().dimmed()));
}

/// Render price rows grouped by category.
pub fn render_prices(rows: &[&UnitPrice], use_color: bool) -> String {
    control::set_override(use_color);

    let mut sections: Vec<String> = Vec::new();
    for category in PriceCategory::all() {
        let in_category: Vec<&&UnitPrice> =
            rows.iter().filter(|r| r.category == *category).collect();
        if in_category.is_empty() {
            continue;
        }
        let mut lines = vec![format!(
            " {} ({})",
            category.display_name().bold(),
            category.unit()
        )];
        for row in in_category {
            lines.push(format!(
                "  {}  ${:.5}",
                format!("{:<22}", row.tier).cyan(),
                row.price
            ));
        }
        sections.push(lines.join("\n"));
    }
    sections.join("\n\n")
}
