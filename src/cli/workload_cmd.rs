use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use crate::cli::estimate_cmd::load_or_exit;
use crate::cli::output::{self, OutputFormat, OutputOptions};
use crate::cli::selector;
use crate::core::cost::engine::EngineProfile;
use crate::core::models::cost::Layer;
use crate::core::models::usage::{ConfTransform, LandingTable, PbDashboard, PbReport, RawJob};
use crate::core::session::ValidationError;
use crate::core::workload::{Mode, Workload, WorkloadFile};

#[derive(Subcommand, Debug)]
pub enum AddItem {
    /// Itemized landing table
    LandingTable(LandingTableArgs),
    /// Itemized RAW ingestion job
    RawJob(RawJobArgs),
    /// Itemized CONF transformation
    ConfTransform(ConfTransformArgs),
    /// PB dashboard, tagged with an engine
    PbDashboard(PbDashboardArgs),
    /// PB report or MV refresh, tagged with an engine
    PbReport(PbReportArgs),
}

#[derive(Args, Debug)]
pub struct LandingTableArgs {
    pub name: String,
    #[arg(long, default_value_t = 2.0)]
    pub file_size_gb: f64,
    #[arg(long, default_value_t = 5)]
    pub files_per_day: u32,
    #[arg(long, default_value = "30 days")]
    pub retention: String,
}

#[derive(Args, Debug)]
pub struct RawJobArgs {
    pub name: String,
    #[arg(long, default_value = "r5.xlarge")]
    pub instance_type: String,
    #[arg(long, default_value_t = 30.0)]
    pub duration_min: f64,
    #[arg(long, default_value_t = 30)]
    pub runs_per_month: u32,
    /// Price without Photon acceleration
    #[arg(long)]
    pub no_photon: bool,
}

#[derive(Args, Debug)]
pub struct ConfTransformArgs {
    pub name: String,
    #[arg(long, default_value = "Databricks Jobs")]
    pub service_tier: String,
    #[arg(long, default_value_t = 60.0)]
    pub duration_min: f64,
    #[arg(long, default_value_t = 30)]
    pub runs_per_month: u32,
    #[arg(long, default_value_t = 4.0)]
    pub dbu_per_hour: f64,
    #[arg(long, default_value_t = 50.0)]
    pub storage_gb: f64,
    #[arg(long)]
    pub no_photon: bool,
}

#[derive(Args, Debug)]
pub struct PbDashboardArgs {
    pub name: String,
    /// Engine tag (default: the workload's PB engine)
    #[arg(long)]
    pub engine: Option<String>,
    /// Compute size label (default: the engine's second size)
    #[arg(long)]
    pub compute_size: Option<String>,
    #[arg(long, default_value_t = 10)]
    pub users: u32,
    #[arg(long, default_value_t = 10)]
    pub queries_per_day: u32,
    #[arg(long, default_value_t = 10.0)]
    pub query_seconds: f64,
    #[arg(long)]
    pub no_photon: bool,
}

#[derive(Args, Debug)]
pub struct PbReportArgs {
    pub name: String,
    #[arg(long)]
    pub engine: Option<String>,
    #[arg(long, default_value_t = 4)]
    pub runs_per_month: u32,
    #[arg(long, default_value_t = 30.0)]
    pub duration_min: f64,
    /// DBUs per hour (default: 4 for PySpark, 2 otherwise)
    #[arg(long)]
    pub dbu_per_hour: Option<f64>,
    #[arg(long)]
    pub no_photon: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearKind {
    LandingTables,
    RawJobs,
    ConfTransforms,
    PbDashboards,
    PbReports,
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        eprintln!("Workload file already exists at {}", path.display());
        eprintln!("Pass --force to overwrite it.");
        return Ok(());
    }

    let items = selector::build_selectable_list();
    let layers = match selector::interactive_select(&items) {
        Ok(Some(layers)) => layers,
        Ok(None) => Layer::all().to_vec(),
        Err(_) => {
            eprintln!("Workload init cancelled.");
            return Ok(());
        }
    };

    let workload = Workload::from_file(WorkloadFile::template(&layers))?;
    match workload.save(path) {
        Ok(()) => {
            println!("Generated workload at {}", path.display());
            if layers.is_empty() {
                println!("  No layers selected. Add a [landing], [raw], [conf] or [pb] section to estimate.");
            } else {
                let names: Vec<&str> = layers.iter().map(|l| l.display_name()).collect();
                println!("  Layers: {}", names.join(", "));
            }
        }
        Err(e) => {
            eprintln!("Failed to write workload: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CheckPayload {
    workload: String,
    layers: Vec<LayerStatus>,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct LayerStatus {
    layer: Layer,
    status: String,
}

pub fn check(path: &Path, opts: &OutputOptions) -> Result<()> {
    let workload = load_or_exit(path)?;
    let configured = workload.configured_layers();
    let issues = workload.check();

    if opts.format == OutputFormat::Json {
        let payload = CheckPayload {
            workload: path.display().to_string(),
            layers: configured
                .iter()
                .map(|layer| LayerStatus {
                    layer: *layer,
                    status: describe_layer(&workload, *layer),
                })
                .collect(),
            warnings: issues,
        };
        output::print_json(&payload, opts.pretty)?;
        return Ok(());
    }

    println!("Workload is valid: {}", path.display());
    if configured.is_empty() {
        println!("  No layers configured.");
    } else {
        for layer in &configured {
            println!("  {:<8} {}", layer.display_name(), describe_layer(&workload, *layer));
        }
    }

    if !issues.is_empty() {
        eprintln!("Warnings:");
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
    }
    Ok(())
}

fn describe_layer(workload: &Workload, layer: Layer) -> String {
    let sections = workload.sections();
    let session = workload.session();
    let (mode, items) = match layer {
        Layer::Landing => (sections.landing.as_ref().map(|s| s.mode), session.landing_tables().len()),
        Layer::Raw => (sections.raw.as_ref().map(|s| s.mode), session.raw_jobs().len()),
        Layer::Conf => (sections.conf.as_ref().map(|s| s.mode), session.conf_transforms().len()),
        Layer::Pb => {
            let engine = workload.pb_engine();
            let items = session
                .pb_dashboards()
                .iter()
                .filter(|d| EngineProfile::tagged(&d.engine) == engine)
                .count()
                + session
                    .pb_reports()
                    .iter()
                    .filter(|r| EngineProfile::tagged(&r.engine) == engine)
                    .count();
            let mode = sections.pb.as_ref().map(|s| s.mode);
            return match mode {
                Some(Mode::Advanced) => format!("advanced, {} ({} items)", engine.label(), items),
                _ => format!("simple, {}", engine.label()),
            };
        }
    };
    match mode {
        Some(Mode::Advanced) => format!("advanced ({} items)", items),
        _ => "simple".to_string(),
    }
}

/// Load the workload for mutation; a missing file starts empty.
fn load_for_edit(path: &Path) -> Result<Workload> {
    if path.exists() {
        load_or_exit(path)
    } else {
        Ok(Workload::default())
    }
}

fn report_rejection(e: &ValidationError) -> ! {
    eprintln!("{}", e);
    std::process::exit(1);
}

pub fn add(path: &Path, item: AddItem) -> Result<()> {
    let mut workload = load_for_edit(path)?;
    let pb_engine = workload.pb_engine();

    let (layer, name) = {
        let session = workload.session_mut();
        let (layer, name, result) = match item {
            AddItem::LandingTable(a) => (
                Layer::Landing,
                a.name.clone(),
                session.add_landing_table(LandingTable {
                    name: a.name,
                    avg_file_size_gb: a.file_size_gb,
                    files_per_day: a.files_per_day,
                    retention: a.retention,
                }),
            ),
            AddItem::RawJob(a) => (
                Layer::Raw,
                a.name.clone(),
                session.add_raw_job(RawJob {
                    name: a.name,
                    instance_type: a.instance_type,
                    avg_duration_min: a.duration_min,
                    runs_per_month: a.runs_per_month,
                    photon: !a.no_photon,
                }),
            ),
            AddItem::ConfTransform(a) => (
                Layer::Conf,
                a.name.clone(),
                session.add_conf_transform(ConfTransform {
                    name: a.name,
                    service_tier: a.service_tier,
                    avg_duration_min: a.duration_min,
                    runs_per_month: a.runs_per_month,
                    dbu_per_hour: a.dbu_per_hour,
                    storage_gb: a.storage_gb,
                    photon: !a.no_photon,
                }),
            ),
            AddItem::PbDashboard(a) => {
                let engine = a
                    .engine
                    .as_deref()
                    .map(EngineProfile::resolve)
                    .unwrap_or(pb_engine);
                (
                    Layer::Pb,
                    a.name.clone(),
                    session.add_pb_dashboard(PbDashboard {
                        name: a.name,
                        engine: engine.label().to_string(),
                        compute_size: a
                            .compute_size
                            .unwrap_or_else(|| engine.default_compute_size().to_string()),
                        active_users: a.users,
                        queries_per_user_per_day: a.queries_per_day,
                        query_duration_s: a.query_seconds,
                        photon: !a.no_photon,
                    }),
                )
            }
            AddItem::PbReport(a) => {
                let engine = a
                    .engine
                    .as_deref()
                    .map(EngineProfile::resolve)
                    .unwrap_or(pb_engine);
                (
                    Layer::Pb,
                    a.name.clone(),
                    session.add_pb_report(PbReport {
                        name: a.name,
                        engine: engine.label().to_string(),
                        runs_per_month: a.runs_per_month,
                        duration_min: a.duration_min,
                        dbu_per_hour: a.dbu_per_hour.unwrap_or_else(|| engine.default_report_dbus()),
                        photon: !a.no_photon,
                    }),
                )
            }
        };
        if let Err(e) = result {
            report_rejection(&e);
        }
        (layer, name)
    };

    workload
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Added {} item '{}' to {}", layer.display_name(), name.trim(), path.display());

    if layer_mode(&workload, layer) != Some(Mode::Advanced) {
        println!(
            "  Note: {} is in simple mode; set mode = \"advanced\" under [{}] to price items.",
            layer.display_name(),
            layer.id()
        );
    }
    Ok(())
}

fn layer_mode(workload: &Workload, layer: Layer) -> Option<Mode> {
    let sections = workload.sections();
    match layer {
        Layer::Landing => sections.landing.as_ref().map(|s| s.mode),
        Layer::Raw => sections.raw.as_ref().map(|s| s.mode),
        Layer::Conf => sections.conf.as_ref().map(|s| s.mode),
        Layer::Pb => sections.pb.as_ref().map(|s| s.mode),
    }
}

pub fn clear(path: &Path, kind: ClearKind, engine: Option<String>) -> Result<()> {
    let mut workload = load_or_exit(path)?;
    let engine = engine
        .as_deref()
        .map(EngineProfile::resolve)
        .unwrap_or_else(|| workload.pb_engine());

    let session = workload.session_mut();
    let (removed, what) = match kind {
        ClearKind::LandingTables => (session.clear_landing_tables(), "landing tables".to_string()),
        ClearKind::RawJobs => (session.clear_raw_jobs(), "RAW jobs".to_string()),
        ClearKind::ConfTransforms => (session.clear_conf_transforms(), "CONF transformations".to_string()),
        ClearKind::PbDashboards => (
            session.clear_pb_dashboards(engine),
            format!("{} dashboards", engine.label()),
        ),
        ClearKind::PbReports => (
            session.clear_pb_reports(engine),
            format!("{} reports", engine.label()),
        ),
    };

    if removed == 0 {
        println!("No {} to clear", what);
        return Ok(());
    }

    workload
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Cleared {} {}", removed, what);
    Ok(())
}
