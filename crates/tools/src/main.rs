use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use formats::{ShapeFeature, feature_value};
use foundation::latlng::LatLng;
use foundation::time::Time;
use projection::{
    MercatorViewport, ProjectionConfig, ProjectionController, ProjectionInfo, ProjectionSession,
    UpdateOutcome,
};
use runtime::throttle::TimerPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Re-project polygons for a new map position")]
struct Cli {
    #[command(flatten)]
    tuning: Tuning,

    /// Write the result here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Tuning {
    /// JSON file with projection settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Share of the latitude span used to inset the reference latitudes
    #[arg(long, global = true)]
    inset: Option<f64>,

    /// Fraction of the scale deviation that is kept (0..=1)
    #[arg(long, global = true)]
    smoothing: Option<f64>,

    /// Throttle window for drag updates, in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Throttle policy: fixed_window or restart
    #[arg(long, global = true)]
    policy: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move a shape to a new center and print it as a GeoJSON Feature
    Transform {
        /// GeoJSON geometry, Feature or FeatureCollection
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Print the distortion summary for moving a shape to a new center
    Info {
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Replay a recorded pointer drag through the throttled controller
    Drag {
        input: PathBuf,
        /// JSON trace: {"viewport": {...}, "events": [{"t_ms", "x", "y"}, ...]}
        trace: PathBuf,
        /// Include the final geometry in the report
        #[arg(long)]
        geometry: bool,
    },
}

#[derive(Debug, Deserialize)]
struct DragTrace {
    viewport: MercatorViewport,
    events: Vec<PointerEvent>,
}

#[derive(Debug, Deserialize)]
struct PointerEvent {
    t_ms: f64,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct DragReport {
    events: usize,
    rejected: usize,
    superseded: usize,
    recomputes: u64,
    info: ProjectionInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    geometry: Option<Value>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = load_config(&cli.tuning)?;
    debug!(?config, "projection settings");

    let out = match cli.command {
        Command::Transform { input, lat, lng } => {
            cmd_transform(&input, target(lat, lng)?, &config)?
        }
        Command::Info { input, lat, lng } => cmd_info(&input, target(lat, lng)?, &config)?,
        Command::Drag {
            input,
            trace,
            geometry,
        } => cmd_drag(&input, &trace, geometry, config)?,
    };

    let text = serde_json::to_string_pretty(&out).map_err(|e| format!("encode output: {e}"))?;
    match cli.output {
        Some(path) => {
            fs::write(&path, text + "\n").map_err(|e| format!("write {path:?}: {e}"))?;
            info!("wrote {path:?}");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn load_config(tuning: &Tuning) -> Result<ProjectionConfig, String> {
    let mut config = match &tuning.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
            serde_json::from_str(&text).map_err(|e| format!("parse {path:?}: {e}"))?
        }
        None => ProjectionConfig::default(),
    };
    if let Some(v) = tuning.inset {
        config.inset_fraction = v;
    }
    if let Some(v) = tuning.smoothing {
        config.smoothing_factor = v;
    }
    if let Some(v) = tuning.interval_ms {
        config.throttle_interval_ms = v;
    }
    if let Some(p) = &tuning.policy {
        config.timer_policy = parse_policy(p)?;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn parse_policy(s: &str) -> Result<TimerPolicy, String> {
    match s.replace('-', "_").as_str() {
        "fixed_window" => Ok(TimerPolicy::FixedWindow),
        "restart" => Ok(TimerPolicy::Restart),
        other => Err(format!("unknown policy: {other} (expected fixed_window or restart)")),
    }
}

fn target(lat: f64, lng: f64) -> Result<LatLng, String> {
    let t = LatLng::new(lat, lng);
    if !t.is_finite() {
        return Err(format!("target must be finite, got {lat}, {lng}"));
    }
    Ok(t)
}

fn read_shape(path: &Path) -> Result<ShapeFeature, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    ShapeFeature::from_geojson_str(&text).map_err(|e| format!("{path:?}: {e}"))
}

fn retargeted(
    path: &Path,
    target: LatLng,
    config: &ProjectionConfig,
) -> Result<(ShapeFeature, ProjectionSession), String> {
    let shape = read_shape(path)?;
    let session = ProjectionSession::from_geometry(shape.geometry.clone())
        .and_then(|s| s.retarget(target, config))
        .map_err(|e| e.to_string())?;
    Ok((shape, session))
}

fn cmd_transform(path: &Path, target: LatLng, config: &ProjectionConfig) -> Result<Value, String> {
    let (shape, session) = retargeted(path, target, config)?;
    let info = session.projection_info();
    if let Some(d) = &info.distortion {
        info!(level = %d.level, range = d.distortion_range, "shape transformed");
    }

    let mut properties = shape.properties;
    properties.insert(
        "projection".to_string(),
        serde_json::to_value(&info).map_err(|e| format!("encode info: {e}"))?,
    );
    Ok(feature_value(session.current_geometry(), properties))
}

fn cmd_info(path: &Path, target: LatLng, config: &ProjectionConfig) -> Result<Value, String> {
    let (_, session) = retargeted(path, target, config)?;
    serde_json::to_value(session.projection_info()).map_err(|e| format!("encode info: {e}"))
}

fn cmd_drag(
    path: &Path,
    trace_path: &Path,
    with_geometry: bool,
    config: ProjectionConfig,
) -> Result<Value, String> {
    let shape = read_shape(path)?;
    let text =
        fs::read_to_string(trace_path).map_err(|e| format!("read {trace_path:?}: {e}"))?;
    let trace: DragTrace =
        serde_json::from_str(&text).map_err(|e| format!("parse {trace_path:?}: {e}"))?;

    let session = ProjectionSession::from_geometry(shape.geometry).map_err(|e| e.to_string())?;
    let mut controller =
        ProjectionController::with_session(session, config).map_err(|e| e.to_string())?;

    let mut rejected = 0;
    let mut superseded = 0;
    for ev in &trace.events {
        let now = Time::from_millis(ev.t_ms);
        match controller.request_update(&trace.viewport, ev.x, ev.y, now) {
            UpdateOutcome::Rejected => rejected += 1,
            UpdateOutcome::Superseded => superseded += 1,
            UpdateOutcome::Scheduled => {}
        }
        if let Err(e) = controller.tick(now) {
            warn!(t_ms = ev.t_ms, "{e}");
        }
    }
    // Pointer released: whatever is still pending runs now.
    controller.flush().map_err(|e| e.to_string())?;
    info!(
        events = trace.events.len(),
        recomputes = controller.recompute_count(),
        "drag replayed"
    );

    let report = DragReport {
        events: trace.events.len(),
        rejected,
        superseded,
        recomputes: controller.recompute_count(),
        info: controller.projection_info(),
        geometry: with_geometry.then(|| formats::geometry_to_value(controller.current_geometry())),
    };
    serde_json::to_value(&report).map_err(|e| format!("encode report: {e}"))
}
