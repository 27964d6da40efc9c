use clap::{Args, Parser, Subcommand};
use fin_app::{AppError, AppResult, FinConfig, Session, SolveEvent, SubmitOutcome, config};
use fin_core::units;
use fin_results::{ResultSnapshot, export_png, export_table, load_table};
use fin_solver::{ParameterUpdate, Preset};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uom::si::area::square_millimeter;
use uom::si::length::millimeter;
use uom::si::power::watt;
use uom::si::thermodynamic_temperature::degree_celsius;

#[derive(Parser)]
#[command(name = "fin-cli")]
#[command(about = "Fin analyzer CLI - straight rectangular fin with adiabatic tip", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the fin and print its performance metrics
    Solve {
        /// YAML config with starting parameters and presets
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Preset id applied on top of the config
        #[arg(short, long)]
        preset: Option<String>,
        #[command(flatten)]
        overrides: ParamArgs,
        /// Number of profile samples (default from config, else 300)
        #[arg(short = 'n', long)]
        points: Option<usize>,
        /// Write the profile table (CSV) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Plot the temperature profile to this PNG file
        #[arg(long)]
        png: Option<PathBuf>,
        /// Print the full result snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available presets
    Presets {
        /// YAML config with extra presets
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Summarize a previously exported profile table
    Inspect {
        /// Path to the CSV table
        path: PathBuf,
    },
}

/// Individual parameter overrides; applied last.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Thermal conductivity k [W/(m·K)]
    #[arg(long, allow_negative_numbers = true)]
    k: Option<f64>,
    /// Convective coefficient h [W/(m²·K)]
    #[arg(long, allow_negative_numbers = true)]
    h: Option<f64>,
    /// Fin thickness t [m]
    #[arg(long, alias = "t", allow_negative_numbers = true)]
    thickness: Option<f64>,
    /// Fin width b [m]
    #[arg(long, alias = "b", allow_negative_numbers = true)]
    width: Option<f64>,
    /// Fin length L [m]
    #[arg(long, allow_negative_numbers = true)]
    length: Option<f64>,
    /// Base temperature Tb [K]
    #[arg(long, allow_negative_numbers = true)]
    tb: Option<f64>,
    /// Ambient temperature Tinf [K]
    #[arg(long, allow_negative_numbers = true)]
    tinf: Option<f64>,
}

impl ParamArgs {
    fn update(&self) -> ParameterUpdate {
        ParameterUpdate {
            k: self.k,
            h: self.h,
            thickness: self.thickness,
            width: self.width,
            length: self.length,
            t_base: self.tb,
            t_inf: self.tinf,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            preset,
            overrides,
            points,
            output,
            png,
            json,
        } => cmd_solve(
            config.as_deref(),
            preset.as_deref(),
            &overrides,
            points,
            Exports {
                table: output.as_deref(),
                png: png.as_deref(),
                json,
            },
        ),
        Commands::Presets { config } => cmd_presets(config.as_deref()),
        Commands::Inspect { path } => cmd_inspect(&path),
    }
}

fn load_config(path: Option<&Path>) -> AppResult<FinConfig> {
    match path {
        Some(path) => config::load_yaml(path),
        None => Ok(FinConfig::default()),
    }
}

/// Where `solve` sends its result.
struct Exports<'a> {
    table: Option<&'a Path>,
    png: Option<&'a Path>,
    json: bool,
}

fn cmd_solve(
    config_path: Option<&Path>,
    preset: Option<&str>,
    overrides: &ParamArgs,
    points: Option<usize>,
    exports: Exports<'_>,
) -> AppResult<()> {
    let cfg = load_config(config_path)?;

    let mut update = cfg.parameters;
    if let Some(id) = preset {
        update = update.merge(cfg.find_preset(id)?.update);
    }
    update = update.merge(overrides.update());
    tracing::debug!(?update, "parameters composed");

    let mut session = Session::new(points.unwrap_or(cfg.sample_count));
    session.apply(&update);
    println!("Solving fin: {}", session.params());

    if session.run()? == SubmitOutcome::AlreadyRunning {
        println!("Solver is already running");
        return Ok(());
    }

    match session.wait()? {
        SolveEvent::Completed { .. } => {}
        SolveEvent::Failed { message, .. } => return Err(AppError::SolveFailed(message)),
    }
    let snapshot = session.snapshot().ok_or(AppError::NothingPending)?;

    if exports.json {
        println!("{}", snapshot.to_json()?);
    } else {
        print_metrics(&snapshot);
    }

    if let Some(path) = exports.table {
        let exported = export_table(&session.snapshot_cell(), path)?;
        println!(
            "✓ Exported {} samples to {}",
            exported.result.len(),
            path.display()
        );
    }
    if let Some(path) = exports.png {
        export_png(&session.snapshot_cell(), path)?;
        println!("✓ Plotted profile to {}", path.display());
    }
    Ok(())
}

fn print_metrics(snapshot: &ResultSnapshot) {
    print!("{}", format_metrics(snapshot));
}

fn format_metrics(snapshot: &ResultSnapshot) -> String {
    let result = &snapshot.result;
    let m = &result.metrics;
    let short_id = snapshot.run_id.get(..12).unwrap_or(&snapshot.run_id);
    let mut lines = vec![
        format!("✓ Solved ({} samples, run {})", result.len(), short_id),
        format!("  Q   = {:.2} W", m.heat_rate().get::<watt>()),
        format!("  eta = {:.3} (-)", m.eta),
        format!("  eps = {:.3} (-)", m.eps),
        format!("  m   = {:.1} 1/m  (m·L = {:.3})", m.m, result.ml()),
        format!(
            "  Ac  = {:.2} mm², P = {:.2} mm",
            m.cross_section().get::<square_millimeter>(),
            m.perimeter_length().get::<millimeter>()
        ),
    ];
    if let (Some(base), Some(tip)) = (result.base_temperature(), result.tip_temperature()) {
        lines.push(format!(
            "  T(0) = {:.2} K, T(L) = {:.2} K ({:.2} °C)",
            base,
            tip,
            units::k(tip).get::<degree_celsius>()
        ));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn cmd_presets(config_path: Option<&Path>) -> AppResult<()> {
    let cfg = load_config(config_path)?;
    println!("Presets:");
    for preset in cfg.presets() {
        println!("  {:<16} {}", preset.id, describe_preset(&preset));
    }
    Ok(())
}

fn describe_preset(preset: &Preset) -> String {
    let u = &preset.update;
    let fields = [
        ("k", u.k),
        ("h", u.h),
        ("t", u.thickness),
        ("b", u.width),
        ("L", u.length),
        ("Tb", u.t_base),
        ("Tinf", u.t_inf),
    ];
    let changes: Vec<String> = fields
        .iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
        .collect();
    if preset.name.is_empty() {
        changes.join(" ")
    } else {
        format!("{} [{}]", preset.name, changes.join(" "))
    }
}

fn cmd_inspect(path: &Path) -> AppResult<()> {
    let table = load_table(path)?;
    println!("Table: {}", path.display());
    println!("  Parameters: {}", table.params);
    println!("  m = {:.1} 1/m, Q = {:.2} W", table.m, table.q);
    println!("  eta = {:.3}, eps = {:.3}", table.eta, table.eps);
    println!("  Samples: {}", table.positions.len());
    let t_min = table.temperatures.iter().copied().fold(f64::INFINITY, f64::min);
    let t_max = table
        .temperatures
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !table.temperatures.is_empty() {
        println!("  T range: {:.2} - {:.2} K", t_min, t_max);
    }
    Ok(())
}
