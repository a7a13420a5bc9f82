//! # Feeder CLI Application
//!
//! Terminal front end for the sizing engine:
//!
//! - `calc` sizes one load described by flags
//! - `batch` sizes every load in a project file
//! - `demo` runs the reference motor feeder
//!
//! Logging goes to stderr and respects `RUST_LOG`; `--verbose` lowers the
//! default level to `debug`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use calc_core::calculations::{calculate, BatchOptions, BatchReport, EnrichedLoad, FailurePolicy, FaultSource};
use calc_core::file_io::{load_project, save_report};
use calc_core::loads::{InstallationMethod, Load, LoadType, StartingMethod};
use calc_core::project::GlobalSettings;
use calc_core::standards::{Standard, StandardsProvider};
use calc_core::CalcError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cable and breaker sizing (IEC / IS / NEC)", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Size a single load
    Calc(CalcArgs),
    /// Size every load in a project file
    Batch {
        /// Project JSON file
        project: PathBuf,
        /// Report each load's failure instead of stopping at the first
        #[arg(long)]
        best_effort: bool,
        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Size the reference 75 kW motor feeder
    Demo,
}

#[derive(clap::Args, Debug)]
struct CalcArgs {
    /// Load identifier
    #[arg(long, default_value = "L-1")]
    id: String,
    #[arg(long, value_enum, default_value_t = Kind::Motor)]
    kind: Kind,
    /// Rated power (kW)
    #[arg(long)]
    power_kw: f64,
    /// System voltage (V)
    #[arg(long)]
    voltage: f64,
    #[arg(long, default_value_t = 3)]
    phases: u8,
    /// One-way cable length (m)
    #[arg(long, required_unless_present = "length_ft", conflicts_with = "length_ft")]
    length: Option<f64>,
    /// One-way cable length (ft)
    #[arg(long)]
    length_ft: Option<f64>,
    #[arg(long, default_value_t = 0.85)]
    power_factor: f64,
    #[arg(long, default_value_t = 0.9)]
    efficiency: f64,
    #[arg(long, value_enum, default_value_t = Installation::Tray)]
    installation: Installation,
    #[arg(long, default_value_t = 1.0)]
    grouping: f64,
    /// Ambient temperature (°C)
    #[arg(long, default_value_t = 40.0)]
    ambient: f64,
    /// Prospective fault level (kA)
    #[arg(long)]
    fault_ka: Option<f64>,
    /// Fault clearing time (s)
    #[arg(long, default_value_t = 0.1)]
    clearing_time: f64,
    /// IEC, IS or NEC
    #[arg(long, default_value = "IEC")]
    standard: Standard,
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Motor,
    Lighting,
    Heating,
    Hvac,
    Pump,
    Socket,
    Transformer,
    Ups,
    Welding,
    Feeder,
    General,
}

impl From<Kind> for LoadType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Motor => LoadType::Motor,
            Kind::Lighting => LoadType::Lighting,
            Kind::Heating => LoadType::Heating,
            Kind::Hvac => LoadType::Hvac,
            Kind::Pump => LoadType::Pump,
            Kind::Socket => LoadType::Socket,
            Kind::Transformer => LoadType::Transformer,
            Kind::Ups => LoadType::Ups,
            Kind::Welding => LoadType::Welding,
            Kind::Feeder => LoadType::Feeder,
            Kind::General => LoadType::General,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Installation {
    Tray,
    Conduit,
    Air,
    Buried,
    Duct,
}

impl From<Installation> for InstallationMethod {
    fn from(method: Installation) -> Self {
        match method {
            Installation::Tray => InstallationMethod::Tray,
            Installation::Conduit => InstallationMethod::Conduit,
            Installation::Air => InstallationMethod::Air,
            Installation::Buried => InstallationMethod::Buried,
            Installation::Duct => InstallationMethod::Duct,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Calc(args) => run_calc(args),
        Commands::Batch {
            project,
            best_effort,
            threads,
            json,
            output,
        } => run_batch(project, best_effort, threads, json, output),
        Commands::Demo => run_demo(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(code = e.error_code(), "{}", e);
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run_calc(args: CalcArgs) -> Result<ExitCode, CalcError> {
    let mut load = Load::new(
        args.id,
        args.kind.into(),
        args.power_kw,
        args.voltage,
        args.phases,
        args.length.unwrap_or_default(),
    )
    .with_power_factor(args.power_factor)
    .with_efficiency(args.efficiency)
    .with_installation(args.installation.into())
    .with_grouping_factor(args.grouping)
    .with_ambient(args.ambient);
    if let Some(feet) = args.length_ft {
        load = load.with_length_ft(feet);
    }
    if let Some(ka) = args.fault_ka {
        load = load.with_fault(ka, args.clearing_time);
    }

    let settings = GlobalSettings {
        standard: args.standard,
        ..GlobalSettings::default()
    };
    let enriched = calculate(&load, &StandardsProvider::new(args.standard), &settings)?;

    if args.json {
        print_json(&enriched)?;
    } else {
        print_enriched(&enriched);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_batch(
    path: PathBuf,
    best_effort: bool,
    threads: usize,
    json: bool,
    output: Option<PathBuf>,
) -> Result<ExitCode, CalcError> {
    let project = load_project(&path)?;
    info!(path = %path.display(), loads = project.loads.len(), "project loaded");

    let policy = if best_effort { FailurePolicy::BestEffort } else { FailurePolicy::FailFast };
    let report = project.run_with(BatchOptions::new(policy).with_threads(threads))?;

    if let Some(out) = &output {
        save_report(&report, out)?;
    }

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    Ok(if report.failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(2) })
}

fn run_demo() -> Result<ExitCode, CalcError> {
    let motor = Load::new("M-101", LoadType::Motor, 75.0, 415.0, 3, 120.0)
        .with_power_factor(0.85)
        .with_efficiency(0.92)
        .with_starting_method(StartingMethod::StarDelta)
        .with_ambient(45.0);

    let settings = GlobalSettings {
        fault_source: Some(FaultSource::FaultLevel { fault_level_ka: 25.0 }),
        ..GlobalSettings::default()
    };

    println!("Feeder - Cable and Breaker Sizing");
    println!("=================================");
    println!();
    println!("75 kW motor, 415 V, 120 m on tray, 45 °C ambient, 25 kA fault level");
    println!();

    let enriched = calculate(&motor, &StandardsProvider::new(Standard::Iec), &settings)?;
    print_enriched(&enriched);

    println!();
    println!("JSON Output (for LLM/API use):");
    print_json(&enriched)?;
    Ok(ExitCode::SUCCESS)
}

fn print_enriched(e: &EnrichedLoad) {
    let cable = &e.cable;
    let vd = e.voltage_drop();

    println!("═══════════════════════════════════════");
    println!("  {} ({}, {})", e.load.id, e.load.load_type.description(), e.standard);
    println!("═══════════════════════════════════════");
    println!();
    println!("Load:");
    println!("  Power:    {:.1} kW at {:.0} V, {}-phase", e.load.power_kw, e.load.voltage_v, e.load.phases);
    println!("  I  = {:.1} A", e.current_a());
    println!("  Ib = {:.1} A", e.design_current_a());
    if let Some(ist) = e.currents.starting_current_a {
        println!("  Ist = {:.1} A", ist);
    }
    println!();
    println!("Cable: {}", cable.designation);
    println!(
        "  Ampacity:     {:.0} A x {:.3} = {:.1} A {}",
        cable.tabulated_ampacity_a,
        cable.derating.factor,
        cable.derated_ampacity_a,
        status_icon(cable.derated_ampacity_a >= e.design_current_a())
    );
    println!(
        "  Voltage drop: {:.2} V ({:.2}% / {:.1}%) {}",
        vd.volts,
        vd.percent,
        cable.voltage_drop_limit_percent,
        status_icon(vd.percent <= cable.voltage_drop_limit_percent)
    );
    match e.short_circuit() {
        Some(sc) => println!(
            "  Withstand:    {:.1} kA for {} s needs {:.1} mm² (k = {:.0})",
            sc.fault_current_ka, sc.clearing_time_s, sc.min_withstand_mm2, sc.k
        ),
        None => println!("  Withstand:    no fault data"),
    }
    println!();
    let curve = e.breaker.curve.map(|c| format!(" curve {}", c)).unwrap_or_default();
    println!(
        "Breaker: {:.0} A {} {}P{}, {:.0} kA",
        e.breaker.rating_a, e.breaker.breaker_type, e.breaker.poles, curve, e.breaker.breaking_capacity_ka
    );
    if e.breaker.escalated {
        println!("  (raised from {:.0} A for breaking capacity)", e.breaker.minimum_rating_a);
    }
    for notice in &e.notices {
        println!("  [NOTE] {}", notice);
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  GOVERNS: {}", e.limiting_factor());
    println!("═══════════════════════════════════════");
}

fn print_report(report: &BatchReport) {
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!("  BATCH {} ({}, {})", report.run_id, report.standard, report.policy);
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "{:<10} {:>9} {:>9}  {:<28} {:>7} {:>6}  {}",
        "Load", "I (A)", "Ib (A)", "Cable", "VD %", "CB A", "Governs"
    );
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(e) => println!(
                "{:<10} {:>9.1} {:>9.1}  {:<28} {:>7.2} {:>6.0}  {}",
                e.load.id,
                e.current_a(),
                e.design_current_a(),
                e.cable.designation,
                e.voltage_drop().percent,
                e.breaker.rating_a,
                e.limiting_factor()
            ),
            Err(err) => println!("{:<10} [FAIL] {}: {}", outcome.load_id, err.error_code(), err),
        }
    }
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!("  {} sized, {} failed", report.succeeded, report.failed);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CalcError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
