use clap::{Parser, Subcommand};
use gh_app::{AppError, AppResult, RunProgress, Scenario, SimRecord, scenario};
use gh_components::OutputValue;
use gh_sim::SimOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "gh-cli")]
#[command(about = "Greenhouse lumped-parameter network simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and build its network
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// List components in a scenario
    Components {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// List every port as component.port
    Ports {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Run a transient simulation
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        #[command(flatten)]
        overrides: SimOverrides,
        /// Write the recorded samples as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Run a scenario and export one scalar output as CSV
    ExportSeries {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Component name
        component: String,
        /// Output name (e.g., Q_flow, COP, VP)
        variable: String,
        #[command(flatten)]
        overrides: SimOverrides,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SimOverrides {
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// End time in seconds
    #[arg(long)]
    t_end: Option<f64>,
    /// Record every N-th step
    #[arg(long)]
    record_every: Option<usize>,
}

impl SimOverrides {
    fn apply(&self, base: &SimOptions) -> SimOptions {
        SimOptions {
            dt: self.dt.unwrap_or(base.dt),
            t_end: self.t_end.unwrap_or(base.t_end),
            max_steps: base.max_steps,
            record_every: self.record_every.unwrap_or(base.record_every),
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Components { scenario_path } => cmd_components(&scenario_path),
        Commands::Ports { scenario_path } => cmd_ports(&scenario_path),
        Commands::Run {
            scenario_path,
            overrides,
            json,
        } => cmd_run(&scenario_path, &overrides, json.as_deref()),
        Commands::ExportSeries {
            scenario_path,
            component,
            variable,
            overrides,
            output,
        } => cmd_export_series(
            &scenario_path,
            &component,
            &variable,
            &overrides,
            output.as_deref(),
        ),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario::load_scenario(scenario_path)?;
    let sim = scenario::build_simulation(&scenario)?;
    println!(
        "✓ Scenario is valid ({} components, {} junctions)",
        scenario.components.len(),
        sim.network().junctions().count()
    );
    if let Some(limit) = sim.stable_dt() {
        println!("  explicit stability estimate: dt <= {:.3} s", limit);
    }
    Ok(())
}

fn cmd_components(scenario_path: &Path) -> AppResult<()> {
    let scenario = scenario::load_scenario(scenario_path)?;
    let components = scenario::list_components(&scenario);

    if components.is_empty() {
        println!("No components found in scenario");
    } else {
        println!("Components in {}:", scenario.name);
        for c in components {
            println!("  {} - {}", c.name, c.kind);
        }
    }
    Ok(())
}

fn cmd_ports(scenario_path: &Path) -> AppResult<()> {
    let scenario = scenario::load_scenario(scenario_path)?;
    let sim = scenario::build_simulation(&scenario)?;
    for name in sim.port_names() {
        let connected = sim
            .port(&name)
            .map(|id| sim.network().is_connected(id))
            .unwrap_or(false);
        println!("  {}{}", name, if connected { "" } else { "  (unconnected)" });
    }
    Ok(())
}

fn run_scenario(scenario: &Scenario, options: &SimOptions) -> AppResult<SimRecord> {
    let mut sim = scenario::build_simulation(scenario)?;
    let started = Instant::now();
    let mut last_emit = Instant::now();
    let record = sim.run_with_progress(
        options,
        Some(&mut |p: RunProgress| {
            if last_emit.elapsed().as_millis() >= 100 || p.fraction_complete >= 1.0 {
                render_cli_progress(&p, started.elapsed().as_secs_f64());
                last_emit = Instant::now();
            }
        }),
    );
    clear_progress_line();
    let record = record?;
    info!(
        scenario = %scenario.name,
        samples = record.len(),
        wall_s = started.elapsed().as_secs_f64(),
        "run complete"
    );
    Ok(record)
}

fn cmd_run(scenario_path: &Path, overrides: &SimOverrides, json: Option<&Path>) -> AppResult<()> {
    let scenario = scenario::load_scenario(scenario_path)?;
    let options = overrides.apply(&scenario.sim);
    println!(
        "Running {} (dt={} s, t_end={} s)",
        scenario.name, options.dt, options.t_end
    );

    let record = run_scenario(&scenario, &options)?;
    println!("✓ Simulation completed: {} samples", record.len());

    if let Some(last) = record.last() {
        println!("Final state at t = {} s:", last.t);
        for (name, outputs) in &last.outputs {
            let scalars: Vec<String> = outputs
                .iter()
                .filter_map(|(k, v)| match v {
                    OutputValue::Scalar(x) => Some(format!("{}={:.4}", k, x)),
                    _ => None,
                })
                .collect();
            println!("  {:<16} {}", name, scalars.join("  "));
        }
    }

    if let Some(path) = json {
        let content = serde_json::to_string_pretty(&record)
            .map_err(|e| AppError::InvalidInput(format!("Failed to serialize record: {}", e)))?;
        std::fs::write(path, content)?;
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_export_series(
    scenario_path: &Path,
    component: &str,
    variable: &str,
    overrides: &SimOverrides,
    output: Option<&Path>,
) -> AppResult<()> {
    let scenario = scenario::load_scenario(scenario_path)?;
    let options = overrides.apply(&scenario.sim);
    let record = run_scenario(&scenario, &options)?;
    let series = record.scalar_series(component, variable)?;

    // Build CSV
    let mut csv = String::from("time_s,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(p: &RunProgress, elapsed_wall_s: f64) {
    let width = 28usize;
    let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  t={:.1}/{:.1}s  step={}  samples={}  elapsed={:.1}s",
        bar,
        p.fraction_complete * 100.0,
        p.sim_time_s,
        p.t_end_s,
        p.step,
        p.samples,
        elapsed_wall_s
    );
    let _ = io::stdout().flush();
}
