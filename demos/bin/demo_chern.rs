//! Chern Insulator Demo
//!
//! Sweeps the mass of the two-band Qi–Wu–Zhang model and reports the Chern
//! number of the lower band at each point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use photq_demos::{create_spinner, print_header, print_info, print_result, print_section};
use photq_sim::lindblad::linspace;
use photq_sim::topology::{BrillouinZoneGrid, berry_curvature, sweep};
use photq_sim::DenseEigensolver;

#[derive(Parser, Debug)]
#[command(name = "demo-chern")]
#[command(about = "Chern number of a two-band Chern insulator versus mass")]
struct Args {
    /// Points per Brillouin-zone axis
    #[arg(short, long, default_value = "30")]
    grid: usize,

    /// First mass of the sweep
    #[arg(long, default_value = "-3.0", allow_hyphen_values = true)]
    start: f64,

    /// Last mass of the sweep
    #[arg(long, default_value = "3.0", allow_hyphen_values = true)]
    stop: f64,

    /// Number of sweep points
    #[arg(short, long, default_value = "25")]
    points: usize,

    /// Print the flux map at this mass
    #[arg(long, allow_hyphen_values = true)]
    map: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    print_header("Chern Insulator Phase Diagram");

    print_section("Setup");
    print_result("Grid", format!("{0}×{0}", args.grid));
    print_result("Masses", format!("{} .. {} ({} points)", args.start, args.stop, args.points));

    let solver = DenseEigensolver::default();
    let masses = linspace(args.start, args.stop, args.points);

    let spinner = create_spinner("Sweeping mass...");
    let points = sweep(&masses, args.grid, &solver)?;
    spinner.finish_with_message("Sweep complete");

    print_section("Chern Number vs Mass");
    for p in &points {
        let label = match p.rounded() {
            Some(0) => "trivial".to_string(),
            Some(c) => format!("topological (C = {c:+})"),
            None => "gapless".to_string(),
        };
        println!("  m = {:+.3}  C = {:+.4}  {}", p.mass, p.chern, label);
    }

    if let Some(mass) = args.map {
        print_section(&format!("Berry Flux Map (m = {mass})"));
        let grid = BrillouinZoneGrid::uniform(args.grid)?;
        let curvature = berry_curvature(&grid, mass, &solver)?;
        let peak = curvature.flux.iter().map(|f| f.abs()).fold(0.0, f64::max);
        for j in (0..args.grid).rev() {
            let row: String = (0..args.grid)
                .map(|i| shade(curvature.flux[(i, j)], peak))
                .collect();
            println!("  {row}");
        }
        print_result("Total flux / 2π", format!("{:.4}", curvature.chern));
    }

    println!();
    print_info("Phase boundaries sit where the gap closes, at m = -2, 0 and 2");
    Ok(())
}

/// Map a flux value onto a character ramp, signed by ±.
fn shade(value: f64, peak: f64) -> char {
    const RAMP: [char; 5] = [' ', '.', ':', '*', '#'];
    if !value.is_finite() {
        return '?';
    }
    if peak <= 0.0 {
        return RAMP[0];
    }
    let level = ((value.abs() / peak) * (RAMP.len() - 1) as f64).round() as usize;
    RAMP[level.min(RAMP.len() - 1)]
}
