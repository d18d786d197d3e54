use std::error::Error;

use clap::{Parser, ValueEnum};
use nalgebra::{Vector2, Vector3};
use turret_ballistics::{
    constants, write_trace_file, FiringError, FiringInputs, FiringSolution, FiringSolver,
    SolverConfig, Trace,
};

#[derive(Parser)]
#[command(name = "turret-cli")]
#[command(version = "0.1.0")]
#[command(about = "Drag-aware ballistic firing solutions for a moving turret", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Turret x position (m)
    turret_x: f64,
    /// Turret y position (m)
    turret_y: f64,
    /// Turret z position (m)
    turret_z: f64,
    /// Target x position (m)
    target_x: f64,
    /// Target y position (m)
    target_y: f64,
    /// Target z position (m)
    target_z: f64,
    /// Turret velocity along x (m/s)
    turret_vel_x: f64,
    /// Turret velocity along y (m/s)
    turret_vel_y: f64,
    /// Projectile launch speed (m/s)
    power: f64,

    /// Prefix for the two trajectory dumps, {prefix}initial.dat and {prefix}final.dat
    #[arg(long, default_value = "results")]
    prefix: String,

    /// Quadratic drag constant km
    #[arg(long, default_value_t = constants::DRAG_COEFFICIENT)]
    drag_coefficient: f64,

    /// Gravitational acceleration (m/s^2)
    #[arg(long, default_value_t = constants::GRAVITY_MPS2)]
    gravity: f64,

    /// Integrator local-error tolerance
    #[arg(long, default_value_t = constants::SIM_TOLERANCE)]
    tolerance: f64,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let inputs = FiringInputs {
        turret: Vector3::new(cli.turret_x, cli.turret_y, cli.turret_z),
        target: Vector3::new(cli.target_x, cli.target_y, cli.target_z),
        turret_velocity: Vector2::new(cli.turret_vel_x, cli.turret_vel_y),
        power: cli.power,
    };
    let config = SolverConfig {
        drag_coefficient: cli.drag_coefficient,
        gravity: cli.gravity,
        sim_tolerance: cli.tolerance,
        ..SolverConfig::default()
    };

    let solver = FiringSolver::with_config(inputs, config);
    let mut initial_trace = Trace::new();
    let mut final_trace = Trace::new();
    let solution = solver.solve_traced(Some(&mut initial_trace), Some(&mut final_trace))?;

    let initial_path = format!("{}initial.dat", cli.prefix);
    let final_path = format!("{}final.dat", cli.prefix);
    write_trace_file(&initial_path, inputs.turret, inputs.target, &initial_trace)?;
    write_trace_file(&final_path, inputs.turret, inputs.target, &final_trace)?;

    if !solution.converged {
        eprintln!(
            "warning: {}",
            FiringError::RootFinderNonConvergence {
                iterations: solution.iterations_used,
                residual: solution.landing_error,
            }
        );
    }

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&solution)?),
        OutputFormat::Table => display_solution(&solution, &initial_path, &final_path),
    }

    Ok(())
}

fn display_solution(solution: &FiringSolution, initial_path: &str, final_path: &str) {
    println!("FIRING SOLUTION");
    println!(
        "  launch angle:  {:.4} rad from vertical ({:.2} deg elevation)",
        solution.angle_rad,
        solution.elevation_deg()
    );
    println!("  iterations:    {}", solution.iterations_used);
    println!(
        "  landing error: {:.6} (squared miss distance)",
        solution.landing_error
    );
    println!(
        "  intercept:     t = {:.4} s at ({:.3}, {:.3}, {:.3})",
        solution.intercept_time_s,
        solution.intercept_point[0],
        solution.intercept_point[1],
        solution.intercept_point[2]
    );
    println!("  traces:        {initial_path}, {final_path}");
}
