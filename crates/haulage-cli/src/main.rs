use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use haulage_model::{assemble, Model, OrderTable, Planner, RouteTable, ShipmentPlan, Solver, TransportError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "haulage")]
#[command(about = "Least-cost transportation planning", long_about = None)]
struct Cli {
    /// Log solver progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a scenario file and print the optimal shipment plan
    Solve {
        /// JSON file with `routes` and `orders`
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Show marginal and reduced costs
        #[arg(short, long)]
        analysis: bool,
        /// Pivot cap across all simplex phases
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
        /// Wall-clock cap for one solve, in milliseconds
        #[arg(long)]
        time_limit_ms: Option<u64>,
        /// Solver tolerance for floating point comparisons
        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,
    },
    /// Validate a scenario file without solving it
    Check {
        /// JSON file with `routes` and `orders`
        file: PathBuf,
    },
}

#[derive(serde::Deserialize)]
struct Scenario {
    routes: RouteTable,
    orders: OrderTable,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            format,
            analysis,
            max_iterations,
            time_limit_ms,
            tolerance,
        } => {
            let scenario = load_scenario(&file);

            let mut solver = Solver::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance);
            if let Some(ms) = time_limit_ms {
                solver = solver.with_time_limit(Duration::from_millis(ms));
            }
            let planner = Planner::new().with_solver(solver);

            let plan = match planner.plan(&scenario.routes, &scenario.orders) {
                Ok(p) => p,
                Err(e) => fail(&e),
            };

            if format == "json" {
                match serde_json::to_string_pretty(&plan) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing plan: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print_plan(&plan, analysis);
            }
        }
        Commands::Check { file } => {
            let scenario = load_scenario(&file);

            let model = match Model::build(&scenario.routes, &scenario.orders) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    fail(&e);
                }
            };
            let constraints = match assemble(&model) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    fail(&e);
                }
            };

            println!("✓ {} is valid", file.display());
            println!("  {} origins", model.origins().len());
            println!("  {} destinations", model.destinations().len());
            println!("  {} routes", scenario.routes.len());
            println!("  {} orders (total {:.2})", scenario.orders.len(), model.total_demand());
            println!("  {} shipment variables", constraints.variables().len());
            println!("  {} constraints", constraints.constraints().len());

            let unordered = model.unordered_destinations();
            if !unordered.is_empty() {
                println!("  destinations without orders: {}", unordered.join(", "));
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(file: &Path) -> Scenario {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_plan(plan: &ShipmentPlan, analysis: bool) {
    println!("Status: OPTIMAL");
    println!("Total cost: {:.2}", plan.total_cost());
    println!();
    println!("Shipments:");
    for s in plan.active() {
        println!(
            "  {:15} -> {:15} {:10.2} @ {:.2}",
            s.origin, s.destination, s.quantity, s.unit_cost
        );
    }

    if analysis {
        println!();
        println!("Analysis:");
        println!();

        println!("Marginal cost per destination:");
        for m in plan.marginal_costs() {
            println!("  {:20} {:10.4}", m.destination, m.marginal_cost);
        }
        println!();

        println!("Reduced costs (routes not in solution):");
        for rc in plan.reduced_costs() {
            if rc.reduced_cost.abs() > 0.001 {
                println!(
                    "  {} -> {} cost must decrease by {:.2} to enter solution",
                    rc.origin, rc.destination, rc.reduced_cost
                );
            }
        }

        if !plan.capped_origins().is_empty() {
            println!();
            println!("Origins at their supply cap:");
            for origin in plan.capped_origins() {
                println!("  - {}", origin);
            }
        }

        println!();
        println!("Simplex pivots: {}", plan.iterations());
    }
}

fn fail(err: &TransportError) -> ! {
    let (status, hint) = match err {
        TransportError::MalformedInput(_) => ("INVALID INPUT", "Fix the route or order table and retry."),
        TransportError::InfeasibleStructure { .. } => (
            "UNREACHABLE DESTINATION",
            "Add a route into the destination or drop its order.",
        ),
        TransportError::Infeasible => ("INFEASIBLE", "No shipment plan satisfies every order."),
        TransportError::SolverInternal(_) => ("SOLVER ERROR", "The solver hit a numerical problem."),
        TransportError::SolverTimeout(_) => ("TIMEOUT", "Raise --max-iterations or --time-limit-ms."),
        TransportError::ResultInconsistency { .. } => (
            "INCONSISTENT RESULT",
            "The plan cost does not match the route table; try a tighter --tolerance.",
        ),
    };
    eprintln!("Status: {}", status);
    eprintln!("  {}", err);
    eprintln!("  {}", hint);
    std::process::exit(1);
}
