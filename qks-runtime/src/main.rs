use anyhow::{anyhow, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use qks_api::Api;
use qks_model::{knapsack_model, solve_and_report, Instance, KNAPSACK_LABEL};
use qks_structs::config::SolverConfig;
use qks_utils::jsonify_pretty;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn instance_arg() -> clap::Arg {
    arg!([INSTANCE] "Path to the instance json file")
        .default_value("instance.json")
        .value_parser(value_parser!(PathBuf))
}

fn with_connection_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(--endpoint [URL] "Solver API endpoint (default: $QKS_API_ENDPOINT)")
            .value_parser(value_parser!(String)),
    )
    .arg(
        arg!(--token [TOKEN] "Solver API token (default: $QKS_API_TOKEN)")
            .value_parser(value_parser!(String)),
    )
    .arg(
        arg!(--solver [SOLVER] "Solver id (default: $QKS_API_SOLVER)")
            .long_help("Solver id. Defaults to $QKS_API_SOLVER, else the newest hybrid CQM solver")
            .value_parser(value_parser!(String)),
    )
    .arg(
        arg!(--"time-limit" [SECS] "Time limit in seconds (default: solver minimum)")
            .value_parser(value_parser!(f64)),
    )
    .arg(
        arg!(--"poll-interval" [MS] "Milliseconds between status polls")
            .value_parser(value_parser!(u64)),
    )
    .arg(
        arg!(--config [CONFIG] "Config json string or path to json file")
            .value_parser(value_parser!(String)),
    )
}

fn cli() -> Command {
    Command::new("qks")
        .about("Solves knapsack instances on a remote hybrid CQM solver")
        .arg_required_else_help(true)
        .subcommand(with_connection_args(
            Command::new("solve")
                .about("Submits an instance and prints the best feasible selection")
                .arg(instance_arg())
                .arg(
                    arg!(--label [LABEL] "Problem label shown by the solver service")
                        .default_value(KNAPSACK_LABEL)
                        .value_parser(value_parser!(String)),
                ),
        ))
        .subcommand(
            Command::new("model")
                .about("Prints the model that would be submitted for an instance")
                .arg(instance_arg()),
        )
        .subcommand(with_connection_args(
            Command::new("solvers").about("Lists remote solvers that accept CQM problems"),
        ))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => match load_config(sub_m) {
            Ok(config) => {
                solve(
                    sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
                    sub_m.get_one::<String>("label").unwrap().clone(),
                    config,
                )
                .await
            }
            Err(e) => Err(e),
        },
        Some(("model", sub_m)) => {
            print_model(sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone())
        }
        Some(("solvers", sub_m)) => match load_config(sub_m) {
            Ok(config) => list_solvers(config).await,
            Err(e) => Err(e),
        },
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Flags win over environment variables, which win over the config file.
fn load_config(sub_m: &ArgMatches) -> Result<SolverConfig> {
    let flags = SolverConfig {
        endpoint: sub_m.get_one::<String>("endpoint").cloned(),
        token: sub_m.get_one::<String>("token").cloned(),
        solver: sub_m.get_one::<String>("solver").cloned(),
        time_limit: sub_m.get_one::<f64>("time-limit").cloned(),
        poll_interval_ms: sub_m.get_one::<u64>("poll-interval").cloned(),
    };
    let file = match sub_m.get_one::<String>("config") {
        Some(arg) => SolverConfig::load(arg)?,
        None => SolverConfig::default(),
    };
    Ok(flags.merge(SolverConfig::from_env()).merge(file))
}

pub async fn solve(instance_path: PathBuf, label: String, config: SolverConfig) -> Result<()> {
    let instance = Instance::from_file(&instance_path)?;
    info!(
        "loaded {} items from {} (max weight {})",
        instance.num_items(),
        instance_path.display(),
        instance.max_weight
    );
    let api = Api::from_config(&config)?;
    info!("connecting to {}", api.api_url());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    solve_and_report(&api, &instance, &label, &mut out).await?;
    Ok(())
}

pub fn print_model(instance_path: PathBuf) -> Result<()> {
    let instance = Instance::from_file(&instance_path)?;
    let cqm = knapsack_model(&instance)?;
    println!("{}", jsonify_pretty(&cqm));
    Ok(())
}

pub async fn list_solvers(config: SolverConfig) -> Result<()> {
    let api = Api::from_config(&config)?;
    let solvers = api.get_cqm_solvers().await?;
    if solvers.is_empty() {
        println!("No solvers accept CQM problems.");
    }
    for solver in solvers {
        let min_time = solver
            .minimum_time_limit()
            .map_or("-".to_string(), |t| format!("{}s", t));
        println!(
            "{} (status: {}, minimum time limit: {})",
            solver.id,
            solver.status.as_deref().unwrap_or("UNKNOWN"),
            min_time
        );
    }
    Ok(())
}
