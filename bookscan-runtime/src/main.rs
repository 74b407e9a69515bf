use anyhow::{anyhow, Result};
use bookscan_algorithms::book_scanning::{find, names, ALGORITHMS, DEFAULT_ALGORITHM};
use bookscan_challenges::book_scanning::Track;
use bookscan_runtime::{compute_solution, generate_instance, verify_solution, RunSettings};
use bookscan_utils::{default_output_path, jsonify, load_json_object};
use clap::{arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("bookscan")
        .about("Computes or verifies book scanning solutions")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compute_solution")
                .about("Runs an algorithm on an input file and writes the submission")
                .arg(
                    arg!(-i --input <INPUT> "Path to the input file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-o --output [OUTPUT] "Path of the submission file (default ./out/<input file name>)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--algorithm [ALGORITHM] "Algorithm to run, see list_algorithms")
                        .default_value(DEFAULT_ALGORITHM)
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--checkpoints "Write <output>.score_<N> for every improvement, whatever the algorithm")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--report "Print a json run report to stdout")
                        .action(ArgAction::SetTrue),
                )
                .arg(arg!(-v --verbose "Log at debug level").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a submission file and prints its score")
                .arg(
                    arg!(<INPUT> "Path to the input file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SUBMISSION> "Path to the submission file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(arg!(-v --verbose "Log at debug level").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("generate_instance")
                .about("Generates a random input file")
                .arg(
                    arg!(<SEED> "Any string, hashed into the random seed")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<TRACK> "Instance size, e.g. books=1000,libraries=50,days=100")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-o --output [OUTPUT] "If set, the instance is saved to this path instead of printed")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("list_algorithms")
                .about("Lists the available algorithms, or describes one in detail")
                .arg(
                    arg!([ALGORITHM] "Print the help and hyperparameters of this algorithm")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn init_logger(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level_filter)
        .parse_default_env()
        .init();
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("compute_solution", sub_m)) => {
            init_logger(sub_m.get_flag("verbose"));
            run_compute_solution(sub_m)
        }
        Some(("verify_solution", sub_m)) => {
            init_logger(sub_m.get_flag("verbose"));
            run_verify_solution(sub_m)
        }
        Some(("generate_instance", sub_m)) => {
            init_logger(false);
            run_generate_instance(sub_m)
        }
        Some(("list_algorithms", sub_m)) => list_algorithms(sub_m.get_one::<String>("ALGORITHM")),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_compute_solution(sub_m: &ArgMatches) -> Result<()> {
    let input = sub_m
        .get_one::<PathBuf>("input")
        .cloned()
        .ok_or_else(|| anyhow!("Missing input file"))?;
    let output = match sub_m.get_one::<PathBuf>("output") {
        Some(output) => output.clone(),
        None => default_output_path(&std::env::current_dir()?, &input),
    };
    let hyperparameters = sub_m
        .get_one::<String>("hyperparameters")
        .map(|h| load_json_object(h))
        .transpose()?;
    let settings = RunSettings {
        input,
        output,
        algorithm: sub_m
            .get_one::<String>("algorithm")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
        hyperparameters,
        checkpoints: sub_m.get_flag("checkpoints"),
    };

    let report = compute_solution(&settings)?;
    println!("score: {}", report.score);
    if sub_m.get_flag("report") {
        println!("{}", jsonify(&report));
    }
    Ok(())
}

fn run_verify_solution(sub_m: &ArgMatches) -> Result<()> {
    let (input, submission) = match (
        sub_m.get_one::<PathBuf>("INPUT"),
        sub_m.get_one::<PathBuf>("SUBMISSION"),
    ) {
        (Some(input), Some(submission)) => (input, submission),
        _ => return Err(anyhow!("Missing input or submission file")),
    };
    let score = verify_solution(input, submission)?;
    println!("score: {}", score);
    Ok(())
}

fn run_generate_instance(sub_m: &ArgMatches) -> Result<()> {
    let (seed, track) = match (
        sub_m.get_one::<String>("SEED"),
        sub_m.get_one::<String>("TRACK"),
    ) {
        (Some(seed), Some(track)) => (seed, track.parse::<Track>()?),
        _ => return Err(anyhow!("Missing seed or track")),
    };
    let output = sub_m.get_one::<PathBuf>("output");
    let text = generate_instance(seed, &track, output.map(|p| p.as_path()))?;
    if output.is_none() {
        print!("{}", text);
    }
    Ok(())
}

fn list_algorithms(algorithm: Option<&String>) -> Result<()> {
    if let Some(name) = algorithm {
        let entry = find(name).ok_or_else(|| {
            anyhow!("Unknown algorithm '{}'. Available: {}", name, names().join(", "))
        })?;
        (entry.help)();
        return Ok(());
    }
    for entry in ALGORITHMS {
        println!("{:<22}{}", entry.name, entry.description);
    }
    Ok(())
}
