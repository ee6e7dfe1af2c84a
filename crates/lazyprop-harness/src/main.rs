use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lazyprop_harness::{
    logging, CountingAllocator, Harness, HarnessConfig, MemoryUnits, ResultAggregator,
    StrategySet,
};
use std::io::Write;
use std::path::PathBuf;

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator::new();

fn cli() -> Command {
    Command::new("lazyprop-bench")
        .version(lazyprop_harness::VERSION)
        .about("Compare lazy property storage strategies by construction time and memory")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (RUST_LOG overrides)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Run one trial per (count, strategy) pair")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file; flags override its values"),
                )
                .arg(
                    Arg::new("counts")
                        .long("counts")
                        .value_delimiter(',')
                        .value_parser(value_parser!(usize))
                        .help("Comma-separated instance counts"),
                )
                .arg(
                    Arg::new("access-handles")
                        .long("access-handles")
                        .action(ArgAction::SetTrue)
                        .help("Materialize every handle while constructing"),
                )
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .short('s')
                        .action(ArgAction::Append)
                        .help("Strategy to run; repeat for several (default: all)"),
                )
                .arg(
                    Arg::new("units")
                        .long("units")
                        .value_parser(value_parser!(MemoryUnits))
                        .help("Units for human-readable memory"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print results as JSON"),
                )
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .action(ArgAction::SetTrue)
                        .requires("json")
                        .help("Group JSON output per count"),
                ),
        )
        .subcommand(Command::new("strategies").about("List built-in strategies"))
}

fn load_config(args: &ArgMatches) -> anyhow::Result<HarnessConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => HarnessConfig::new(),
    };
    if let Some(counts) = args.get_many::<usize>("counts") {
        config = config.with_counts(counts.copied().collect());
    }
    if args.get_flag("access-handles") {
        config = config.with_access_handles(true);
    }
    if let Some(names) = args.get_many::<String>("strategy") {
        config = config.with_strategies(names.cloned().collect());
    }
    if let Some(units) = args.get_one::<MemoryUnits>("units") {
        config = config.with_units(*units);
    }
    Ok(config)
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let mut harness = Harness::from_config(&config)?;
    let json = args.get_flag("json");

    let mut stdout = std::io::stdout().lock();
    let mut aggregator = ResultAggregator::new();
    for result in harness.trials(&config.counts, config.access_handles)? {
        let result = result?;
        if !json {
            writeln!(stdout, "{result}")?;
        }
        aggregator.record(result);
    }

    if json {
        if args.get_flag("rows") {
            serde_json::to_writer_pretty(&mut stdout, &aggregator.rows())?;
        } else {
            serde_json::to_writer_pretty(&mut stdout, aggregator.results())?;
        }
        writeln!(stdout)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    logging::init(matches.get_count("verbose"), matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("strategies", _)) => {
            for name in StrategySet::builtin_names() {
                println!("{name}");
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let matches = cli()
            .try_get_matches_from([
                "lazyprop-bench",
                "run",
                "--counts",
                "10,20",
                "-s",
                "eager",
                "-s",
                "named-map",
                "--units",
                "binary",
                "--access-handles",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let config = load_config(args).unwrap();
        assert_eq!(config.counts, vec![10, 20]);
        assert_eq!(
            config.strategies,
            Some(vec!["eager".to_string(), "named-map".to_string()])
        );
        assert_eq!(config.units, MemoryUnits::Binary);
        assert!(config.access_handles);
    }
}
