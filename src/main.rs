use clap::{crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches, Command};
use hinagata::{GenerateOptions, Mode};
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("manifest")
                .help("Built-in preset name or path to a .toml manifest [default: service]"),
        )
        .arg(
            Arg::new("base")
                .short('o')
                .long("base")
                .value_name("DIR")
                .help("Directory to scaffold into, instead of the manifest's own base"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Preview what would be created without writing anything")
                .action(ArgAction::SetTrue)
                .conflicts_with("interactive"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Pick a preset, preview it, and confirm before writing")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("list").about("List built-in presets"))
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("list", _)) => hinagata::list_presets()?,
        _ => handle_generate(&matches)?,
    }

    Ok(())
}

fn init_logging(is_verbose: bool) {
    let level = if is_verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn handle_generate(args: &ArgMatches) -> Result<(), hinagata::HinagataError> {
    let mode = if args.get_flag("dry-run") {
        Mode::DryRun
    } else if args.get_flag("interactive") {
        Mode::Interactive
    } else {
        Mode::Apply
    };

    let options = GenerateOptions {
        manifest: args.get_one::<String>("manifest").cloned(),
        base: args.get_one::<String>("base").map(PathBuf::from),
        mode,
    };

    hinagata::generate(options)?;

    Ok(())
}
