// Binary entry point for the command-line parser.
use anyhow::{Context, Result};
use log::LevelFilter;
use std::io::Read;
use taskdraft::cli::{CliArgs, print_help};
use taskdraft::config::Config;
use taskdraft::context::StandardContext;
use taskdraft::logging::init_logging;
use taskdraft::model::TranscriptParser;

fn main() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1));

    if args.help {
        print_help("taskdraft");
        return Ok(());
    }
    if args.version {
        println!("taskdraft {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let ctx = StandardContext::new(args.override_root.clone());
    let config = Config::load_or_default(&ctx)?;

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.level_filter()
    };
    init_logging(level)?;

    let transcript = match args.transcript {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read transcript from stdin")?;
            buf
        }
    };

    let parser = TranscriptParser::new();
    let response = parser.respond(&transcript);

    if config.show_review_hints {
        let flagged = response
            .parsed
            .confidence
            .fields_below(config.review_threshold());
        if !flagged.is_empty() {
            eprintln!("Please review: {}", flagged.join(", "));
        }
    }

    let json = match (args.envelope, args.compact || !config.pretty) {
        (true, true) => serde_json::to_string(&response)?,
        (true, false) => serde_json::to_string_pretty(&response)?,
        (false, true) => serde_json::to_string(&response.parsed)?,
        (false, false) => serde_json::to_string_pretty(&response.parsed)?,
    };
    println!("{}", json);
    Ok(())
}
