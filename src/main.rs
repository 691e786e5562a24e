// SPDX-License-Identifier: (Apache-2.0 OR MIT)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use elfstrings::config::DEFAULT_MIN_LENGTH;
use elfstrings::{driver, logger, AllocMatch, Config, Dictionary, SpellChecker, SpellMode};

/// Print the string literals found in the read-only data of ELF files.
#[derive(Parser, Debug)]
#[command(name = "elfstrings", version, about)]
struct Cli {
    /// Minimum string length to display.
    #[arg(short = 'n', long, default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    /// Spell check string literals.
    #[arg(short, long, value_enum, default_value = "none")]
    spell: SpellMode,

    /// Dictionary locale, defaults to the locale of the environment.
    #[arg(short, long)]
    locale: Option<String>,

    /// Dictionary file to use instead of looking one up by locale.
    #[arg(short, long)]
    dict: Option<PathBuf>,

    /// Scan PROGBITS sections carrying ALLOC among other flags, not only those
    /// flagged exactly ALLOC.
    #[arg(long)]
    any_alloc: bool,

    /// Keep scanning the remaining files after one fails.
    #[arg(short, long)]
    keep_going: bool,

    /// More logging on stderr, repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// ELF files to scan.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn build_config(cli: &Cli) -> elfstrings::Result<Config> {
    let oracle: Option<Box<dyn SpellChecker>> = match cli.spell {
        SpellMode::None => None,
        _ => {
            let dictionary = match &cli.dict {
                Some(path) => Dictionary::from_path(path)?,
                None => Dictionary::initialize(cli.locale.as_deref())?,
            };
            Some(Box::new(dictionary))
        }
    };
    let alloc_match = if cli.any_alloc {
        AllocMatch::AnyAlloc
    } else {
        AllocMatch::Exact
    };
    Ok(Config::new(cli.min_length, cli.spell, oracle)?
        .with_alloc_match(alloc_match)
        .with_keep_going(cli.keep_going))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // Fails only when a logger is already installed, which is fine to keep.
    logger::init(logger::level_for_verbosity(cli.verbose)).ok();

    let result = build_config(&cli)
        .and_then(|config| driver::run(&cli.files, &config, std::io::stdout().lock()));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::FAILURE
        }
    }
}
