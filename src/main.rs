use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use csvbook::convert::StdoutReporter;
use csvbook::logging::{init_logging, level_from_verbosity};
use csvbook::{Converter, ConverterConfig, Result};

const PROMPT: &str = "Enter the folder path containing CSV files: ";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(level_from_verbosity(cli.verbose))?;

    let directory = match cli.directory {
        Some(directory) => directory,
        None => prompt_directory()?,
    };

    let config = ConverterConfig::default()
        .with_max_files(usize::from(cli.max_files))
        .with_output_prefix(cli.prefix);

    Converter::new(config).convert(&directory, &mut StdoutReporter)?;
    Ok(())
}

fn prompt_directory() -> Result<PathBuf> {
    let mut stdout = io::stdout();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Collect the CSV files of a folder into one multi-sheet Excel workbook."
)]
struct Cli {
    /// Folder to scan. Prompted for when omitted.
    directory: Option<PathBuf>,

    /// Maximum number of CSV files to turn into sheets.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    max_files: u16,

    /// Text placed before the timestamp in the workbook file name.
    #[arg(long, default_value = "test-data-load-")]
    prefix: String,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}
