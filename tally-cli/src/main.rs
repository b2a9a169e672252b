use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tally_core::{Category, Counterparty, classify, describe};
use tally_report::Layout;

mod config;
mod interactive;
mod process;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "tally", version = VERSION, about = "Categorize bank statements into an Excel report")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Categorize a CSV or PDF statement and write an .xlsx report
    Process {
        /// Statement file (.csv Bank of Valletta export, .pdf Wamo statement)
        input: PathBuf,

        /// Report path (default: <output.dir>/<output.prefix><input stem>.xlsx)
        output: Option<PathBuf>,

        /// Column layout for the INCOMING / OUTGOING sheets
        #[arg(long)]
        layout: Option<Layout>,

        /// Open the report once written
        #[arg(long)]
        open: bool,
    },

    /// Guided prompts: pick a statement, review the summary, write the report
    Interactive,

    /// Show how a single statement description is categorized
    Classify {
        description: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file (left alone if it exists)
    Init,
    /// Print the effective config
    Show,
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    description: &'a str,
    category: Category,
    label: String,
    invoice: String,
    counterparty: Counterparty,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Process {
            input,
            output,
            layout,
            open,
        } => {
            let cfg = config::load_config()?;
            let (format, ledger) = process::load_ledger(&input)?;
            let output = output.unwrap_or_else(|| cfg.default_output(&input));

            process::print_summary(format, &ledger);
            process::render(&ledger, &output, &cfg.report_options(format, layout))?;
            println!("\nWrote {}", output.display());

            if open {
                process::open_or_warn(&output);
            }
        }

        Command::Interactive => {
            let cfg = config::load_config()?;
            interactive::run_interactive(&cfg)?;
        }

        Command::Classify { description, json } => {
            let c = describe(&description);

            if json {
                let out = ClassifyOutput {
                    description: &description,
                    category: classify(&description),
                    label: c.category,
                    invoice: c.invoice_ref,
                    counterparty: c.counterparty,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("category:     {}", c.category);
                println!("invoice:      {}", c.invoice_ref);
                println!("counterparty: {}", c.counterparty);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
