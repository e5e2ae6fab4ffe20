//! academy CLI: assessment reports and invoices from the command line.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "academy",
    version,
    about = "Sports academy assessment reports and invoices"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate assessment sessions for a roster
    Sessions {
        /// Roster JSON file, or a directory of `<batch>.json` rosters
        #[arg(long)]
        roster: PathBuf,

        /// Batch to pick when --roster is a directory
        #[arg(long)]
        batch: Option<String>,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Day after the last possible session (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,

        /// Seed for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,

        /// Save the sessions as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build a physical-assessment report
    Report {
        /// Previously saved sessions JSON
        #[arg(long, conflicts_with = "roster")]
        sessions: Option<PathBuf>,

        /// Roster JSON file or batch directory (sessions are generated from it)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Day after the last possible session (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Report on a single session id
        #[arg(long, conflicts_with = "summary")]
        session: Option<u32>,

        /// Report on all sessions together
        #[arg(long)]
        summary: bool,

        /// School name for the report header
        #[arg(long)]
        school: Option<String>,

        /// Batch name for the report header and roster directory lookup
        #[arg(long)]
        batch: Option<String>,

        /// Seed for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Save the report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Save the report as JSON under the configured output directory
        #[arg(long, conflicts_with = "output")]
        save: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a billing invoice
    Invoice {
        /// Invoice number
        #[arg(long, default_value = "")]
        number: String,

        /// Invoice date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Who the invoice is addressed to
        #[arg(long)]
        billed_to: Option<String>,

        /// Billing period start (default: invoice date)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Billing period end (default: invoice date)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of coaching sessions
        #[arg(long)]
        coaching_sessions: Option<u32>,

        /// Rate per coaching session
        #[arg(long)]
        rate: Option<f64>,

        /// Tournament fee
        #[arg(long)]
        tournament: Option<f64>,

        /// Extra line item as "description=amount" (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,

        /// Free-text notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Save the invoice payload as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write an amount in words
    Words {
        /// Amount in rupees (paise are dropped)
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Create starter config and example roster
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("academy=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sessions {
            roster,
            batch,
            from,
            to,
            seed,
            output,
            config,
        } => commands::sessions::execute(roster, batch, from, to, seed, output, config),
        Commands::Report {
            sessions,
            roster,
            from,
            to,
            session,
            summary,
            school,
            batch,
            seed,
            format,
            output,
            save,
            config,
        } => commands::report::execute(commands::report::ReportArgs {
            sessions,
            roster,
            from,
            to,
            session,
            summary,
            school,
            batch,
            seed,
            format,
            output,
            save,
            config,
        }),
        Commands::Invoice {
            number,
            date,
            billed_to,
            from,
            to,
            coaching_sessions,
            rate,
            tournament,
            items,
            notes,
            format,
            output,
            config,
        } => commands::invoice::execute(commands::invoice::InvoiceArgs {
            number,
            date,
            billed_to,
            from,
            to,
            coaching_sessions,
            rate,
            tournament,
            items,
            notes,
            format,
            output,
            config,
        }),
        Commands::Words { amount } => commands::words::execute(amount),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        if e
            .downcast_ref::<academy_core::AcademyError>()
            .is_some_and(|e| e.is_filter_error())
        {
            eprintln!("Hint: pass --from/--to and either --session ID or --summary.");
        }
        process::exit(1);
    }
}
