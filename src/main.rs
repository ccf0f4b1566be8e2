//! contactdir CLI
//!
//! Interactive contact view by default, plus one-shot `list` and `status`
//! commands for scripts.

use clap::{Parser, Subcommand};
use console::style;
use contactdir::logging::{self, LogTarget, Verbosity};
use contactdir::view::{self, View};
use contactdir::{
    diagnostics, AppConfig, ConnectionStatus, Contact, ContactSource, FetchController,
    MemorySource, RestClient, ServiceConfig,
};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use unicode_width::UnicodeWidthStr;

/// contactdir - browse and search a contacts table
///
/// Reads SUPABASE_URL and SUPABASE_ANON_KEY from the environment unless
/// --fixture points at a local JSON file.
#[derive(Parser)]
#[command(name = "contactdir")]
#[command(author = "contactdir Contributors")]
#[command(version)]
#[command(about = "Terminal contact directory", long_about = None)]
struct Cli {
    /// Serve contacts from a JSON array file instead of the remote service
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Table holding the contacts
    #[arg(long, global = true, default_value = "contacts")]
    table: String,

    /// Quiet period before a typed query is sent, in milliseconds
    #[arg(long, global = true, default_value_t = 300)]
    debounce_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Log file (the interactive view defaults to contactdir.log next to the binary)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Open the interactive contact view (default)
    Browse {
        /// Query to start with
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Print the contacts matching a query
    List {
        /// Case-insensitive substring of name, email or company (use -- before a leading -)
        #[arg(allow_hyphen_values = true, default_value = "")]
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the connection and count the contacts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Browse {
        query: String::new(),
    });

    let target = match (&command, &cli.log_file) {
        (_, Some(path)) => LogTarget::File(path.clone()),
        (Commands::Browse { .. }, None) => LogTarget::File(logging::default_log_path()),
        (_, None) => LogTarget::Stderr,
    };
    logging::init(target, Verbosity::from_flags(cli.verbose, cli.quiet));
    info!(version = contactdir::VERSION, "contactdir starting up");

    let config = AppConfig {
        table: cli.table.clone(),
        debounce: Duration::from_millis(cli.debounce_ms),
        request_timeout: Duration::from_secs(cli.timeout_secs.max(1)),
        ..AppConfig::default()
    };

    let result = match command {
        Commands::Browse { query } => cmd_browse(&cli, config, query),
        Commands::List { query, json } => cmd_list(&cli, &config, &query, json),
        Commands::Status { json } => cmd_status(&cli, &config, json),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Build the contact source. Service settings are only required (and a
/// missing one is fatal) when no fixture is given.
fn open_source(cli: &Cli, config: &AppConfig) -> contactdir::Result<Arc<dyn ContactSource>> {
    match &cli.fixture {
        Some(path) => Ok(Arc::new(MemorySource::from_json_file(path)?)),
        None => {
            let service = ServiceConfig::from_env()?;
            Ok(Arc::new(RestClient::new(service, config)?))
        }
    }
}

/// Interactive view
fn cmd_browse(cli: &Cli, mut config: AppConfig, query: String) -> contactdir::Result<i32> {
    let source = open_source(cli, &config)?;
    config.initial_query = query;
    contactdir::tui::run(source, &config)?;
    Ok(0)
}

/// One retrieval through the same controller the view uses
fn cmd_list(cli: &Cli, config: &AppConfig, query: &str, json: bool) -> contactdir::Result<i32> {
    let source = open_source(cli, config)?;
    let mut fetch = FetchController::new(source);

    let spinner = if json || cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    spinner.set_message("Fetching contacts...");

    let start = Instant::now();
    fetch.retrieve(query);
    // One extra second so the transport timeout fires first.
    let settled = fetch.wait_until_settled(config.request_timeout + Duration::from_secs(1));
    spinner.finish_and_clear();
    settled?;

    let machine = fetch.machine();
    match view::select(machine, query).view {
        View::ErrorPanel { message } => {
            eprintln!("{}", style(message).red());
            Ok(1)
        }
        _ if json => {
            println!("{}", serde_json::to_string_pretty(machine.contacts())?);
            Ok(0)
        }
        View::Empty { message } => {
            println!("{}", style(message).dim());
            Ok(0)
        }
        View::Table { contacts } => {
            print_table(contacts);
            println!();
            println!(
                "{} {} contacts in {}",
                style("✓").green().bold(),
                style(contacts.len()).green(),
                style(HumanDuration(start.elapsed())).cyan()
            );
            Ok(0)
        }
        View::FullPageSpinner => Ok(0),
    }
}

fn print_table(contacts: &[Contact]) {
    let headers = ["Name", "Email", "Phone", "Company"];
    let cells = |c: &Contact| -> [String; 4] {
        [
            c.name.clone(),
            c.email.clone(),
            c.phone.clone(),
            c.company.clone(),
        ]
    };

    let mut widths = headers.map(|h| h.width());
    for contact in contacts {
        for (w, cell) in widths.iter_mut().zip(cells(contact).iter()) {
            *w = (*w).max(cell.width());
        }
    }

    let pad = |text: &str, width: usize| -> String {
        format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
    };

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", style(header_line.trim_end()).bold().underlined());

    for contact in contacts {
        let [name, email, phone, company] = cells(contact);
        println!(
            "{}  {}  {}  {}",
            style(pad(&name, widths[0])).bold(),
            style(pad(&email, widths[1])).cyan(),
            pad(&phone, widths[2]),
            style(company).green()
        );
    }
}

/// Connection diagnostics
fn cmd_status(cli: &Cli, config: &AppConfig, json: bool) -> contactdir::Result<i32> {
    let source = open_source(cli, config)?;
    let diag = diagnostics::run(source.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&diag)?);
    } else {
        let status = match diag.status {
            ConnectionStatus::Connected => style(diag.status.label()).green().bold(),
            _ => style(diag.status.label()).red().bold(),
        };
        println!("{} {}", style("Connection Status:").bold(), status);
        if let Some(count) = diag.contact_count {
            println!("{} {}", style("Total Contacts:").bold(), count);
        }
    }

    Ok(if diag.status == ConnectionStatus::Connected { 0 } else { 1 })
}
