//! wal-archive-clean - list or remove archived WAL segments older than a backup

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wal_archive_clean::models::Mode;
use wal_archive_clean::output::write_report;
use wal_archive_clean::{ArchiveRetentionManager, OutputFormat, RetentionError, RunConfig};

const AFTER_HELP: &str = "\
The PATH argument can be either a directory or the path of an archived WAL file.
If PATH is a directory, every WAL file (including .backup files) older than its
newest backup label is listed (--list) or removed (--remove).
If PATH is an archived WAL file, every WAL file older than it is listed (--list)
or removed (--remove).";

/// Default log filter. Per-entry removal failures are already printed by the
/// report, so executor events stay hidden unless verbose or `RUST_LOG` asks.
const DEFAULT_FILTER: &str = "wal_archive_clean=warn,wal_archive_clean::retention::executor=error";
const VERBOSE_FILTER: &str = "wal_archive_clean=info";

/// Clean up PostgreSQL WAL archive files.
#[derive(Parser, Debug)]
#[command(
    name = "wal-archive-clean",
    version,
    arg_required_else_help = true,
    after_help = AFTER_HELP
)]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "remove"])))]
struct Cli {
    /// List the files that can be deleted
    #[arg(long)]
    list: bool,

    /// Remove the older WAL files that can be deleted
    #[arg(long)]
    remove: bool,

    /// Archive directory, or an archived WAL segment or backup label
    path: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Log progress at info level (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mode = if self.remove { Mode::Remove } else { Mode::List };
        RunConfig::new(mode, self.path).with_format(self.format)
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    };

    init_logging(cli.verbose);

    let config = cli.into_config();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let result = run(&config, &mut stdout.lock(), &mut stderr.lock());
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }
    std::process::exit(exit_code_for(&result));
}

/// Help and version requests succeed; every other parse error is a usage error.
fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// 0 for a clean run, 1 if any entry failed, the error's own code when fatal.
fn exit_code_for(result: &anyhow::Result<bool>) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => e
            .downcast_ref::<RetentionError>()
            .map(RetentionError::exit_code)
            .unwrap_or(1),
    }
}

/// Run the pipeline and print the report. Returns false if any entry failed.
fn run<W: Write, E: Write>(
    config: &RunConfig,
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<bool> {
    let report = ArchiveRetentionManager::new(config.clone()).run()?;

    write_report(&report, config.format, out, err).context("Failed to write report")?;

    Ok(report.is_clean())
}

/// Logs go to stderr so they never mix with the report on stdout.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let json = std::env::var("WAL_CLEAN_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}
