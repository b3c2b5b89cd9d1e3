use std::process::ExitCode;

use clap::{Parser, Subcommand};
use muidb::{MuiDbFile, OpenMode};
use muidb_cli::{
    exchange, info::print_info, path_glob::expand_db_globs, validation::resolve_format,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print progress details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show statistics and configured output files of a database.
    Info {
        /// The MuiDB file
        db: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import translations from a ResX or XLIFF file.
    ImportFile {
        /// The file to import
        #[arg(short, long)]
        input: String,

        /// The input format: resx or xliff (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// The language the file's texts are imported as
        #[arg(short, long)]
        lang: String,

        /// The MuiDB file to update (created if missing)
        #[arg(short, long)]
        db: String,
    },

    /// Export all target files configured in one or more databases.
    Export {
        /// MuiDB files or glob patterns
        #[arg(required = true)]
        db: Vec<String>,
    },

    /// Export one language into a ResX file.
    ExportFile {
        /// The MuiDB file
        #[arg(short, long)]
        db: String,

        /// The language to export
        #[arg(short, long)]
        lang: String,

        /// The file to write
        #[arg(short, long)]
        output: String,

        /// The output format: resx or xliff (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// Leave item comments out of the output
        #[arg(long)]
        no_comments: bool,
    },

    /// Rewrite databases with items sorted by id.
    Format {
        /// MuiDB files or glob patterns
        #[arg(required = true)]
        db: Vec<String>,
    },

    /// Check the document structure and that every item is translated.
    Validate {
        /// MuiDB files or glob patterns
        #[arg(required = true)]
        db: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(commands: Commands) -> Result<(), String> {
    match commands {
        Commands::Info { db, json } => {
            let db = MuiDbFile::open(&db, OpenMode::OpenExisting).map_err(|e| e.to_string())?;
            print_info(&db, json)
        }
        Commands::ImportFile {
            input,
            format,
            lang,
            db,
        } => {
            let format = resolve_format(format.as_deref(), &input)?;
            exchange::import_file(&db, &input, format, &lang)
        }
        Commands::Export { db } => for_each_db(&db, |path| exchange::export_all(path).map(|_| ())),
        Commands::ExportFile {
            db,
            lang,
            output,
            format,
            no_comments,
        } => {
            let format = resolve_format(format.as_deref(), &output)?;
            exchange::export_file(&db, &output, format, &lang, !no_comments)
        }
        Commands::Format { db } => for_each_db(&db, exchange::format),
        Commands::Validate { db } => for_each_db(&db, exchange::validate),
    }
}

/// Runs `command` on every database the arguments expand to, stopping at the
/// first failure.
fn for_each_db<F>(patterns: &[String], command: F) -> Result<(), String>
where
    F: Fn(&str) -> Result<(), String>,
{
    let paths = expand_db_globs(patterns)?;
    let many = paths.len() > 1;
    for path in &paths {
        command(path).map_err(|e| if many { format!("{}: {}", path, e) } else { e })?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args.commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
