//! CLI entry point for inspecting a registration store.
//!
//! # Responsibility
//! - Verify `regdesk_core` linkage without the Flutter runtime.
//! - List and export enrollments from a store file for local checks.

use clap::{Parser, Subcommand, ValueEnum};
use regdesk_core::db::open_db;
use regdesk_core::{
    core_version, init_logging, ping, CsvLayout, ListingService, RegdeskConfig,
    SqliteStudentStore, StudentFilter,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "regdesk", version, about = "Student registration store probe")]
struct Cli {
    /// Write rolling logs to this absolute directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print core linkage and resolved configuration
    Info,
    /// List enrollments in store order
    List {
        /// Store file (defaults to REGDESK_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Exact class filter
        #[arg(long, default_value = "")]
        class: String,
        /// Case-insensitive match on name, mobile or class
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Write students.csv
    Export {
        /// Store file (defaults to REGDESK_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Target directory (defaults to REGDESK_EXPORT_DIR or downloads)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Layout::Admin)]
        layout: Layout,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Admin,
    Listing,
}

impl From<Layout> for CsvLayout {
    fn from(value: Layout) -> Self {
        match value {
            Layout::Admin => CsvLayout::Admin,
            Layout::Listing => CsvLayout::StudentListing,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = RegdeskConfig::from_env();

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("regdesk: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("regdesk: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &RegdeskConfig) -> Result<(), String> {
    match command {
        Command::Info => {
            println!("regdesk_core ping={}", ping());
            println!("regdesk_core version={}", core_version());
            println!("db_path={}", config.db_path.display());
            println!("export_dir={}", config.export_dir.display());
            println!("log_level={}", config.log_level);
            Ok(())
        }
        Command::List { db, class, query } => {
            let conn = open_db(db.as_ref().unwrap_or(&config.db_path))
                .map_err(|err| err.to_string())?;
            let store = SqliteStudentStore::new(&conn);
            let filter = StudentFilter {
                class,
                query,
                ..StudentFilter::default()
            };
            let records = ListingService::new(&store)
                .list_filtered(&filter)
                .map_err(|err| err.to_string())?;
            for record in &records {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    record.id.as_deref().unwrap_or("-"),
                    record.name,
                    record.mobile,
                    record.student_class,
                    record.course
                );
            }
            println!("{} student(s)", records.len());
            Ok(())
        }
        Command::Export { db, out, layout } => {
            let conn = open_db(db.as_ref().unwrap_or(&config.db_path))
                .map_err(|err| err.to_string())?;
            let store = SqliteStudentStore::new(&conn);
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            match ListingService::new(&store)
                .export_students(&dir, layout.into())
                .map_err(|err| err.to_string())?
            {
                Some(path) => println!("exported {}", path.display()),
                None => println!("no students to export"),
            }
            Ok(())
        }
    }
}
