//! Attendify command-line entry point.
//!
//! # Responsibility
//! - Parse flags and environment, open the store, start logging.
//! - Render core reports as plain text.

use attendify_core::{
    core_version, default_log_level, format_percentage, init_logging, open_db, seed_demo_data,
    Portal, DEFAULT_LOW_ATTENDANCE_THRESHOLD,
};
use clap::{Parser, Subcommand};
use log::error;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Attendance tracking over a local SQLite store.
#[derive(Parser, Debug)]
#[command(name = "attendify", author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, env = "ATTENDIFY_DB", default_value = "attendify.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "ATTENDIFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, env = "ATTENDIFY_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the demo roster, staff and attendance history.
    Seed,
    /// Per-person totals and percentages.
    Summary,
    /// Average attendance per cohort.
    Departments,
    /// People below an attendance threshold.
    Low {
        #[arg(long, default_value_t = DEFAULT_LOW_ATTENDANCE_THRESHOLD)]
        threshold: f64,
    },
    /// Registry sizes and the pooled record-level average.
    Overall,
    /// Profile, statistics and history for one person.
    Student { id: String },
    /// Everyone's status on one date.
    Date { date: String },
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::Version = cli.command {
        println!("attendify_core version={}", core_version());
        return Ok(());
    }

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &absolute(&cli.log_dir)?)?;

    let conn = open_db(&cli.db)?;
    let portal = Portal::instructor(&conn);

    match cli.command {
        Command::Seed => {
            let report = seed_demo_data(&conn)?;
            println!(
                "seeded people={} staff={} records={} default_head={}",
                report.people_created,
                report.staff_created,
                report.records_created,
                report.default_head_created
            );
        }
        Command::Summary => {
            println!("{:<8} {:<24} {:>6} {:>8} {:>9}", "ID", "NAME", "TOTAL", "PRESENT", "PERCENT");
            for row in portal.summary()? {
                println!(
                    "{:<8} {:<24} {:>6} {:>8} {:>9}",
                    row.person_id,
                    row.name,
                    row.total,
                    row.present,
                    format_percentage(row.percentage)
                );
            }
        }
        Command::Departments => {
            println!("{:<24} {:>8} {:>9}", "COHORT", "PEOPLE", "AVERAGE");
            for row in portal.department_report()? {
                println!(
                    "{:<24} {:>8} {:>9}",
                    row.cohort.as_deref().unwrap_or("-"),
                    row.student_count,
                    format_percentage(row.average_percentage)
                );
            }
        }
        Command::Low { threshold } => {
            let rows = portal.low_attendance(threshold)?;
            if rows.is_empty() {
                println!("nobody below {}", format_percentage(threshold));
            }
            for row in rows {
                println!(
                    "{:<8} {:<24} {:<20} {:>9}",
                    row.person_id,
                    row.name,
                    row.cohort.as_deref().unwrap_or("-"),
                    format_percentage(row.percentage)
                );
            }
        }
        Command::Overall => {
            let overall = portal.overall_statistics()?;
            println!("people={}", overall.total_people);
            println!("staff={}", overall.total_staff);
            println!("records={}", overall.total_records);
            println!(
                "pooled_average={}",
                format_percentage(overall.pooled_average_percentage)
            );
        }
        Command::Student { id } => {
            let own = Portal::individual(&conn, &id)?;
            let person = own.profile(&id)?;
            let stats = own.stats(&id)?;
            println!("{} {}", person.id, person.name);
            println!("cohort={}", person.cohort.as_deref().unwrap_or("-"));
            println!("total_classes={}", person.total_classes);
            println!(
                "present={} absent={} percentage={}",
                stats.present,
                stats.absent,
                format_percentage(own.percentage(&id)?)
            );
            for entry in own.records(&id)? {
                println!("{} {}", entry.date, entry.status);
            }
        }
        Command::Date { date } => {
            for row in portal.attendance_on(&date)? {
                println!("{:<8} {:<24} {}", row.person_id, row.name, row.status.as_str());
            }
        }
        // Printed before the store is opened.
        Command::Version => {}
    }
    Ok(())
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
