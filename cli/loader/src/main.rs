//! eventlake CLI
//!
//! Event analytics load pipeline over Athena and S3.

use clap::Parser;
use el_loader::pipeline::LoadOutcome;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for the scatter payload)
    run::init_logging(args.log_level)?;

    let outcome = run::execute(args).await?;

    // Report results to stderr
    eprintln!();
    match &outcome {
        LoadOutcome::Completed {
            details_path,
            report,
        } => {
            eprintln!("Load completed:");
            eprintln!("  Steps executed:  {}", report.steps.len());
            eprintln!(
                "  Data scanned:    {}",
                format_bytes(report.total_scanned_bytes().max(0) as u64)
            );
            if let Some(duration) = report.duration() {
                eprintln!(
                    "  Duration:        {:.2}s",
                    duration.num_milliseconds() as f64 / 1000.0
                );
            }
            eprintln!("  Details result:  {}", details_path);
        }
        LoadOutcome::Failed {
            step,
            reason,
            report,
        } => {
            eprintln!("Load failed:");
            eprintln!("  Failed step:     {}", step);
            eprintln!("  Reason:          {}", reason);
            eprintln!("  Steps executed:  {}", report.steps.len());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Format bytes as human-readable string.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
