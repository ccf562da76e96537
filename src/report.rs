use crate::{
    manifest::{EntryKind, Manifest},
    scaffold::{EntryReport, Observer, Outcome, Summary},
};
use colored::Colorize;

/// Prints one line per processed entry to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Observer for ConsoleReporter {
    fn on_entry(&mut self, report: &EntryReport) {
        println!("{}", progress_line(report));
    }
}

fn progress_line(report: &EntryReport) -> String {
    let verb = match report.outcome {
        Outcome::Created => "create".green(),
        Outcome::Skipped(_) => "exists".yellow(),
    };

    let path = match report.kind {
        EntryKind::Directory => format!("{}/", report.path.display()),
        EntryKind::File => report.path.display().to_string(),
    };

    format!("{} {}", verb, path)
}

pub fn summary_line(summary: &Summary) -> String {
    format!(
        "directories: {} created, {} existing; files: {} created, {} existing",
        summary.directories_created,
        summary.directories_skipped,
        summary.files_created,
        summary.files_skipped
    )
}

pub fn print_summary(manifest: &Manifest, summary: &Summary) {
    println!(
        "\n{} scaffolded '{}'",
        "✔".green().bold(),
        manifest.name.bold()
    );
    println!("{}", summary_line(summary));

    if manifest.notes.is_empty() {
        return;
    }

    println!("\n{}", "Next steps:".bright_blue().bold());
    for (index, note) in manifest.notes.iter().enumerate() {
        println!("  {}. {}", index + 1, note);
    }
}
