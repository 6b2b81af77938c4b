//! Run summary printed to stderr.

use colored::Colorize;
use callmap::{IndexError, IndexStats};

const MAX_DISPLAY_ERRORS: usize = 5;

/// Print counts, skipped directories and the first few unit failures.
pub fn print_stats(stats: &IndexStats) {
    eprintln!(
        "{} {} units, found {} classes, {} methods, {} calls",
        "Indexed".green().bold(),
        stats.units_indexed,
        stats.totals.classes_registered,
        stats.totals.methods_registered,
        stats.totals.calls_found
    );
    eprintln!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    if stats.totals.duplicate_classes > 0 {
        eprintln!(
            "{}: {} duplicate class declarations ({} methods dropped)",
            "Duplicates".yellow(),
            stats.totals.duplicate_classes,
            stats.totals.methods_dropped
        );
    }

    if stats.totals.orphan_methods > 0 {
        eprintln!(
            "{}: {} methods outside any class",
            "Orphans".yellow(),
            stats.totals.orphan_methods
        );
    }

    if !stats.directories_skipped.is_empty() {
        eprintln!(
            "{}: {} directories (unreadable)",
            "Skipped".yellow(),
            stats.directories_skipped.len()
        );
    }

    print_errors(&stats.errors);
}

fn print_errors(errors: &[IndexError]) {
    if errors.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("{} ({}):", "Errors".red().bold(), errors.len());
    for err in errors.iter().take(MAX_DISPLAY_ERRORS) {
        eprintln!("  {} {}: {}", "•".red(), err.path.display(), err.message);
    }
    if errors.len() > MAX_DISPLAY_ERRORS {
        eprintln!("  ... and {} more", errors.len() - MAX_DISPLAY_ERRORS);
    }
}
