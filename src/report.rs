//! One-line console summary per cycle.

use crate::diff::Delta;
use crate::pipeline::CycleReport;
use colored::Colorize;

fn counts(delta: Delta) -> String {
    format!(
        "({},{})",
        format!("+{}", delta.added).green(),
        format!("-{}", delta.removed).red()
    )
}

fn output_name(report: &CycleReport) -> String {
    report
        .output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.output.display().to_string())
}

/// Summary line for `report`, or `None` for a triggered cycle that changed
/// nothing.
///
/// Triggered: `App.tsx (+1,-0) -> styles.css (+2,-0) • 1.23ms`, ids first,
/// classes second. Initial: `ready -> styles.css (4 classes, 2 ids) • 1.23ms`.
pub fn format_summary(report: &CycleReport) -> Option<String> {
    let elapsed = format!("{:.2}ms", report.elapsed_ms);
    let output = output_name(report).bright_cyan();

    match (&report.trigger, report.id_delta, report.class_delta) {
        (Some(trigger), Some(ids), Some(classes)) => {
            if ids.is_empty() && classes.is_empty() {
                return None;
            }
            Some(format!(
                "{} {} -> {} {} • {}",
                trigger.magenta(),
                counts(ids),
                output,
                counts(classes),
                elapsed
            ))
        }
        _ => Some(format!(
            "{} -> {} ({} classes, {} ids) • {}",
            "ready".bright_green(),
            output,
            report.classes,
            report.ids,
            elapsed
        )),
    }
}

pub fn print_summary(report: &CycleReport) {
    if let Some(line) = format_summary(report) {
        println!("{line}");
    }
}
