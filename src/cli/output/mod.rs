pub mod table;

use ansi_term::{Colour, Style};
use chrono::{DateTime, Utc};

use crate::{
    engine::{
        archive::ArchiveOutcome,
        lifecycle::{FinishSummary, PomReport},
        query::ListRow,
    },
    storage::entities::PomStatus,
    utils::time::{elapsed_hours, format_short, humanize},
};

use table::{Alignment, Table};

pub const MSG_NO_POMS: &str = "No poms to show";

fn dimmed() -> Style {
    Colour::Fixed(244).normal()
}

/// Table with one line per pom. Active poms show how long they have been running.
pub fn render_list(rows: &[ListRow], now: DateTime<Utc>) -> String {
    let mut table = Table::new();
    table.push(
        vec![
            "Title".into(),
            "Original Estimate".into(),
            "Actual Time".into(),
            "Status".into(),
        ],
        Some(Colour::Blue.normal()),
    );

    for row in rows {
        let (time, style) = match (row.status, row.started) {
            (PomStatus::Active, Some(started)) => (
                format!("{} ⏱", humanize(elapsed_hours(started, now))),
                Some(Colour::Green.normal()),
            ),
            (PomStatus::Finished, _) => (non_empty_or_dash(&row.actual), Some(dimmed())),
            _ => (non_empty_or_dash(&row.actual), None),
        };
        table.push(
            vec![
                row.title.clone(),
                row.estimate.clone(),
                time,
                row.status.to_string(),
            ],
            style,
        );
    }
    table.to_string()
}

fn non_empty_or_dash(value: &str) -> String {
    if value.is_empty() {
        "--".into()
    } else {
        value.into()
    }
}

pub fn render_report(report: &PomReport) -> String {
    let mut table = Table::new()
        .with_column(Alignment::Right, Some(Colour::Blue.normal()))
        .with_column(Alignment::Left, None);
    for (label, value) in report.rows() {
        table.push(vec![label.into(), value], None);
    }

    let mut output = format!(
        "{table}\n\n{}\n\n",
        Style::new().on(Colour::White).fg(Colour::Black).paint("NOTES:")
    );
    for (time, text) in &report.notes {
        output += &format!(
            "{}\n{}\n\n",
            dimmed().paint(format_short(*time)),
            Colour::Green.paint(text.as_str())
        );
    }
    output
}

pub fn render_finish_summary(summary: &FinishSummary) -> String {
    let stars = "★".repeat(23);
    format!(
        "{stars}\n{}\n{}\n{stars}",
        Colour::Green.paint(summary.title.as_str()),
        dimmed().paint(summary.actual.to_string())
    )
}

pub fn render_archive_outcome(outcome: &ArchiveOutcome) -> String {
    match outcome {
        ArchiveOutcome::NothingFinished => {
            let line = "=".repeat(17);
            format!("{line}\nNo Finished Poms\n{line}")
        }
        ArchiveOutcome::Archived { accuracy, .. } => {
            let line = "=".repeat(40);
            format!(
                "{line}\nToday's Margin of Error: {}\n{line}",
                dimmed().paint(humanize(*accuracy))
            )
        }
    }
}
