//! Console report rendering and JSON/CSV export
//!
//! One table per group, strategies as rows, latencies in microseconds. The
//! fastest mean in each group is highlighted. Errored cases still appear,
//! with their message, so the report always enumerates every registered case.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use ormbench_core::{BenchError, BenchResult, CaseReport, CaseStatus, RunReport};
use std::path::Path;

/// Print the full run report to stdout.
pub fn print_report(report: &RunReport) {
    println!(
        "\n{}",
        format!(
            "ormbench - {} cases, {} ok, {} errored ({} warmup + {} iterations per case)",
            report.cases.len(),
            report.ok_count(),
            report.errored_count(),
            report.meta.warmup,
            report.meta.iterations
        )
        .bold()
    );
    println!(
        "{}",
        format!(
            "started {} on {}/{} ({} cpus)",
            report.meta.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.meta.os,
            report.meta.arch,
            report.meta.cpus
        )
        .dimmed()
    );

    for (group, cases) in grouped(&report.cases) {
        print_group(group, &cases);
    }
}

fn print_group(group: &str, cases: &[&CaseReport]) {
    println!("\n{}", format!("━━━ {group} ━━━").bold().cyan());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec![
        "Strategy",
        "Samples",
        "Mean (µs)",
        "Min (µs)",
        "Max (µs)",
        "p50 (µs)",
        "p75 (µs)",
        "p99 (µs)",
    ]);

    let best_mean = cases
        .iter()
        .filter_map(|c| c.status.stats())
        .map(|s| s.mean_us)
        .fold(f64::INFINITY, f64::min);

    for case in cases {
        match &case.status {
            CaseStatus::Ok { stats } => {
                let is_best = (stats.mean_us - best_mean).abs() < f64::EPSILON;
                let name = if is_best {
                    Cell::new(format!("★ {}", case.label)).fg(Color::Green)
                } else {
                    Cell::new(&case.label)
                };
                table.add_row(vec![
                    name,
                    Cell::new(stats.samples),
                    Cell::new(format!("{:.1}", stats.mean_us)),
                    Cell::new(format!("{:.1}", stats.min_us)),
                    Cell::new(format!("{:.1}", stats.max_us)),
                    Cell::new(format!("{:.1}", stats.p50_us)),
                    Cell::new(format!("{:.1}", stats.p75_us)),
                    Cell::new(format!("{:.1}", stats.p99_us)),
                ]);
            }
            CaseStatus::Errored { message, completed } => {
                table.add_row(vec![
                    Cell::new(&case.label).fg(Color::Red),
                    Cell::new(completed),
                    Cell::new(truncate(message, 48)).fg(Color::Red),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    println!("{table}");
}

/// Write the report as pretty-printed JSON.
pub fn export_json(report: &RunReport, path: &Path) -> BenchResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| BenchError::Config(format!("report serialization failed: {e}")))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Write one CSV row per case.
pub fn export_csv(report: &RunReport, path: &Path) -> BenchResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(io_from_csv)?;

    wtr.write_record([
        "group",
        "strategy",
        "status",
        "samples",
        "mean_us",
        "min_us",
        "max_us",
        "p50_us",
        "p75_us",
        "p99_us",
        "error",
    ])
    .map_err(io_from_csv)?;

    for case in &report.cases {
        match &case.status {
            CaseStatus::Ok { stats } => {
                let samples = stats.samples.to_string();
                let mean = format!("{:.3}", stats.mean_us);
                let min = format!("{:.3}", stats.min_us);
                let max = format!("{:.3}", stats.max_us);
                let p50 = format!("{:.3}", stats.p50_us);
                let p75 = format!("{:.3}", stats.p75_us);
                let p99 = format!("{:.3}", stats.p99_us);
                wtr.write_record([
                    case.group.as_str(),
                    case.label.as_str(),
                    "ok",
                    samples.as_str(),
                    mean.as_str(),
                    min.as_str(),
                    max.as_str(),
                    p50.as_str(),
                    p75.as_str(),
                    p99.as_str(),
                    "",
                ])
                .map_err(io_from_csv)?;
            }
            CaseStatus::Errored { message, completed } => {
                let completed = completed.to_string();
                wtr.write_record([
                    case.group.as_str(),
                    case.label.as_str(),
                    "errored",
                    completed.as_str(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    message.as_str(),
                ])
                .map_err(io_from_csv)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn io_from_csv(e: csv::Error) -> BenchError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => BenchError::Io(io),
        other => BenchError::Config(format!("csv export failed: {other:?}")),
    }
}

/// Groups in report order, preserving case order within each group.
fn grouped(cases: &[CaseReport]) -> Vec<(&str, Vec<&CaseReport>)> {
    let mut order: Vec<&str> = Vec::new();
    for case in cases {
        if !order.contains(&case.group.as_str()) {
            order.push(&case.group);
        }
    }
    order
        .into_iter()
        .map(|group| (group, cases.iter().filter(|c| c.group == group).collect()))
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…")
    }
}
