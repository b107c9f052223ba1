//! Human-readable run report

use crossterm::style::{Color, Stylize};
use std::fmt::Write;

use crate::outcome::aggregate::FailureBreakdown;
use crate::outcome::record::ParsedRun;

const RULE_WIDTH: usize = 72;
const MAX_BAR: usize = 40;

/// Knobs for [`render_report`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub colour: bool,
    pub top_details: usize,
    pub top_features: usize,
    pub example_categories: usize,
    pub examples_shown: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            colour: false,
            top_details: 5,
            top_features: 15,
            example_categories: 10,
            examples_shown: 2,
        }
    }
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }
}

/// `█` per `per_block` scenarios, at least a sliver so no row is bare
fn bar(count: usize, per_block: usize) -> String {
    match (count / per_block).min(MAX_BAR) {
        0 => "▏".to_string(),
        n => "█".repeat(n),
    }
}

fn clip(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn heading(out: &mut String, p: &Palette, title: &str) {
    let rule = "-".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{}", p.bold(&rule));
    let _ = writeln!(out, "{}", p.bold(&format!("  {}", title)));
    let _ = writeln!(out, "{}", p.bold(&rule));
    out.push('\n');
}

/// Render totals, category breakdown, groups, failing features and
/// example queries
pub fn render_report(run: &ParsedRun, breakdown: &FailureBreakdown, options: &ReportOptions) -> String {
    let p = Palette {
        enabled: options.colour,
    };
    let summary = &run.summary;
    let double_rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push('\n');
    let _ = writeln!(out, "{}", p.bold(&double_rule));
    let _ = writeln!(out, "{}", p.bold("  TCK Test Results"));
    let _ = writeln!(out, "{}", p.bold(&double_rule));
    out.push('\n');
    let _ = writeln!(
        out,
        "  {}  {}  {}  {}    {}",
        p.paint(&format!("{:>5} passed", summary.passed), Color::Green),
        p.paint(&format!("{:>5} failed", summary.failed), Color::Red),
        p.paint(&format!("{:>5} error", summary.errored), Color::Yellow),
        p.dim(&format!("{:>5} skipped", summary.skipped)),
        p.bold(&format!("{} total", summary.total())),
    );
    let _ = writeln!(
        out,
        "  Pass rate: {}",
        p.bold(&format!("{:.1}%", summary.pass_rate()))
    );
    out.push('\n');

    let ranked = breakdown.ranked_categories();

    heading(&mut out, &p, "Error Breakdown (by first error per scenario)");
    for (category, stats) in &ranked {
        let _ = writeln!(
            out,
            "  {}  {:<45}  {}",
            p.paint(&format!("{:>5}", stats.count), Color::Red),
            category.label(),
            p.dim(&bar(stats.count, 5))
        );
        for (detail, count) in stats.top_details(options.top_details) {
            let _ = writeln!(
                out,
                "         {}  {}",
                p.dim(&format!("{:>4}x", count)),
                p.dim(&clip(detail, 70))
            );
        }
    }
    out.push('\n');

    heading(&mut out, &p, "High-Level Groups");
    let failing = breakdown.failing_scenarios().max(1);
    for (group, count) in breakdown.groups() {
        let share = count as f64 / failing as f64 * 100.0;
        let _ = writeln!(
            out,
            "  {:>5}  ({:>5.1}%)  {:<30}  {}",
            count,
            share,
            group,
            p.dim(&bar(count, 10))
        );
    }
    out.push('\n');

    heading(
        &mut out,
        &p,
        &format!("Top {} Failing Features", options.top_features),
    );
    for (feature, count) in breakdown.top_features(options.top_features) {
        let _ = writeln!(
            out,
            "  {}  {}",
            p.paint(&format!("{:>5}", count), Color::Red),
            clip(feature, 65)
        );
    }
    out.push('\n');

    heading(
        &mut out,
        &p,
        &format!(
            "Example Queries (first {} per top-{} category)",
            options.examples_shown, options.example_categories
        ),
    );
    for (category, stats) in ranked.iter().take(options.example_categories) {
        if stats.examples.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {}:", p.bold(&category.label()));
        for example in stats.examples.iter().take(options.examples_shown) {
            let query = if example.query.is_empty() {
                "(no query captured)".to_string()
            } else {
                clip(&example.query.replace('\n', " "), 80)
            };
            let _ = writeln!(out, "    {}", p.dim(&example.location));
            let _ = writeln!(out, "    {}", p.paint(&query, Color::Cyan));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", p.bold(&double_rule));
    out
}
