use crate::error::Result;
use crate::model::{HeatmapPoint, ProfileStats};
use crate::util::truncate;
use chrono::Datelike;
use console::style;

const LEVEL_CHARS: [char; 4] = ['·', '░', '▓', '█'];

pub fn output_json(stats: &ProfileStats) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

/// One JSON object per heatmap day, oldest first.
pub fn output_ndjson(stats: &ProfileStats) -> Result<()> {
    for point in &stats.heatmap {
        println!("{}", serde_json::to_string(point)?);
    }
    Ok(())
}

pub fn output_profile(stats: &ProfileStats) {
    let in_window: u32 = stats.heatmap.iter().map(|p| p.count).sum();

    println!();
    println!(
        "{}",
        style(format!(
            "{} contributions in the last {} days",
            in_window, stats.window_days
        ))
        .bold()
    );
    println!();

    print_calendar(&stats.heatmap);

    let legend: String = (0..LEVEL_CHARS.len()).map(|l| level_cell(l as u8)).collect();
    println!();
    println!("     {} {} {}", style("Less").dim(), legend, style("More").dim());

    if !stats.category_breakdown.is_empty() {
        let total: u32 = stats.category_breakdown.iter().map(|s| s.count).sum();
        println!();
        println!("{}", style("Categories").bold());
        println!("{}", "─".repeat(50));
        for stat in &stats.category_breakdown {
            let pct = f64::from(stat.count) * 100.0 / f64::from(total);
            let bar = "█".repeat((pct / 100.0 * 24.0).round() as usize);
            println!(
                "{:<10} {:>5}  {} {:>3.0}%",
                stat.category.as_str(),
                stat.count,
                style(format!("{bar:<24}")).green(),
                pct
            );
        }
    }

    if !stats.repo_summaries.is_empty() {
        println!();
        println!("{}", style("Repositories").bold());
        println!("{}", "─".repeat(64));
        println!(
            "{}",
            style(format!(
                "{:<24} {:>8}  {:<10} {}",
                "NAME", "COMMITS", "PRIMARY", "LAST ACTIVITY"
            ))
            .bold()
        );
        for summary in &stats.repo_summaries {
            let primary = summary
                .primary_category
                .map(|c| c.as_str())
                .unwrap_or("-");
            let last = summary
                .last_activity
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<24} {:>8}  {:<10} {}",
                truncate(&summary.name, 24),
                summary.total_commits,
                primary,
                style(last).dim()
            );
        }
    }

    println!();
    println!(
        "{} commits total, {} active days",
        style(stats.total_commits).cyan(),
        style(stats.active_days).cyan()
    );
}

/// GitHub-style contribution calendar: weeks as columns, weekdays as rows,
/// Monday on top. Cells before the window's first day stay blank.
fn print_calendar(heatmap: &[HeatmapPoint]) {
    if heatmap.is_empty() {
        return;
    }

    let lead = heatmap[0].date.weekday().num_days_from_monday() as usize;
    let n_cols = (lead + heatmap.len() + 6) / 7;

    // month labels anchored at the column holding each month's first day
    let mut labels = vec![' '; n_cols];
    for (i, point) in heatmap.iter().enumerate() {
        if point.date.day() == 1 || i == 0 {
            let col = (lead + i) / 7;
            for (j, ch) in month_abbr(point.date.month()).chars().enumerate() {
                if col + j < n_cols {
                    labels[col + j] = ch;
                }
            }
        }
    }
    println!(
        "     {}",
        style(labels.iter().collect::<String>()).dim()
    );

    for row in 0..7 {
        let label = match row {
            0 => "Mon  ",
            2 => "Wed  ",
            4 => "Fri  ",
            6 => "Sun  ",
            _ => "     ",
        };
        let mut line = String::new();
        for col in 0..n_cols {
            let idx = col * 7 + row;
            if idx < lead || idx - lead >= heatmap.len() {
                line.push(' ');
            } else {
                line.push_str(&level_cell(heatmap[idx - lead].level));
            }
        }
        println!("{}{}", style(label).dim(), line);
    }
}

fn level_cell(level: u8) -> String {
    let ch = LEVEL_CHARS[(level as usize).min(LEVEL_CHARS.len() - 1)].to_string();
    match level {
        0 => style(ch).dim().to_string(),
        1 | 2 => style(ch).green().to_string(),
        _ => style(ch).green().bold().to_string(),
    }
}

fn month_abbr(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}
