use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;

use crate::model::{Insight, ProfileStats, Severity};
use crate::util::truncate;
use chrono::Datelike;

fn header_cell(text: &str, color: Color) -> Cell<'static> {
    Cell::from(text.to_string()).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

pub fn draw_overview(f: &mut Frame, area: Rect, stats: &ProfileStats) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    let in_window: u32 = stats.heatmap.iter().map(|p| p.count).sum();
    let summary_lines = vec![
        Line::from(vec![Span::styled(
            "Activity",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Window: ", Style::default().fg(Color::White)),
            Span::styled(
                format!("{} days", stats.window_days),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("In window: ", Style::default().fg(Color::White)),
            Span::styled(
                format!("{in_window} commits"),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("All time: ", Style::default().fg(Color::White)),
            Span::styled(
                format!("{} commits", stats.total_commits),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Active days: ", Style::default().fg(Color::White)),
            Span::styled(
                format!("{}", stats.active_days),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];

    let summary = Paragraph::new(summary_lines).block(
        Block::default()
            .title("Profile")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(summary, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_category_table(f, right[0], stats);
    draw_repo_table(f, right[1], stats);
}

fn draw_category_table(f: &mut Frame, area: Rect, stats: &ProfileStats) {
    let total: u32 = stats.category_breakdown.iter().map(|s| s.count).sum();

    let rows: Vec<Row> = stats
        .category_breakdown
        .iter()
        .map(|stat| {
            let share = if total == 0 {
                0.0
            } else {
                f64::from(stat.count) * 100.0 / f64::from(total)
            };
            Row::new(vec![
                Cell::from(stat.category.as_str()),
                Cell::from(format!("{:>5}", stat.count))
                    .style(Style::default().fg(Color::Green)),
                Cell::from(format!("{share:>5.1}%")).style(Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Percentage(100),
        ],
    )
    .header(Row::new([
        header_cell("Category", Color::Yellow),
        header_cell("Count", Color::Green),
        header_cell("Share", Color::Cyan),
    ]))
    .block(
        Block::default()
            .title("Categories")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(table, area);
}

fn draw_repo_table(f: &mut Frame, area: Rect, stats: &ProfileStats) {
    let rows: Vec<Row> = stats
        .repo_summaries
        .iter()
        .map(|summary| {
            let primary = summary
                .primary_category
                .map(|c| c.as_str())
                .unwrap_or("-");
            let last = summary
                .last_activity
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(truncate(&summary.name, 20)),
                Cell::from(format!("{:>5}", summary.total_commits))
                    .style(Style::default().fg(Color::Green)),
                Cell::from(primary.to_string()).style(Style::default().fg(Color::Magenta)),
                Cell::from(last).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Percentage(100),
        ],
    )
    .header(Row::new([
        header_cell("Repository", Color::Yellow),
        header_cell("Commits", Color::Green),
        header_cell("Primary", Color::Magenta),
        header_cell("Last", Color::Cyan),
    ]))
    .block(
        Block::default()
            .title("Repositories")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(table, area);
}

pub fn draw_calendar(f: &mut Frame, area: Rect, stats: &ProfileStats) {
    let heatmap = &stats.heatmap;
    let mut lines: Vec<Line> = Vec::new();

    if heatmap.is_empty() {
        lines.push(Line::from("No activity data."));
    } else {
        let lead = heatmap[0].date.weekday().num_days_from_monday() as usize;
        let n_cols = (lead + heatmap.len() + 6) / 7;

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
        lines.push(Line::from(Span::styled(
            format!("     {}", labels.iter().collect::<String>()),
            Style::default().fg(Color::DarkGray),
        )));

        for row in 0..7 {
            let label = match row {
                0 => "Mon  ",
                2 => "Wed  ",
                4 => "Fri  ",
                6 => "Sun  ",
                _ => "     ",
            };
            let mut spans: Vec<Span> =
                vec![Span::styled(label, Style::default().fg(Color::DarkGray))];
            for col in 0..n_cols {
                let idx = col * 7 + row;
                if idx < lead || idx - lead >= heatmap.len() {
                    spans.push(Span::raw(" "));
                } else {
                    spans.push(level_span(heatmap[idx - lead].level));
                }
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        let mut legend: Vec<Span> = vec![Span::styled(
            "     Less ",
            Style::default().fg(Color::DarkGray),
        )];
        for level in 0..4 {
            legend.push(level_span(level));
        }
        legend.push(Span::styled(" More", Style::default().fg(Color::DarkGray)));
        lines.push(Line::from(legend));
    }

    let in_window: u32 = heatmap.iter().map(|p| p.count).sum();
    let calendar = Paragraph::new(lines).block(
        Block::default()
            .title(format!(
                "{} contributions in the last {} days",
                in_window, stats.window_days
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(calendar, area);
}

fn level_span(level: u8) -> Span<'static> {
    match level {
        0 => Span::styled("·", Style::default().fg(Color::DarkGray)),
        1 => Span::styled("░", Style::default().fg(Color::Green)),
        2 => Span::styled("▓", Style::default().fg(Color::Green)),
        _ => Span::styled("█", Style::default().fg(Color::LightGreen)),
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

pub fn draw_insight(f: &mut Frame, area: Rect, insight: &Insight) {
    let severity_style = match insight.severity {
        Severity::Low => Style::default().fg(Color::Green),
        Severity::Medium => Style::default().fg(Color::Yellow),
        Severity::High => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                insight.summary.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", insight.severity), severity_style),
        ]),
        Line::from(""),
    ];
    for reason in &insight.reasoning {
        lines.push(Line::from(format!("  • {reason}")));
    }
    if !insight.related_commits.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Based on {} related commits", insight.related_commits.len()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "generated {}",
            insight.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("Current Insight")
            .borders(Borders::ALL)
            .border_style(severity_style),
    );

    f.render_widget(panel, area);
}

pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let block = Block::default().title("Help").borders(Borders::ALL);
    let help_area = centered_rect(60, 60, area);

    f.render_widget(Clear, help_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "mindlog - Help",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Views:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab or →    Next view (Overview/Calendar/Insight)"),
        Line::from("  Shift+Tab   Previous view"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Actions:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )]),
        Line::from("  h or F1     Toggle this help"),
        Line::from("  q or Esc    Quit"),
    ];

    let help = Paragraph::new(help_text).block(block);
    f.render_widget(help, help_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
