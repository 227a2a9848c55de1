use std::io;
use crossterm::terminal::{enable_raw_mode, disable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::event::KeyEventKind;
use crate::model::{Insight, ProfileStats};
use super::views::{draw_calendar, draw_help_overlay, draw_insight, draw_overview};

const TAB_COUNT: usize = 3;

#[derive(Default)]
pub struct DashboardState {
    pub tab_index: usize,
    pub show_help: bool,
}

pub fn run(stats: ProfileStats, insight: Insight) -> io::Result<()> {
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut state = DashboardState::default();
    terminal.clear()?;

    loop {
        let draw_result = terminal.draw(|f| {
            let size = f.size();

            if state.show_help {
                draw_help_overlay(f, size);
                return;
            }

            let chunks = ratatui::layout::Layout::default()
                .direction(ratatui::layout::Direction::Vertical)
                .constraints([
                    ratatui::layout::Constraint::Length(3),
                    ratatui::layout::Constraint::Min(0),
                ])
                .split(size);

            let tabs = ratatui::widgets::Tabs::new(vec!["Overview", "Calendar", "Insight"])
                .block(ratatui::widgets::Block::default().borders(ratatui::widgets::Borders::ALL).title("mindlog"))
                .highlight_style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow).add_modifier(ratatui::style::Modifier::BOLD))
                .select(state.tab_index);
            f.render_widget(tabs, chunks[0]);

            match state.tab_index {
                0 => draw_overview(f, chunks[1], &stats),
                1 => draw_calendar(f, chunks[1], &stats),
                _ => draw_insight(f, chunks[1], &insight),
            }
        });

        if let Err(e) = draw_result {
            eprintln!("TUI draw error: {}", e);
        }

        if poll(std::time::Duration::from_millis(200))? {
            if let Event::Key(key_event) = read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                match key_event.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('h') | KeyCode::F(1) => state.show_help = !state.show_help,
                    KeyCode::Tab | KeyCode::Right => {
                        state.tab_index = (state.tab_index + 1) % TAB_COUNT;
                    }
                    KeyCode::BackTab | KeyCode::Left => {
                        state.tab_index = if state.tab_index == 0 { TAB_COUNT - 1 } else { state.tab_index - 1 };
                    }
                    _ => {}
                }
            }
        }
    }

    terminal.clear()?;
    disable_raw_mode()?;
    Ok(())
}
