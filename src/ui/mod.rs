mod browse;
mod detail;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Tab;
use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::Browse => browse::render(frame, app, chunks[1]),
        Screen::Detail => detail::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Browse => match app.tab {
            Tab::Movies => format!("reel - Movies ({})", app.movie_list),
            Tab::Tv => format!("reel - TV Shows ({})", app.tv_list),
            Tab::Search => format!("reel - Search ({})", app.search_kind),
        },
        Screen::Detail => {
            if let Some(detail) = &app.detail {
                format!("reel - {}", detail.title)
            } else {
                "reel".to_string()
            }
        }
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.api_error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if app.search_error {
        Line::from(vec![Span::styled(
            "A movie or TV show name is required",
            Style::default().fg(Color::Red),
        )])
    } else if app.loading || (app.tab == Tab::Search && app.page_transition) {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.screen {
            Screen::Browse => {
                if app.editing_query {
                    "Enter: search | Esc: cancel"
                } else {
                    "Tab: tabs | c: cycle list | /: search | j/k: nav | n/p: page | Enter: details | o: browser | q: quit"
                }
            }
            Screen::Detail => "j/k: scroll | o: browser | q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
