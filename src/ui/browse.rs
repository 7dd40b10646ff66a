use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs};
use ratatui::Frame;

use crate::action::Tab;
use crate::app::App;
use crate::types::MediaKind;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_controls(frame, app, chunks[1]);
    render_results(frame, app, chunks[2]);
    render_page_bar(frame, app, chunks[3]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Movies", "Search Results", "TV Shows"];

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(match app.tab {
            Tab::Movies => 0,
            Tab::Search => 1,
            Tab::Tv => 2,
        })
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    match app.tab {
        Tab::Movies => {
            let line = Line::from(vec![
                Span::styled("List: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    app.movie_list.to_string(),
                    Style::default().fg(Color::Cyan),
                ),
            ]);
            let para = Paragraph::new(line)
                .block(Block::default().borders(Borders::ALL).title(" Movie Type "));
            frame.render_widget(para, area);
        }
        Tab::Tv => {
            let line = Line::from(vec![
                Span::styled("List: ", Style::default().fg(Color::Gray)),
                Span::styled(app.tv_list.to_string(), Style::default().fg(Color::Cyan)),
            ]);
            let para = Paragraph::new(line)
                .block(Block::default().borders(Borders::ALL).title(" TV Show Type "));
            frame.render_widget(para, area);
        }
        Tab::Search => {
            let border_color = if app.search_error {
                Color::Red
            } else if app.editing_query {
                Color::Yellow
            } else {
                Color::DarkGray
            };

            let cursor = if app.editing_query { "_" } else { "" };
            let line = Line::from(vec![
                Span::styled(
                    format!("[{}] ", app.search_kind),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!("{}{}", app.query_input, cursor)),
            ]);
            let para = Paragraph::new(line).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(" Search Movie/TV Show Name "),
            );
            frame.render_widget(para, area);
        }
    }
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Results ");

    if app.tab == Tab::Search && !app.has_searched {
        let prompt = Paragraph::new("Please initiate a search.")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(prompt, area);
        return;
    }

    if app.results.is_empty() {
        if !app.loading && !app.page_transition {
            let empty = Paragraph::new("No results found.")
                .block(block)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(empty, area);
        } else {
            frame.render_widget(block, area);
        }
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 30; // kind(7) + popularity(10) + date(11) + spaces(2)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = app
        .results
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let title = if item.title.chars().count() > flex {
                let cut: String = item.title.chars().take(flex.saturating_sub(3)).collect();
                format!("{cut}...")
            } else {
                item.title.clone()
            };

            let kind_color = match item.kind {
                MediaKind::Movie => Color::Cyan,
                MediaKind::Tv => Color::Magenta,
                _ => Color::Gray,
            };

            let date = item
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());

            let line = Line::from(vec![
                Span::styled(format!("{:<flex$}", title), style),
                Span::raw(" "),
                Span::styled(format!("{:<6}", item.kind.to_string()), Style::default().fg(kind_color)),
                Span::styled(
                    format!("{:>9.3}", item.popularity),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(format!("{:>10}", date), Style::default().fg(Color::Gray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_page_bar(frame: &mut Frame, app: &App, area: Rect) {
    if app.tab == Tab::Search && !app.has_searched {
        return;
    }

    let total = app.total_pages();
    let gated = app.tab == Tab::Search && app.page_transition;
    let dim = Style::default().fg(Color::DarkGray);
    let active = Style::default().fg(Color::Cyan);

    let mut spans = vec![Span::styled(
        format!(" Page {}/{} ", app.page, total),
        Style::default().fg(Color::Gray),
    )];
    if app.page > 1 {
        spans.push(Span::styled(
            "[p] Previous ",
            if gated { dim } else { active },
        ));
    }
    if app.page < total {
        spans.push(Span::styled("[n] Next", if gated { dim } else { active }));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
