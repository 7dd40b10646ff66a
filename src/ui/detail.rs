use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::{MediaDetail, MediaKind};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        let block = Block::default().borders(Borders::ALL).title(" Details ");
        let empty = Paragraph::new("Nothing selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    render_summary(frame, detail, chunks[0]);
    render_overview(frame, app, detail, chunks[1]);
}

fn render_summary(frame: &mut Frame, detail: &MediaDetail, area: Rect) {
    let kind_color = match detail.kind {
        MediaKind::Movie => Color::Cyan,
        MediaKind::Tv => Color::Magenta,
        _ => Color::Gray,
    };

    let mut facts: Vec<Span> = vec![Span::styled(
        detail.kind.to_string(),
        Style::default().fg(kind_color).add_modifier(Modifier::BOLD),
    )];
    if let Some(date) = detail.release_date {
        facts.push(Span::raw(" | "));
        facts.push(Span::raw(date.format("%Y-%m-%d").to_string()));
    }
    if let Some(runtime) = detail.runtime_minutes {
        facts.push(Span::raw(" | "));
        facts.push(Span::raw(format!("{runtime} min")));
    }
    if let (Some(seasons), Some(episodes)) = (detail.seasons, detail.episodes) {
        facts.push(Span::raw(" | "));
        facts.push(Span::raw(format!("{seasons} seasons, {episodes} episodes")));
    }
    if let Some(cert) = &detail.certification {
        facts.push(Span::raw(" | "));
        facts.push(Span::styled(
            cert.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(status) = &detail.status {
        facts.push(Span::raw(" | "));
        facts.push(Span::styled(status.clone(), Style::default().fg(Color::Gray)));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            detail.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(facts),
        Line::from(vec![
            Span::styled(
                format!("★ {:.1}", detail.vote_average),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" ({} votes)", detail.vote_count),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("Popularity: {:.3}", detail.popularity),
                Style::default().fg(Color::Gray),
            ),
        ]),
    ];

    if !detail.genres.is_empty() {
        lines.push(Line::from(Span::styled(
            detail.genres.join(", "),
            Style::default().fg(Color::Cyan),
        )));
    }

    let summary =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Details "));
    frame.render_widget(summary, area);
}

fn render_overview(frame: &mut Frame, app: &App, detail: &MediaDetail, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(tagline) = &detail.tagline {
        lines.push(Line::from(Span::styled(
            tagline.clone(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    let overview = detail.overview.as_deref().unwrap_or("No overview available.");
    let width = area.width.saturating_sub(2) as usize;
    for paragraph in overview.lines() {
        lines.extend(wrap_line(paragraph, width.max(20)));
    }

    if let Some(url) = crate::tmdb::poster_url(detail.poster_path.as_deref()) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Poster: ", Style::default().fg(Color::Gray)),
            Span::raw(url),
        ]));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    let scroll_offset = app.scroll_offset.min(max_scroll);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(inner_height)
        .collect();

    let body = Paragraph::new(Text::from(visible))
        .block(Block::default().borders(Borders::ALL).title(" Overview "));
    frame.render_widget(body, area);
}

fn wrap_line(text: &str, width: usize) -> Vec<Line<'static>> {
    if text.is_empty() {
        return vec![Line::from("")];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(Line::from(std::mem::take(&mut current)));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}
