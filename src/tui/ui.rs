use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::grid::{classification_style, GridLayout, YearGrid};
use super::headline::Segment;
use super::App;
use crate::calendar::Classification;
use chrono::{Datelike, Local};

const ACCENT: Color = Color::Cyan;
const HEADER_BG: Color = Color::DarkGray;
const DIM: Color = Color::DarkGray;
/// Accent for the day counts in the headline.
const NUMBER: Color = Color::Red;

// ─── Main render ────────────────────────────────────────────────────────────

pub fn render(f: &mut Frame, app: &mut App) {
    let prompt_height = if app.prompt.visible { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(prompt_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_headline(f, app, chunks[0]);
    render_clock(f, chunks[0]);
    if app.prompt.visible {
        render_prompt(f, app, chunks[1]);
    }
    render_grid(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);
    render_tooltip(f, app);
}

// ─── Headline ───────────────────────────────────────────────────────────────

fn segments_line(segments: &[Segment], base: Style) -> Line<'static> {
    Line::from(
        segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => Span::styled(t.clone(), base),
                Segment::Number(n) => Span::styled(
                    n.to_string(),
                    base.fg(NUMBER).add_modifier(Modifier::BOLD),
                ),
            })
            .collect::<Vec<_>>(),
    )
}

fn render_headline(f: &mut Frame, app: &App, area: Rect) {
    let lines = match &app.headline {
        Some(h) => vec![
            segments_line(&h.first, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            segments_line(&h.second, Style::default().fg(Color::White)),
            Line::from(Span::styled(h.progress.clone(), Style::default().fg(DIM))),
        ],
        None => vec![Line::from(Span::styled("…", Style::default().fg(DIM)))],
    };

    let headline = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Days Left ")
            .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(headline, area);
}

// ─── Clock ──────────────────────────────────────────────────────────────────

fn render_clock(f: &mut Frame, header: Rect) {
    let time_str = format!(" {} ", Local::now().format("%a %b %d  %H:%M"));
    let clock_width = time_str.width() as u16;
    let clock_area = Rect {
        x: header.right().saturating_sub(clock_width + 1),
        y: header.y,
        width: clock_width.min(header.width),
        height: 1,
    };
    f.render_widget(
        Paragraph::new(time_str).style(Style::default().fg(ACCENT)),
        clock_area,
    );
}

// ─── Name prompt ────────────────────────────────────────────────────────────

fn render_prompt(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 3 || area.width < 4 {
        return;
    }
    let border = if app.prompt.focused { ACCENT } else { DIM };
    let input = Paragraph::new(app.prompt.input.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Your name ")
                .title_style(Style::default().fg(border)),
        );
    f.render_widget(input, area);

    if app.prompt.focused {
        let typed = u16::try_from(app.prompt.input.width()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        f.set_cursor_position((x, area.y + 1));
    }
}

// ─── Year grid ──────────────────────────────────────────────────────────────

fn render_grid(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.year_view.year))
        .title_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Rebuilt every frame; hover hit tests use this copy.
    let grid_width = GridLayout::full_width().min(inner.width);
    let grid_area = Rect {
        x: inner.x + inner.width.saturating_sub(grid_width) / 2,
        width: grid_width,
        ..inner
    };
    app.layout = GridLayout::compute(&app.year_view, grid_area);
    f.render_widget(
        YearGrid::new(&app.layout).current_month(app.today.month()),
        grid_area,
    );
}

// ─── Tooltip ────────────────────────────────────────────────────────────────

fn render_tooltip(f: &mut Frame, app: &App) {
    if !app.tooltip.is_visible() {
        return;
    }
    let frame = f.area();
    let text = app.tooltip.text();
    let width = text.width() as u16 + 2;
    let height = 3;
    if width > frame.width || height > frame.height {
        return;
    }

    // Keep the whole box on screen.
    let (x, y) = app.tooltip.position();
    let area = Rect {
        x: x.min(frame.right() - width),
        y: y.min(frame.bottom() - height),
        width,
        height,
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT))),
        area,
    );
}

// ─── Status Bar ─────────────────────────────────────────────────────────────

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status_message, Style::default().fg(Color::White)),
        Span::styled("  ", Style::default()),
    ];
    for class in [
        Classification::Today,
        Classification::Past,
        Classification::Future,
        Classification::Sunday,
    ] {
        spans.push(Span::styled("■", classification_style(class)));
        spans.push(Span::styled(format!(" {} ", class.class_name()), Style::default().fg(DIM)));
    }
    let keys = if app.prompt.visible {
        " Enter:save  Esc:leave prompt  n:edit name  q:quit "
    } else {
        " r:refresh  q:quit "
    };
    spans.push(Span::styled(keys, Style::default().fg(DIM)));

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(HEADER_BG));
    f.render_widget(status, area);
}
