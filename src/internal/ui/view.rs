use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use super::app::{App, InputMode};
use crate::internal::gallery::{self, Placement};
use crate::internal::jokes;
use crate::internal::models::{Joke, JokeCardState, Photo};
use crate::internal::notification::ToastKind;
use crate::internal::router::{NavLink, Route};
use crate::utils::theme_loader::TuiTheme;

const BRAND: &str = "SQA Demo App";
const HALF_BLOCK: &str = "▀";
const COLUMN_GAP: u16 = 1;

#[tracing::instrument(skip(app, f))]
pub fn draw(app: &mut App, f: &mut Frame) {
    let start = std::time::Instant::now();

    f.render_widget(
        Block::default().style(
            Style::default()
                .bg(app.theme.background)
                .fg(app.theme.foreground),
        ),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_nav_bar(app, f, chunks[0]);

    let view_start = std::time::Instant::now();
    let view = match app.route {
        Route::Gallery => {
            render_gallery(app, f, chunks[1]);
            "gallery"
        }
        Route::Jokes => {
            render_jokes(app, f, chunks[1]);
            "jokes"
        }
        Route::NotFound(_) => {
            render_not_found(app, f, chunks[1]);
            "not_found"
        }
    };
    if app.config.logging.enable_performance_metrics && cfg!(debug_assertions) {
        tracing::debug!(elapsed = ?view_start.elapsed(), view, "render.view");
    }

    render_status_bar(app, f, chunks[2]);

    if app.input_mode == InputMode::PathInput {
        render_path_prompt(app, f);
    }

    if app.toast.is_some() {
        render_toast(app, f);
    }

    if app.config.logging.enable_performance_metrics && cfg!(debug_assertions) {
        tracing::debug!(elapsed = ?start.elapsed(), "render.draw");
    }
}

fn render_nav_bar(app: &App, f: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(
            format!(" {} ", BRAND),
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    for (i, link) in NavLink::all().into_iter().enumerate() {
        let style = match link.is_active(&app.route) {
            true => Style::default()
                .bg(theme.primary_bg)
                .fg(theme.primary_fg)
                .add_modifier(Modifier::BOLD),
            false => Style::default().fg(theme.muted),
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, link), style));
        spans.push(Span::raw(" "));
    }

    let toggle_label = app.theme_store.preference().toggle_label();
    let toggle_width = toggle_label.chars().count() as u16 + 4;

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(toggle_width)])
        .split(area);

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background)),
        cols[0],
    );
    f.render_widget(
        Paragraph::new(format!("[ {} ]", toggle_label))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.accent_fg).bg(theme.accent_bg)),
        cols[1],
    );
}

/// Page title over a rule, returning the area below it.
fn render_page_title(app: &App, f: &mut Frame, area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        app.route.title(),
        Style::default()
            .fg(app.theme.foreground)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(app.theme.border))
            .padding(Padding::horizontal(1)),
    );
    f.render_widget(title, chunks[0]);

    chunks[1]
}

fn render_error_banner(theme: &TuiTheme, f: &mut Frame, area: Rect, message: &str) {
    let height = 3.min(area.height);
    let banner_area = Rect::new(area.x, area.y, area.width, height);
    let banner = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(theme.destructive))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.destructive))
                .padding(Padding::horizontal(1)),
        );
    f.render_widget(banner, banner_area);
}

/// Column geometry for a grid of `columns` within `area`.
fn column_rects(area: Rect, columns: usize) -> Vec<(u16, u16)> {
    let columns = columns.max(1) as u16;
    let gaps = COLUMN_GAP * (columns - 1);
    let width = area.width.saturating_sub(gaps) / columns;
    (0..columns)
        .map(|i| (area.x + i * (width + COLUMN_GAP), width))
        .collect()
}

fn render_gallery(app: &mut App, f: &mut Frame, area: Rect) {
    let area = render_page_title(app, f, area);
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };

    if let Some(message) = app.gallery.loader.error() {
        render_error_banner(&app.theme, f, area, message);
        return;
    }

    let columns = column_rects(area, gallery::column_count(area.width));
    let inner_width = columns.first().map(|(_, w)| w.saturating_sub(2)).unwrap_or(0);
    let target_width = app.gallery.target_width();

    // Card height: borders + picture rows, plus a caption line for real photos.
    let heights: Vec<u16> = match app.gallery.loader.is_loading() {
        true => app
            .gallery
            .skeleton_heights()
            .iter()
            .map(|&h| gallery::picture_rows(h, target_width, inner_width).saturating_add(2))
            .collect(),
        false => app
            .gallery
            .photos()
            .iter()
            .map(|p| {
                gallery::picture_rows(app.gallery.display_height(p), target_width, inner_width)
                    .saturating_add(3)
            })
            .collect(),
    };

    let placements = gallery::masonry(&heights, columns.len());
    let content_height = placements
        .iter()
        .map(|p| p.y + p.height as u32)
        .max()
        .unwrap_or(0);
    let max_scroll = content_height.saturating_sub(area.height as u32);
    if app.gallery.scroll as u32 > max_scroll {
        app.gallery.scroll = max_scroll as u16;
    }
    let scroll = app.gallery.scroll as u32;

    for (i, placement) in placements.iter().enumerate() {
        let Some(frame) = clip_card(area, &columns, placement, scroll) else {
            continue;
        };
        let lines = match app.gallery.loader.is_loading() {
            true => skeleton_lines(&app.theme, placement.height.saturating_sub(2), inner_width, ""),
            false => match app.gallery.photos().get(i) {
                Some(photo) => photo_lines(app, photo, placement.height, inner_width),
                None => continue,
            },
        };
        render_card(&app.theme, f, frame, lines);
    }
}

/// A card's on-screen rectangle after scrolling, with the borders that are
/// still visible and how many content rows scrolled off the top.
struct CardFrame {
    rect: Rect,
    borders: Borders,
    hidden_rows: u16,
}

fn clip_card(
    area: Rect,
    columns: &[(u16, u16)],
    placement: &Placement,
    scroll: u32,
) -> Option<CardFrame> {
    let (x, width) = *columns.get(placement.column)?;
    let top = placement.y;
    let bottom = placement.y + placement.height as u32;
    let view_bottom = scroll + area.height as u32;

    let visible_top = top.max(scroll);
    let visible_bottom = bottom.min(view_bottom);
    if visible_bottom <= visible_top {
        return None;
    }

    let mut borders = Borders::ALL;
    if top < scroll {
        borders.remove(Borders::TOP);
    }
    if bottom > view_bottom {
        borders.remove(Borders::BOTTOM);
    }
    let hidden = (visible_top - top) as u16;

    Some(CardFrame {
        rect: Rect::new(
            x,
            area.y + (visible_top - scroll) as u16,
            width,
            (visible_bottom - visible_top) as u16,
        ),
        borders,
        hidden_rows: hidden.saturating_sub(1),
    })
}

fn render_card(
    theme: &TuiTheme,
    f: &mut Frame,
    frame: CardFrame,
    lines: Vec<Line<'static>>,
) {
    let block = Block::default()
        .borders(frame.borders)
        .border_style(Style::default().fg(theme.card_border))
        .style(Style::default().bg(theme.card_bg));

    let card = Paragraph::new(lines)
        .block(block)
        .scroll((frame.hidden_rows, 0));
    f.render_widget(card, frame.rect);
}

fn skeleton_lines(theme: &TuiTheme, rows: u16, width: u16, label: &str) -> Vec<Line<'static>> {
    let fill = Style::default().bg(theme.skeleton).fg(theme.muted);
    let label_row = rows / 2;
    (0..rows)
        .map(|row| {
            let text = match row == label_row && !label.is_empty() {
                true => format!("{:^width$}", label, width = width as usize),
                false => " ".repeat(width as usize),
            };
            Line::from(Span::styled(text, fill))
        })
        .collect()
}

fn photo_lines(app: &App, photo: &Photo, card_height: u16, width: u16) -> Vec<Line<'static>> {
    let rows = card_height.saturating_sub(3);

    let mut lines = match app.gallery.thumbnail(&photo.id) {
        Some(thumb) => thumb
            .cells(width, rows)
            .into_iter()
            .map(|row| {
                Line::from(
                    row.into_iter()
                        .map(|([tr, tg, tb], [br, bg, bb])| {
                            Span::styled(
                                HALF_BLOCK,
                                Style::default()
                                    .fg(Color::Rgb(tr, tg, tb))
                                    .bg(Color::Rgb(br, bg, bb)),
                            )
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect(),
        None => {
            let label = match app.gallery.has_failed(&photo.id) {
                true => "Image unavailable",
                false => "Loading...",
            };
            skeleton_lines(&app.theme, rows, width, label)
        }
    };

    let caption: String = gallery::caption(photo)
        .chars()
        .take(width as usize)
        .collect();
    lines.push(Line::from(Span::styled(
        caption,
        Style::default().fg(app.theme.muted),
    )));
    lines
}

fn render_jokes(app: &App, f: &mut Frame, area: Rect) {
    let area = render_page_title(app, f, area);
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };

    if let Some(message) = app.jokes.loader.error() {
        render_error_banner(&app.theme, f, area, message);
        return;
    }

    let columns = column_rects(area, jokes::column_count(area.width));
    let inner_width = columns
        .first()
        .map(|(_, w)| w.saturating_sub(4))
        .unwrap_or(0)
        .max(1);

    if app.jokes.loader.is_loading() {
        let placeholders = app.config.jokes.loading_placeholders;
        let cards: Vec<(Vec<Line<'static>>, Option<String>)> = (0..placeholders)
            .map(|_| (skeleton_lines(&app.theme, 5, inner_width, ""), None))
            .collect();
        render_joke_grid(app, f, area, &columns, cards, None);
        return;
    }

    let cards: Vec<(Vec<Line<'static>>, Option<String>)> = app
        .jokes
        .jokes()
        .iter()
        .enumerate()
        .map(|(i, joke)| {
            let selected = i == app.jokes.selected();
            (
                joke_lines(
                    &app.theme,
                    joke,
                    app.jokes.card(joke.id),
                    selected,
                    inner_width,
                ),
                Some(format!(" {} ", joke.kind)),
            )
        })
        .collect();
    render_joke_grid(app, f, area, &columns, cards, Some(app.jokes.selected()));
}

/// Lay joke cards out row by row, scrolling so the selected card stays in view.
fn render_joke_grid(
    app: &App,
    f: &mut Frame,
    area: Rect,
    columns: &[(u16, u16)],
    cards: Vec<(Vec<Line<'static>>, Option<String>)>,
    selected: Option<usize>,
) {
    let per_row = columns.len().max(1);
    let mut rows: Vec<Vec<(usize, Vec<Line<'static>>, Option<String>)>> = Vec::new();
    for (i, (lines, title)) in cards.into_iter().enumerate() {
        if i % per_row == 0 {
            rows.push(Vec::new());
        }
        if let Some(row) = rows.last_mut() {
            row.push((i, lines, title));
        }
    }
    let row_heights: Vec<u16> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(_, lines, _)| lines.len() as u16 + 2)
                .max()
                .unwrap_or(0)
        })
        .collect();

    let selected_row = selected.map(|s| s / per_row).unwrap_or(0);
    let mut first_row = 0;
    while first_row < selected_row
        && row_heights[first_row..=selected_row].iter().sum::<u16>() > area.height
    {
        first_row += 1;
    }

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (row, height) in rows.into_iter().zip(row_heights).skip(first_row) {
        if y >= bottom {
            break;
        }
        let visible = height.min(bottom - y);
        for (i, lines, title) in row {
            let Some(&(x, width)) = columns.get(i % per_row) else {
                continue;
            };
            let mut borders = Borders::ALL;
            if visible < height {
                borders.remove(Borders::BOTTOM);
            }
            let border_color = match selected == Some(i) {
                true => app.theme.primary_bg,
                false => app.theme.card_border,
            };
            let mut block = Block::default()
                .borders(borders)
                .border_style(Style::default().fg(border_color))
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(app.theme.card_bg));
            if let Some(title) = title {
                block = block.title(title);
            }
            f.render_widget(
                Paragraph::new(lines).block(block),
                Rect::new(x, y, width, visible),
            );
        }
        y += height;
    }
}

fn joke_lines(
    theme: &TuiTheme,
    joke: &Joke,
    card: JokeCardState,
    selected: bool,
    width: u16,
) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines: Vec<Line<'static>> = textwrap::wrap(&joke.setup, width)
        .into_iter()
        .map(|l| {
            Line::from(Span::styled(
                l.into_owned(),
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .collect();
    lines.push(Line::default());

    if card.punchline_visible {
        lines.extend(textwrap::wrap(&joke.punchline, width).into_iter().map(|l| {
            Line::from(Span::styled(
                l.into_owned(),
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::ITALIC),
            ))
        }));
        lines.push(Line::default());
    }

    let button_style = match selected {
        true => Style::default()
            .bg(theme.primary_bg)
            .fg(theme.primary_fg)
            .add_modifier(Modifier::BOLD),
        false => Style::default().bg(theme.accent_bg).fg(theme.accent_fg),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("[ {} ]", card.toggle_label()), button_style),
        Span::raw("  "),
        Span::styled(
            format!("♥ {}", card.like_count),
            Style::default().fg(theme.like),
        ),
    ]));
    lines
}

fn render_not_found(app: &App, f: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(Span::styled(
            "404",
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Page Not Found",
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Oops! The page you're looking for doesn't exist.",
            Style::default().fg(theme.muted),
        )),
        Line::from(Span::styled(
            app.route.path().to_string(),
            Style::default().fg(theme.muted),
        )),
        Line::default(),
        Line::from(Span::styled(
            "[ Return to Gallery ]",
            Style::default()
                .bg(theme.primary_bg)
                .fg(theme.primary_fg)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let height = lines.len() as u16;
    let top = area.y + area.height.saturating_sub(height) / 2;
    let content_area = Rect::new(area.x, top, area.width, height.min(area.height));
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        content_area,
    );
}

fn render_status_bar(app: &App, f: &mut Frame, area: Rect) {
    let status = match (&app.input_mode, &app.route) {
        (InputMode::PathInput, _) => "Type a path | Enter: Go | Esc: Cancel".to_string(),
        (InputMode::Normal, Route::Gallery) => {
            let progress = match app.gallery.photos().len() {
                0 => String::new(),
                n => format!("Images: {}/{} | ", app.gallery.decoded_count(), n),
            };
            format!(
                "{}1/2/Tab: Pages | j/k: Scroll | :: Path | t: Theme | q: Quit",
                progress
            )
        }
        (InputMode::Normal, Route::Jokes) => {
            "1/2/Tab: Pages | j/k: Select | Enter: Punchline | l: Like | t: Theme | q: Quit"
                .to_string()
        }
        (InputMode::Normal, Route::NotFound(_)) => {
            "Enter: Return to Gallery | 1/2/Tab: Pages | :: Path | t: Theme | q: Quit".to_string()
        }
    };

    let p = Paragraph::new(status)
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(app.theme.accent_bg)),
        )
        .style(Style::default().fg(app.theme.accent_fg));
    f.render_widget(p, area);
}

fn render_path_prompt(app: &App, f: &mut Frame) {
    let area = f.area();
    let width = 50.min(area.width.saturating_sub(4));
    let height = 3.min(area.height);
    let prompt_area = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let input = Paragraph::new(format!("{}█", app.path_input))
        .style(
            Style::default()
                .bg(app.theme.background)
                .fg(app.theme.foreground),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.primary_bg))
                .title(" Go to path ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        );

    f.render_widget(Clear, prompt_area);
    f.render_widget(input, prompt_area);
}

fn render_toast(app: &App, f: &mut Frame) {
    let Some(toast) = &app.toast else {
        return;
    };
    let area = f.area();

    let width = (toast.message.chars().count() as u16 + 4).min(area.width.saturating_sub(2));
    let height = 3.min(area.height);
    // Bottom-right, above the status bar.
    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    );

    let (border, title) = match toast.kind {
        ToastKind::Info => (app.theme.primary_bg, "Info"),
        ToastKind::Error => (app.theme.destructive, "Error"),
    };

    let popup = Paragraph::new(toast.message.as_str())
        .style(
            Style::default()
                .bg(app.theme.card_bg)
                .fg(app.theme.foreground),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        )
        .alignment(Alignment::Center);

    f.render_widget(Clear, toast_area);
    f.render_widget(popup, toast_area);
}
