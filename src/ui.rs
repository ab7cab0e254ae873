use crate::app::{InfoLine, MapPane, PaneSurface};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Height of the info pane, borders included
pub const INFO_HEIGHT: u16 = 9;

/// Split the screen into the map pane (top) and the info pane (bottom)
pub fn pane_areas(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),              // Map
            Constraint::Length(INFO_HEIGHT), // Info
        ])
        .split(area);

    (chunks[0], chunks[1])
}

fn pane_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
}

/// Character extent inside the map pane border for a screen of `area`
pub fn map_extent(area: Rect) -> (usize, usize) {
    let (map_area, _) = pane_areas(area);
    let inner = pane_block("").inner(map_area);
    (inner.width as usize, inner.height as usize)
}

/// Render the UI
pub fn render(frame: &mut Frame, surface: &PaneSurface) {
    let (map_area, info_area) = pane_areas(frame.area());

    render_map(frame, surface.map.as_ref(), map_area);
    render_info(frame, surface.info.as_deref(), info_area);
}

fn render_map(frame: &mut Frame, pane: Option<&MapPane>, area: Rect) {
    let mut block = pane_block(" Map ");
    if let Some(err) = pane.and_then(|p| p.marker_error.as_deref()) {
        block = block.title_bottom(Span::styled(
            format!(" no marker: {err} "),
            Style::default().fg(Color::Red),
        ));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match pane {
        Some(pane) => frame.render_widget(MapWidget { rows: &pane.rows }, inner),
        None => frame.render_widget(
            Paragraph::new("Rendering map...").style(Style::default().fg(Color::DarkGray)),
            inner,
        ),
    }
}

/// Braille map rows with the location label drawn on top
struct MapWidget<'a> {
    rows: &'a [String],
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let marker_style = Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD);

        for (row_idx, row_str) in self.rows.iter().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                if ('\u{2801}'..='\u{28FF}').contains(&ch) {
                    buf[(x, y)].set_char(ch).set_fg(Color::Cyan);
                } else {
                    buf[(x, y)].set_char(ch).set_style(marker_style);
                }
            }
        }
    }
}

fn render_info(frame: &mut Frame, lines: Option<&[InfoLine]>, area: Rect) {
    let block = pane_block(" Info ").title_bottom(Span::styled(
        " q/Esc/Ctrl-C: quit ",
        Style::default().fg(Color::DarkGray),
    ));

    let text: Vec<Line> = match lines {
        Some(lines) => lines
            .iter()
            .map(|line| {
                Line::from(vec![
                    Span::styled(format!("{}: ", line.label), Style::default().fg(Color::DarkGray)),
                    Span::styled(line.value.as_str(), Style::default().fg(Color::Yellow)),
                ])
            })
            .collect(),
        None => vec![Line::styled("Loading...", Style::default().fg(Color::DarkGray))],
    };

    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Plain-text rendering of both panes, for non-interactive output
pub fn render_plain(surface: &PaneSurface) -> String {
    let mut out = String::new();

    if let Some(map) = &surface.map {
        for row in &map.rows {
            out.push_str(row);
            out.push('\n');
        }
        if let Some(err) = &map.marker_error {
            out.push_str(&format!("no marker: {err}\n"));
        }
    }

    if let Some(lines) = &surface.info {
        for line in lines {
            out.push_str(&format!("{}: {}\n", line.label, line.value));
        }
    }

    out
}
