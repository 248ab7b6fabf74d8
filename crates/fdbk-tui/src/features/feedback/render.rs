use chrono::{DateTime, Local, Utc};
use fdbk_core::auth::Identity;
use fdbk_core::feedback::{FeedbackRecord, FeedbackView};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::HomeState;
use crate::common::{TaskKind, Tasks, truncate_start_with_ellipsis, truncate_with_ellipsis};
use crate::overlays::render_utils::{InputHint, render_hints};

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
const EMPTY_MESSAGE: &str = "Nenhum feedback encontrado.";
const SEARCH_PLACEHOLDER: &str = "Buscar por nome ou comentário...";
const MAX_RATING: i64 = 5;

fn format_date(created_at: Option<DateTime<Utc>>) -> String {
    created_at.map_or_else(
        || "-".to_string(),
        |at| at.with_timezone(&Local).format("%d/%m/%Y").to_string(),
    )
}

fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(MAX_RATING as usize - filled));
    out
}

/// Renders the home screen.
pub fn render_home(
    frame: &mut Frame,
    area: Rect,
    home: &HomeState,
    identity: Option<&Identity>,
    tasks: &Tasks,
    spinner_frame: usize,
) {
    let view = home.list.view();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], identity, tasks, spinner_frame);
    render_controls(frame, chunks[1], home, tasks, spinner_frame);
    render_table(frame, chunks[2], &view, home.loaded_once);
    render_pager(frame, chunks[3], &view);

    let hints = if home.search_focused {
        vec![InputHint::new("Enter/Esc", "sair da busca")]
    } else {
        vec![
            InputHint::new("←→", "página"),
            InputHint::new("/", "buscar"),
            InputHint::new("o", "ordenar"),
            InputHint::new("r", "recarregar"),
            InputHint::new("x", "sair"),
            InputHint::new("q", "fechar"),
        ]
    };
    render_hints(frame, chunks[4], &hints, Color::Cyan);
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    identity: Option<&Identity>,
    tasks: &Tasks,
    spinner_frame: usize,
) {
    let greeting = identity
        .and_then(|who| who.name.as_deref().or(who.email.as_deref()))
        .map(|who| format!("Olá, {who}"))
        .unwrap_or_default();
    let sign_out = if tasks.state(TaskKind::SignOut).is_running() {
        format!("{} Sair ", SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()])
    } else {
        "Sair (x) ".to_string()
    };

    let left = Line::from(vec![
        Span::styled(
            " Feedbacks",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(greeting, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(left), area);
    frame.render_widget(
        Paragraph::new(Span::styled(sign_out, Style::default().fg(Color::Red)))
            .alignment(Alignment::Right),
        area,
    );
}

fn render_controls(
    frame: &mut Frame,
    area: Rect,
    home: &HomeState,
    tasks: &Tasks,
    spinner_frame: usize,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(36),
            Constraint::Length(18),
        ])
        .split(area);

    let border = if home.search_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let text_width = columns[0].width.saturating_sub(4) as usize;
    let search_line = if home.search.is_empty() {
        Line::from(Span::styled(
            SEARCH_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(truncate_start_with_ellipsis(
            home.search.value(),
            text_width,
        ))];
        if home.search_focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };
    frame.render_widget(
        Paragraph::new(search_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" / "),
        ),
        columns[0],
    );

    let order = Line::from(vec![
        Span::styled("Ordenar por: ", Style::default().fg(Color::Gray)),
        Span::styled(
            home.list.order().label(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(order).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" o "),
        ),
        columns[1],
    );

    let loading = tasks.state(TaskKind::FeedbackLoad).is_running();
    let (label, style) = if loading {
        (
            format!(
                "{} Carregando",
                SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()]
            ),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        ("Recarregar".to_string(), Style::default().fg(Color::Cyan))
    };
    frame.render_widget(
        Paragraph::new(Span::styled(label, style))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" r "),
            ),
        columns[2],
    );
}

fn render_table(frame: &mut Frame, area: Rect, view: &FeedbackView, loaded_once: bool) {
    const DATE_WIDTH: u16 = 10;
    const NAME_WIDTH: u16 = 20;
    const RATING_WIDTH: u16 = 5;

    let comment_width = area
        .width
        .saturating_sub(DATE_WIDTH + NAME_WIDTH + RATING_WIDTH + 3 + 2) as usize;

    let header = Row::new(["Data", "Nome", "Comentário", "Nota"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = if view.rows.is_empty() {
        let message = if loaded_once { EMPTY_MESSAGE } else { "Carregando..." };
        vec![Row::new([
            Cell::from(""),
            Cell::from(""),
            Cell::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
            Cell::from(""),
        ])]
    } else {
        view.rows
            .iter()
            .map(|record| feedback_row(record, NAME_WIDTH as usize, comment_width))
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(DATE_WIDTH),
            Constraint::Length(NAME_WIDTH),
            Constraint::Min(10),
            Constraint::Length(RATING_WIDTH),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(table, area);
}

fn feedback_row(record: &FeedbackRecord, name_width: usize, comment_width: usize) -> Row<'static> {
    Row::new([
        Cell::from(format_date(record.created_at)),
        Cell::from(truncate_with_ellipsis(&record.user_name, name_width)),
        Cell::from(truncate_with_ellipsis(&record.comment, comment_width)),
        Cell::from(Span::styled(
            stars(record.rating),
            Style::default().fg(Color::Yellow),
        )),
    ])
}

fn render_pager(frame: &mut Frame, area: Rect, view: &FeedbackView) {
    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let line = Line::from(vec![
        Span::styled(
            "← Anterior",
            if view.has_prev() { enabled } else { disabled },
        ),
        Span::raw("   "),
        Span::raw(view.page_label()),
        Span::raw("   "),
        Span::styled(
            "Próxima →",
            if view.has_next() { enabled } else { disabled },
        ),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn stars_clamp_to_five() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
        assert_eq!(stars(-1), "☆☆☆☆☆");
    }

    #[test]
    fn missing_date_renders_dash() {
        assert_eq!(format_date(None), "-");
        let noon = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).single();
        let rendered = format_date(noon);
        assert_eq!(rendered.len(), 10);
        assert!(rendered.ends_with("/2024"));
    }
}
