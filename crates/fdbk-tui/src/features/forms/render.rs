//! Credential form view.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{CredentialForm, FieldId, Focus, FormKind, TextField};
use crate::common::{mask, truncate_start_with_ellipsis};
use crate::overlays::render_utils::{InputHint, OverlayConfig, render_overlay};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];
const FORM_WIDTH: u16 = 56;

struct FieldCopy {
    label: &'static str,
    placeholder: &'static str,
}

fn field_copy(kind: FormKind, id: FieldId) -> FieldCopy {
    match (kind, id) {
        (_, FieldId::Name) => FieldCopy {
            label: "Nome",
            placeholder: "Nome completo",
        },
        (FormKind::Login, FieldId::Email) => FieldCopy {
            label: "E-mail",
            placeholder: "seu@email.com",
        },
        (FormKind::Register, FieldId::Email) => FieldCopy {
            label: "E-mail",
            placeholder: "Digite seu email",
        },
        (_, FieldId::Password) => FieldCopy {
            label: "Senha",
            placeholder: "Digite sua senha",
        },
    }
}

/// Renders a login or registration card centered in `area`.
pub fn render_form(
    frame: &mut Frame,
    form: &CredentialForm,
    area: Rect,
    busy: bool,
    spinner_frame: usize,
) {
    let (title, button, link) = match form.kind {
        FormKind::Login => (
            "Acessar Plataforma",
            "Entrar",
            "Ainda não possui uma conta? Cadastre-se (Ctrl+R)",
        ),
        FormKind::Register => ("Crie sua conta", "Cadastrar", "Já tem uma conta? Acesse (Esc)"),
    };

    let hints = [
        InputHint::new("Tab", "próximo campo"),
        InputHint::new("Enter", "enviar"),
        InputHint::new("Ctrl+C", "sair"),
    ];
    let field_count = form.fields().count() as u16;
    let layout = render_overlay(
        frame,
        area,
        area.height,
        &OverlayConfig {
            title,
            border_color: Color::Blue,
            width: FORM_WIDTH,
            height: 3 * field_count + 8,
            hints: &hints,
        },
    );
    let inner = Rect::new(
        layout.body.x + 1,
        layout.body.y,
        layout.body.width.saturating_sub(2),
        layout.body.height,
    );

    let mut lines = vec![Line::from("")];
    for id in form.fields() {
        let copy = field_copy(form.kind, id);
        let focused = form.focused() == Focus::Field(id);
        let error = form.error(id);
        lines.push(Line::from(Span::styled(
            copy.label,
            Style::default().fg(if focused { Color::Cyan } else { Color::Gray }),
        )));
        lines.push(input_line(
            form.field(id),
            id == FieldId::Password,
            copy.placeholder,
            focused,
            error.is_some(),
            inner.width as usize,
        ));
        lines.push(match error {
            Some(message) => Line::from(Span::styled(message, Style::default().fg(Color::Red))),
            None => Line::from(""),
        });
    }

    lines.push(Line::from(""));
    lines.push(button_line(
        button,
        form.focused() == Focus::Submit,
        busy,
        spinner_frame,
    ));
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(link, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
    );

    frame.render_widget(Paragraph::new(lines), inner);
}

fn input_line(
    field: &TextField,
    masked: bool,
    placeholder: &'static str,
    focused: bool,
    invalid: bool,
    width: usize,
) -> Line<'static> {
    let prompt_color = if invalid {
        Color::Red
    } else if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let prompt = Span::styled("> ", Style::default().fg(prompt_color));
    let max_text = width.saturating_sub(3);

    if field.is_empty() {
        let mut spans = vec![prompt];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        spans.push(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        ));
        return Line::from(spans);
    }

    let shown = if masked {
        mask(field.value())
    } else {
        field.value().to_string()
    };
    if !focused {
        return Line::from(vec![
            prompt,
            Span::raw(truncate_start_with_ellipsis(&shown, max_text)),
        ]);
    }

    let before: String = shown.chars().take(field.cursor()).collect();
    let at: Option<char> = shown.chars().nth(field.cursor());
    let after: String = shown.chars().skip(field.cursor() + 1).collect();
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    Line::from(vec![
        prompt,
        Span::raw(truncate_start_with_ellipsis(&before, max_text)),
        Span::styled(at.map_or_else(|| " ".to_string(), String::from), cursor_style),
        Span::raw(after),
    ])
}

fn button_line(label: &str, focused: bool, busy: bool, spinner_frame: usize) -> Line<'static> {
    let text = if busy {
        format!(
            " {} Enviando... ",
            SPINNER[spinner_frame % SPINNER.len()]
        )
    } else {
        format!(" {label} ")
    };
    let style = if busy {
        Style::default().fg(Color::DarkGray).bg(Color::Black)
    } else if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).bg(Color::Blue)
    };
    Line::from(Span::styled(text, style)).alignment(Alignment::Center)
}
