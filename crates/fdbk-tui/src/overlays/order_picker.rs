use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fdbk_core::feedback::SortOrder;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay, render_separator};
use crate::mutations::{FeedbackMutation, StateMutation};
use crate::state::TuiState;

/// Picker for the feedback table order.
#[derive(Debug, Clone)]
pub struct OrderPickerState {
    pub selected: usize,
}

impl OrderPickerState {
    pub fn open(current: SortOrder) -> Self {
        let selected = SortOrder::ALL
            .iter()
            .position(|order| *order == current)
            .unwrap_or(0);
        Self { selected }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_order_picker(frame, self, area);
    }

    pub fn handle_key(&mut self, _tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                OverlayUpdate::stay()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < SortOrder::ALL.len() {
                    self.selected += 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                let Some(&order) = SortOrder::ALL.get(self.selected) else {
                    return OverlayUpdate::close();
                };
                OverlayUpdate::close().with_mutations(vec![StateMutation::Feedback(
                    FeedbackMutation::SetOrder(order),
                )])
            }
            _ => OverlayUpdate::stay(),
        }
    }
}

pub fn render_order_picker(frame: &mut Frame, picker: &OrderPickerState, area: Rect) {
    let hints = [
        InputHint::new("↑↓", "navegar"),
        InputHint::new("Enter", "selecionar"),
        InputHint::new("Esc", "cancelar"),
    ];
    let layout = render_overlay(
        frame,
        area,
        area.height,
        &OverlayConfig {
            title: "Ordenar por",
            border_color: Color::Magenta,
            width: 40,
            height: SortOrder::ALL.len() as u16 + 5,
            hints: &hints,
        },
    );

    let list_height = layout.body.height.saturating_sub(1);
    let list_area = Rect::new(layout.body.x, layout.body.y, layout.body.width, list_height);

    let items: Vec<ListItem> = SortOrder::ALL
        .iter()
        .map(|order| {
            ListItem::new(Line::from(Span::styled(
                order.label(),
                Style::default().fg(Color::Cyan),
            )))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));
    frame.render_stateful_widget(list, list_area, &mut list_state);

    render_separator(frame, layout.body, list_height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opens_on_current_order() {
        assert_eq!(OrderPickerState::open(SortOrder::RatingDesc).selected, 2);
    }

    #[test]
    fn enter_emits_set_order_and_closes() {
        let tui = TuiState::default();
        let mut picker = OrderPickerState::open(SortOrder::DateDesc);
        picker.handle_key(&tui, key(KeyCode::Down));
        picker.handle_key(&tui, key(KeyCode::Down));
        picker.handle_key(&tui, key(KeyCode::Down));
        picker.handle_key(&tui, key(KeyCode::Down));

        let update = picker.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(matches!(
            update.mutations.as_slice(),
            [StateMutation::Feedback(FeedbackMutation::SetOrder(SortOrder::RatingAsc))]
        ));
    }

    #[test]
    fn esc_closes_without_changes() {
        let tui = TuiState::default();
        let mut picker = OrderPickerState::open(SortOrder::DateAsc);
        let update = picker.handle_key(&tui, key(KeyCode::Esc));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(update.mutations.is_empty());
    }
}
