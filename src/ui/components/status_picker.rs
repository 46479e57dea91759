use super::KeyResult;
use crate::ui::renderfns::status_color;
use crate::woo::types::{OrderId, OrderStatus};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by status picker that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPickerEvent {
  Selected {
    order_id: OrderId,
    status: OrderStatus,
  },
  Cancelled,
}

/// Overlay for choosing an order's new status
#[derive(Debug, Clone, Default)]
pub struct StatusPicker {
  target: Option<(OrderId, String)>,
  selected: usize,
}

impl StatusPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.target.is_some()
  }

  /// Show the picker for one order, preselecting its current status
  pub fn show(&mut self, order_id: OrderId, number: &str, current: Option<OrderStatus>) {
    self.target = Some((order_id, number.to_string()));
    self.selected = current
      .and_then(|c| OrderStatus::ALL.iter().position(|s| *s == c))
      .unwrap_or(0);
  }

  pub fn hide(&mut self) {
    self.target = None;
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<StatusPickerEvent> {
    let Some((order_id, _)) = &self.target else {
      return KeyResult::NotHandled;
    };
    let order_id = *order_id;
    let count = OrderStatus::ALL.len();

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(StatusPickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let status = OrderStatus::ALL[self.selected];
        self.hide();
        KeyResult::Event(StatusPickerEvent::Selected { order_id, status })
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.selected = (self.selected + 1) % count;
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.selected = (self.selected + count - 1) % count;
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some((_, number)) = &self.target else {
      return;
    };

    let width = 30.min(area.width);
    let height = (OrderStatus::ALL.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" Status for #{} ", number));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = OrderStatus::ALL
      .iter()
      .map(|status| {
        ListItem::new(Line::from(vec![
          Span::styled("● ", Style::default().fg(status_color(Some(*status)))),
          Span::raw(status.label()),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_picker_ignores_keys() {
    let mut picker = StatusPicker::new();
    assert_eq!(picker.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }

  #[test]
  fn test_preselects_current_and_moves() {
    let mut picker = StatusPicker::new();
    picker.show(7, "1007", Some(OrderStatus::OnHold));

    picker.handle_key(key(KeyCode::Down));
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(StatusPickerEvent::Selected {
        order_id: 7,
        status: OrderStatus::Cancelled
      })
    );
    assert!(!picker.is_active());
  }

  #[test]
  fn test_up_wraps_around() {
    let mut picker = StatusPicker::new();
    picker.show(1, "1001", None);

    picker.handle_key(key(KeyCode::Up));
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(StatusPickerEvent::Selected {
        order_id: 1,
        status: OrderStatus::Failed
      })
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut picker = StatusPicker::new();
    picker.show(1, "1001", Some(OrderStatus::Pending));
    assert_eq!(
      picker.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(StatusPickerEvent::Cancelled)
    );
  }
}
