use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::connection::ConnectionConfig;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Events emitted by the connect form that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectEvent {
  Submitted(ConnectionConfig),
  Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Field {
  #[default]
  Url,
  Token,
}

/// Store URL and token entry
#[derive(Debug, Clone, Default)]
pub struct ConnectForm {
  url: TextInput,
  token: TextInput,
  focus: Field,
  active: bool,
  error: Option<String>,
}

impl ConnectForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open the form, prefilled from the current connection
  pub fn show(&mut self, current: Option<&ConnectionConfig>) {
    self.active = true;
    self.focus = Field::Url;
    self.error = None;
    match current {
      Some(cfg) => {
        self.url.set_value(&cfg.url);
        self.token.set_value(&cfg.token);
      }
      None => {
        self.url.clear();
        self.token.clear();
      }
    }
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.error = None;
    self.token.clear();
  }

  /// Keep the form open and show why saving failed
  pub fn set_error(&mut self, message: impl Into<String>) {
    self.error = Some(message.into());
  }

  fn focused(&mut self) -> &mut TextInput {
    match self.focus {
      Field::Url => &mut self.url,
      Field::Token => &mut self.token,
    }
  }

  fn switch_focus(&mut self) {
    self.focus = match self.focus {
      Field::Url => Field::Token,
      Field::Token => Field::Url,
    };
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConnectEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
        self.switch_focus();
        return KeyResult::Handled;
      }
      KeyCode::Esc => {
        self.hide();
        return KeyResult::Event(ConnectEvent::Cancelled);
      }
      // Enter on the URL field moves on to the token
      KeyCode::Enter if self.focus == Field::Url && self.token.is_empty() => {
        self.focus = Field::Token;
        return KeyResult::Handled;
      }
      KeyCode::Enter => {
        self.error = None;
        return KeyResult::Event(ConnectEvent::Submitted(ConnectionConfig::new(
          self.url.value(),
          self.token.value(),
        )));
      }
      _ => {}
    }

    match self.focused().handle_key(key) {
      InputResult::Consumed => self.error = None,
      InputResult::Submitted(_) | InputResult::Cancelled | InputResult::NotHandled => {}
    }
    KeyResult::Handled
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 70 / 100).clamp(40, 80).min(area.width);
    let height = 9.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Connect to store ")
      .title_bottom(Line::from(" Tab switch  Enter save  Esc cancel ").right_aligned());

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
      ])
      .split(inner);

    let token_text = self.token.masked();
    frame.render_widget(
      Paragraph::new(self.field_line("Store URL", self.url.value(), Field::Url)),
      chunks[0],
    );
    frame.render_widget(
      Paragraph::new(self.field_line("API token", &token_text, Field::Token)),
      chunks[2],
    );

    if let Some(error) = &self.error {
      let para = Paragraph::new(error.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
      frame.render_widget(para, chunks[4]);
    }
  }

  fn field_line<'a>(&self, label: &'a str, value: &'a str, field: Field) -> Line<'a> {
    let focused = self.focus == field;
    let label_style = if focused {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
      Span::styled(format!("{:<11}", label), label_style),
      Span::raw(value),
    ];
    if focused {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
  }
}
