use crate::orders::OrderFilters;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// What the header shows about the current session
pub struct HeaderInfo<'a> {
  pub title: &'a str,
  /// Store domain, `None` when not connected
  pub domain: Option<&'a str>,
  pub loading: bool,
  pub filters: &'a OrderFilters,
}

/// Draw the header bar with title, connection state and active filters
pub fn draw_header(frame: &mut Frame, area: Rect, info: &HeaderInfo) {
  let sep = || Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(
      format!(" {} ", info.title),
      Style::default().fg(Color::Cyan).bold(),
    ),
    sep(),
  ];

  match info.domain {
    Some(domain) => {
      spans.push(Span::styled(
        format!(" {} ", domain),
        Style::default().fg(Color::White),
      ));
      if info.loading {
        spans.push(Span::styled("(syncing) ", Style::default().fg(Color::Yellow)));
      }
    }
    None => spans.push(Span::styled(
      " not connected ",
      Style::default().fg(Color::Red),
    )),
  }

  spans.push(sep());
  spans.push(Span::styled(
    format!(" {} ", info.filters.status.label()),
    Style::default().fg(Color::Yellow).bold(),
  ));
  spans.push(sep());
  spans.push(Span::styled(
    format!(" {} ", info.filters.sort.label()),
    Style::default().fg(Color::White),
  ));

  let query = info.filters.search.trim();
  if !query.is_empty() {
    spans.push(sep());
    spans.push(Span::styled(
      format!(" /{} ", query),
      Style::default().fg(Color::Cyan),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
