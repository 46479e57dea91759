use crate::ui::renderfns::{format_date, format_money, status_color};
use crate::woo::types::{Address, Order};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Full view of one order. `None` means it disappeared from the cache.
pub fn draw_order_detail(frame: &mut Frame, area: Rect, order: Option<&Order>, updating: bool) {
  let Some(order) = order else {
    let paragraph = Paragraph::new("This order is no longer in the list. Press q to go back.")
      .block(
        Block::default()
          .title(" Order ")
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Blue)),
      )
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  };

  let block = Block::default()
    .title(format!(" Order #{} ", order.number))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(2), // Status, date, total
      Constraint::Length(7), // Addresses
      Constraint::Min(1),    // Note and items
    ])
    .split(inner);

  let status_style = Style::default().fg(status_color(order.status.known())).bold();
  let mut summary = vec![
    Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
    Span::styled(order.status.label(), status_style),
  ];
  if updating {
    summary.push(Span::styled(" (updating...)", Style::default().fg(Color::Yellow)));
  }
  summary.extend([
    Span::raw("  "),
    Span::styled("Placed: ", Style::default().fg(Color::DarkGray)),
    Span::raw(format_date(order.created_at())),
    Span::raw("  "),
    Span::styled("Total: ", Style::default().fg(Color::DarkGray)),
    Span::raw(format_money(&order.total, &order.currency)).bold(),
  ]);
  frame.render_widget(Paragraph::new(Line::from(summary)), chunks[0]);

  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(chunks[1]);
  draw_address(frame, columns[0], "Billing", &order.billing);
  draw_address(frame, columns[1], "Shipping", &order.shipping);

  let mut lines = Vec::new();
  if !order.customer_note.trim().is_empty() {
    lines.push(Line::from(Span::styled(
      "Customer note",
      Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(order.customer_note.trim()));
    lines.push(Line::from(""));
  }

  lines.push(Line::from(Span::styled(
    "Items",
    Style::default().fg(Color::DarkGray),
  )));
  if order.line_items.is_empty() {
    lines.push(Line::from("No items."));
  }
  for item in &order.line_items {
    lines.push(Line::from(vec![
      Span::raw(format!("{:>3} × ", item.quantity)),
      Span::raw(item.name.clone()),
      Span::styled(
        format!("  @ {}", format_money(&item.price, &order.currency)),
        Style::default().fg(Color::DarkGray),
      ),
      Span::raw(format!("  {}", format_money(&item.total, &order.currency))),
    ]));
  }

  let body = Paragraph::new(lines).wrap(Wrap { trim: false });
  frame.render_widget(body, chunks[2]);
}

fn draw_address(frame: &mut Frame, area: Rect, title: &str, address: &Address) {
  let mut lines: Vec<Line> = address.lines().into_iter().map(Line::from).collect();
  if let Some(email) = address.email.as_deref().filter(|e| !e.is_empty()) {
    lines.push(Line::from(email.to_string()));
  }
  if let Some(phone) = address.phone.as_deref().filter(|p| !p.is_empty()) {
    lines.push(Line::from(phone.to_string()));
  }
  if lines.is_empty() {
    lines.push(Line::from(Span::styled(
      "Not provided",
      Style::default().fg(Color::DarkGray),
    )));
  }

  let block = Block::default()
    .title(format!(" {} ", title))
    .borders(Borders::TOP)
    .border_style(Style::default().fg(Color::DarkGray));
  frame.render_widget(Paragraph::new(lines).block(block), area);
}
