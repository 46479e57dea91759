use crate::ui::renderfns::{format_date, format_money, status_color, truncate};
use crate::woo::types::{Order, OrderId};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

pub struct OrderListProps<'a> {
  pub orders: &'a [&'a Order],
  /// Orders in the cache before filtering
  pub total: usize,
  pub loading: bool,
  pub spinner: &'a str,
  pub is_updating: &'a dyn Fn(OrderId) -> bool,
}

pub fn draw_order_list(frame: &mut Frame, area: Rect, props: &OrderListProps, state: &mut ListState) {
  let title = if props.loading {
    " Orders (loading...) ".to_string()
  } else if props.orders.len() == props.total {
    format!(" Orders ({}) ", props.total)
  } else {
    format!(" Orders ({} of {}) ", props.orders.len(), props.total)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if props.orders.is_empty() {
    let content = if props.loading {
      "Loading orders..."
    } else {
      "No orders found."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = props
    .orders
    .iter()
    .map(|order| order_row(order, (props.is_updating)(order.id), props.spinner))
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  frame.render_stateful_widget(list, area, state);
}

fn order_row<'a>(order: &'a Order, updating: bool, spinner: &'a str) -> ListItem<'a> {
  let customer = match order.billing.email.as_deref() {
    Some(email) if !email.is_empty() => format!("{} <{}>", order.customer_name(), email),
    _ => order.customer_name(),
  };
  let marker = if updating { spinner } else { " " };

  let line = Line::from(vec![
    Span::styled(
      format!("#{:<8}", order.number),
      Style::default().fg(Color::Cyan),
    ),
    Span::raw(" "),
    Span::raw(format!("{:<40}", truncate(&customer, 40))),
    Span::raw(" "),
    Span::styled(
      format!("{:<20}", format_date(order.created_at())),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(" "),
    Span::styled(marker, Style::default().fg(Color::Yellow)),
    Span::raw(" "),
    Span::styled(
      format!("{:<11}", order.status.label()),
      Style::default().fg(status_color(order.status.known())),
    ),
    Span::raw(" "),
    Span::raw(format_money(&order.total, &order.currency)),
  ]);
  ListItem::new(line)
}

/// Shown instead of the list when no credential is stored
pub fn draw_not_connected(frame: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Not connected ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let text = vec![
    Line::from("No store connection is configured."),
    Line::from(""),
    Line::from(vec![
      Span::raw("Press "),
      Span::styled("c", Style::default().fg(Color::Cyan).bold()),
      Span::raw(" to enter your store URL and connection token,"),
    ]),
    Line::from("or run `ordash connect --url <URL> --token <TOKEN>`."),
  ];

  let paragraph = Paragraph::new(text)
    .block(block)
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::DarkGray));
  frame.render_widget(paragraph, area);
}
