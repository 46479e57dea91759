pub mod components;
pub mod renderfns;
mod views;

use crate::app::{App, Screen};
use crate::woo::types::OrderId;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use renderfns::{draw_footer, draw_header, HeaderInfo};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let error = app.dashboard().error().map(str::to_string);
  let banner_height = if error.is_some() { 1 } else { 0 };

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),             // Header
      Constraint::Length(banner_height), // Error banner
      Constraint::Min(1),                // Main content
      Constraint::Length(1),             // Footer
    ])
    .split(frame.area());

  let dashboard = app.dashboard();
  let domain = dashboard.connection().map(|c| c.domain());
  let header = HeaderInfo {
    title: app.title(),
    domain: domain.as_deref(),
    loading: dashboard.is_loading(),
    filters: dashboard.filters(),
  };
  draw_header(frame, chunks[0], &header);

  if let Some(message) = error {
    draw_banner(frame, chunks[1], &message);
  }

  draw_content(frame, chunks[2], app);

  draw_footer(frame, chunks[3], &app.breadcrumb(), &app.key_hints());

  // Overlays render on top of the content area
  app.search().render_overlay(frame, chunks[2]);
  app.command().render_overlay(frame, chunks[2]);
  app.status_picker().render_overlay(frame, chunks[2]);
  app.connect_form().render_overlay(frame, chunks[2]);
}

fn draw_content(frame: &mut Frame, area: Rect, app: &mut App) {
  match app.screen() {
    Screen::Orders => {
      let spinner = app.spinner();
      let (dashboard, list_state) = app.list_parts();

      if !dashboard.is_connected() {
        views::draw_not_connected(frame, area);
        return;
      }

      let orders = dashboard.visible_orders();
      let is_updating = |id: OrderId| dashboard.is_updating(id);
      let props = views::OrderListProps {
        orders: &orders,
        total: dashboard.order_count(),
        loading: dashboard.is_loading(),
        spinner,
        is_updating: &is_updating,
      };
      views::draw_order_list(frame, area, &props, list_state);
    }
    Screen::Detail(id) => {
      let dashboard = app.dashboard();
      views::draw_order_detail(frame, area, dashboard.order(id), dashboard.is_updating(id));
    }
  }
}

fn draw_banner(frame: &mut Frame, area: Rect, message: &str) {
  let line = Line::from(vec![
    Span::styled(" ✖ ", Style::default().fg(Color::White).bg(Color::Red).bold()),
    Span::styled(format!(" {} ", message), Style::default().fg(Color::Red)),
    Span::styled("(x to dismiss)", Style::default().fg(Color::DarkGray)),
  ]);
  frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}
