use crate::woo::types::OrderStatus;
use chrono::NaiveDateTime;
use ratatui::prelude::Color;

/// Truncate to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Badge color for a status; unrecognized statuses are gray
pub fn status_color(status: Option<OrderStatus>) -> Color {
  match status {
    Some(OrderStatus::Processing) => Color::Blue,
    Some(OrderStatus::Completed) => Color::Green,
    Some(OrderStatus::OnHold) => Color::Yellow,
    Some(OrderStatus::Cancelled) => Color::Red,
    Some(OrderStatus::Refunded) => Color::Magenta,
    Some(OrderStatus::Pending) => Color::LightYellow,
    Some(OrderStatus::Failed) => Color::LightRed,
    None => Color::Gray,
  }
}

/// Order total with its currency, e.g. "125.50 USD"
pub fn format_money(total: &str, currency: &str) -> String {
  let total = total.trim();
  let amount = two_decimals(total).unwrap_or_else(|| total.to_string());
  if currency.is_empty() {
    amount
  } else {
    format!("{} {}", amount, currency)
  }
}

/// Decimal string with exactly two fraction digits. Extra digits are cut,
/// not rounded. `None` when the input is not a plain decimal number.
fn two_decimals(value: &str) -> Option<String> {
  let (sign, digits) = match value.strip_prefix('-') {
    Some(rest) => ("-", rest),
    None => ("", value.strip_prefix('+').unwrap_or(value)),
  };
  let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));

  let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
  if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
    return None;
  }

  let int = if int.is_empty() { "0" } else { int };
  let frac: String = frac.chars().chain(std::iter::repeat('0')).take(2).collect();
  Some(format!("{}{}.{}", sign, int, frac))
}

/// "January 5, 2024", or "-" when the date could not be parsed
pub fn format_date(date: Option<NaiveDateTime>) -> String {
  match date {
    Some(d) => d.format("%B %-d, %Y").to_string(),
    None => "-".to_string(),
  }
}
