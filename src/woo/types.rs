//! Domain types for store orders as the connector endpoint returns them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type OrderId = u64;

/// Order lifecycle states the dashboard can set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
  Processing,
  Completed,
  OnHold,
  Cancelled,
  Refunded,
  Pending,
  Failed,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 7] = [
    OrderStatus::Processing,
    OrderStatus::Completed,
    OrderStatus::OnHold,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
    OrderStatus::Pending,
    OrderStatus::Failed,
  ];

  /// Wire name
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Processing => "processing",
      OrderStatus::Completed => "completed",
      OrderStatus::OnHold => "on-hold",
      OrderStatus::Cancelled => "cancelled",
      OrderStatus::Refunded => "refunded",
      OrderStatus::Pending => "pending",
      OrderStatus::Failed => "failed",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      OrderStatus::Processing => "Processing",
      OrderStatus::Completed => "Completed",
      OrderStatus::OnHold => "On Hold",
      OrderStatus::Cancelled => "Cancelled",
      OrderStatus::Refunded => "Refunded",
      OrderStatus::Pending => "Pending",
      OrderStatus::Failed => "Failed",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim().to_lowercase();
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s || status.label().to_lowercase() == s)
      .ok_or_else(|| format!("unknown order status '{}'", s))
  }
}

/// Status as received from the store.
///
/// Values outside [`OrderStatus`] are kept verbatim so they can be shown as
/// "Unknown" instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
  Known(OrderStatus),
  Unknown(String),
}

impl StatusValue {
  pub fn known(&self) -> Option<OrderStatus> {
    match self {
      StatusValue::Known(status) => Some(*status),
      StatusValue::Unknown(_) => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      StatusValue::Known(status) => status.label(),
      StatusValue::Unknown(_) => "Unknown",
    }
  }

  pub fn is(&self, status: OrderStatus) -> bool {
    self.known() == Some(status)
  }
}

impl From<OrderStatus> for StatusValue {
  fn from(status: OrderStatus) -> Self {
    StatusValue::Known(status)
  }
}

impl fmt::Display for StatusValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StatusValue::Known(status) => f.write_str(status.as_str()),
      StatusValue::Unknown(raw) => f.write_str(raw),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
  pub first_name: String,
  pub last_name: String,
  pub address_1: String,
  pub address_2: Option<String>,
  pub city: String,
  pub state: String,
  pub postcode: String,
  pub country: String,
  pub email: Option<String>,
  pub phone: Option<String>,
}

impl Address {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Non-empty address lines for display
  pub fn lines(&self) -> Vec<String> {
    let locality = [self.city.as_str(), self.state.as_str(), self.postcode.as_str()]
      .into_iter()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(", ");

    [
      Some(self.full_name().trim().to_string()),
      Some(self.address_1.clone()),
      self.address_2.clone(),
      Some(locality),
      Some(self.country.clone()),
    ]
    .into_iter()
    .flatten()
    .filter(|line| !line.is_empty())
    .collect()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub product_id: u64,
  #[serde(default)]
  pub quantity: u32,
  #[serde(default, deserialize_with = "string_or_number")]
  pub price: String,
  #[serde(default, deserialize_with = "string_or_number")]
  pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,
  #[serde(deserialize_with = "string_or_number")]
  pub number: String,
  pub status: StatusValue,
  #[serde(default)]
  pub date_created: String,
  #[serde(default)]
  pub currency: String,
  #[serde(default, deserialize_with = "string_or_number")]
  pub total: String,
  #[serde(default)]
  pub customer_note: String,
  #[serde(default)]
  pub billing: Address,
  #[serde(default)]
  pub shipping: Address,
  #[serde(default)]
  pub line_items: Vec<LineItem>,
}

impl Order {
  /// Billing first and last name joined by a space
  pub fn customer_name(&self) -> String {
    self.billing.full_name()
  }

  /// `date_created` as a comparable instant, `None` when it cannot be parsed
  pub fn created_at(&self) -> Option<NaiveDateTime> {
    parse_order_date(&self.date_created)
  }
}

/// Parse the date formats the store is known to send.
///
/// RFC 3339 values are normalized to UTC; naive values are taken as-is.
pub fn parse_order_date(s: &str) -> Option<NaiveDateTime> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_utc());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
    return Some(dt);
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
    return Some(dt);
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Accept a JSON string or number, keeping the textual form
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Str(String),
    Num(serde_json::Number),
    Null(()),
  }

  Ok(match Raw::deserialize(deserializer)? {
    Raw::Str(s) => s,
    Raw::Num(n) => n.to_string(),
    Raw::Null(()) => String::new(),
  })
}
