//! Derives the rows the dashboard shows from the cache and the UI filters.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::woo::types::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Only(OrderStatus),
}

impl StatusFilter {
  fn matches(&self, order: &Order) -> bool {
    match self {
      StatusFilter::All => true,
      StatusFilter::Only(status) => order.status.is(*status),
    }
  }

  /// All, then every status in display order, wrapping around
  pub fn next(&self) -> Self {
    let statuses = OrderStatus::ALL;
    match self {
      StatusFilter::All => StatusFilter::Only(statuses[0]),
      StatusFilter::Only(current) => statuses
        .iter()
        .position(|s| s == current)
        .and_then(|i| statuses.get(i + 1))
        .map(|s| StatusFilter::Only(*s))
        .unwrap_or(StatusFilter::All),
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      StatusFilter::All => "All",
      StatusFilter::Only(status) => status.label(),
    }
  }
}

impl FromStr for StatusFilter {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.trim().eq_ignore_ascii_case("all") {
      Ok(StatusFilter::All)
    } else {
      s.parse().map(StatusFilter::Only)
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Newest,
  Oldest,
}

impl SortOrder {
  pub fn toggle(&self) -> Self {
    match self {
      SortOrder::Newest => SortOrder::Oldest,
      SortOrder::Oldest => SortOrder::Newest,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      SortOrder::Newest => "Newest First",
      SortOrder::Oldest => "Oldest First",
    }
  }
}

impl fmt::Display for SortOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SortOrder::Newest => "newest",
      SortOrder::Oldest => "oldest",
    })
  }
}

impl FromStr for SortOrder {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "newest" => Ok(SortOrder::Newest),
      "oldest" => Ok(SortOrder::Oldest),
      other => Err(format!("unknown sort order '{}'", other)),
    }
  }
}

/// Transient UI filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilters {
  pub status: StatusFilter,
  pub search: String,
  pub sort: SortOrder,
}

/// Filter, search and sort `orders`.
///
/// Search is a case-insensitive substring match on the order number or the
/// billing "first last" name. Sorting is stable, so orders with equal dates
/// keep their input order; unparseable dates sort as the oldest.
pub fn visible_orders<'a, I>(orders: I, filters: &OrderFilters) -> Vec<&'a Order>
where
  I: IntoIterator<Item = &'a Order>,
{
  let query = filters.search.trim().to_lowercase();

  let mut rows: Vec<&Order> = orders
    .into_iter()
    .filter(|order| filters.status.matches(order))
    .filter(|order| query.is_empty() || matches_query(order, &query))
    .collect();

  match filters.sort {
    SortOrder::Newest => rows.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
    SortOrder::Oldest => rows.sort_by(|a, b| a.created_at().cmp(&b.created_at())),
  }

  rows
}

/// `query` must already be lowercased
fn matches_query(order: &Order, query: &str) -> bool {
  order.number.to_lowercase().contains(query)
    || order.customer_name().to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::woo::gateway::fake::order;
  use crate::woo::types::{OrderId, StatusValue};

  fn dated(id: OrderId, date: &str) -> Order {
    let mut o = order(id, OrderStatus::Processing);
    o.date_created = date.to_string();
    o
  }

  fn named(id: OrderId, first: &str, last: &str) -> Order {
    let mut o = order(id, OrderStatus::Processing);
    o.billing.first_name = first.to_string();
    o.billing.last_name = last.to_string();
    o
  }

  fn ids(rows: &[&Order]) -> Vec<OrderId> {
    rows.iter().map(|o| o.id).collect()
  }

  fn search(query: &str) -> OrderFilters {
    OrderFilters {
      search: query.to_string(),
      ..Default::default()
    }
  }

  #[test]
  fn test_sort_newest_and_oldest() {
    let orders = vec![
      dated(1, "2024-01-01T00:00:00"),
      dated(3, "2024-03-01T00:00:00"),
      dated(2, "2024-02-01T00:00:00"),
    ];

    let newest = visible_orders(&orders, &OrderFilters::default());
    assert_eq!(ids(&newest), vec![3, 2, 1]);

    let oldest = visible_orders(
      &orders,
      &OrderFilters {
        sort: SortOrder::Oldest,
        ..Default::default()
      },
    );
    assert_eq!(ids(&oldest), vec![1, 2, 3]);
  }

  #[test]
  fn test_sort_ties_keep_input_order() {
    let orders = vec![
      dated(5, "2024-01-01T00:00:00"),
      dated(2, "2024-01-01T00:00:00"),
      dated(9, "2024-01-01T00:00:00"),
    ];

    assert_eq!(
      ids(&visible_orders(&orders, &OrderFilters::default())),
      vec![5, 2, 9]
    );
  }

  #[test]
  fn test_unparseable_dates_sort_oldest() {
    let orders = vec![dated(1, "garbage"), dated(2, "2024-01-01T00:00:00")];

    assert_eq!(
      ids(&visible_orders(&orders, &OrderFilters::default())),
      vec![2, 1]
    );
  }

  #[test]
  fn test_search_is_case_insensitive() {
    let orders = vec![named(1, "Jane", "Doe"), named(2, "John", "Smith")];

    for query in ["jane", "DOE", "Jane Doe", "  e d  "] {
      assert_eq!(ids(&visible_orders(&orders, &search(query))), vec![1], "{query}");
    }
    assert!(visible_orders(&orders, &search("Janet")).is_empty());
  }

  #[test]
  fn test_search_matches_order_number() {
    let orders = vec![order(1, OrderStatus::Processing), order(42, OrderStatus::Processing)];

    assert_eq!(ids(&visible_orders(&orders, &search("1042"))), vec![42]);
  }

  #[test]
  fn test_empty_search_matches_all() {
    let orders = vec![named(1, "Jane", "Doe"), named(2, "John", "Smith")];
    assert_eq!(visible_orders(&orders, &search("   ")).len(), 2);
  }

  #[test]
  fn test_status_filter() {
    let mut odd = order(3, OrderStatus::Processing);
    odd.status = StatusValue::Unknown("trash".to_string());
    let orders = vec![
      order(1, OrderStatus::Completed),
      order(2, OrderStatus::Processing),
      odd,
    ];

    let completed = visible_orders(
      &orders,
      &OrderFilters {
        status: StatusFilter::Only(OrderStatus::Completed),
        ..Default::default()
      },
    );
    assert_eq!(ids(&completed), vec![1]);

    assert_eq!(visible_orders(&orders, &OrderFilters::default()).len(), 3);
  }

  #[test]
  fn test_projection_is_repeatable() {
    let orders = vec![
      dated(1, "2024-01-01T00:00:00"),
      named(2, "Jane", "Doe"),
      dated(3, "2023-12-31T23:59:59"),
    ];
    let filters = OrderFilters {
      status: StatusFilter::Only(OrderStatus::Processing),
      search: "doe".to_string(),
      sort: SortOrder::Oldest,
    };

    let first = visible_orders(&orders, &filters);
    let second = visible_orders(&orders, &filters);

    assert_eq!(first, second);
  }

  #[test]
  fn test_status_filter_cycles_back_to_all() {
    let mut filter = StatusFilter::All;
    for _ in 0..OrderStatus::ALL.len() {
      filter = filter.next();
      assert_ne!(filter, StatusFilter::All);
    }
    assert_eq!(filter.next(), StatusFilter::All);
  }

  #[test]
  fn test_parse_filters() {
    assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
    assert_eq!(
      "on-hold".parse::<StatusFilter>(),
      Ok(StatusFilter::Only(OrderStatus::OnHold))
    );
    assert_eq!("Oldest".parse::<SortOrder>(), Ok(SortOrder::Oldest));
    assert!("sideways".parse::<SortOrder>().is_err());
  }
}
