//! Remote order gateway: the paginated full fetch and the status mutation.
//!
//! Transport is behind [`OrderApi`] so the pagination protocol can be driven by
//! a scripted store in tests. Nothing here caches or retries.

use async_trait::async_trait;
use tracing::{debug, info};

use super::types::{Order, OrderId, OrderStatus};
use crate::connection::ConnectionConfig;
use crate::error::{Error, Result};

/// Orders requested per page
pub const PAGE_SIZE: u32 = 100;

/// Pages fetched before giving up on a store that never returns a short page
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Single-request operations against the store's order endpoint.
#[async_trait]
pub trait OrderApi: Send + Sync {
  /// Fetch one page of orders (1-based)
  async fn fetch_page(&self, cfg: &ConnectionConfig, page: u32, per_page: u32)
    -> Result<Vec<Order>>;

  /// Replace an order's status, returning the order as the store now has it
  async fn put_status(
    &self,
    cfg: &ConnectionConfig,
    order_id: OrderId,
    status: OrderStatus,
  ) -> Result<Order>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  pub per_page: u32,
  pub max_pages: u32,
}

impl Default for Pagination {
  fn default() -> Self {
    Self {
      per_page: PAGE_SIZE,
      max_pages: DEFAULT_MAX_PAGES,
    }
  }
}

/// Fail before touching the network when the credential cannot authenticate
fn ensure_credentials(cfg: &ConnectionConfig) -> Result<()> {
  if cfg.url.trim().is_empty() {
    return Err(Error::Config("Store URL is missing.".to_string()));
  }
  if cfg.token.trim().is_empty() {
    return Err(Error::Config("Connection token is missing.".to_string()));
  }
  Ok(())
}

/// Fetch every order the store has.
///
/// Pages are requested one at a time. The walk stops after an empty page or
/// a page shorter than `per_page`; running into `max_pages` is an error.
pub async fn fetch_all_orders<A>(
  api: &A,
  cfg: &ConnectionConfig,
  pagination: Pagination,
) -> Result<Vec<Order>>
where
  A: OrderApi + ?Sized,
{
  ensure_credentials(cfg)?;

  let per_page = pagination.per_page.max(1);
  let mut all_orders = Vec::new();
  let mut page = 1u32;

  loop {
    if page > pagination.max_pages {
      return Err(Error::remote(
        None,
        format!(
          "Store kept returning full pages after {} pages; stopping",
          pagination.max_pages
        ),
      ));
    }

    let orders = api.fetch_page(cfg, page, per_page).await?;
    let count = orders.len();
    debug!(page, count, "fetched order page");

    all_orders.extend(orders);

    if count < per_page as usize {
      break;
    }
    page += 1;
  }

  info!(pages = page, orders = all_orders.len(), "fetched all orders");
  Ok(all_orders)
}

/// Ask the store to set one order's status
pub async fn update_order_status<A>(
  api: &A,
  cfg: &ConnectionConfig,
  order_id: OrderId,
  status: OrderStatus,
) -> Result<Order>
where
  A: OrderApi + ?Sized,
{
  ensure_credentials(cfg)?;
  api.put_status(cfg, order_id, status).await
}

#[cfg(test)]
pub(crate) mod fake {
  //! Scripted in-memory store used by gateway, cache and dashboard tests.

  use super::*;
  use crate::woo::types::{Address, StatusValue};
  use std::collections::{HashMap, VecDeque};
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::{Arc, Mutex};
  use tokio::sync::Semaphore;

  pub fn order(id: OrderId, status: OrderStatus) -> Order {
    Order {
      id,
      number: format!("{}", 1000 + id),
      status: StatusValue::Known(status),
      date_created: "2024-01-01T00:00:00".to_string(),
      currency: "USD".to_string(),
      total: "10.00".to_string(),
      customer_note: String::new(),
      billing: Address {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        ..Default::default()
      },
      shipping: Address::default(),
      line_items: Vec::new(),
    }
  }

  #[derive(Default)]
  struct State {
    pages: VecDeque<Result<Vec<Order>>>,
    page_requests: Vec<u32>,
    put_requests: Vec<(OrderId, OrderStatus)>,
    put_failures: HashMap<OrderId, Error>,
  }

  /// Fake store. Clones share state.
  #[derive(Clone, Default)]
  pub struct FakeStore {
    state: Arc<Mutex<State>>,
    in_flight: Arc<Mutex<HashMap<OrderId, usize>>>,
    max_in_flight_per_order: Arc<AtomicUsize>,
    gate: Option<Arc<Semaphore>>,
  }

  impl FakeStore {
    pub fn new() -> Self {
      Self::default()
    }

    /// Serve pages of the given sizes, in order
    pub fn with_page_sizes(sizes: &[usize]) -> Self {
      let store = Self::new();
      let mut next_id = 1;
      for &size in sizes {
        let page = (0..size)
          .map(|i| order(next_id + i as OrderId, OrderStatus::Processing))
          .collect();
        next_id += size as OrderId;
        store.push_page(Ok(page));
      }
      store
    }

    /// Hold every `put_status` until a permit is released on the returned gate
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
      let gate = Arc::new(Semaphore::new(0));
      self.gate = Some(gate.clone());
      (self, gate)
    }

    pub fn push_page(&self, page: Result<Vec<Order>>) {
      self.state.lock().unwrap().pages.push_back(page);
    }

    pub fn fail_put(&self, order_id: OrderId, err: Error) {
      self.state.lock().unwrap().put_failures.insert(order_id, err);
    }

    pub fn page_requests(&self) -> Vec<u32> {
      self.state.lock().unwrap().page_requests.clone()
    }

    pub fn put_requests(&self) -> Vec<(OrderId, OrderStatus)> {
      self.state.lock().unwrap().put_requests.clone()
    }

    pub fn max_in_flight_per_order(&self) -> usize {
      self.max_in_flight_per_order.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl OrderApi for FakeStore {
    async fn fetch_page(
      &self,
      _cfg: &ConnectionConfig,
      page: u32,
      _per_page: u32,
    ) -> Result<Vec<Order>> {
      let mut state = self.state.lock().unwrap();
      state.page_requests.push(page);
      state.pages.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn put_status(
      &self,
      _cfg: &ConnectionConfig,
      order_id: OrderId,
      status: OrderStatus,
    ) -> Result<Order> {
      {
        let mut in_flight = self.in_flight.lock().unwrap();
        let count = in_flight.entry(order_id).or_insert(0);
        *count += 1;
        self
          .max_in_flight_per_order
          .fetch_max(*count, Ordering::SeqCst);
      }
      self.state.lock().unwrap().put_requests.push((order_id, status));

      if let Some(gate) = &self.gate {
        gate.acquire().await.unwrap().forget();
      }

      if let Some(count) = self.in_flight.lock().unwrap().get_mut(&order_id) {
        *count -= 1;
      }

      if let Some(err) = self.state.lock().unwrap().put_failures.get(&order_id) {
        return Err(err.clone());
      }

      // The store normalizes the order on write; mimic that with a new note.
      let mut updated = order(order_id, status);
      updated.customer_note = "updated by store".to_string();
      Ok(updated)
    }
  }
}
