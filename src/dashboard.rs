//! The dashboard core the presentation layer talks to.
//!
//! All state lives on the caller's task. Network work is spawned and reports
//! back as [`StoreEvent`]s on the channel given to [`Dashboard::new`]; the
//! owner feeds them to [`Dashboard::handle_event`] from its event loop.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::connection::{ConnectionConfig, ConnectionStore};
use crate::error::{Error, Result};
use crate::orders::{
  visible_orders, OrderCache, OrderFilters, SortOrder, StatusChange, StatusFilter, StatusTicket,
};
use crate::storage::KeyValueStorage;
use crate::woo::gateway::{fetch_all_orders, update_order_status, OrderApi, Pagination};
use crate::woo::types::{Order, OrderId, OrderStatus};

const FETCH_FALLBACK_MESSAGE: &str =
  "An error occurred while fetching orders. Check your connection details.";

/// Completion of spawned network work
#[derive(Debug)]
pub enum StoreEvent {
  OrdersLoaded {
    generation: u64,
    result: Result<Vec<Order>>,
  },
  StatusUpdated {
    generation: u64,
    ticket: StatusTicket,
    result: Result<Order>,
  },
}

pub struct Dashboard<A, S>
where
  A: OrderApi + 'static,
  S: KeyValueStorage,
{
  api: Arc<A>,
  store: ConnectionStore<S>,
  connection: Option<ConnectionConfig>,
  cache: OrderCache,
  filters: OrderFilters,
  pagination: Pagination,
  loading: bool,
  /// Bumped on connect/disconnect so results of older sessions are dropped
  generation: u64,
  error: Option<String>,
  errors_surfaced: usize,
  tx: mpsc::UnboundedSender<StoreEvent>,
}

impl<A, S> Dashboard<A, S>
where
  A: OrderApi + 'static,
  S: KeyValueStorage,
{
  pub fn new(
    api: A,
    store: ConnectionStore<S>,
    pagination: Pagination,
    tx: mpsc::UnboundedSender<StoreEvent>,
  ) -> Self {
    Self {
      api: Arc::new(api),
      store,
      connection: None,
      cache: OrderCache::new(),
      filters: OrderFilters::default(),
      pagination,
      loading: false,
      generation: 0,
      error: None,
      errors_surfaced: 0,
      tx,
    }
  }

  pub fn with_sort(mut self, sort: SortOrder) -> Self {
    self.filters.sort = sort;
    self
  }

  /// Pick up the saved connection, if any, and start loading orders
  pub fn start(&mut self) {
    match self.store.load() {
      Ok(Some(config)) => {
        info!(store = %config.domain(), "using saved connection");
        self.connection = Some(config);
        self.refresh();
      }
      Ok(None) => debug!("no saved connection"),
      Err(e) => self.surface(e.to_string()),
    }
  }

  /// Validate, persist and switch to a new connection, then load its orders.
  ///
  /// On error nothing changes and the error is returned to the caller.
  pub fn connect(&mut self, config: ConnectionConfig) -> Result<()> {
    let saved = self.store.save(&config)?;

    self.generation += 1;
    self.cache.clear();
    self.loading = false;
    self.error = None;
    self.connection = Some(saved);
    self.refresh();
    Ok(())
  }

  pub fn disconnect(&mut self) -> Result<()> {
    self.store.clear()?;

    self.generation += 1;
    self.connection = None;
    self.cache.clear();
    self.loading = false;
    self.error = None;
    Ok(())
  }

  /// Start a full fetch. Returns false when not connected or already fetching.
  pub fn refresh(&mut self) -> bool {
    let Some(config) = self.connection.clone() else {
      return false;
    };
    if self.loading {
      debug!("refresh ignored, fetch already running");
      return false;
    }

    self.loading = true;
    self.error = None;

    let api = self.api.clone();
    let pagination = self.pagination;
    let generation = self.generation;
    let tx = self.tx.clone();

    tokio::spawn(async move {
      let result = fetch_all_orders(api.as_ref(), &config, pagination).await;
      let _ = tx.send(StoreEvent::OrdersLoaded { generation, result });
    });
    true
  }

  /// Optimistically set an order's status and persist it in the background.
  ///
  /// Returns `Ok(false)` when the order already has that status. A rejected
  /// request (not connected, unknown order, update already running) is both
  /// returned and shown in the banner.
  pub fn change_order_status(&mut self, order_id: OrderId, status: OrderStatus) -> Result<bool> {
    let Some(config) = self.connection.clone() else {
      return Err(self.reject(Error::Config("Not connected to a store.".to_string())));
    };

    let ticket = match self.cache.begin_status_change(order_id, status) {
      Ok(StatusChange::Unchanged) => return Ok(false),
      Ok(StatusChange::Started(ticket)) => ticket,
      Err(e) => return Err(self.reject(e)),
    };

    let api = self.api.clone();
    let generation = self.generation;
    let tx = self.tx.clone();

    tokio::spawn(async move {
      let result = update_order_status(api.as_ref(), &config, ticket.order_id, ticket.status).await;
      let _ = tx.send(StoreEvent::StatusUpdated {
        generation,
        ticket,
        result,
      });
    });
    Ok(true)
  }

  pub fn handle_event(&mut self, event: StoreEvent) {
    match event {
      StoreEvent::OrdersLoaded { generation, .. } if generation != self.generation => {
        debug!(generation, "dropping orders from a previous connection");
      }
      StoreEvent::StatusUpdated { generation, ticket, .. } if generation != self.generation => {
        debug!(
          generation,
          order = %ticket.number,
          "dropping status result from a previous connection"
        );
        self.cache.release(ticket.order_id);
      }
      StoreEvent::OrdersLoaded { result, .. } => {
        self.loading = false;
        match result {
          Ok(orders) => self.cache.replace_all(orders),
          Err(e) => {
            // Never show stale orders after a failed fetch. Open changes
            // still wait for their own result.
            self.cache.clear_orders();
            let message = e.to_string();
            if message.trim().is_empty() {
              self.surface(FETCH_FALLBACK_MESSAGE.to_string());
            } else {
              self.surface(message);
            }
          }
        }
      }
      StoreEvent::StatusUpdated { ticket, result, .. } => {
        if let Err(e) = self.cache.resolve(&ticket, result) {
          self.surface(e.to_string());
        }
      }
    }
  }

  fn reject(&mut self, e: Error) -> Error {
    self.surface(e.to_string());
    e
  }

  /// Show a message in the error banner
  pub fn surface(&mut self, message: impl Into<String>) {
    let message = message.into();
    error!("{}", message);
    self.errors_surfaced += 1;
    self.error = Some(message);
  }

  /// Rows to render under the current filters
  pub fn visible_orders(&self) -> Vec<&Order> {
    visible_orders(self.cache.orders(), &self.filters)
  }

  pub fn order(&self, order_id: OrderId) -> Option<&Order> {
    self.cache.get(order_id)
  }

  pub fn order_count(&self) -> usize {
    self.cache.len()
  }

  pub fn is_updating(&self, order_id: OrderId) -> bool {
    self.cache.is_updating(order_id)
  }

  pub fn filters(&self) -> &OrderFilters {
    &self.filters
  }

  pub fn set_status_filter(&mut self, status: StatusFilter) {
    self.filters.status = status;
  }

  pub fn set_search(&mut self, query: impl Into<String>) {
    self.filters.search = query.into();
  }

  pub fn set_sort(&mut self, sort: SortOrder) {
    self.filters.sort = sort;
  }

  pub fn connection(&self) -> Option<&ConnectionConfig> {
    self.connection.as_ref()
  }

  pub fn is_connected(&self) -> bool {
    self.connection.is_some()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Current banner message
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn dismiss_error(&mut self) {
    self.error = None;
  }

  /// Number of errors shown in the banner since start
  pub fn errors_surfaced(&self) -> usize {
    self.errors_surfaced
  }
}
