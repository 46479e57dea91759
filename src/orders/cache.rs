//! In-memory order cache with optimistic status changes.
//!
//! A status change is a small transaction keyed by order id:
//! [`OrderCache::begin_status_change`] snapshots the order and writes the
//! requested status, then exactly one of [`OrderCache::confirm`] (server copy
//! wins) or [`OrderCache::rollback`] (snapshot restored) ends it. While the
//! transaction is open the id is in-flight and further changes to it are
//! rejected. Changes to different ids never block each other.
//!
//! Only the store's answer ends a change. Clearing the cache for a new
//! connection detaches open changes instead of forgetting them: the id stays
//! blocked until the late answer arrives, and that answer is then discarded.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::woo::types::{Order, OrderId, OrderStatus, StatusValue};

/// An open status change
#[derive(Debug, Clone)]
struct PendingChange {
  /// Full order as it was before the optimistic write
  snapshot: Order,
  requested: OrderStatus,
}

/// What the caller has to do after [`OrderCache::begin_status_change`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
  /// Requested status equals the cached one; nothing to send
  Unchanged,
  /// Cache updated optimistically; send this to the store
  Started(StatusTicket),
}

/// Everything the gateway call needs, detached from the cache borrow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTicket {
  pub order_id: OrderId,
  pub number: String,
  pub status: OrderStatus,
}

#[derive(Debug, Default)]
pub struct OrderCache {
  /// Orders in the order the store returned them
  orders: Vec<Order>,
  /// Order id -> position in `orders`
  index: HashMap<OrderId, usize>,
  in_flight: HashMap<OrderId, PendingChange>,
  /// Ids whose request is still out but whose result will be dropped
  detached: HashSet<OrderId>,
}

impl OrderCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.orders.len()
  }

  pub fn is_empty(&self) -> bool {
    self.orders.is_empty()
  }

  pub fn get(&self, id: OrderId) -> Option<&Order> {
    self.index.get(&id).map(|&i| &self.orders[i])
  }

  pub fn orders(&self) -> &[Order] {
    &self.orders
  }

  pub fn is_updating(&self, id: OrderId) -> bool {
    self.in_flight.contains_key(&id) || self.detached.contains(&id)
  }

  /// Requests still out, detached ones included
  pub fn in_flight_count(&self) -> usize {
    self.in_flight.len() + self.detached.len()
  }

  /// Swap in a freshly fetched order set.
  ///
  /// Duplicate ids keep the last copy at the first copy's position. Orders
  /// with an open status change get the fresh copy as their new snapshot and
  /// keep showing the requested status.
  pub fn replace_all(&mut self, fetched: Vec<Order>) {
    let mut orders: Vec<Order> = Vec::with_capacity(fetched.len());
    let mut index = HashMap::with_capacity(fetched.len());

    for order in fetched {
      match index.get(&order.id) {
        Some(&i) => orders[i] = order,
        None => {
          index.insert(order.id, orders.len());
          orders.push(order);
        }
      }
    }

    for (id, pending) in self.in_flight.iter_mut() {
      if let Some(&i) = index.get(id) {
        pending.snapshot = orders[i].clone();
        orders[i].status = StatusValue::Known(pending.requested);
      }
    }

    debug!(count = orders.len(), "replaced order cache");
    self.orders = orders;
    self.index = index;
  }

  /// Drop the loaded orders. Open changes stay open and resolve as usual.
  pub fn clear_orders(&mut self) {
    self.orders.clear();
    self.index.clear();
  }

  /// Drop every order and detach open changes from the cache.
  ///
  /// Their ids stay blocked until [`release`](Self::release) is called with
  /// the late result.
  pub fn clear(&mut self) {
    self.clear_orders();
    self.detached.extend(self.in_flight.drain().map(|(id, _)| id));
  }

  /// Unblock a detached id once its request has come back
  pub fn release(&mut self, id: OrderId) {
    if self.detached.remove(&id) {
      debug!(order_id = id, "detached status change came back");
    } else {
      warn!(order_id = id, "release for an order with no detached change");
    }
  }

  /// Start an optimistic status change.
  ///
  /// Check-and-mark happens in this one call, so a second change for the same
  /// id can never slip in before the first is marked in-flight.
  pub fn begin_status_change(&mut self, id: OrderId, status: OrderStatus) -> Result<StatusChange> {
    let i = *self.index.get(&id).ok_or(Error::UnknownOrder(id))?;
    let order = &mut self.orders[i];

    if self.in_flight.contains_key(&id) || self.detached.contains(&id) {
      return Err(Error::UpdateInProgress {
        number: order.number.clone(),
      });
    }

    if order.status.is(status) {
      return Ok(StatusChange::Unchanged);
    }

    self.in_flight.insert(
      id,
      PendingChange {
        snapshot: order.clone(),
        requested: status,
      },
    );
    order.status = StatusValue::Known(status);

    info!(order = %order.number, %status, "status change started");
    Ok(StatusChange::Started(StatusTicket {
      order_id: id,
      number: order.number.clone(),
      status,
    }))
  }

  /// Finish a change with the store's copy of the order
  pub fn confirm(&mut self, id: OrderId, confirmed: Order) {
    if self.in_flight.remove(&id).is_none() {
      warn!(order_id = id, "confirmation for an order with no open change");
    }

    match self.index.get(&id) {
      Some(&i) => {
        info!(order = %confirmed.number, status = %confirmed.status, "status change confirmed");
        self.orders[i] = confirmed;
      }
      None => debug!(order_id = id, "confirmed order is no longer loaded"),
    }
  }

  /// Undo a change and describe the failure in terms of the order number
  pub fn rollback(&mut self, id: OrderId, number: &str, cause: Error) -> Error {
    if let Some(pending) = self.in_flight.remove(&id) {
      if let Some(&i) = self.index.get(&id) {
        self.orders[i] = pending.snapshot;
      }
    }

    warn!(order = number, error = %cause, "status change rolled back");
    Error::StatusChangeFailed {
      number: number.to_string(),
      source: Box::new(cause),
    }
  }

  /// Route a gateway result to [`confirm`](Self::confirm) or [`rollback`](Self::rollback)
  pub fn resolve(&mut self, ticket: &StatusTicket, result: Result<Order>) -> Result<()> {
    match result {
      Ok(order) => {
        self.confirm(ticket.order_id, order);
        Ok(())
      }
      Err(e) => Err(self.rollback(ticket.order_id, &ticket.number, e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::woo::gateway::fake::order;

  fn cache_with(orders: Vec<Order>) -> OrderCache {
    let mut cache = OrderCache::new();
    cache.replace_all(orders);
    cache
  }

  fn ticket(change: StatusChange) -> StatusTicket {
    match change {
      StatusChange::Started(ticket) => ticket,
      StatusChange::Unchanged => panic!("expected a started change"),
    }
  }

  #[test]
  fn test_same_status_is_noop() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);
    let before = cache.orders().to_vec();

    let change = cache
      .begin_status_change(1, OrderStatus::Processing)
      .unwrap();

    assert_eq!(change, StatusChange::Unchanged);
    assert_eq!(cache.orders(), before.as_slice());
    assert!(!cache.is_updating(1));
  }

  #[test]
  fn test_begin_applies_optimistically() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);

    let t = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    assert_eq!(t.order_id, 1);
    assert_eq!(t.number, "1001");
    assert!(cache.get(1).unwrap().status.is(OrderStatus::Completed));
    assert!(cache.is_updating(1));
  }

  #[test]
  fn test_confirm_takes_server_copy() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);
    let t = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    let mut server = order(1, OrderStatus::Completed);
    server.total = "12.00".to_string();
    cache.resolve(&t, Ok(server.clone())).unwrap();

    assert_eq!(cache.get(1), Some(&server));
    assert!(!cache.is_updating(1));
  }

  #[test]
  fn test_rollback_restores_whole_order() {
    let original = order(1, OrderStatus::Processing);
    let mut cache = cache_with(vec![original.clone()]);
    let t = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    let err = cache
      .resolve(&t, Err(Error::remote(Some(500), "Server error")))
      .unwrap_err();

    assert_eq!(cache.get(1), Some(&original));
    assert!(!cache.is_updating(1));
    assert_eq!(
      err.to_string(),
      "Failed to update status for order #1001. Server error"
    );
  }

  #[test]
  fn test_second_change_while_pending_is_rejected() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);
    ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    let second = cache.begin_status_change(1, OrderStatus::Cancelled);

    assert_eq!(
      second,
      Err(Error::UpdateInProgress {
        number: "1001".to_string()
      })
    );
    assert!(cache.get(1).unwrap().status.is(OrderStatus::Completed));
    assert_eq!(cache.in_flight_count(), 1);
  }

  #[test]
  fn test_changes_on_different_orders_are_independent() {
    let mut cache = cache_with(vec![
      order(1, OrderStatus::Processing),
      order(2, OrderStatus::Processing),
    ]);

    let t1 = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());
    let t2 = ticket(cache.begin_status_change(2, OrderStatus::OnHold).unwrap());
    assert_eq!(cache.in_flight_count(), 2);

    cache
      .resolve(&t2, Err(Error::Transport("timeout".to_string())))
      .unwrap_err();
    cache
      .resolve(&t1, Ok(order(1, OrderStatus::Completed)))
      .unwrap();

    assert!(cache.get(1).unwrap().status.is(OrderStatus::Completed));
    assert!(cache.get(2).unwrap().status.is(OrderStatus::Processing));
    assert_eq!(cache.in_flight_count(), 0);
  }

  #[test]
  fn test_unknown_order() {
    let mut cache = OrderCache::new();
    assert_eq!(
      cache.begin_status_change(9, OrderStatus::Completed),
      Err(Error::UnknownOrder(9))
    );
  }

  #[test]
  fn test_unknown_status_can_be_changed() {
    let mut odd = order(1, OrderStatus::Processing);
    odd.status = StatusValue::Unknown("checkout-draft".to_string());
    let mut cache = cache_with(vec![odd]);

    let change = cache.begin_status_change(1, OrderStatus::Pending).unwrap();

    assert!(matches!(change, StatusChange::Started(_)));
  }

  #[test]
  fn test_replace_all_collapses_duplicates_in_place() {
    let mut newer = order(1, OrderStatus::Completed);
    newer.total = "99.00".to_string();

    let cache = cache_with(vec![
      order(1, OrderStatus::Processing),
      order(2, OrderStatus::Processing),
      newer.clone(),
    ]);

    let ids: Vec<OrderId> = cache.orders().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(cache.get(1), Some(&newer));
  }

  #[test]
  fn test_replace_all_keeps_pending_change() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);
    let t = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    let mut fresh = order(1, OrderStatus::Processing);
    fresh.customer_note = "left at door".to_string();
    cache.replace_all(vec![fresh.clone()]);

    assert!(cache.get(1).unwrap().status.is(OrderStatus::Completed));
    assert!(cache.is_updating(1));

    cache
      .resolve(&t, Err(Error::remote(Some(500), "nope")))
      .unwrap_err();
    assert_eq!(cache.get(1), Some(&fresh));
  }

  #[test]
  fn test_late_result_for_dropped_order_is_ignored() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);
    let t = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    cache.replace_all(vec![order(2, OrderStatus::Pending)]);
    cache.resolve(&t, Ok(order(1, OrderStatus::Completed))).unwrap();

    assert_eq!(cache.len(), 1);
    assert!(cache.get(1).is_none());
    assert!(!cache.is_updating(1));
  }

  #[test]
  fn test_clear_orders_keeps_open_change() {
    let original = order(1, OrderStatus::Processing);
    let mut cache = cache_with(vec![original.clone()]);
    let t = ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    cache.clear_orders();
    assert!(cache.is_empty());
    assert!(cache.is_updating(1));

    cache.replace_all(vec![original]);
    assert!(cache.get(1).unwrap().status.is(OrderStatus::Completed));
    assert!(matches!(
      cache.begin_status_change(1, OrderStatus::Cancelled),
      Err(Error::UpdateInProgress { .. })
    ));

    cache.resolve(&t, Ok(order(1, OrderStatus::Completed))).unwrap();
    assert!(!cache.is_updating(1));
  }

  #[test]
  fn test_clear_detaches_until_released() {
    let mut cache = cache_with(vec![order(1, OrderStatus::Processing)]);
    ticket(cache.begin_status_change(1, OrderStatus::Completed).unwrap());

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.in_flight_count(), 1);

    // Fresh copy is shown as the store has it, but stays blocked
    cache.replace_all(vec![order(1, OrderStatus::Processing)]);
    assert!(cache.get(1).unwrap().status.is(OrderStatus::Processing));
    assert!(cache.is_updating(1));
    assert!(matches!(
      cache.begin_status_change(1, OrderStatus::Cancelled),
      Err(Error::UpdateInProgress { .. })
    ));

    cache.release(1);
    assert_eq!(cache.in_flight_count(), 0);
    assert!(matches!(
      cache.begin_status_change(1, OrderStatus::Cancelled),
      Ok(StatusChange::Started(_))
    ));
  }
}
