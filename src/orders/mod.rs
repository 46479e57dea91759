//! Order cache, optimistic status changes and the view projection.

pub mod cache;
pub mod projection;

pub use cache::{OrderCache, StatusChange, StatusTicket};
pub use projection::{visible_orders, OrderFilters, SortOrder, StatusFilter};
