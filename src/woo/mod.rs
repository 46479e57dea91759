//! Client side of the WooCommerce order-dashboard connector.

pub mod api_types;
pub mod client;
pub mod gateway;
pub mod types;
