mod order_detail;
mod order_list;

pub use order_detail::draw_order_detail;
pub use order_list::{draw_not_connected, draw_order_list, OrderListProps};
