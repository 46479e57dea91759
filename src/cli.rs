//! One-shot subcommands that run the dashboard without the TUI.

use clap::Subcommand;
use color_eyre::eyre::{bail, eyre, Result};
use tokio::sync::mpsc;

use crate::app::StoreDashboard;
use crate::config::Config;
use crate::connection::{ConnectionConfig, ConnectionStore};
use crate::dashboard::{Dashboard, StoreEvent};
use crate::orders::{SortOrder, StatusFilter};
use crate::storage::SqliteStorage;
use crate::ui::renderfns::{format_date, format_money, truncate};
use crate::woo::client::StoreClient;
use crate::woo::types::{OrderId, OrderStatus};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Validate and store the store URL and connection token
  Connect {
    #[arg(long)]
    url: String,
    #[arg(long)]
    token: String,
  },
  /// Forget the stored connection
  Disconnect,
  /// Fetch all orders and print them as a table
  Orders {
    /// Status to show, or "all"
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    /// Match order number or customer name
    #[arg(long)]
    search: Option<String>,
    /// newest or oldest
    #[arg(long)]
    sort: Option<SortOrder>,
  },
  /// Change one order's status
  SetStatus { id: OrderId, status: OrderStatus },
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
  match command {
    Command::Connect { url, token } => {
      let store = ConnectionStore::new(SqliteStorage::open()?);
      let saved = store.save(&ConnectionConfig::new(url, token))?;
      println!("Saved connection to {}", saved.domain());
    }
    Command::Disconnect => {
      ConnectionStore::new(SqliteStorage::open()?).clear()?;
      println!("Connection removed");
    }
    Command::Orders {
      status,
      search,
      sort,
    } => {
      let (mut dashboard, _rx) = load(config).await?;
      dashboard.set_status_filter(status);
      if let Some(search) = search {
        dashboard.set_search(search);
      }
      if let Some(sort) = sort {
        dashboard.set_sort(sort);
      }
      print_orders(&dashboard);
    }
    Command::SetStatus { id, status } => {
      let (mut dashboard, mut rx) = load(config).await?;
      if !dashboard.change_order_status(id, status)? {
        println!("Order {} is already {}", id, status.label());
        return Ok(());
      }
      while dashboard.is_updating(id) {
        pump(&mut dashboard, &mut rx).await?;
      }
      if let Some(message) = dashboard.error() {
        bail!("{}", message);
      }
      let order = dashboard
        .order(id)
        .ok_or_else(|| eyre!("Order {} disappeared", id))?;
      println!("Order #{} is now {}", order.number, order.status.label());
    }
  }
  Ok(())
}

/// Dashboard on the saved connection with all orders fetched
async fn load(config: &Config) -> Result<(StoreDashboard, mpsc::UnboundedReceiver<StoreEvent>)> {
  let client = StoreClient::new(config.request_timeout())?;
  let store = ConnectionStore::new(SqliteStorage::open()?);
  let (tx, mut rx) = mpsc::unbounded_channel();
  let mut dashboard =
    Dashboard::new(client, store, config.pagination(), tx).with_sort(config.default_sort);

  dashboard.start();
  if let Some(message) = dashboard.error() {
    bail!("{}", message);
  }
  if !dashboard.is_connected() {
    bail!("Not connected. Run `ordash connect --url <URL> --token <TOKEN>` first.");
  }

  while dashboard.is_loading() {
    pump(&mut dashboard, &mut rx).await?;
  }
  if let Some(message) = dashboard.error() {
    bail!("{}", message);
  }
  Ok((dashboard, rx))
}

async fn pump(
  dashboard: &mut StoreDashboard,
  rx: &mut mpsc::UnboundedReceiver<StoreEvent>,
) -> Result<()> {
  let event = rx
    .recv()
    .await
    .ok_or_else(|| eyre!("store task ended unexpectedly"))?;
  dashboard.handle_event(event);
  Ok(())
}

fn print_orders(dashboard: &StoreDashboard) {
  let orders = dashboard.visible_orders();
  if orders.is_empty() {
    println!("No orders found.");
    return;
  }

  println!(
    "{:<10} {:<20} {:<11} {:>16}  {}",
    "ORDER", "DATE", "STATUS", "TOTAL", "CUSTOMER"
  );
  for order in &orders {
    println!(
      "{:<10} {:<20} {:<11} {:>16}  {}",
      format!("#{}", order.number),
      format_date(order.created_at()),
      order.status.label(),
      format_money(&order.total, &order.currency),
      truncate(&order.customer_name(), 40),
    );
  }
  println!("\n{} of {} orders", orders.len(), dashboard.order_count());
}
