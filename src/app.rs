use crate::config::Config;
use crate::connection::{ConnectionConfig, ConnectionStore};
use crate::dashboard::{Dashboard, StoreEvent};
use crate::event::{Event, EventHandler};
use crate::storage::SqliteStorage;
use crate::ui;
use crate::ui::components::{
  CommandEvent, CommandInput, ConnectEvent, ConnectForm, KeyResult, SearchEvent, SearchInput,
  StatusPicker, StatusPickerEvent,
};
use crate::woo::client::StoreClient;
use crate::woo::types::OrderId;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub type StoreDashboard = Dashboard<StoreClient, SqliteStorage>;

/// Screens on the navigation stack; the order list is always at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Orders,
  Detail(OrderId),
}

/// Main application state
pub struct App {
  config: Config,
  dashboard: StoreDashboard,
  store_rx: mpsc::UnboundedReceiver<StoreEvent>,

  screens: Vec<Screen>,
  list_state: ListState,

  search: SearchInput,
  command: CommandInput,
  status_picker: StatusPicker,
  connect_form: ConnectForm,

  tick: usize,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let client = StoreClient::new(config.request_timeout())?;
    let store = ConnectionStore::new(SqliteStorage::open()?);
    let (tx, store_rx) = mpsc::unbounded_channel();
    let dashboard =
      Dashboard::new(client, store, config.pagination(), tx).with_sort(config.default_sort);

    Ok(Self {
      config,
      dashboard,
      store_rx,
      screens: vec![Screen::Orders],
      list_state: ListState::default(),
      search: SearchInput::new(),
      command: CommandInput::new(),
      status_picker: StatusPicker::new(),
      connect_form: ConnectForm::new(),
      tick: 0,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
  ) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    self.dashboard.start();
    if !self.dashboard.is_connected() {
      self.connect_form.show(None);
    }

    while !self.should_quit {
      self.clamp_selection();
      terminal.draw(|frame| ui::draw(frame, self))?;

      tokio::select! {
        event = events.next() => match event {
          Some(Event::Key(key)) => self.handle_key(key),
          Some(Event::Tick) => self.tick = self.tick.wrapping_add(1),
          Some(Event::Resize) => {}
          None => break,
        },
        Some(event) = self.store_rx.recv() => self.dashboard.handle_event(event),
      }
    }

    info!("exiting");
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // Overlays first, the topmost owns the key
    match self.connect_form.handle_key(key) {
      KeyResult::Event(ConnectEvent::Submitted(cfg)) => return self.submit_connection(cfg),
      KeyResult::NotHandled => {}
      _ => return,
    }

    match self.status_picker.handle_key(key) {
      KeyResult::Event(StatusPickerEvent::Selected { order_id, status }) => {
        // Rejections already land in the banner
        let _ = self.dashboard.change_order_status(order_id, status);
        return;
      }
      KeyResult::NotHandled => {}
      _ => return,
    }

    match self.command.handle_key(key) {
      KeyResult::Event(CommandEvent::Submitted(cmd)) => return self.execute_command(&cmd),
      KeyResult::NotHandled => {}
      _ => return,
    }

    if self.screen() == Screen::Orders {
      match self.search.handle_key(key) {
        KeyResult::Event(SearchEvent::Changed(query)) => {
          self.dashboard.set_search(query);
          self.list_state.select(Some(0));
          return;
        }
        KeyResult::NotHandled => {}
        _ => return,
      }
    }

    self.handle_normal_key(key);
  }

  fn handle_normal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => {
        if self.screens.len() > 1 {
          self.screens.pop();
        } else {
          self.should_quit = true;
        }
      }
      KeyCode::Esc => {
        if self.screens.len() > 1 {
          self.screens.pop();
        }
      }

      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => {
        if self.screen() == Screen::Orders {
          if let Some(id) = self.selected_order_id() {
            self.screens.push(Screen::Detail(id));
          }
        }
      }

      KeyCode::Char('s') => self.open_status_picker(),
      KeyCode::Char('f') => {
        let next = self.dashboard.filters().status.next();
        self.dashboard.set_status_filter(next);
        self.list_state.select(Some(0));
      }
      KeyCode::Char('o') => {
        let sort = self.dashboard.filters().sort.toggle();
        self.dashboard.set_sort(sort);
      }
      KeyCode::Char('r') => {
        self.dashboard.refresh();
      }
      KeyCode::Char('c') => self.connect_form.show(self.dashboard.connection()),
      KeyCode::Char('x') => self.dashboard.dismiss_error(),

      _ => {}
    }
  }

  fn execute_command(&mut self, cmd: &str) {
    match cmd {
      "orders" => self.screens.truncate(1),
      "refresh" => {
        self.dashboard.refresh();
      }
      "connect" => self.connect_form.show(self.dashboard.connection()),
      "disconnect" => match self.dashboard.disconnect() {
        Ok(()) => {
          self.screens.truncate(1);
          self.list_state.select(None);
          self.connect_form.show(None);
        }
        Err(e) => self.dashboard.surface(e.to_string()),
      },
      "quit" => self.should_quit = true,
      "" => {}
      other => self.dashboard.surface(format!("Unknown command: {}", other)),
    }
  }

  fn submit_connection(&mut self, cfg: ConnectionConfig) {
    match self.dashboard.connect(cfg) {
      Ok(()) => {
        self.connect_form.hide();
        self.screens.truncate(1);
        self.list_state.select(Some(0));
      }
      Err(e) => self.connect_form.set_error(e.to_string()),
    }
  }

  fn open_status_picker(&mut self) {
    let Some(id) = self.selected_order_id() else {
      return;
    };
    // One change per order at a time
    if self.dashboard.is_updating(id) {
      return;
    }
    if let Some(order) = self.dashboard.order(id) {
      self
        .status_picker
        .show(id, &order.number, order.status.known());
    }
  }

  fn move_selection(&mut self, delta: i32) {
    if self.screen() != Screen::Orders {
      return;
    }
    let len = self.dashboard.visible_orders().len();
    if len == 0 {
      return;
    }
    let current = self.list_state.selected().unwrap_or(0);
    let next = (current as i32 + delta).rem_euclid(len as i32) as usize;
    self.list_state.select(Some(next));
  }

  /// Keep the list selection inside the current projection
  fn clamp_selection(&mut self) {
    let len = self.dashboard.visible_orders().len();
    match (len, self.list_state.selected()) {
      (0, _) => self.list_state.select(None),
      (_, None) => self.list_state.select(Some(0)),
      (len, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
      _ => {}
    }
  }

  fn selected_order_id(&self) -> Option<OrderId> {
    match self.screen() {
      Screen::Detail(id) => Some(id),
      Screen::Orders => {
        let index = self.list_state.selected()?;
        self.dashboard.visible_orders().get(index).map(|o| o.id)
      }
    }
  }

  // Accessors for UI rendering

  pub fn screen(&self) -> Screen {
    self.screens.last().copied().unwrap_or(Screen::Orders)
  }

  pub fn dashboard(&self) -> &StoreDashboard {
    &self.dashboard
  }

  /// Dashboard and list selection, borrowed together for rendering
  pub fn list_parts(&mut self) -> (&StoreDashboard, &mut ListState) {
    (&self.dashboard, &mut self.list_state)
  }

  pub fn title(&self) -> &str {
    self.config.title.as_deref().unwrap_or("ordash")
  }

  pub fn spinner(&self) -> &'static str {
    SPINNER[self.tick % SPINNER.len()]
  }

  pub fn search(&self) -> &SearchInput {
    &self.search
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn status_picker(&self) -> &StatusPicker {
    &self.status_picker
  }

  pub fn connect_form(&self) -> &ConnectForm {
    &self.connect_form
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .screens
      .iter()
      .map(|screen| match screen {
        Screen::Orders => "Orders".to_string(),
        Screen::Detail(id) => match self.dashboard.order(*id) {
          Some(order) => format!("#{}", order.number),
          None => format!("#{}", id),
        },
      })
      .collect()
  }

  pub fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
    if !self.dashboard.is_connected() {
      return vec![("c", "connect"), (":", "command"), ("q", "quit")];
    }
    let mut hints = match self.screen() {
      Screen::Orders => vec![
        ("enter", "details"),
        ("s", "status"),
        ("f", "filter"),
        ("o", "sort"),
        ("/", "search"),
        ("r", "refresh"),
      ],
      Screen::Detail(_) => vec![("s", "status"), ("r", "refresh"), ("q", "back")],
    };
    if self.dashboard.error().is_some() {
      hints.push(("x", "dismiss"));
    }
    hints
  }
}
