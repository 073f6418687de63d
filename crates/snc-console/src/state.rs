use crate::notice::{NoticeBoard, NoticeKind};
use chrono::{DateTime, Local};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::TableState;
use snc_client::{ApiCommand, ApiEvent};
use snc_core::{
    control_availability, BotStatus, ControlAction, ControlAvailability, Network, TokenSummary,
    TradeRecord,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Tokens,
    Trades,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Panel::Tokens => "Tokens",
            Panel::Trades => "Trades",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Panel::Tokens => Panel::Trades,
            Panel::Trades => Panel::Tokens,
        }
    }
}

/// Console-side state: the snapshot slots mirrored from the controller, the
/// notice board, and the control bookkeeping. Mutated only from the render
/// loop's task.
pub struct App {
    pub config: Config,
    command_tx: mpsc::Sender<ApiCommand>,
    pub status: Option<BotStatus>,
    pub tokens: Vec<TokenSummary>,
    pub trades: Vec<TradeRecord>,
    status_cycle: u64,
    tokens_cycle: u64,
    trades_cycle: u64,
    pub last_status_at: Option<DateTime<Local>>,
    pub notices: NoticeBoard,
    pending_control: Option<ControlAction>,
    pub panel: Panel,
    pub table_state: TableState,
    pub help_open: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, command_tx: mpsc::Sender<ApiCommand>) -> Self {
        Self {
            config,
            command_tx,
            status: None,
            tokens: Vec::new(),
            trades: Vec::new(),
            status_cycle: 0,
            tokens_cycle: 0,
            trades_cycle: 0,
            last_status_at: None,
            notices: NoticeBoard::default(),
            pending_control: None,
            panel: Panel::Tokens,
            table_state: TableState::default(),
            help_open: false,
            should_quit: false,
        }
    }

    pub fn controls(&self) -> ControlAvailability {
        control_availability(self.status.as_ref())
    }

    pub fn control_pending(&self) -> bool {
        self.pending_control.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn tick(&mut self, now: Instant) {
        self.notices.expire(now);
    }

    /// Applies one event from the sync loop. Each slot is replaced
    /// wholesale; a response tagged with an older cycle than the slot's
    /// last applied one is dropped so overlapping cycles resolve
    /// last-scheduled-wins.
    pub fn apply_api_event(&mut self, event: ApiEvent, now: Instant) {
        match event {
            ApiEvent::Status { cycle, status } => {
                if cycle < self.status_cycle {
                    debug!(event = "stale_status_dropped", cycle, applied = self.status_cycle);
                    return;
                }
                self.status_cycle = cycle;
                self.status = Some(status);
                self.last_status_at = Some(Local::now());
            }
            ApiEvent::Tokens { cycle, tokens } => {
                if cycle < self.tokens_cycle {
                    debug!(event = "stale_tokens_dropped", cycle, applied = self.tokens_cycle);
                    return;
                }
                self.tokens_cycle = cycle;
                self.tokens = tokens;
                self.clamp_selection();
            }
            ApiEvent::Trades { cycle, trades } => {
                if cycle < self.trades_cycle {
                    debug!(event = "stale_trades_dropped", cycle, applied = self.trades_cycle);
                    return;
                }
                self.trades_cycle = cycle;
                self.trades = trades;
                self.clamp_selection();
            }
            ApiEvent::ControlResult { action, ok } => {
                self.pending_control = None;
                if ok {
                    self.notices
                        .raise(action.success_message(), NoticeKind::Success, now);
                } else {
                    self.notices
                        .raise(action.failure_message(), NoticeKind::Error, now);
                }
            }
        }
    }

    pub fn handle_input(&mut self, event: Event, now: Instant) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key, now);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::F(1)) {
            self.help_open = !self.help_open;
            return;
        }
        if key.code == KeyCode::Esc && self.help_open {
            self.help_open = false;
            return;
        }
        if self.help_open {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => self.request_control(ControlAction::Start, now),
            KeyCode::Char('x') => self.request_control(ControlAction::Stop, now),
            KeyCode::Char('n') => self.request_network_toggle(now),
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Tab => self.switch_panel(self.panel.next()),
            KeyCode::Char('1') => self.switch_panel(Panel::Tokens),
            KeyCode::Char('2') => self.switch_panel(Panel::Trades),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            _ => {}
        }
    }

    /// Queues a control request. The snapshot-derived enablement and the
    /// in-flight guard both have to pass, so a start while running or a
    /// double press while a request is pending sends nothing.
    fn request_control(&mut self, action: ControlAction, now: Instant) {
        if self.pending_control.is_some() {
            return;
        }
        if !self.controls().permits(action) {
            return;
        }
        match self.command_tx.try_send(ApiCommand::Control(action)) {
            Ok(()) => self.pending_control = Some(action),
            Err(err) => {
                warn!(event = "control_queue_failed", action = action.verb(), error = %err);
                self.notices
                    .raise(action.failure_message(), NoticeKind::Error, now);
            }
        }
    }

    fn request_network_toggle(&mut self, now: Instant) {
        let Some(status) = &self.status else {
            return;
        };
        let Ok(current) = status.network.parse::<Network>() else {
            warn!(event = "unknown_network_value", value = %status.network);
            return;
        };
        self.request_control(ControlAction::SwitchNetwork(current.toggled()), now);
    }

    fn request_refresh(&mut self) {
        if let Err(err) = self.command_tx.try_send(ApiCommand::Refresh) {
            warn!(event = "refresh_queue_failed", error = %err);
        }
    }

    fn switch_panel(&mut self, panel: Panel) {
        self.panel = panel;
        self.table_state = TableState::default();
        self.clamp_selection();
    }

    fn panel_rows(&self) -> usize {
        match self.panel {
            Panel::Tokens => self.tokens.len(),
            Panel::Trades => self.trades.len(),
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let rows = self.panel_rows();
        if rows == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, rows as i64 - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        let rows = self.panel_rows();
        if rows == 0 {
            self.table_state.select(None);
        } else if self.table_state.selected().map_or(true, |index| index >= rows) {
            self.table_state.select(Some(0));
        }
    }
}
