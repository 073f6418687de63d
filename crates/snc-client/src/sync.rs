use crate::client::BotApiClient;
use snc_core::{BotStatus, ControlAction, TokenSummary, TradeRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Outcome of one fetch or control request, delivered to the console.
///
/// Fetch events carry the cycle number they were scheduled under so the
/// receiver can discard responses that arrive after a later cycle has
/// already been applied. Failed fetches are logged here and produce no
/// event at all; failed controls always produce a result event.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    Status { cycle: u64, status: BotStatus },
    Tokens { cycle: u64, tokens: Vec<TokenSummary> },
    Trades { cycle: u64, trades: Vec<TradeRecord> },
    ControlResult { action: ControlAction, ok: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    Control(ControlAction),
    Refresh,
}

/// Drives the poll cadence and executes control requests until the command
/// channel closes or the event receiver goes away. The interval's first
/// tick fires immediately, so activation doubles as the initial fetch.
///
/// Aborting the task that runs this loop is the shutdown path: the interval
/// dies with it, and responses still in flight land in a closed channel.
pub async fn run_sync_loop(
    client: BotApiClient,
    interval: Duration,
    events: mpsc::Sender<ApiEvent>,
    mut commands: mpsc::Receiver<ApiCommand>,
) {
    let cycle_seq = Arc::new(AtomicU64::new(0));
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                spawn_poll_cycle(&client, &events, &cycle_seq);
            }
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    ApiCommand::Refresh => spawn_poll_cycle(&client, &events, &cycle_seq),
                    ApiCommand::Control(action) => {
                        spawn_control(&client, &events, &cycle_seq, action);
                    }
                }
            }
        }
        if events.is_closed() {
            break;
        }
    }
}

fn next_cycle(seq: &AtomicU64) -> u64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

/// One cycle: status, tokens, and trades fetched as independent tasks under
/// a shared cycle number. A failure in one resource never delays or cancels
/// the others; the next scheduled cycle is the only retry.
fn spawn_poll_cycle(
    client: &BotApiClient,
    events: &mpsc::Sender<ApiEvent>,
    cycle_seq: &Arc<AtomicU64>,
) {
    let cycle = next_cycle(cycle_seq);
    debug!(event = "poll_cycle_scheduled", cycle);

    {
        let client = client.clone();
        let events = events.clone();
        tokio::spawn(async move {
            match client.status().await {
                Ok(status) => {
                    let _ = events.send(ApiEvent::Status { cycle, status }).await;
                }
                Err(err) => warn!(event = "status_fetch_failed", cycle, error = %err),
            }
        });
    }
    {
        let client = client.clone();
        let events = events.clone();
        tokio::spawn(async move {
            match client.tokens().await {
                Ok(tokens) => {
                    let _ = events.send(ApiEvent::Tokens { cycle, tokens }).await;
                }
                Err(err) => warn!(event = "tokens_fetch_failed", cycle, error = %err),
            }
        });
    }
    {
        let client = client.clone();
        let events = events.clone();
        tokio::spawn(async move {
            match client.trades().await {
                Ok(trades) => {
                    let _ = events.send(ApiEvent::Trades { cycle, trades }).await;
                }
                Err(err) => warn!(event = "trades_fetch_failed", cycle, error = %err),
            }
        });
    }
}

fn spawn_control(
    client: &BotApiClient,
    events: &mpsc::Sender<ApiEvent>,
    cycle_seq: &Arc<AtomicU64>,
    action: ControlAction,
) {
    let client = client.clone();
    let events = events.clone();
    let cycle_seq = Arc::clone(cycle_seq);
    tokio::spawn(async move {
        let result = match action {
            ControlAction::Start => client.start().await,
            ControlAction::Stop => client.stop().await,
            ControlAction::SwitchNetwork(network) => client.set_network(network).await,
        };
        match result {
            Ok(()) => {
                info!(event = "control_applied", action = action.verb());
                let _ = events.send(ApiEvent::ControlResult { action, ok: true }).await;
                // Status catches up right away; tokens and trades wait for
                // the next scheduled cycle.
                let cycle = next_cycle(&cycle_seq);
                match client.status().await {
                    Ok(status) => {
                        let _ = events.send(ApiEvent::Status { cycle, status }).await;
                    }
                    Err(err) => warn!(event = "status_fetch_failed", cycle, error = %err),
                }
            }
            Err(err) => {
                warn!(event = "control_failed", action = action.verb(), error = %err);
                let _ = events.send(ApiEvent::ControlResult { action, ok: false }).await;
            }
        }
    });
}
