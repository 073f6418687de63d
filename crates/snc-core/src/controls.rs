use crate::bot_api::{BotStatus, Network};

/// A mutating request the console can issue against the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    SwitchNetwork(Network),
}

impl ControlAction {
    pub fn success_message(self) -> String {
        match self {
            ControlAction::Start => "Bot Started Successfully".to_string(),
            ControlAction::Stop => "Bot Stopped Successfully".to_string(),
            ControlAction::SwitchNetwork(network) => {
                format!("Network Switched to {network}")
            }
        }
    }

    pub fn failure_message(self) -> String {
        match self {
            ControlAction::Start => "Error Starting Bot".to_string(),
            ControlAction::Stop => "Error Stopping Bot".to_string(),
            ControlAction::SwitchNetwork(_) => "Error Switching Network".to_string(),
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ControlAction::Start => "start",
            ControlAction::Stop => "stop",
            ControlAction::SwitchNetwork(_) => "switch_network",
        }
    }
}

/// Which controls the current snapshot permits. Before the first successful
/// status fetch everything is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlAvailability {
    pub start: bool,
    pub stop: bool,
    pub switch_network: bool,
}

impl ControlAvailability {
    pub fn permits(self, action: ControlAction) -> bool {
        match action {
            ControlAction::Start => self.start,
            ControlAction::Stop => self.stop,
            ControlAction::SwitchNetwork(_) => self.switch_network,
        }
    }
}

pub fn control_availability(status: Option<&BotStatus>) -> ControlAvailability {
    match status {
        Some(status) => ControlAvailability {
            start: !status.is_running,
            stop: status.is_running,
            switch_network: true,
        },
        None => ControlAvailability::default(),
    }
}
