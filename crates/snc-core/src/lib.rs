pub mod bot_api;
pub mod controls;

pub use bot_api::{BotStatus, Network, TokenSummary, TradeRecord, UnknownNetwork};
pub use controls::{control_availability, ControlAction, ControlAvailability};
