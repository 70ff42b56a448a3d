pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod panel;
pub mod service;
pub mod stats;
pub mod ui;

pub use api::{ControlApi, HttpControlApi, RecordAction};
pub use config::PanelConfig;
pub use error::PanelError;
pub use panel::Panel;
