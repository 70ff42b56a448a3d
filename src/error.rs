/// Failures surfaced by the control panel. All of them end at the view: they are
/// logged and rendered as text, never propagated further.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("invalid number of days: {0:?}")]
    InvalidDays(String),

    #[error("HTTP error! Status: {status}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Network(String),

    #[error("malformed statistics response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PanelError::Malformed(err.to_string())
        } else {
            PanelError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::Malformed(err.to_string())
    }
}
