use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Channel unavailable: {0}")]
    Unavailable(String),

    #[error("Send timed out after {0:?}")]
    Timeout(Duration),
}
