//! Sync layer: webhook payload assembly and fire-and-forget HTTP delivery.

pub mod payload;
pub use payload::{StampedPayload, WebhookPayload};

#[cfg(feature = "http")]
pub mod webhook;

#[cfg(feature = "http")]
pub use webhook::{DEFAULT_WEBHOOK_URL, WebhookClient, WebhookError};
