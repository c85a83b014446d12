//! Error types.

use crate::events::EventId;
use thiserror::Error;

/// Errors raised by the platform registry, widgets and applications.
#[derive(Debug, Error)]
pub enum Error {
    /// No factory is registered for the requested handler contract.
    ///
    /// This is a deployment error: the wrong backend was loaded, or the backend does not implement
    /// this widget.
    #[error("no handler registered for `{contract}` on platform `{platform}`")]
    HandlerNotFound {
        contract: &'static str,
        platform: String,
    },

    /// A widget event was subscribed to, but the handler does not implement it.
    #[error("event {event:?} is not supported by handler `{handler}`")]
    UnsupportedEvent {
        handler: &'static str,
        event: EventId,
    },

    /// The backend's native library could not be loaded.
    #[error("platform `{platform}` failed to load: {reason}")]
    PlatformLoad { platform: String, reason: String },

    /// None of the candidate backends could be loaded.
    #[error("no valid platform found (tried {tried:?})")]
    NoPlatform { tried: Vec<String> },

    /// A platform was requested by id but no backend has that id.
    #[error("unknown platform `{0}`")]
    UnknownPlatform(String),

    /// A configuration value could not be parsed.
    #[error("invalid value `{value}` for `{key}`")]
    InvalidConfig { key: &'static str, value: String },

    /// A binding was requested on a widget that no longer exists.
    #[error("widget has been disposed")]
    WidgetDisposed,

    /// The application has exited and no longer accepts invocations.
    #[error("application has exited")]
    ApplicationExited,

    /// A blocking invoke was issued from the UI thread, which would deadlock.
    #[error("blocking invoke called on the UI thread")]
    InvokeOnUiThread,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
