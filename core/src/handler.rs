//! The handler contract shared by every widget.

use crate::events::{EventArgs, EventId, EventTable};
use crate::widget::WidgetId;
use core::any::Any;
use core::fmt;
use std::rc::Weak;

/// A backend implementation of one widget.
///
/// Each widget type declares its own handler trait extending this one (e.g. a button handler with
/// `text`/`set_text`), and each backend implements that trait for its native control. Handlers
/// are used through shared references and keep their state with interior mutability, the same
/// way a native control is a handle that can be touched from within its own callbacks.
pub trait WidgetHandler: Any {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// For downcasting to the concrete handler.
    fn as_any(&self) -> &dyn Any;

    /// Wires up a native event.
    ///
    /// Called at most once per widget and event, when the event gets its first subscriber. The
    /// handler should keep the callback and raise the event through it whenever the native
    /// control fires.
    fn attach_event(&self, event: EventId, callback: &Callback) -> EventAttach {
        let _ = (event, callback);
        EventAttach::Unsupported
    }

    /// Releases native resources. Called once, when the owning widget is disposed.
    fn dispose(&self) {}
}

/// Result of [`WidgetHandler::attach_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAttach {
    /// The native event is wired up.
    Attached,
    /// Intentionally nothing to do: a parent or container raises this event for the widget.
    Delegated,
    /// The handler does not implement this event.
    Unsupported,
}

/// Lets a handler raise events on the widget that owns it.
///
/// Holds only a weak reference, so a handler keeping its callback does not keep the widget's
/// subscribers alive.
#[derive(Clone)]
pub struct Callback {
    widget: WidgetId,
    events: Weak<EventTable>,
}

impl Callback {
    pub(crate) fn new(widget: WidgetId, events: Weak<EventTable>) -> Callback {
        Callback { widget, events }
    }

    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Raises an event on the owning widget.
    ///
    /// Returns false if the widget is gone.
    pub fn raise(&self, event: EventId, args: &EventArgs) -> bool {
        match self.events.upgrade() {
            Some(events) => {
                events.raise(event, args);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Callback")
            .field("widget", &self.widget)
            .field("alive", &(self.events.strong_count() > 0))
            .finish()
    }
}
