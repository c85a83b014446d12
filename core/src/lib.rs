//! Backend-independent core of the veneer UI library.
//!
//! # Conceptual overview
//! Veneer is a cross-platform widget layer: application code talks to abstract widgets, and every
//! widget forwards its work to a backend-specific handler.
//!
//! ## Handlers
//! Each widget type declares a handler contract: a trait extending [`WidgetHandler`] with the
//! property accessors and operations the widget needs. A backend implements the contract for its
//! native control. The widget never knows which concrete handler it talks to; it only holds a
//! `Box<dyn ButtonHandler>` (or whichever contract it declares).
//!
//! Handlers are used through shared references and keep their own state with interior
//! mutability. This mirrors native controls, which are handles that can be touched from inside
//! their own callbacks.
//!
//! ## Platforms and Backends
//! A [`Platform`] maps handler contracts to factories. Backends are platform-specific UI toolkits
//! like GTK or WPF; a [`Backend`] fills a platform with one factory per widget it implements.
//! Which backend to use is decided once at startup ([`Platform::detect`]) and the platform is
//! read-only afterwards. Asking for a contract nobody registered fails fast with
//! [`Error::HandlerNotFound`]; there is no fallback to a base contract.
//!
//! ## Events
//! Widget events are identified by [`EventId`]. Native events are expensive to wire up, so a
//! handler is only asked to [attach](WidgetHandler::attach_event) an event once the event gets its
//! first subscriber. The handler then raises the event through a [`Callback`]. Some events are
//! raised by a container instead of the widget's own handler (menu items are validated by their
//! menu), in which case the handler reports the event as delegated. Events a handler cannot
//! provide at all are treated according to the configured [`EventPolicy`].
//!
//! ## Bindings
//! The [`binding`] module connects widget properties to model objects without knowing the model
//! types. Bindings observe models through change events and always remove exactly the
//! subscriptions they added. A widget owns its bindings and unbinds them when disposed.
//!
//! ## Data contexts
//! Every widget has a data context: the model object its bindings resolve against. A widget
//! without its own data context inherits its container's, and bindings follow the effective
//! context as it changes.
//!
//! ## Threading
//! Everything here is bound to the UI thread and is deliberately `!Send`. Work from other
//! threads is marshalled through the application's invoke queue.

pub mod backend;
pub mod binding;
pub mod config;
mod data_context;
mod error;
pub mod events;
mod handler;
pub mod platform;
mod properties;
mod widget;

pub use backend::Backend;
pub use config::{Config, EventPolicy};
pub use data_context::DataContextNode;
pub use error::{Error, Result};
pub use events::{EventArgs, EventData, EventId, HandlerToken};
pub use handler::{Callback, EventAttach, WidgetHandler};
pub use platform::{Platform, Toolkit};
pub use properties::Properties;
pub use widget::{Widget, WidgetId};
