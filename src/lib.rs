//! Cross-platform widgets over pluggable native backends.
//!
//! This crate holds the widgets themselves; the platform registry, events and bindings live in
//! [`veneer_core`].
//!
//! ```ignore
//! let platform = Rc::new(Platform::detect(&[&HeadlessBackend], &Config::from_env()?)?);
//! let app = Application::new(&platform)?;
//!
//! let name = TextBox::new(&platform)?;
//! name.set_data_context(Rc::new(Person::default()));
//! name.text_binding().bind_data_context(
//!     binding::property("name", Person::name, Person::set_name),
//!     DualBindingMode::TwoWay,
//! )?;
//!
//! app.run()?;
//! ```

#[macro_use]
mod control;
#[macro_use]
pub mod bindable;

pub mod application;
mod button;
mod check_box;
pub mod color;
pub mod headless;
mod label;
pub mod logging;
mod menu;
mod panel;
mod rect;
mod text_box;

pub use application::{Application, ApplicationHandler, InvokeHandle, Lifecycle, UiSender};
pub use bindable::BindableBinding;
pub use button::{Button, ButtonHandler};
pub use check_box::{CheckBox, CheckBoxHandler};
pub use color::Color;
pub use control::{AnyControl, Bindable, Control, ControlHandler};
pub use label::{Label, LabelHandler};
pub use menu::{ButtonMenuItem, ButtonMenuItemHandler, ContextMenu, ContextMenuHandler};
pub use panel::{Panel, PanelHandler};
pub use rect::Rect;
pub use text_box::{TextBox, TextBoxHandler};
pub use veneer_core::binding;
pub use veneer_core::{Config, Error, EventArgs, EventId, Platform, Result};
