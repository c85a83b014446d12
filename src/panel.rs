//! Containers with a single child.

use crate::control::{AnyControl, Control, ControlHandler};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;
use veneer_core::{Platform, Result};

pub trait PanelHandler: ControlHandler {
    /// Replaces the native child. `None` removes it.
    fn set_content(&self, content: Option<&dyn ControlHandler>);

    /// Space between the panel's edges and its content, on every side.
    fn padding(&self) -> f64;
    fn set_padding(&self, padding: f64);
}

/// A control hosting one child control.
///
/// The child inherits the panel's data context unless it has its own.
pub struct Panel {
    control: Control<dyn PanelHandler>,
    content: RefCell<Option<Rc<dyn AnyControl>>>,
}

impl_control!(Panel, PanelHandler);

impl Panel {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<Panel>> {
        Ok(Rc::new(Panel {
            control: Control::new(platform)?,
            content: RefCell::new(None),
        }))
    }

    pub fn content(&self) -> Option<Rc<dyn AnyControl>> {
        self.content.borrow().clone()
    }

    pub fn set_content(&self, content: Option<Rc<dyn AnyControl>>) {
        let old = self.content.replace(content.clone());
        if let Some(old) = old {
            old.context_node().set_parent(None);
        }

        if let Some(content) = &content {
            trace!(panel = ?self.id(), content = ?content.widget_id(), "set panel content");
            content
                .context_node()
                .set_parent(Some(self.data_context_node()));
        }
        self.handler()
            .set_content(content.as_ref().map(|content| content.control_handler()));
    }

    pub fn padding(&self) -> f64 {
        self.handler().padding()
    }

    pub fn set_padding(&self, padding: f64) {
        self.handler().set_padding(padding);
    }
}
