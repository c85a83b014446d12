use super::adapters::DowncastBinding;
use super::indirect::IndirectBinding;
use super::{Binding, BindingUpdateMode, DirectBinding, DualBinding, DualBindingMode, ObjectBinding};
use crate::data_context::DataContextNode;
use crate::events::HandlerToken;
use core::any::Any;
use core::fmt;
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Binds a value of a widget's data context to a destination.
///
/// The source follows the widget's effective data context: when it changes (directly or by
/// inheritance) the binding is moved to the new context object and the destination refreshed.
pub struct DataContextBinding<T: Clone + 'static> {
    node: Weak<DataContextNode>,
    source: Rc<ObjectBinding<dyn Any, T>>,
    dual: Rc<DualBinding<T>>,
    token: Cell<Option<HandlerToken>>,
}

impl<T: Clone + 'static> DataContextBinding<T> {
    pub fn new<M, B>(
        node: &Rc<DataContextNode>,
        binding: B,
        destination: Rc<dyn DirectBinding<T>>,
        mode: DualBindingMode,
    ) -> Rc<Self>
    where
        M: Any,
        B: IndirectBinding<M, T> + 'static,
    {
        let source = ObjectBinding::<dyn Any, T>::with_shared(
            node.get().as_ref(),
            Rc::new(DowncastBinding::new(binding)),
        );
        let dual = DualBinding::<T>::new(source.clone(), destination, mode);

        let token = {
            let weak_node = Rc::downgrade(node);
            let source = Rc::downgrade(&source);
            let dual = Rc::downgrade(&dual);
            node.changed().subscribe(move |_| {
                let (Some(node), Some(source), Some(dual)) =
                    (weak_node.upgrade(), source.upgrade(), dual.upgrade())
                else {
                    return;
                };
                trace!("data context changed, retargeting binding");
                source.set_data_item(node.get().as_ref());
                if !dual.mode().updates_destination() {
                    dual.set_destination();
                }
            })
        };

        Rc::new(DataContextBinding {
            node: Rc::downgrade(node),
            source,
            dual,
            token: Cell::new(Some(token)),
        })
    }

    pub fn source(&self) -> &Rc<ObjectBinding<dyn Any, T>> {
        &self.source
    }

    pub fn dual(&self) -> &Rc<DualBinding<T>> {
        &self.dual
    }
}

impl<T: Clone + 'static> Binding for DataContextBinding<T> {
    fn unbind(&self) {
        if let (Some(node), Some(token)) = (self.node.upgrade(), self.token.take()) {
            node.changed().unsubscribe(token);
        }
        self.dual.unbind();
    }

    fn update(&self, mode: BindingUpdateMode) {
        self.dual.update(mode);
    }
}

impl<T: Clone + 'static> fmt::Debug for DataContextBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DataContextBinding")
            .field("dual", &self.dual)
            .field("subscribed", &self.token.get().is_some())
            .finish()
    }
}
