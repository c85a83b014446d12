use super::{Binding, BindingUpdateMode, DirectBinding, DualBindingMode};
use crate::events::HandlerToken;
use core::fmt;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Keeps two direct bindings in sync.
///
/// The destination always receives the source's value once, when the dual binding is created.
/// After that, changes propagate as the [mode](DualBindingMode) says. While a value is being
/// copied in either direction, change notifications caused by that copy are not propagated back.
pub struct DualBinding<T: Clone + 'static> {
    source: Rc<dyn DirectBinding<T>>,
    destination: Rc<dyn DirectBinding<T>>,
    mode: DualBindingMode,
    channeling: Cell<bool>,
    source_token: Cell<Option<HandlerToken>>,
    destination_token: Cell<Option<HandlerToken>>,
    unbound: Cell<bool>,
}

/// Marks a copy in progress for as long as it lives.
struct Channel<'a>(&'a Cell<bool>);

impl<'a> Channel<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Channel<'a>> {
        if flag.replace(true) {
            None
        } else {
            Some(Channel(flag))
        }
    }
}

impl Drop for Channel<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T: Clone + 'static> DualBinding<T> {
    pub fn new(
        source: Rc<dyn DirectBinding<T>>,
        destination: Rc<dyn DirectBinding<T>>,
        mode: DualBindingMode,
    ) -> Rc<Self> {
        let binding = Rc::new(DualBinding {
            source,
            destination,
            mode,
            channeling: Cell::new(false),
            source_token: Cell::new(None),
            destination_token: Cell::new(None),
            unbound: Cell::new(false),
        });

        if mode.updates_destination() {
            let me = Rc::downgrade(&binding);
            let token = binding
                .source
                .add_data_value_changed(Rc::new(move |_: &Option<T>| {
                    if let Some(me) = me.upgrade() {
                        me.set_destination();
                    }
                }));
            binding.source_token.set(Some(token));
        }
        if mode.updates_source() {
            let me = Rc::downgrade(&binding);
            let token = binding
                .destination
                .add_data_value_changed(Rc::new(move |_: &Option<T>| {
                    if let Some(me) = me.upgrade() {
                        me.set_source();
                    }
                }));
            binding.destination_token.set(Some(token));
        }

        binding.set_destination();
        binding
    }

    pub fn source(&self) -> &Rc<dyn DirectBinding<T>> {
        &self.source
    }

    pub fn destination(&self) -> &Rc<dyn DirectBinding<T>> {
        &self.destination
    }

    pub fn mode(&self) -> DualBindingMode {
        self.mode
    }

    /// Copies the source's value to the destination. Does nothing once unbound.
    pub fn set_destination(&self) {
        if self.unbound.get() {
            return;
        }
        if let Some(_channel) = Channel::enter(&self.channeling) {
            trace!("copying source value to destination");
            self.destination.set_data_value(self.source.data_value());
        }
    }

    /// Copies the destination's value to the source. Does nothing once unbound.
    pub fn set_source(&self) {
        if self.unbound.get() {
            return;
        }
        if let Some(_channel) = Channel::enter(&self.channeling) {
            trace!("copying destination value to source");
            self.source.set_data_value(self.destination.data_value());
        }
    }

    pub fn is_unbound(&self) -> bool {
        self.unbound.get()
    }
}

impl<T: Clone + 'static> Binding for DualBinding<T> {
    fn unbind(&self) {
        if let Some(token) = self.source_token.take() {
            self.source.remove_data_value_changed(token);
        }
        if let Some(token) = self.destination_token.take() {
            self.destination.remove_data_value_changed(token);
        }
        self.source.unbind();
        self.destination.unbind();
        self.unbound.set(true);
    }

    fn update(&self, mode: BindingUpdateMode) {
        match mode {
            BindingUpdateMode::Destination => self.set_destination(),
            BindingUpdateMode::Source => self.set_source(),
        }
    }
}

impl<T: Clone + 'static> fmt::Debug for DualBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DualBinding")
            .field("mode", &self.mode)
            .field("unbound", &self.unbound.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding;
    use crate::events::Event;
    use std::cell::RefCell;

    type Bound = (Rc<Cell<i32>>, Rc<Event<()>>, Rc<dyn DirectBinding<i32>>);

    /// A value with a change event, bound directly.
    fn cell(initial: i32) -> Bound {
        let value = Rc::new(Cell::new(initial));
        let changed = Rc::new(Event::new());
        let (get, set) = (Rc::clone(&value), Rc::clone(&value));
        let (add, remove, raise) = (Rc::clone(&changed), Rc::clone(&changed), Rc::clone(&changed));
        let binding: Rc<dyn DirectBinding<i32>> = Rc::new(
            binding::direct(move || Some(get.get()))
                .with_setter(move |v| {
                    set.set(v.unwrap_or_default());
                    raise.raise(&());
                })
                .with_change_event(
                    move |h| add.subscribe(move |_| h()),
                    move |token| {
                        remove.unsubscribe(token);
                    },
                ),
        );
        (value, changed, binding)
    }

    #[test]
    fn test_modes() {
        for (mode, forward, backward) in [
            (DualBindingMode::OneWay, true, false),
            (DualBindingMode::TwoWay, true, true),
            (DualBindingMode::OneWayToSource, false, true),
            (DualBindingMode::OneTime, false, false),
        ] {
            let (a, _, source) = cell(1);
            let (b, _, destination) = cell(0);
            let _dual = DualBinding::new(source.clone(), destination.clone(), mode);
            assert_eq!(b.get(), 1, "{:?} copies the initial value", mode);

            source.set_data_value(Some(2));
            assert_eq!(b.get() == 2, forward, "{:?} forward", mode);

            destination.set_data_value(Some(3));
            assert_eq!(a.get() == 3, backward, "{:?} backward", mode);
        }
    }

    #[test]
    fn test_unbind_stops_propagation() {
        let (_, source_event, source) = cell(1);
        let (b, destination_event, destination) = cell(0);
        let dual = DualBinding::new(source.clone(), destination, DualBindingMode::TwoWay);
        assert_eq!(source_event.len(), 1);
        assert_eq!(destination_event.len(), 1);

        dual.unbind();
        assert!(dual.is_unbound());
        assert!(source_event.is_empty());
        assert!(destination_event.is_empty());
        source.set_data_value(Some(9));
        assert_eq!(b.get(), 1);
        dual.unbind();
    }

    #[test]
    fn test_unbind_during_raise() {
        let (_, _, source) = cell(1);
        let (b, _, destination) = cell(0);
        let slot: Rc<RefCell<Option<Rc<DualBinding<i32>>>>> = Rc::new(RefCell::new(None));
        {
            let slot = Rc::clone(&slot);
            // runs before the dual binding's own handler, in the same raise
            source.add_data_value_changed(Rc::new(move |_: &Option<i32>| {
                if let Some(dual) = slot.borrow().as_ref() {
                    dual.unbind();
                }
            }));
        }
        let dual = DualBinding::new(source.clone(), destination, DualBindingMode::OneWay);
        *slot.borrow_mut() = Some(Rc::clone(&dual));
        assert_eq!(b.get(), 1);

        source.set_data_value(Some(4));
        assert!(dual.is_unbound());
        assert_eq!(b.get(), 1, "the rest of the raise does not write through");
    }

    #[test]
    fn test_update() {
        let (a, _, source) = cell(1);
        let (b, _, destination) = cell(0);
        let dual = DualBinding::new(source, destination, DualBindingMode::OneTime);
        a.set(5);
        b.set(7);
        dual.update(BindingUpdateMode::Destination);
        assert_eq!(b.get(), 5);
        b.set(8);
        dual.update(BindingUpdateMode::Source);
        assert_eq!(a.get(), 8);
    }
}
