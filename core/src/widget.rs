//! The widget base: a handler plus the backend-independent bookkeeping around it.

use crate::binding::BindingCollection;
use crate::config::EventPolicy;
use crate::data_context::DataContextNode;
use crate::error::{Error, Result};
use crate::events::{EventArgs, EventId, EventTable, HandlerToken};
use crate::handler::{Callback, EventAttach, WidgetHandler};
use crate::platform::Platform;
use crate::properties::Properties;
use core::any::Any;
use core::fmt;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{trace, warn};
use uuid::Uuid;

/// A unique identifier for a widget.
///
/// (this is just a UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(u32, u16, u16, [u8; 8]);

impl WidgetId {
    pub(crate) fn new() -> WidgetId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        WidgetId(a, b, c, *d)
    }
}

/// A widget of handler contract `H`.
///
/// Concrete widgets wrap this and forward their properties to [`handler`](Widget::handler).
/// The handler is created from the platform when the widget is constructed and stays the same
/// for the widget's whole life.
pub struct Widget<H: ?Sized + WidgetHandler + 'static> {
    id: WidgetId,
    platform: Rc<Platform>,
    handler: Box<H>,
    events: Rc<EventTable>,
    attached: RefCell<HashSet<EventId>>,
    bindings: BindingCollection,
    properties: Properties,
    data_context: Rc<DataContextNode>,
    disposed: Cell<bool>,
}

impl<H: ?Sized + WidgetHandler + 'static> Widget<H> {
    /// Creates a widget, resolving its handler from the platform.
    pub fn new(platform: &Rc<Platform>) -> Result<Widget<H>> {
        let handler = platform.create::<H>()?;
        Ok(Self::with_handler(platform, handler))
    }

    /// Creates a widget around an existing handler.
    pub fn with_handler(platform: &Rc<Platform>, handler: Box<H>) -> Widget<H> {
        let id = WidgetId::new();
        trace!(?id, handler = handler.name(), "created widget");
        Widget {
            id,
            platform: Rc::clone(platform),
            handler,
            events: Rc::new(EventTable::default()),
            attached: RefCell::new(HashSet::new()),
            bindings: BindingCollection::new(),
            properties: Properties::new(),
            data_context: DataContextNode::new(),
            disposed: Cell::new(false),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn platform(&self) -> &Rc<Platform> {
        &self.platform
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Bindings owned by this widget; unbound when it is disposed.
    pub fn bindings(&self) -> &BindingCollection {
        &self.bindings
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn data_context_node(&self) -> &Rc<DataContextNode> {
        &self.data_context
    }

    /// The effective data context, inherited from the parent if not set on this widget.
    pub fn data_context(&self) -> Option<Rc<dyn Any>> {
        self.data_context.get()
    }

    /// The effective data context, if it is of type `T`.
    pub fn data_context_as<T: Any>(&self) -> Option<Rc<T>> {
        self.data_context().and_then(|ctx| ctx.downcast::<T>().ok())
    }

    pub fn set_data_context<T: Any>(&self, value: Rc<T>) {
        self.data_context.set(Some(value as Rc<dyn Any>));
    }

    /// Clears this widget's own data context so it inherits its parent's again.
    pub fn clear_data_context(&self) {
        self.data_context.set(None);
    }

    /// A callback through which a handler raises events on this widget.
    pub fn callback(&self) -> Callback {
        Callback::new(self.id, Rc::downgrade(&self.events))
    }

    /// Returns true if the handler was already asked to wire up this event.
    pub fn is_attached(&self, event: EventId) -> bool {
        self.attached.borrow().contains(&event)
    }

    /// Asks the handler to wire up an event, unless that already happened.
    ///
    /// Unsupported events fail or are tolerated according to the platform's [`EventPolicy`].
    pub fn attach_event(&self, event: EventId) -> Result<()> {
        if self.is_attached(event) {
            return Ok(());
        }

        match self.handler.attach_event(event, &self.callback()) {
            EventAttach::Attached => trace!(id = ?self.id, ?event, "attached event"),
            EventAttach::Delegated => trace!(id = ?self.id, ?event, "event is raised by a parent"),
            EventAttach::Unsupported => match self.platform.event_policy() {
                EventPolicy::Strict => {
                    return Err(Error::UnsupportedEvent {
                        handler: self.handler.name(),
                        event,
                    })
                }
                EventPolicy::Lenient => warn!(
                    handler = self.handler.name(),
                    ?event,
                    "event is not supported and will never fire"
                ),
            },
        }

        self.attached.borrow_mut().insert(event);
        Ok(())
    }

    /// Subscribes to an event, wiring it up natively on first use.
    pub fn subscribe<F>(&self, event: EventId, handler: F) -> Result<HandlerToken>
    where
        F: Fn(&EventArgs) + 'static,
    {
        self.attach_event(event)?;
        Ok(self.events.get_or_insert(event).subscribe(handler))
    }

    pub fn unsubscribe(&self, event: EventId, token: HandlerToken) -> bool {
        self.events
            .get(event)
            .map_or(false, |e| e.unsubscribe(token))
    }

    /// Number of subscribers to an event.
    pub fn subscriber_count(&self, event: EventId) -> usize {
        self.events.get(event).map_or(0, |e| e.len())
    }

    /// Raises an event on this widget's subscribers.
    ///
    /// Used by widgets for events they implement themselves, and by containers for events that
    /// their children delegate to them.
    pub fn raise(&self, event: EventId, args: &EventArgs) {
        self.events.raise(event, args);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Unbinds all bindings and releases the handler's native resources.
    ///
    /// Happens automatically on drop; calling it more than once has no effect.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        trace!(id = ?self.id, "disposing widget");
        self.bindings.unbind();
        self.handler.dispose();
        self.events.clear();
        self.data_context.set_parent(None);
    }
}

impl<H: ?Sized + WidgetHandler + 'static> Drop for Widget<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<H: ?Sized + WidgetHandler + 'static> fmt::Debug for Widget<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.id)
            .field("handler", &self.handler.name())
            .field("platform", &self.platform.id())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{self, DirectBinding};
    use crate::platform::Toolkit;

    trait ThingHandler: WidgetHandler {
        fn fire(&self, event: EventId);
        fn disposed(&self) -> bool;
    }

    #[derive(Default)]
    struct FakeThing {
        callbacks: RefCell<Vec<(EventId, Callback)>>,
        attach_calls: Cell<usize>,
        disposed: Cell<bool>,
    }

    impl WidgetHandler for FakeThing {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn attach_event(&self, event: EventId, callback: &Callback) -> EventAttach {
            self.attach_calls.set(self.attach_calls.get() + 1);
            match event {
                EventId::Click => {
                    self.callbacks.borrow_mut().push((event, callback.clone()));
                    EventAttach::Attached
                }
                // the owning menu raises this
                EventId::Validate => EventAttach::Delegated,
                _ => EventAttach::Unsupported,
            }
        }

        fn dispose(&self) {
            self.disposed.set(true);
        }
    }

    impl ThingHandler for FakeThing {
        fn fire(&self, event: EventId) {
            for (id, callback) in self.callbacks.borrow().iter() {
                if *id == event {
                    callback.raise(event, &EventArgs::empty());
                }
            }
        }

        fn disposed(&self) -> bool {
            self.disposed.get()
        }
    }

    fn platform(policy: EventPolicy) -> Rc<Platform> {
        let mut platform = Platform::empty("fake", Toolkit::Headless);
        platform.set_event_policy(policy);
        platform.add::<dyn ThingHandler, _>(|| Box::new(FakeThing::default()));
        Rc::new(platform)
    }

    fn fake(widget: &Widget<dyn ThingHandler>) -> &FakeThing {
        widget.handler().as_any().downcast_ref::<FakeThing>().unwrap()
    }

    #[test]
    fn test_lazy_attach_once() {
        let widget = Widget::<dyn ThingHandler>::new(&platform(EventPolicy::Strict)).unwrap();
        assert_eq!(fake(&widget).attach_calls.get(), 0, "nothing is wired before subscribing");

        let clicks = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let clicks = Rc::clone(&clicks);
            widget
                .subscribe(EventId::Click, move |_| clicks.set(clicks.get() + 1))
                .unwrap();
        }
        assert_eq!(fake(&widget).attach_calls.get(), 1);
        assert!(widget.is_attached(EventId::Click));

        widget.handler().fire(EventId::Click);
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn test_unsupported_event_policy() {
        let strict = Widget::<dyn ThingHandler>::new(&platform(EventPolicy::Strict)).unwrap();
        match strict.subscribe(EventId::KeyDown, |_| {}) {
            Err(Error::UnsupportedEvent { event, handler }) => {
                assert_eq!(event, EventId::KeyDown);
                assert!(handler.contains("FakeThing"));
            }
            other => panic!("expected UnsupportedEvent, got {:?}", other),
        }
        assert_eq!(strict.subscriber_count(EventId::KeyDown), 0);

        let lenient = Widget::<dyn ThingHandler>::new(&platform(EventPolicy::Lenient)).unwrap();
        lenient.subscribe(EventId::KeyDown, |_| {}).unwrap();
        lenient.subscribe(EventId::KeyDown, |_| {}).unwrap();
        assert_eq!(fake(&lenient).attach_calls.get(), 1);
        assert_eq!(lenient.subscriber_count(EventId::KeyDown), 2);
    }

    #[test]
    fn test_delegated_event_is_raised_by_parent() {
        let widget = Widget::<dyn ThingHandler>::new(&platform(EventPolicy::Strict)).unwrap();
        let validated = Rc::new(Cell::new(false));
        {
            let validated = Rc::clone(&validated);
            widget
                .subscribe(EventId::Validate, move |_| validated.set(true))
                .unwrap();
        }
        // the handler never raises it
        widget.handler().fire(EventId::Validate);
        assert!(!validated.get());

        widget.raise(EventId::Validate, &EventArgs::empty());
        assert!(validated.get());
    }

    #[test]
    fn test_missing_handler() {
        let platform = Rc::new(Platform::empty("empty", Toolkit::Headless));
        assert!(matches!(
            Widget::<dyn ThingHandler>::new(&platform),
            Err(Error::HandlerNotFound { .. })
        ));
    }

    #[test]
    fn test_dispose_releases_everything() {
        let widget = Widget::<dyn ThingHandler>::new(&platform(EventPolicy::Strict)).unwrap();
        let callback = widget.callback();

        let value = Rc::new(Cell::new(1));
        let source: Rc<dyn DirectBinding<i32>> = {
            let (get, set) = (Rc::clone(&value), Rc::clone(&value));
            Rc::new(binding::direct(move || Some(get.get())).with_setter(move |v| {
                if let Some(v) = v {
                    set.set(v)
                }
            }))
        };
        let destination: Rc<dyn DirectBinding<i32>> =
            Rc::new(binding::direct(|| Some(0)).with_setter(|_| {}));
        let dual = crate::binding::DualBinding::new(
            source.clone(),
            destination,
            binding::DualBindingMode::OneWay,
        );
        widget.bindings().add(dual.clone());

        widget.dispose();
        assert!(widget.is_disposed());
        assert!(widget.handler().disposed());
        assert!(dual.is_unbound());
        assert_eq!(source.data_value(), Some(1));
        assert!(callback.raise(EventId::Click, &EventArgs::empty()), "table is alive until drop");

        widget.dispose();
        drop(widget);
        assert!(!callback.raise(EventId::Click, &EventArgs::empty()));
    }

    #[test]
    fn test_data_context_downcast() {
        let widget = Widget::<dyn ThingHandler>::new(&platform(EventPolicy::Strict)).unwrap();
        widget.set_data_context(Rc::new(String::from("model")));
        assert_eq!(
            widget.data_context_as::<String>().as_deref().map(String::as_str),
            Some("model")
        );
        assert!(widget.data_context_as::<i32>().is_none());
        widget.clear_data_context();
        assert!(widget.data_context().is_none());
    }
}
