//! Events.
//!
//! [`Event`] is the single-threaded multicast primitive used throughout the crate: by widgets for
//! their native events, by models for property change notification, and by bindings. Every
//! subscription returns a [`HandlerToken`], and that exact token is what removes it again.

use cgmath::{Point2, Vector2};
use core::fmt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

thread_local! {
    static NEXT_TOKEN: Cell<u64> = const { Cell::new(1) };
}

/// Refers to a single subscription to an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerToken(u64);

impl HandlerToken {
    pub(crate) fn next() -> HandlerToken {
        NEXT_TOKEN.with(|next| {
            let id = next.get();
            next.set(id + 1);
            HandlerToken(id)
        })
    }
}

/// A list of handlers that can be raised with an argument of type `A`.
pub struct Event<A: ?Sized> {
    handlers: RefCell<Vec<(HandlerToken, Rc<dyn Fn(&A)>)>>,
}

impl<A: ?Sized> Event<A> {
    pub fn new() -> Event<A> {
        Event {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Adds a handler.
    pub fn subscribe<F: Fn(&A) + 'static>(&self, handler: F) -> HandlerToken {
        self.subscribe_rc(Rc::new(handler))
    }

    /// Adds a shared handler.
    pub fn subscribe_rc(&self, handler: Rc<dyn Fn(&A)>) -> HandlerToken {
        let token = HandlerToken::next();
        self.handlers.borrow_mut().push((token, handler));
        token
    }

    /// Removes the handler that was added with this token.
    ///
    /// Returns false if there was no such handler.
    pub fn unsubscribe(&self, token: HandlerToken) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter().position(|(t, _)| *t == token) {
            Some(pos) => {
                handlers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Calls every handler in subscription order.
    ///
    /// Handlers added or removed while raising take effect on the next raise.
    pub fn raise(&self, args: &A) {
        let handlers: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(args);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

impl<A: ?Sized> Default for Event<A> {
    fn default() -> Self {
        Event::new()
    }
}

impl<A: ?Sized> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Event({} handlers)", self.len())
    }
}

/// Widget events that a handler may have to wire up natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventId {
    // controls
    GotFocus,
    LostFocus,
    SizeChanged,
    EnabledChanged,
    MouseDown,
    MouseUp,
    KeyDown,
    KeyUp,

    // specific widgets
    Click,
    TextChanged,
    CheckedChanged,
    Validate,

    // application
    Initialized,
    Terminating,
}

/// Arguments passed to widget event subscribers.
#[derive(Debug, Default)]
pub struct EventArgs {
    pub data: EventData,
    handled: Cell<bool>,
    cancel: Cell<bool>,
}

impl EventArgs {
    pub fn new(data: EventData) -> EventArgs {
        EventArgs {
            data,
            ..EventArgs::default()
        }
    }

    pub fn empty() -> EventArgs {
        EventArgs::default()
    }

    /// Marks the event as handled, stopping native default processing.
    pub fn set_handled(&self) {
        self.handled.set(true);
    }

    pub fn is_handled(&self) -> bool {
        self.handled.get()
    }

    /// Requests that the operation announced by this event does not happen.
    pub fn cancel(&self) {
        self.cancel.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.get()
    }
}

/// Event-specific payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventData {
    #[default]
    None,
    Mouse(MouseEventArgs),
    Key(KeyEventArgs),
    /// New size of the control.
    Size(Vector2<f64>),
}

/// Mouse buttons.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary = 0,
    Middle = 1,
    Alternate = 2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseEventArgs {
    /// Location in the control's coordinate system.
    pub location: Point2<f64>,
    pub button: Option<MouseButton>,
    /// Between 0 and 1; constant 1 for devices without pressure.
    pub pressure: f64,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEventArgs {
    /// The character the key produces, if any.
    pub key_char: Option<char>,
    pub modifiers: KeyModifiers,
}

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any control key is pressed.
    pub control: bool,

    /// Whether any option key or alt key is pressed.
    pub alt: bool,

    /// Whether any command key or meta key is pressed.
    pub command: bool,
}

/// Per-widget subscriber lists, keyed by event.
#[derive(Debug, Default)]
pub(crate) struct EventTable {
    events: RefCell<HashMap<EventId, Rc<Event<EventArgs>>>>,
}

impl EventTable {
    pub(crate) fn get_or_insert(&self, id: EventId) -> Rc<Event<EventArgs>> {
        Rc::clone(self.events.borrow_mut().entry(id).or_default())
    }

    pub(crate) fn get(&self, id: EventId) -> Option<Rc<Event<EventArgs>>> {
        self.events.borrow().get(&id).cloned()
    }

    pub(crate) fn raise(&self, id: EventId, args: &EventArgs) {
        // the map must not stay borrowed while subscribers run
        if let Some(event) = self.get(id) {
            event.raise(args);
        }
    }

    pub(crate) fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

#[test]
fn test_subscribe_raise_unsubscribe() {
    let event = Event::<i32>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let a = {
        let seen = Rc::clone(&seen);
        event.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
    };
    let _b = {
        let seen = Rc::clone(&seen);
        event.subscribe(move |v| seen.borrow_mut().push(("b", *v)))
    };

    event.raise(&1);
    assert!(event.unsubscribe(a));
    assert!(!event.unsubscribe(a), "a token only removes its handler once");
    event.raise(&2);

    assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("b", 2)]);
    assert_eq!(event.len(), 1);
}

#[test]
fn test_subscribe_while_raising() {
    let event = Rc::new(Event::<()>::new());
    let count = Rc::new(Cell::new(0));

    {
        let inner = Rc::downgrade(&event);
        let count = Rc::clone(&count);
        event.subscribe(move |_| {
            count.set(count.get() + 1);
            if let Some(event) = inner.upgrade() {
                let count = Rc::clone(&count);
                event.subscribe(move |_| count.set(count.get() + 100));
            }
        });
    }

    event.raise(&());
    assert_eq!(count.get(), 1, "new handlers are not called by the raise that added them");
    event.raise(&());
    assert_eq!(count.get(), 102);
}

#[test]
fn test_event_args_flags() {
    let args = EventArgs::empty();
    assert!(!args.is_handled() && !args.is_cancelled());
    args.set_handled();
    args.cancel();
    assert!(args.is_handled() && args.is_cancelled());
    assert_eq!(args.data, EventData::None);
}
