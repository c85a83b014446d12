use crate::color::Color;
use crate::rect::Rect;
use cgmath::{Point2, Vector2};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use veneer_core::events::{KeyEventArgs, KeyModifiers, MouseButton, MouseEventArgs};
use veneer_core::{Callback, EventArgs, EventAttach, EventData, EventId};

const CONTROL_EVENTS: [EventId; 8] = [
    EventId::GotFocus,
    EventId::LostFocus,
    EventId::SizeChanged,
    EventId::EnabledChanged,
    EventId::MouseDown,
    EventId::MouseUp,
    EventId::KeyDown,
    EventId::KeyUp,
];

/// State every headless control has, and the callbacks of its attached events.
#[derive(Debug)]
pub struct ControlState {
    enabled: Cell<bool>,
    visible: Cell<bool>,
    bounds: Cell<Rect>,
    background: Cell<Color>,
    focused: Cell<bool>,
    disposed: Cell<bool>,
    callbacks: RefCell<HashMap<EventId, Callback>>,
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState {
            enabled: Cell::new(true),
            visible: Cell::new(true),
            bounds: Cell::new(Rect::zero()),
            background: Cell::new(Color::TRANSPARENT),
            focused: Cell::new(false),
            disposed: Cell::new(false),
            callbacks: RefCell::new(HashMap::new()),
        }
    }
}

impl ControlState {
    /// Keeps the callback if `event` is a control event or one of `extra`.
    pub(crate) fn attach(
        &self,
        event: EventId,
        callback: &Callback,
        extra: &[EventId],
    ) -> EventAttach {
        if CONTROL_EVENTS.contains(&event) || extra.contains(&event) {
            self.callbacks.borrow_mut().insert(event, callback.clone());
            EventAttach::Attached
        } else {
            EventAttach::Unsupported
        }
    }

    /// Raises an event if it was attached. Returns false if nobody could receive it.
    pub fn raise(&self, event: EventId, args: &EventArgs) -> bool {
        // cloned so subscribers may touch this control again
        let callback = self.callbacks.borrow().get(&event).cloned();
        callback.map_or(false, |callback| callback.raise(event, args))
    }

    pub fn is_attached(&self, event: EventId) -> bool {
        self.callbacks.borrow().contains_key(&event)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn dispose(&self) {
        self.disposed.set(true);
        self.callbacks.borrow_mut().clear();
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            self.raise(EventId::EnabledChanged, &EventArgs::empty());
        }
    }

    pub(crate) fn visible(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub(crate) fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    pub(crate) fn set_size(&self, size: Vector2<f64>) {
        let bounds = self.bounds.get();
        if bounds.size != size {
            self.bounds.set(bounds.with_size(size));
            self.raise(EventId::SizeChanged, &EventArgs::new(EventData::Size(size)));
        }
    }

    /// Moves the control within its parent.
    pub fn set_location(&self, location: Point2<f64>) {
        self.bounds.set(self.bounds.get().with_location(location));
    }

    pub(crate) fn background_color(&self) -> Color {
        self.background.get()
    }

    pub(crate) fn set_background_color(&self, color: Color) {
        self.background.set(color);
    }

    pub(crate) fn focus(&self) {
        if !self.focused.replace(true) {
            self.raise(EventId::GotFocus, &EventArgs::empty());
        }
    }

    pub(crate) fn has_focus(&self) -> bool {
        self.focused.get()
    }

    /// Simulates focus moving elsewhere.
    pub fn blur(&self) {
        if self.focused.replace(false) {
            self.raise(EventId::LostFocus, &EventArgs::empty());
        }
    }

    /// Simulates a primary-button click at `location`. Disabled controls ignore it.
    pub fn mouse_click(&self, location: Point2<f64>) -> bool {
        if !self.enabled.get() {
            return false;
        }
        let args = |button| MouseEventArgs {
            location,
            button: Some(button),
            pressure: 1.,
            modifiers: KeyModifiers::default(),
        };
        self.raise(
            EventId::MouseDown,
            &EventArgs::new(EventData::Mouse(args(MouseButton::Primary))),
        );
        self.raise(
            EventId::MouseUp,
            &EventArgs::new(EventData::Mouse(args(MouseButton::Primary))),
        );
        true
    }

    /// Simulates a key press. Returns true if a `KeyDown` subscriber marked it handled.
    pub fn press_key(&self, key_char: char, modifiers: KeyModifiers) -> bool {
        let key = || {
            EventArgs::new(EventData::Key(KeyEventArgs {
                key_char: Some(key_char),
                modifiers,
            }))
        };
        let down = key();
        self.raise(EventId::KeyDown, &down);
        self.raise(EventId::KeyUp, &key());
        down.is_handled()
    }
}

/// Implements `WidgetHandler` and `ControlHandler` for a headless control with a `state` field.
/// Extra events after the type are attached in addition to the control events.
macro_rules! headless_control {
    ($ty:ident $(, $event:ident)*) => {
        impl ::veneer_core::WidgetHandler for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn attach_event(
                &self,
                event: ::veneer_core::EventId,
                callback: &::veneer_core::Callback,
            ) -> ::veneer_core::EventAttach {
                self.state
                    .attach(event, callback, &[$(::veneer_core::EventId::$event),*])
            }

            fn dispose(&self) {
                self.state.dispose();
            }
        }

        impl $crate::control::ControlHandler for $ty {
            fn enabled(&self) -> bool {
                self.state.enabled()
            }

            fn set_enabled(&self, enabled: bool) {
                self.state.set_enabled(enabled);
            }

            fn visible(&self) -> bool {
                self.state.visible()
            }

            fn set_visible(&self, visible: bool) {
                self.state.set_visible(visible);
            }

            fn bounds(&self) -> $crate::rect::Rect {
                self.state.bounds()
            }

            fn set_size(&self, size: ::cgmath::Vector2<f64>) {
                self.state.set_size(size);
            }

            fn background_color(&self) -> $crate::color::Color {
                self.state.background_color()
            }

            fn set_background_color(&self, color: $crate::color::Color) {
                self.state.set_background_color(color);
            }

            fn focus(&self) {
                self.state.focus();
            }

            fn has_focus(&self) -> bool {
                self.state.has_focus()
            }
        }

        impl $ty {
            pub fn state(&self) -> &$crate::headless::ControlState {
                &self.state
            }
        }
    };
}

#[test]
fn test_change_events_only_fire_on_change() {
    use std::rc::Rc;
    use veneer_core::{EventPolicy, Platform, Toolkit, Widget, WidgetHandler};

    #[derive(Default)]
    struct Plain {
        state: ControlState,
    }
    headless_control!(Plain);

    let mut platform = Platform::empty("test", Toolkit::Headless);
    platform.set_event_policy(EventPolicy::Strict);
    let platform = Rc::new(platform);
    let widget = Widget::<dyn crate::control::ControlHandler>::with_handler(
        &platform,
        Box::new(Plain::default()),
    );
    let count = Rc::new(Cell::new(0));
    {
        let count = Rc::clone(&count);
        widget
            .subscribe(EventId::SizeChanged, move |args| {
                assert_eq!(args.data, EventData::Size(Vector2::new(10., 20.)));
                count.set(count.get() + 1);
            })
            .unwrap();
    }

    widget.handler().set_size(Vector2::new(10., 20.));
    widget.handler().set_size(Vector2::new(10., 20.));
    assert_eq!(count.get(), 1);
    assert!(widget.handler().as_any().is::<Plain>());
    assert!(widget.subscribe(EventId::Click, |_| {}).is_err());
}
