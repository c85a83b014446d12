use crate::application::ApplicationHandler;
use std::any::Any;
use std::cell::Cell;
use std::time::Duration;
use veneer_core::{Callback, EventAttach, EventId, WidgetHandler};

/// How long the headless main loop waits for jobs per iteration.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
pub struct HeadlessApplication {
    quit_requested: Cell<bool>,
    iterations: Cell<u64>,
}

impl HeadlessApplication {
    pub fn quit_requested(&self) -> bool {
        self.quit_requested.get()
    }

    /// Number of main loop iterations so far.
    pub fn iterations(&self) -> u64 {
        self.iterations.get()
    }
}

impl WidgetHandler for HeadlessApplication {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn attach_event(&self, event: EventId, _: &Callback) -> EventAttach {
        match event {
            EventId::Initialized | EventId::Terminating => EventAttach::Delegated,
            _ => EventAttach::Unsupported,
        }
    }
}

impl ApplicationHandler for HeadlessApplication {
    fn run(&self, pump: &mut dyn FnMut(Option<Duration>) -> bool) {
        self.quit_requested.set(false);
        loop {
            self.iterations.set(self.iterations.get() + 1);
            if !pump(Some(POLL_INTERVAL)) || self.quit_requested.get() {
                break;
            }
        }
    }

    fn quit(&self) {
        self.quit_requested.set(true);
    }
}
