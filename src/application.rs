//! The application: main loop, lifecycle, and running code on the UI thread from other threads.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;
use tracing::{debug, trace, warn};
use veneer_core::{
    Error, EventArgs, EventId, HandlerToken, Platform, Result, Widget, WidgetHandler,
};

/// Handler contract for [`Application`].
///
/// `Initialized` and `Terminating` are raised by the application itself, so handlers report them
/// as delegated.
pub trait ApplicationHandler: WidgetHandler {
    /// Runs the native main loop.
    ///
    /// The loop must call `pump` regularly and return once it returns false. `pump` runs queued
    /// jobs, blocking for up to the given duration while waiting for one (`None` never blocks).
    fn run(&self, pump: &mut dyn FnMut(Option<Duration>) -> bool);

    /// Asks the native main loop to stop.
    fn quit(&self);
}

type Job = Box<dyn FnOnce(&Application) + Send>;

/// Application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Quitting,
    Exited,
}

/// State shared with [`InvokeHandle`]s on other threads.
struct Shared {
    lifecycle: Mutex<Lifecycle>,
    ui_thread: ThreadId,
}

/// The application: owns the main loop and the UI thread's job queue.
///
/// Everything in veneer is bound to the thread that created the application. Other threads
/// use an [`InvokeHandle`] or a [`UiSender`] to get work onto it.
pub struct Application {
    widget: Widget<dyn ApplicationHandler>,
    sender: Sender<Job>,
    jobs: Receiver<Job>,
    shared: Arc<Shared>,
    receivers: RefCell<HashMap<u64, Box<dyn Any>>>,
    next_receiver: Cell<u64>,
}

impl Application {
    /// Creates the application on the current thread, which becomes the UI thread.
    pub fn new(platform: &Rc<Platform>) -> Result<Application> {
        let (sender, jobs) = channel::unbounded();
        Ok(Application {
            widget: Widget::new(platform)?,
            sender,
            jobs,
            shared: Arc::new(Shared {
                lifecycle: Mutex::new(Lifecycle::Created),
                ui_thread: thread::current().id(),
            }),
            receivers: RefCell::new(HashMap::new()),
            next_receiver: Cell::new(0),
        })
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.shared.lifecycle.lock()
    }

    /// Returns true if called on the thread that created the application.
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.shared.ui_thread
    }

    /// A handle other threads can use to run code on the UI thread.
    pub fn invoke_handle(&self) -> InvokeHandle {
        InvokeHandle {
            sender: self.sender.clone(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Runs `f` right away. This is the UI-thread counterpart of [`InvokeHandle::invoke`].
    pub fn invoke<R>(&self, f: impl FnOnce(&Application) -> R) -> R {
        f(self)
    }

    /// Runs every queued job without blocking. Returns how many ran.
    pub fn process_pending(&self) -> usize {
        let mut count = 0;
        loop {
            match self.jobs.try_recv() {
                Ok(job) => {
                    job(self);
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if count > 0 {
            trace!(count, "processed pending jobs");
        }
        count
    }

    /// Runs queued jobs, waiting up to `timeout` for the first one. Returns true while the
    /// application should keep running.
    fn pump(&self, timeout: Option<Duration>) -> bool {
        if let Some(timeout) = timeout {
            match self.jobs.recv_timeout(timeout) {
                Ok(job) => job(self),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => (),
            }
        }
        self.process_pending();
        self.lifecycle() == Lifecycle::Running
    }

    /// Runs the main loop until the application quits.
    ///
    /// Raises `Initialized` before entering the loop. Fails if the application already exited.
    pub fn run(&self) -> Result<()> {
        let state = {
            let mut lifecycle = self.shared.lifecycle.lock();
            let state = *lifecycle;
            if state == Lifecycle::Created {
                *lifecycle = Lifecycle::Running;
            }
            state
        };

        match state {
            Lifecycle::Exited => return Err(Error::ApplicationExited),
            Lifecycle::Running => {
                warn!("application is already running");
                return Ok(());
            }
            // quit before run
            Lifecycle::Quitting => (),
            Lifecycle::Created => {
                debug!("application starting");
                self.widget.raise(EventId::Initialized, &EventArgs::empty());
                if self.lifecycle() == Lifecycle::Running {
                    self.widget.handler().run(&mut |timeout| self.pump(timeout));
                }
            }
        }

        if self.lifecycle() == Lifecycle::Running {
            // the native loop ended on its own, so there is nothing to cancel
            self.widget.raise(EventId::Terminating, &EventArgs::empty());
        }
        self.process_pending();
        *self.shared.lifecycle.lock() = Lifecycle::Exited;
        // dropping the rest fails any blocked `invoke`
        while self.jobs.try_recv().is_ok() {}
        debug!("application exited");
        Ok(())
    }

    /// Asks the application to quit.
    ///
    /// A running application raises `Terminating` first; if a subscriber cancels it, the
    /// application keeps running and this returns false.
    pub fn quit(&self) -> bool {
        match self.lifecycle() {
            Lifecycle::Created => {
                *self.shared.lifecycle.lock() = Lifecycle::Quitting;
                true
            }
            Lifecycle::Running => {
                let args = EventArgs::empty();
                self.widget.raise(EventId::Terminating, &args);
                if args.is_cancelled() {
                    debug!("quit was cancelled");
                    return false;
                }
                *self.shared.lifecycle.lock() = Lifecycle::Quitting;
                self.widget.handler().quit();
                true
            }
            Lifecycle::Quitting | Lifecycle::Exited => true,
        }
    }

    pub fn on_initialized<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.widget.subscribe(EventId::Initialized, f)
    }

    /// Raised before quitting. Cancelling the arguments keeps the application running.
    pub fn on_terminating<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.widget.subscribe(EventId::Terminating, f)
    }

    /// Creates a channel whose values are delivered to `receiver` on the UI thread.
    ///
    /// The receiver is dropped once the last [`UiSender`] is gone and the values sent before
    /// that have been delivered.
    pub fn channel<T, F>(&self, receiver: F) -> UiSender<T>
    where
        T: Send + 'static,
        F: Fn(T) + 'static,
    {
        let id = self.next_receiver.get();
        self.next_receiver.set(id + 1);
        let receiver: Rc<dyn Fn(T)> = Rc::new(receiver);
        self.receivers.borrow_mut().insert(id, Box::new(receiver));
        UiSender {
            registration: Arc::new(Registration {
                id,
                handle: self.invoke_handle(),
            }),
            _value: PhantomData,
        }
    }

    fn remove_receiver(&self, id: u64) {
        if self.receivers.borrow_mut().remove(&id).is_some() {
            trace!(id, "removed channel receiver");
        }
    }

    fn deliver<T: 'static>(&self, id: u64, value: T) {
        let receiver = self
            .receivers
            .borrow()
            .get(&id)
            .and_then(|receiver| receiver.downcast_ref::<Rc<dyn Fn(T)>>())
            .cloned();
        match receiver {
            Some(receiver) => receiver(value),
            None => trace!(id, "dropped value for missing receiver"),
        }
    }
}

impl Deref for Application {
    type Target = Widget<dyn ApplicationHandler>;

    fn deref(&self) -> &Self::Target {
        &self.widget
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Application")
            .field("widget", &self.widget)
            .field("lifecycle", &self.lifecycle())
            .field("pending", &self.jobs.len())
            .finish()
    }
}

/// Runs code on the UI thread from any thread.
#[derive(Clone)]
pub struct InvokeHandle {
    sender: Sender<Job>,
    shared: Arc<Shared>,
}

impl InvokeHandle {
    /// Queues `f` to run on the UI thread and returns immediately.
    pub fn async_invoke<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&Application) + Send + 'static,
    {
        // held while sending so the queue cannot be drained in between
        let lifecycle = self.shared.lifecycle.lock();
        if *lifecycle == Lifecycle::Exited {
            return Err(Error::ApplicationExited);
        }
        self.sender
            .send(Box::new(f))
            .map_err(|_| Error::ApplicationExited)
    }

    /// Runs `f` on the UI thread and waits for its result.
    ///
    /// Fails with [`Error::InvokeOnUiThread`] on the UI thread itself, where waiting would never
    /// end; use [`Application::invoke`] there.
    pub fn invoke<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&Application) -> R + Send + 'static,
    {
        if thread::current().id() == self.shared.ui_thread {
            return Err(Error::InvokeOnUiThread);
        }
        let (reply, result) = channel::bounded(1);
        self.async_invoke(move |app| {
            let _ = reply.send(f(app));
        })?;
        result.recv().map_err(|_| Error::ApplicationExited)
    }

    /// Asks the application to quit, from any thread.
    pub fn quit(&self) -> Result<()> {
        self.async_invoke(|app| {
            app.quit();
        })
    }

    pub fn is_running(&self) -> bool {
        *self.shared.lifecycle.lock() == Lifecycle::Running
    }
}

impl fmt::Debug for InvokeHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("InvokeHandle")
            .field("lifecycle", &*self.shared.lifecycle.lock())
            .finish()
    }
}

/// Shared by all clones of a [`UiSender`]; removes the receiver when dropped.
struct Registration {
    id: u64,
    handle: InvokeHandle,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let id = self.id;
        // queued behind any pending values; fails harmlessly once the application exited
        let _ = self.handle.async_invoke(move |app| app.remove_receiver(id));
    }
}

/// The sending half of [`Application::channel`].
pub struct UiSender<T> {
    registration: Arc<Registration>,
    _value: PhantomData<fn(T)>,
}

impl<T: Send + 'static> UiSender<T> {
    /// Sends a value to the receiver on the UI thread.
    pub fn send(&self, value: T) -> Result<()> {
        let id = self.registration.id;
        self.registration
            .handle
            .async_invoke(move |app| app.deliver::<T>(id, value))
    }
}

impl<T> Clone for UiSender<T> {
    fn clone(&self) -> Self {
        UiSender {
            registration: Arc::clone(&self.registration),
            _value: PhantomData,
        }
    }
}

impl<T> fmt::Debug for UiSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("UiSender")
            .field("id", &self.registration.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;

    #[test]
    fn test_channel_receiver_outlives_only_its_senders() {
        let platform = Rc::new(Platform::new(&HeadlessBackend).unwrap());
        let app = Application::new(&platform).unwrap();
        let received = Rc::new(Cell::new(0));
        let sender = {
            let received = Rc::clone(&received);
            app.channel(move |n: i32| received.set(received.get() + n))
        };
        let clone = sender.clone();
        assert_eq!(app.receivers.borrow().len(), 1);

        sender.send(2).unwrap();
        drop(sender);
        assert_eq!(app.process_pending(), 1);
        assert_eq!(app.receivers.borrow().len(), 1, "a clone is still alive");

        clone.send(3).unwrap();
        drop(clone);
        assert_eq!(app.process_pending(), 2);
        assert_eq!(received.get(), 5, "values sent before the drop still arrive");
        assert!(app.receivers.borrow().is_empty());
    }
}
