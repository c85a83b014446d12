//! The platform registry: which handler implements which widget.

use crate::backend::Backend;
use crate::config::{Config, EventPolicy};
use crate::error::{Error, Result};
use core::any::{type_name, Any, TypeId};
use core::fmt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

type Factory<H> = Box<dyn Fn() -> Box<H>>;

/// Backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toolkit {
    Gtk,
    WinForms,
    Wpf,
    Mac,
    Ios,
    Android,
    /// In-memory handlers without a native toolkit.
    Headless,
}

impl Toolkit {
    pub fn is_desktop(self) -> bool {
        match self {
            Toolkit::Gtk | Toolkit::WinForms | Toolkit::Wpf | Toolkit::Mac | Toolkit::Headless => {
                true
            }
            Toolkit::Ios | Toolkit::Android => false,
        }
    }

    pub fn is_mobile(self) -> bool {
        !self.is_desktop()
    }
}

struct Registration {
    contract: &'static str,
    /// A `Factory<H>` for the contract `H` this entry is keyed by.
    factory: Box<dyn Any>,
}

/// Maps handler contracts to the factories that create their backend implementation.
///
/// A handler contract is a trait object type such as `dyn ButtonHandler`. Each contract has at
/// most one factory; lookups match the exact contract type only.
///
/// A platform is built once, before any widget, and then shared read-only (behind an `Rc`) with
/// every widget it creates.
pub struct Platform {
    id: String,
    toolkit: Toolkit,
    event_policy: EventPolicy,
    factories: HashMap<TypeId, Registration>,
    shared: RefCell<HashMap<TypeId, Box<dyn Any>>>,
}

impl Platform {
    /// Creates an empty platform. Handlers must be added with [`add`](Platform::add).
    pub fn empty(id: impl Into<String>, toolkit: Toolkit) -> Platform {
        Platform {
            id: id.into(),
            toolkit,
            event_policy: EventPolicy::default(),
            factories: HashMap::new(),
            shared: RefCell::new(HashMap::new()),
        }
    }

    /// Loads a backend and registers all of its handlers.
    pub fn new(backend: &dyn Backend) -> Result<Platform> {
        Self::with_config(backend, &Config::default())
    }

    /// Loads a backend with the given configuration.
    ///
    /// A backend that panics while loading fails with [`Error::PlatformLoad`].
    pub fn with_config(backend: &dyn Backend, config: &Config) -> Result<Platform> {
        load(backend)?;
        Ok(Platform::loaded(backend, config))
    }

    /// Builds the platform for a backend whose toolkit is already loaded.
    fn loaded(backend: &dyn Backend, config: &Config) -> Platform {
        let mut platform = Platform::empty(backend.id(), backend.toolkit());
        platform.event_policy = config.event_policy;
        backend.add_to(&mut platform);
        debug!(
            platform = %platform.id,
            handlers = platform.factories.len(),
            "platform initialized"
        );
        platform
    }

    /// Picks a platform from a list of candidates.
    ///
    /// If the configuration names a platform, that backend is used and any load failure is
    /// returned. Otherwise the first backend that loads successfully wins. Each candidate is
    /// loaded at most once.
    pub fn detect(backends: &[&dyn Backend], config: &Config) -> Result<Platform> {
        if let Some(id) = &config.platform {
            let backend = backends
                .iter()
                .find(|backend| backend.id().eq_ignore_ascii_case(id))
                .ok_or_else(|| Error::UnknownPlatform(id.clone()))?;
            return Platform::with_config(*backend, config);
        }

        for backend in backends {
            match load(*backend) {
                Ok(()) => {
                    info!(platform = backend.id(), "detected platform");
                    return Ok(Platform::loaded(*backend, config));
                }
                Err(err) => debug!(platform = backend.id(), %err, "backend is not available"),
            }
        }

        Err(Error::NoPlatform {
            tried: backends.iter().map(|b| b.id().to_string()).collect(),
        })
    }

    /// Returns true if the backend's native toolkit can be loaded.
    ///
    /// Never fails: load errors and panics are reported as `false`.
    pub fn is_valid(backend: &dyn Backend) -> bool {
        load(backend).is_ok()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn toolkit(&self) -> Toolkit {
        self.toolkit
    }

    pub fn is_desktop(&self) -> bool {
        self.toolkit.is_desktop()
    }

    pub fn is_mobile(&self) -> bool {
        self.toolkit.is_mobile()
    }

    pub fn is_gtk(&self) -> bool {
        self.toolkit == Toolkit::Gtk
    }

    pub fn is_win_forms(&self) -> bool {
        self.toolkit == Toolkit::WinForms
    }

    pub fn is_wpf(&self) -> bool {
        self.toolkit == Toolkit::Wpf
    }

    pub fn is_mac(&self) -> bool {
        self.toolkit == Toolkit::Mac
    }

    pub fn is_ios(&self) -> bool {
        self.toolkit == Toolkit::Ios
    }

    pub fn is_android(&self) -> bool {
        self.toolkit == Toolkit::Android
    }

    pub fn is_headless(&self) -> bool {
        self.toolkit == Toolkit::Headless
    }

    /// Policy applied by widgets when a handler does not support an event.
    pub fn event_policy(&self) -> EventPolicy {
        self.event_policy
    }

    pub fn set_event_policy(&mut self, policy: EventPolicy) {
        self.event_policy = policy;
    }

    /// Registers the factory for handler contract `H`, replacing any previous one.
    ///
    /// ```ignore
    /// platform.add::<dyn ButtonHandler, _>(|| Box::new(GtkButton::new()));
    /// ```
    pub fn add<H, F>(&mut self, factory: F)
    where
        H: ?Sized + 'static,
        F: Fn() -> Box<H> + 'static,
    {
        let key = TypeId::of::<H>();
        let contract = type_name::<H>();
        let factory: Factory<H> = Box::new(factory);
        let previous = self.factories.insert(
            key,
            Registration {
                contract,
                factory: Box::new(factory),
            },
        );
        self.shared.get_mut().remove(&key);
        trace!(contract, replaced = previous.is_some(), "registered handler");
    }

    /// Returns true if a factory is registered for exactly `H`.
    pub fn supports<H: ?Sized + 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<H>())
    }

    /// Number of registered contracts.
    pub fn handler_count(&self) -> usize {
        self.factories.len()
    }

    /// Names of all registered contracts, in no particular order.
    pub fn contracts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.values().map(|r| r.contract)
    }

    fn factory<H: ?Sized + 'static>(&self) -> Option<&Factory<H>> {
        self.factories
            .get(&TypeId::of::<H>())
            .and_then(|r| r.factory.downcast_ref::<Factory<H>>())
    }

    /// Creates a new handler for contract `H`.
    pub fn create<H: ?Sized + 'static>(&self) -> Result<Box<H>> {
        match self.factory::<H>() {
            Some(factory) => {
                debug!(contract = type_name::<H>(), platform = %self.id, "creating handler");
                Ok(factory())
            }
            None => Err(Error::HandlerNotFound {
                contract: type_name::<H>(),
                platform: self.id.clone(),
            }),
        }
    }

    /// Returns the platform-wide handler for contract `H`, creating it on first use.
    ///
    /// For service-style handlers that exist once per process rather than once per widget.
    pub fn shared<H: ?Sized + 'static>(&self) -> Result<Rc<H>> {
        let key = TypeId::of::<H>();
        if let Some(existing) = self
            .shared
            .borrow()
            .get(&key)
            .and_then(|shared| shared.downcast_ref::<Rc<H>>())
        {
            return Ok(Rc::clone(existing));
        }

        let handler: Rc<H> = Rc::from(self.create::<H>()?);
        self.shared
            .borrow_mut()
            .insert(key, Box::new(Rc::clone(&handler)));
        Ok(handler)
    }
}

/// Calls [`Backend::load`], turning a panic into [`Error::PlatformLoad`].
fn load(backend: &dyn Backend) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(|| backend.load())).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panicked while loading".to_string());
        warn!(platform = backend.id(), %reason, "backend panicked while loading");
        Err(Error::PlatformLoad {
            platform: backend.id().to_string(),
            reason,
        })
    })
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Platform")
            .field("id", &self.id)
            .field("toolkit", &self.toolkit)
            .field("event_policy", &self.event_policy)
            .field("handlers", &self.factories.len())
            .finish()
    }
}
