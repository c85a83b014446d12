//! Data binding.
//!
//! # Overview
//! An [`IndirectBinding`] knows how to read, write and observe one value on *some* item of type
//! `S`, without being tied to a particular item: a single property binding can be reused for
//! every row of a grid. Property, column and delegate bindings are the stock implementations.
//!
//! A [`DirectBinding`] is tied to exactly one value source. [`ObjectBinding`] makes a direct
//! binding out of an indirect binding and an item (held weakly: a binding never keeps its model
//! alive), substituting configured defaults for null values.
//!
//! A [`DualBinding`] keeps two direct bindings in sync according to a [`DualBindingMode`], and
//! guards against the ping-pong that happens when both sides observe each other.
//!
//! Every binding can be [unbound](Binding::unbind), which removes each change subscription it
//! installed using the token it got when installing it. Widgets own their bindings through a
//! [`BindingCollection`] and unbind them when disposed.
//!
//! Null is modelled as `None`: bindings traffic in `Option<T>`.

mod adapters;
mod collection;
mod column;
mod context;
mod delegate;
mod direct;
mod dual;
mod indirect;
mod object;
mod property;

pub use adapters::{ChildBinding, ConvertBinding, DowncastBinding, IndirectBindingExt};
pub use collection::BindingCollection;
pub use column::{ColumnBinding, ColumnItem};
pub use context::DataContextBinding;
pub use delegate::{ChangeEvent, DelegateBinding};
pub use direct::{DelegateDirectBinding, DirectBinding};
pub use dual::DualBinding;
pub use indirect::{
    BindingChangedEventArgs, BindingChangingEventArgs, BindingEvents, IndirectBinding,
};
pub use object::ObjectBinding;
pub use property::{NotifyPropertyChanged, PropertyBinding, PropertyChangedEventArgs};

/// Anything that can be detached from the values it observes.
pub trait Binding {
    /// Removes every change subscription this binding installed. Idempotent.
    fn unbind(&self);

    /// Forces a value refresh in the given direction.
    fn update(&self, mode: BindingUpdateMode);
}

/// Direction of a forced [`Binding::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingUpdateMode {
    /// Push the destination's value to the source.
    Source,
    /// Push the source's value to the destination.
    #[default]
    Destination,
}

/// Which changes a [`DualBinding`] propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DualBindingMode {
    /// Source changes update the destination.
    OneWay,
    /// Changes on either side update the other.
    #[default]
    TwoWay,
    /// Destination changes update the source.
    OneWayToSource,
    /// Only the initial value is copied to the destination.
    OneTime,
}

impl DualBindingMode {
    /// Whether source changes are propagated to the destination.
    pub fn updates_destination(self) -> bool {
        matches!(self, DualBindingMode::OneWay | DualBindingMode::TwoWay)
    }

    /// Whether destination changes are propagated to the source.
    pub fn updates_source(self) -> bool {
        matches!(
            self,
            DualBindingMode::OneWayToSource | DualBindingMode::TwoWay
        )
    }
}

/// A read/write property binding notified through [`NotifyPropertyChanged`].
///
/// ```ignore
/// let count = binding::property("count", Model::count, Model::set_count);
/// ```
pub fn property<M, T, G, S>(name: &str, get: G, set: S) -> PropertyBinding<M, T>
where
    M: NotifyPropertyChanged + ?Sized + 'static,
    T: Clone + 'static,
    G: Fn(&M) -> T + 'static,
    S: Fn(&M, T) + 'static,
{
    PropertyBinding::new(name, get).with_setter(set).notifying()
}

/// An indirect binding over a getter; see [`DelegateBinding`] for adding a setter and events.
pub fn delegate<S, T, G>(get: G) -> DelegateBinding<S, T>
where
    S: ?Sized + 'static,
    T: Clone + 'static,
    G: Fn(&S) -> Option<T> + 'static,
{
    DelegateBinding::new(get)
}

/// A direct binding over a getter; see [`DelegateDirectBinding`].
pub fn direct<T, G>(get: G) -> DelegateDirectBinding<T>
where
    T: Clone + 'static,
    G: Fn() -> Option<T> + 'static,
{
    DelegateDirectBinding::new(get)
}

/// A binding to a column of a positional item, such as a grid row.
pub fn column<C, T>(column: usize) -> ColumnBinding<C, T>
where
    C: ColumnItem<T> + ?Sized + 'static,
    T: Clone + 'static,
{
    ColumnBinding::new(column)
}
