use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use veneer_core::binding::{
    self, Binding, BindingCollection, BindingUpdateMode, DirectBinding, DualBinding,
    DualBindingMode, NotifyPropertyChanged, ObjectBinding, PropertyChangedEventArgs,
};
use veneer_core::events::Event;

#[derive(Default)]
struct Probe {
    unbound: Cell<usize>,
    panics: bool,
}

impl Binding for Probe {
    fn unbind(&self) {
        self.unbound.set(self.unbound.get() + 1);
        if self.panics {
            panic!("unbind failed");
        }
    }

    fn update(&self, _: BindingUpdateMode) {}
}

#[test]
fn panicking_binding_does_not_stop_the_cascade() {
    let bindings = BindingCollection::new();
    let probes = [
        Rc::new(Probe::default()),
        Rc::new(Probe {
            panics: true,
            ..Probe::default()
        }),
        Rc::new(Probe::default()),
    ];
    for probe in &probes {
        bindings.add(probe.clone());
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| bindings.unbind()));
    assert!(result.is_err(), "the failure is reported");
    for probe in &probes {
        assert_eq!(probe.unbound.get(), 1);
    }
}

#[test]
fn first_panic_is_resumed() {
    let bindings = BindingCollection::new();
    bindings.add(Rc::new(Probe {
        panics: true,
        ..Probe::default()
    }));
    let second = Rc::new(Probe::default());
    bindings.add(second.clone());

    let payload = panic::catch_unwind(AssertUnwindSafe(|| bindings.unbind())).unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"unbind failed"));
    assert_eq!(second.unbound.get(), 1);
}

#[derive(Default)]
struct Model {
    name: RefCell<String>,
    property_changed: Event<PropertyChangedEventArgs>,
}

impl Model {
    fn name(&self) -> String {
        self.name.borrow().clone()
    }

    fn set_name(&self, name: String) {
        *self.name.borrow_mut() = name;
        self.notify_property_changed("name");
    }
}

impl NotifyPropertyChanged for Model {
    fn property_changed(&self) -> &Event<PropertyChangedEventArgs> {
        &self.property_changed
    }
}

#[test]
fn unbind_removes_every_model_subscription() {
    let model = Rc::new(Model::default());
    let bindings = BindingCollection::new();
    let shown = Rc::new(RefCell::new(None));

    for _ in 0..3 {
        let source: Rc<dyn DirectBinding<String>> = ObjectBinding::new(
            &model,
            binding::property("name", Model::name, Model::set_name),
        );
        let destination: Rc<dyn DirectBinding<String>> = {
            let (get, set) = (Rc::clone(&shown), Rc::clone(&shown));
            Rc::new(
                binding::direct(move || get.borrow().clone())
                    .with_setter(move |v| *set.borrow_mut() = v),
            )
        };
        bindings.add(DualBinding::new(source, destination, DualBindingMode::OneWay));
    }
    assert_eq!(model.property_changed().len(), 3);

    model.set_name("bound".to_string());
    assert_eq!(shown.borrow().as_deref(), Some("bound"));

    bindings.unbind();
    assert!(model.property_changed().is_empty());
    model.set_name("unbound".to_string());
    assert_eq!(shown.borrow().as_deref(), Some("bound"));
}
