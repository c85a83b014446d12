//! Data contexts: the model object a widget subtree is bound against.

use crate::events::Event;
use core::any::Any;
use core::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A widget's position in the data context hierarchy.
///
/// A node's effective data context is its own, or else its parent's. Changing a context notifies
/// the node and every descendant that inherits from it.
pub struct DataContextNode {
    me: Weak<DataContextNode>,
    local: RefCell<Option<Rc<dyn Any>>>,
    parent: RefCell<Weak<DataContextNode>>,
    children: RefCell<Vec<Weak<DataContextNode>>>,
    changed: Event<()>,
}

impl DataContextNode {
    pub fn new() -> Rc<DataContextNode> {
        Rc::new_cyclic(|me| DataContextNode {
            me: me.clone(),
            local: RefCell::new(None),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            changed: Event::new(),
        })
    }

    /// The effective data context.
    pub fn get(&self) -> Option<Rc<dyn Any>> {
        if let Some(local) = self.local.borrow().as_ref() {
            return Some(Rc::clone(local));
        }
        self.parent.borrow().upgrade().and_then(|parent| parent.get())
    }

    /// Returns true if this node has its own context instead of inheriting one.
    pub fn has_local(&self) -> bool {
        self.local.borrow().is_some()
    }

    /// Sets (or clears, inheriting again) this node's own context.
    pub fn set(&self, value: Option<Rc<dyn Any>>) {
        *self.local.borrow_mut() = value;
        self.notify();
    }

    /// Raised when the effective data context may have changed.
    pub fn changed(&self) -> &Event<()> {
        &self.changed
    }

    pub fn parent(&self) -> Option<Rc<DataContextNode>> {
        self.parent.borrow().upgrade()
    }

    /// Moves this node under a new parent (or detaches it).
    pub fn set_parent(&self, parent: Option<&Rc<DataContextNode>>) {
        if let Some(old) = self.parent() {
            old.children
                .borrow_mut()
                .retain(|child| child.strong_count() > 0 && !child.ptr_eq(&self.me));
        }

        *self.parent.borrow_mut() = match parent {
            Some(parent) => {
                parent.children.borrow_mut().push(self.me.clone());
                Rc::downgrade(parent)
            }
            None => Weak::new(),
        };

        if !self.has_local() {
            self.notify();
        }
    }

    fn notify(&self) {
        self.changed.raise(&());
        let children: Vec<_> = self
            .children
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for child in children {
            if !child.has_local() {
                child.notify();
            }
        }
    }
}

impl fmt::Debug for DataContextNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DataContextNode")
            .field("has_local", &self.has_local())
            .field("has_parent", &self.parent().is_some())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter(node: &DataContextNode) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        node.changed().subscribe(move |_| c.set(c.get() + 1));
        count
    }

    fn value_of(node: &DataContextNode) -> Option<i32> {
        node.get().and_then(|v| v.downcast_ref::<i32>().copied())
    }

    #[test]
    fn test_inheritance() {
        let root = DataContextNode::new();
        let child = DataContextNode::new();
        let child_changes = counter(&child);

        child.set_parent(Some(&root));
        assert_eq!(child_changes.get(), 1);
        assert_eq!(value_of(&child), None);

        root.set(Some(Rc::new(1)));
        assert_eq!(value_of(&child), Some(1));
        assert_eq!(child_changes.get(), 2);

        child.set(Some(Rc::new(2)));
        assert_eq!(child_changes.get(), 3);
        root.set(Some(Rc::new(3)));
        assert_eq!(value_of(&child), Some(2), "local context shadows the parent's");
        assert_eq!(child_changes.get(), 3, "shadowed children are not notified");

        child.set(None);
        assert_eq!(value_of(&child), Some(3));
    }

    #[test]
    fn test_reparent() {
        let a = DataContextNode::new();
        let b = DataContextNode::new();
        a.set(Some(Rc::new(10)));
        b.set(Some(Rc::new(20)));

        let child = DataContextNode::new();
        child.set_parent(Some(&a));
        assert_eq!(value_of(&child), Some(10));
        child.set_parent(Some(&b));
        assert_eq!(value_of(&child), Some(20));

        let changes = counter(&child);
        a.set(Some(Rc::new(11)));
        assert_eq!(changes.get(), 0, "old parent no longer notifies");

        child.set_parent(None);
        assert_eq!(value_of(&child), None);
    }
}
