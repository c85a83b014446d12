use super::indirect::{BindingEvents, IndirectBinding};
use core::fmt;
use core::marker::PhantomData;
use std::cell::RefCell;

/// Items whose values are addressed by position, such as the rows of a grid.
pub trait ColumnItem<T> {
    fn column_value(&self, column: usize) -> Option<T>;
    fn set_column_value(&self, column: usize, value: Option<T>);
}

impl<T: Clone> ColumnItem<T> for RefCell<Vec<Option<T>>> {
    fn column_value(&self, column: usize) -> Option<T> {
        self.borrow().get(column).cloned().flatten()
    }

    /// Grows the row with nulls if `column` is past its end.
    fn set_column_value(&self, column: usize, value: Option<T>) {
        let mut row = self.borrow_mut();
        if column >= row.len() {
            row.resize(column + 1, None);
        }
        row[column] = value;
    }
}

/// Binds one column of a [`ColumnItem`]. Rows offer no change notification.
pub struct ColumnBinding<C: ?Sized, T> {
    column: usize,
    events: BindingEvents<T>,
    _item: PhantomData<fn(&C)>,
}

impl<C: ColumnItem<T> + ?Sized, T: Clone + 'static> ColumnBinding<C, T> {
    pub fn new(column: usize) -> Self {
        ColumnBinding {
            column,
            events: BindingEvents::new(),
            _item: PhantomData,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl<C: ColumnItem<T> + ?Sized, T: Clone + 'static> IndirectBinding<C, T> for ColumnBinding<C, T> {
    fn get_value(&self, item: &C) -> Option<T> {
        item.column_value(self.column)
    }

    fn internal_set_value(&self, item: &C, value: Option<T>) {
        item.set_column_value(self.column, value);
    }

    fn events(&self) -> &BindingEvents<T> {
        &self.events
    }
}

impl<C: ?Sized, T> fmt::Debug for ColumnBinding<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ColumnBinding").field(&self.column).finish()
    }
}

#[test]
fn test_column_binding() {
    let row = RefCell::new(vec![Some("a".to_string()), None]);
    let second = ColumnBinding::<_, String>::new(1);
    assert_eq!(second.get_value(&row), None);

    let fourth = super::column::<RefCell<Vec<Option<String>>>, String>(3);
    fourth.set_value(&row, Some("d".to_string()));
    assert_eq!(row.borrow().len(), 4);
    assert_eq!(fourth.get_value(&row).as_deref(), Some("d"));
    assert_eq!(ColumnBinding::<_, String>::new(9).get_value(&row), None);
}
