use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{CallbackRegistry, ListObservable, OnListChangedCallback};

/// A vector that reports each mutation as a range notification.
///
/// Index arguments follow `Vec` semantics: out-of-bounds positions panic
/// before any callback is notified.
///
/// # Examples
///
/// ```
/// use bindery::observable::ObservableVec;
///
/// let todos = ObservableVec::new();
/// todos.push("write tests");
/// todos.push("ship");
/// todos.move_item(1, 0);
/// assert_eq!(todos.to_vec(), vec!["ship", "write tests"]);
/// ```
pub struct ObservableVec<T> {
    items: RefCell<Vec<T>>,
    callbacks: CallbackRegistry<dyn OnListChangedCallback>,
}

impl<T: 'static> ObservableVec<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            callbacks: CallbackRegistry::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.borrow().clone()
    }

    /// Read the items with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    pub fn push(&self, item: T) {
        let position = {
            let mut items = self.items.borrow_mut();
            items.push(item);
            items.len() - 1
        };
        self.notify(|cb, sender| cb.on_item_range_inserted(sender, position, 1));
    }

    pub fn insert(&self, index: usize, item: T) {
        self.items.borrow_mut().insert(index, item);
        self.notify(|cb, sender| cb.on_item_range_inserted(sender, index, 1));
    }

    pub fn extend(&self, iter: impl IntoIterator<Item = T>) {
        let (start, count) = {
            let mut items = self.items.borrow_mut();
            let start = items.len();
            items.extend(iter);
            (start, items.len() - start)
        };
        if count > 0 {
            self.notify(|cb, sender| cb.on_item_range_inserted(sender, start, count));
        }
    }

    pub fn remove(&self, index: usize) -> T {
        let removed = self.items.borrow_mut().remove(index);
        self.notify(|cb, sender| cb.on_item_range_removed(sender, index, 1));
        removed
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn set(&self, index: usize, item: T) -> T {
        let previous = std::mem::replace(&mut self.items.borrow_mut()[index], item);
        self.notify(|cb, sender| cb.on_item_range_changed(sender, index, 1));
        previous
    }

    /// Move the item at `from` so that it ends up at `to`.
    pub fn move_item(&self, from: usize, to: usize) {
        {
            let mut items = self.items.borrow_mut();
            let item = items.remove(from);
            items.insert(to, item);
        }
        self.notify(|cb, sender| cb.on_item_range_moved(sender, from, to, 1));
    }

    pub fn truncate(&self, len: usize) {
        let removed = {
            let mut items = self.items.borrow_mut();
            let removed = items.len().saturating_sub(len);
            items.truncate(len);
            removed
        };
        if removed > 0 {
            self.notify(|cb, sender| cb.on_item_range_removed(sender, len, removed));
        }
    }

    pub fn clear(&self) {
        self.truncate(0);
    }

    /// Swap in entirely new contents. Reported as a generic change.
    pub fn replace_all(&self, items: Vec<T>) -> Vec<T> {
        let previous = std::mem::replace(&mut *self.items.borrow_mut(), items);
        self.notify(|cb, sender| cb.on_changed(sender));
        previous
    }

    /// Number of callbacks currently registered.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    fn notify(&self, deliver: impl Fn(&dyn OnListChangedCallback, &dyn ListObservable)) {
        self.callbacks.notify(|callback| deliver(callback, self));
    }
}

impl<T: 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ListObservable for ObservableVec<T> {
    fn add_on_list_changed_callback(&self, callback: Rc<dyn OnListChangedCallback>) {
        self.callbacks.add(callback);
    }

    fn remove_on_list_changed_callback(&self, callback: &Rc<dyn OnListChangedCallback>) {
        self.callbacks.remove(callback);
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVec")
            .field("items", &self.items.borrow())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Changed,
        RangeChanged(usize, usize),
        Inserted(usize, usize),
        Moved(usize, usize, usize),
        Removed(usize, usize),
    }

    #[derive(Default)]
    struct Log(RefCell<Vec<Event>>);

    impl OnListChangedCallback for Log {
        fn on_changed(&self, _sender: &dyn ListObservable) {
            self.0.borrow_mut().push(Event::Changed);
        }

        fn on_item_range_changed(&self, _sender: &dyn ListObservable, start: usize, count: usize) {
            self.0.borrow_mut().push(Event::RangeChanged(start, count));
        }

        fn on_item_range_inserted(&self, _sender: &dyn ListObservable, start: usize, count: usize) {
            self.0.borrow_mut().push(Event::Inserted(start, count));
        }

        fn on_item_range_moved(
            &self,
            _sender: &dyn ListObservable,
            from: usize,
            to: usize,
            count: usize,
        ) {
            self.0.borrow_mut().push(Event::Moved(from, to, count));
        }

        fn on_item_range_removed(&self, _sender: &dyn ListObservable, start: usize, count: usize) {
            self.0.borrow_mut().push(Event::Removed(start, count));
        }
    }

    fn observed<T: 'static>(list: &ObservableVec<T>) -> Rc<Log> {
        let log = Rc::new(Log::default());
        list.add_on_list_changed_callback(log.clone());
        log
    }

    #[test]
    fn each_mutation_raises_its_range() {
        let list = ObservableVec::from_vec(vec!['a', 'b']);
        let log = observed(&list);

        list.push('c');
        list.insert(0, 'z');
        list.set(1, 'A');
        list.move_item(0, 3);
        list.remove(0);
        list.extend(['x', 'y']);
        list.truncate(2);
        list.replace_all(vec!['q']);

        assert_eq!(
            *log.0.borrow(),
            vec![
                Event::Inserted(2, 1),
                Event::Inserted(0, 1),
                Event::RangeChanged(1, 1),
                Event::Moved(0, 3, 1),
                Event::Removed(0, 1),
                Event::Inserted(3, 2),
                Event::Removed(2, 3),
                Event::Changed,
            ]
        );
        assert_eq!(list.to_vec(), vec!['q']);
    }

    #[test]
    fn empty_mutations_are_silent() {
        let list: ObservableVec<u32> = ObservableVec::new();
        let log = observed(&list);

        list.clear();
        list.extend(Vec::new());
        list.truncate(10);

        assert!(log.0.borrow().is_empty());
    }

    #[test]
    fn move_item_reorders() {
        let list = ObservableVec::from_vec(vec![1, 2, 3, 4]);
        list.move_item(3, 1);
        assert_eq!(list.to_vec(), vec![1, 4, 2, 3]);
    }
}
