use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use super::{CallbackRegistry, MapObservable, OnMapChangedCallback};

/// A hash map that reports every changed key.
pub struct ObservableMap<K, V> {
    entries: RefCell<HashMap<K, V>>,
    callbacks: CallbackRegistry<dyn OnMapChangedCallback>,
}

impl<K, V> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            callbacks: CallbackRegistry::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.borrow().get(key).cloned()
    }

    /// Read the entries with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&HashMap<K, V>) -> R) -> R {
        f(&self.entries.borrow())
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let previous = self.entries.borrow_mut().insert(key.clone(), value);
        self.notify(&key);
        previous
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let removed = self.entries.borrow_mut().remove(key);
        if removed.is_some() {
            self.notify(key);
        }
        removed
    }

    /// Remove every entry, notifying once per removed key.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *self.entries.borrow_mut());
        for key in drained.keys() {
            self.notify(key);
        }
    }

    /// Number of callbacks currently registered.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    fn notify(&self, key: &K) {
        self.callbacks
            .notify(|callback| callback.on_map_changed(self, key));
    }
}

impl<K, V> Default for ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MapObservable for ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    fn add_on_map_changed_callback(&self, callback: Rc<dyn OnMapChangedCallback>) {
        self.callbacks.add(callback);
    }

    fn remove_on_map_changed_callback(&self, callback: &Rc<dyn OnMapChangedCallback>) {
        self.callbacks.remove(callback);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ObservableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableMap")
            .field("entries", &self.entries.borrow())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Default)]
    struct KeyLog(RefCell<Vec<String>>);

    impl OnMapChangedCallback for KeyLog {
        fn on_map_changed(&self, _sender: &dyn MapObservable, key: &dyn Any) {
            if let Some(key) = key.downcast_ref::<String>() {
                self.0.borrow_mut().push(key.clone());
            }
        }
    }

    #[test]
    fn insert_and_remove_report_keys() {
        let map: ObservableMap<String, i32> = ObservableMap::new();
        let log = Rc::new(KeyLog::default());
        map.add_on_map_changed_callback(log.clone());

        map.insert("a".to_string(), 1);
        map.insert("a".to_string(), 2);
        map.remove(&"missing".to_string());
        map.remove(&"a".to_string());

        assert_eq!(*log.0.borrow(), vec!["a", "a", "a"]);
        assert!(map.is_empty());
    }

    #[test]
    fn clear_reports_every_key() {
        let map: ObservableMap<String, i32> = ObservableMap::new();
        map.insert("x".to_string(), 1);
        map.insert("y".to_string(), 2);

        let log = Rc::new(KeyLog::default());
        map.add_on_map_changed_callback(log.clone());
        map.clear();

        let mut keys = log.0.borrow().clone();
        keys.sort();
        assert_eq!(keys, vec!["x", "y"]);
    }
}
