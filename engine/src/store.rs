//! FILENAME: engine/src/store.rs
//! PURPOSE: Owns the session state (dataset, codebook, active filters) and
//! notifies subscribers when any of it changes.
//! CONTEXT: Every codebook or filter mutation re-derives the filtered row
//! set and runs the injected listener callbacks, so dependent views can
//! recompute. Listeners and the persistence hook are injected explicitly;
//! there is no ambient shared state.

use std::collections::HashMap;
use crate::codebook::Codebook;
use crate::dataset::{Dataset, Row};
use crate::filter::FilterSet;

/// Callback run after every state change, with the current filtered rows.
pub type Listener = Box<dyn Fn(&[Row])>;

/// Callback run after every codebook mutation, for immediate durability.
pub type PersistHook = Box<dyn Fn(&Codebook)>;

pub struct DataStore {
    dataset: Dataset,
    codebook: Codebook,
    filters: FilterSet,
    filtered: Vec<Row>,
    listeners: Vec<Listener>,
    persist_hook: Option<PersistHook>,
}

impl DataStore {
    pub fn new(dataset: Dataset, codebook: Codebook) -> Self {
        let filtered = dataset.rows().to_vec();
        DataStore {
            dataset,
            codebook,
            filters: FilterSet::new(),
            filtered,
            listeners: Vec::new(),
            persist_hook: None,
        }
    }

    /// Registers a change listener. It is not called for past changes.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Installs the durability hook for codebook mutations.
    pub fn set_persist_hook(&mut self, hook: PersistHook) {
        self.persist_hook = Some(hook);
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// The rows currently passing the active filters.
    pub fn filtered_rows(&self) -> &[Row] {
        &self.filtered
    }

    /// Replaces the dataset (new file loaded), resetting filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.filters = FilterSet::new();
        self.refresh();
    }

    /// Replaces the active filter selections and re-filters.
    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.refresh();
    }

    /// Replaces the mapping for one column; persists, then notifies.
    pub fn set_mapping(&mut self, column: &str, mapping: HashMap<String, String>) {
        self.codebook.set_mapping(column, mapping);
        self.persist();
        self.notify();
    }

    /// Sets a column's question text; persists, then notifies.
    pub fn set_question(&mut self, column: &str, text: &str) {
        self.codebook.set_question(column, text);
        self.persist();
        self.notify();
    }

    fn refresh(&mut self) {
        self.filtered = self.filters.apply(self.dataset.rows());
        self.notify();
    }

    fn persist(&self) {
        if let Some(hook) = &self.persist_hook {
            hook(&self.codebook);
        }
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.filtered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use crate::value::RawValue;

    fn create_test_store() -> DataStore {
        let headers = vec!["q1".to_string()];
        let rows = vec![
            HashMap::from([("q1".to_string(), RawValue::from("a"))]),
            HashMap::from([("q1".to_string(), RawValue::from("b"))]),
        ];
        DataStore::new(Dataset::from_rows(headers, rows), Codebook::new())
    }

    #[test]
    fn test_listener_sees_filtered_rows() {
        let mut store = create_test_store();
        let seen = Rc::new(RefCell::new(0usize));
        let seen_clone = Rc::clone(&seen);
        store.subscribe(Box::new(move |rows| {
            *seen_clone.borrow_mut() = rows.len();
        }));

        let mut filters = FilterSet::new();
        filters.set("q1", vec!["a".to_string()]);
        store.set_filters(filters);

        assert_eq!(*seen.borrow(), 1);
        assert_eq!(store.filtered_rows().len(), 1);
    }

    #[test]
    fn test_codebook_mutation_runs_persist_hook() {
        let mut store = create_test_store();
        let saved = Rc::new(RefCell::new(None));
        let saved_clone = Rc::clone(&saved);
        store.set_persist_hook(Box::new(move |cb| {
            *saved_clone.borrow_mut() = Some(cb.clone());
        }));

        store.set_question("q1", "First question");

        let persisted = saved.borrow().clone().expect("hook should run");
        assert_eq!(persisted.question("q1"), Some("First question"));
    }

    #[test]
    fn test_new_dataset_resets_filters() {
        let mut store = create_test_store();
        let mut filters = FilterSet::new();
        filters.set("q1", vec!["a".to_string()]);
        store.set_filters(filters);
        assert_eq!(store.filtered_rows().len(), 1);

        store.set_dataset(Dataset::from_rows(vec!["q1".to_string()], vec![]));
        assert_eq!(store.filters().active_count(), 0);
    }
}
