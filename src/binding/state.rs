//! Per-instance side tables for a render binding.
//!
//! One record per component index, holding what an object-oriented host
//! would keep in private instance fields. Records never own the component.
//! Every accessor releases its borrow before returning, so callers are free
//! to run user code, stop effects or call the host afterwards.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::Cleanup;

/// State kept for one bound instance.
pub(crate) struct InstanceState<R> {
    /// Stops the instance's current render effect.
    pub(crate) dispose: Option<Cleanup>,
    /// Output of the latest recomputation, not yet delivered to the host.
    pub(crate) result: Option<R>,
    /// Whether the binding's destroy callback is registered.
    pub(crate) teardown_installed: bool,
}

impl<R> InstanceState<R> {
    fn new() -> Self {
        Self {
            dispose: None,
            result: None,
            teardown_installed: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.dispose.is_none() && self.result.is_none() && !self.teardown_installed
    }
}

/// Index → [`InstanceState`] map shared between a binding and its effects.
pub(crate) struct BindingTables<R> {
    instances: RefCell<HashMap<usize, InstanceState<R>>>,
}

impl<R> BindingTables<R> {
    pub(crate) fn new() -> Self {
        Self {
            instances: RefCell::new(HashMap::new()),
        }
    }

    /// Consume the cached result, if any.
    pub(crate) fn take_result(&self, index: usize) -> Option<R> {
        let mut instances = self.instances.borrow_mut();
        let state = instances.get_mut(&index)?;
        let result = state.result.take();
        if state.is_empty() {
            instances.remove(&index);
        }
        result
    }

    /// Cache a freshly computed result, replacing an undelivered one.
    pub(crate) fn store_result(&self, index: usize, result: R) {
        self.instances
            .borrow_mut()
            .entry(index)
            .or_insert_with(InstanceState::new)
            .result = Some(result);
    }

    pub(crate) fn has_result(&self, index: usize) -> bool {
        self.instances
            .borrow()
            .get(&index)
            .is_some_and(|state| state.result.is_some())
    }

    /// Take the live subscription's stop function out of the table.
    pub(crate) fn take_dispose(&self, index: usize) -> Option<Cleanup> {
        self.instances
            .borrow_mut()
            .get_mut(&index)
            .and_then(|state| state.dispose.take())
    }

    /// Record the live subscription. Any previous one must already be taken.
    pub(crate) fn set_dispose(&self, index: usize, dispose: Cleanup) {
        self.instances
            .borrow_mut()
            .entry(index)
            .or_insert_with(InstanceState::new)
            .dispose = Some(dispose);
    }

    pub(crate) fn is_subscribed(&self, index: usize) -> bool {
        self.instances
            .borrow()
            .get(&index)
            .is_some_and(|state| state.dispose.is_some())
    }

    /// Set the teardown flag. Returns `false` if it was already set.
    pub(crate) fn mark_teardown_installed(&self, index: usize) -> bool {
        let mut instances = self.instances.borrow_mut();
        let state = instances.entry(index).or_insert_with(InstanceState::new);
        !std::mem::replace(&mut state.teardown_installed, true)
    }

    /// Drop every record for the index and hand it back.
    pub(crate) fn remove(&self, index: usize) -> Option<InstanceState<R>> {
        self.instances.borrow_mut().remove(&index)
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_result_is_consumed_once() {
        let tables = BindingTables::new();
        tables.store_result(0, "a");
        assert!(tables.has_result(0));

        assert_eq!(tables.take_result(0), Some("a"));
        assert_eq!(tables.take_result(0), None);
        // Nothing else was recorded, so the record is gone
        assert_eq!(tables.len(), 0);
    }

    #[test]
    fn test_newer_result_replaces_undelivered() {
        let tables = BindingTables::new();
        tables.store_result(0, 1);
        tables.store_result(0, 2);
        assert_eq!(tables.take_result(0), Some(2));
    }

    #[test]
    fn test_teardown_flag_set_once() {
        let tables: BindingTables<()> = BindingTables::new();
        assert!(tables.mark_teardown_installed(4));
        assert!(!tables.mark_teardown_installed(4));

        // Flag keeps the record alive after the result is consumed
        tables.store_result(4, ());
        tables.take_result(4);
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn test_remove_returns_dispose() {
        let stopped = Rc::new(Cell::new(false));
        let stopped_clone = stopped.clone();

        let tables: BindingTables<i32> = BindingTables::new();
        tables.set_dispose(2, Box::new(move || stopped_clone.set(true)));
        assert!(tables.is_subscribed(2));

        let state = tables.remove(2).expect("record exists");
        assert_eq!(tables.len(), 0);
        (state.dispose.expect("dispose recorded"))();
        assert!(stopped.get());
    }
}
