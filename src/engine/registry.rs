//! Component Registry - Instance identity for bound components.
//!
//! Manages the lifecycle of component indices:
//! - ID ↔ Index bidirectional mapping
//! - Monotonic allocation (an index is never handed out twice)
//! - Allocated-index set for liveness checks
//! - Destroy callbacks, run once when an index is released

use std::cell::RefCell;
use std::collections::HashMap;
use spark_signals::ReactiveSet;
use tracing::debug;

use crate::types::Cleanup;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map component ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to component ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices.
    static ALLOCATED_INDICES: ReactiveSet<usize> = ReactiveSet::new();

    /// Next index to allocate.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Destroy callbacks registered per index, in registration order.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Cleanup>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new component instance.
///
/// # Arguments
/// * `id` - Optional component ID. If not provided, one is generated.
///
/// # Returns
/// The allocated index. An ID that is already allocated returns its
/// existing index.
pub fn allocate_index(id: Option<&str>) -> usize {
    // Generate ID if not provided
    let component_id = match id {
        Some(id) => id.to_string(),
        None => {
            ID_COUNTER.with(|counter| {
                let mut counter = counter.borrow_mut();
                let id = format!("c{}", *counter);
                *counter += 1;
                id
            })
        }
    };

    // Check if already allocated
    let existing = ID_TO_INDEX.with(|map| {
        map.borrow().get(&component_id).copied()
    });
    if let Some(index) = existing {
        return index;
    }

    // Identity is never reused, so released indices are not pooled
    let index = NEXT_INDEX.with(|next| {
        let mut next = next.borrow_mut();
        let index = *next;
        *next += 1;
        index
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(component_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, component_id);
    });
    ALLOCATED_INDICES.with(|set| {
        set.insert(index);
    });

    index
}

/// Release an index permanently.
///
/// Runs the destroy callbacks registered for the index, in registration
/// order, then drops the mappings. Releasing an index that is not
/// allocated does nothing.
pub fn release_index(index: usize) {
    let id = INDEX_TO_ID.with(|map| {
        map.borrow().get(&index).cloned()
    });
    let Some(id) = id else { return };

    debug!(index, id = %id, "releasing component");

    // Run destroy callbacks before cleanup
    run_destroy_callbacks(index);

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    ALLOCATED_INDICES.with(|set| {
        set.remove(&index);
    });

    // Callbacks registered while tearing down would never fire
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks.borrow_mut().remove(&index);
    });
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the component at `index` is released.
///
/// Several callbacks may be registered for one index; each runs once.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Number of destroy callbacks waiting on an index.
pub fn destroy_callback_count(index: usize) -> usize {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks.borrow().get(&index).map_or(0, Vec::len)
    })
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| {
        callbacks.borrow_mut().remove(&index)
    });
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a component ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.contains(&index))
}

/// Get the count of currently allocated components.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
///
/// Pending destroy callbacks are dropped without running.
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_allocate_index() {
        reset_registry();

        let idx1 = allocate_index(None);
        let idx2 = allocate_index(None);
        let idx3 = allocate_index(Some("signal-component"));

        assert_eq!(idx1, 0);
        assert_eq!(idx2, 1);
        assert_eq!(idx3, 2);

        assert!(is_allocated(0));
        assert!(is_allocated(1));
        assert!(is_allocated(2));
        assert!(!is_allocated(3));

        assert_eq!(get_allocated_count(), 3);
    }

    #[test]
    fn test_same_id_returns_existing_index() {
        reset_registry();

        let idx1 = allocate_index(Some("counter"));
        let idx2 = allocate_index(Some("counter"));
        assert_eq!(idx1, idx2);
        assert_eq!(get_allocated_count(), 1);
    }

    #[test]
    fn test_released_index_is_not_reused() {
        reset_registry();

        let idx1 = allocate_index(None);
        let idx2 = allocate_index(None);

        release_index(idx1);
        assert!(!is_allocated(idx1));
        assert!(is_allocated(idx2));

        let idx3 = allocate_index(None);
        assert_ne!(idx3, idx1);
        assert_eq!(idx3, 2);
    }

    #[test]
    fn test_id_mapping() {
        reset_registry();

        let idx = allocate_index(Some("test_component"));
        assert_eq!(get_index("test_component"), Some(idx));
        assert_eq!(get_id(idx), Some("test_component".to_string()));

        release_index(idx);
        assert_eq!(get_index("test_component"), None);
        assert_eq!(get_id(idx), None);
    }

    #[test]
    fn test_destroy_callbacks_run_in_order() {
        reset_registry();

        let order = Rc::new(RefCell::new(Vec::new()));
        let idx = allocate_index(None);

        let first = order.clone();
        on_destroy(idx, move || first.borrow_mut().push("first"));
        let second = order.clone();
        on_destroy(idx, move || second.borrow_mut().push("second"));
        assert_eq!(destroy_callback_count(idx), 2);

        assert!(order.borrow().is_empty());
        release_index(idx);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
        assert_eq!(destroy_callback_count(idx), 0);
    }

    #[test]
    fn test_release_twice_is_noop() {
        reset_registry();

        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let idx = allocate_index(None);
        on_destroy(idx, move || calls_clone.set(calls_clone.get() + 1));

        release_index(idx);
        release_index(idx);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_callback_registered_during_teardown_is_dropped() {
        reset_registry();

        let late = Rc::new(Cell::new(false));
        let late_clone = late.clone();

        let idx = allocate_index(None);
        on_destroy(idx, move || {
            on_destroy(idx, move || late_clone.set(true));
        });

        release_index(idx);
        assert_eq!(destroy_callback_count(idx), 0);
        assert!(!late.get());
    }
}
