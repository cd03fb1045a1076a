//! Render Binding - Re-run a component's render method when its signals change.
//!
//! A [`RenderBinding`] wraps a component's render function. Each call decides
//! who is asking:
//!
//! ```text
//! host calls render(instance, args)
//!   ├─ cached result waiting? ── yes ─→ take it, return          (effect already re-ran)
//!   └─ no ─→ stop old effect, start effect(render_fn(args))      (host-initiated render)
//!            ├─ first run: cache result
//!            └─ later runs: cache result, then force_update(index)
//!          → install teardown once → take cached result, return
//! ```
//!
//! The branch is keyed only on "is a fresh result waiting", so it stays
//! purely data-driven: a render call arriving right after a recomputation is
//! answered from the cache without running user code again.
//!
//! # Pattern: Teardown by Composition
//!
//! Instead of swapping the instance's own teardown, the binding registers one
//! destroy callback per instance through [`crate::engine::on_destroy`].
//! Releasing the index stops the effect and drops the instance's records;
//! the instance's other destroy callbacks still run in registration order.
//!
//! # Example
//!
//! ```ignore
//! use spark_render_binding::{bind_render, Component, Property};
//! use spark_signals::{signal, Signal};
//!
//! struct Counter { index: usize, count: Signal<i32> }
//!
//! impl Component for Counter {
//!     fn index(&self) -> usize { self.index }
//! }
//!
//! let binding = bind_render("render", Property::method(|c: &Counter, _: &()| {
//!     format!("Counter: {}", c.count.get())
//! }))?;
//!
//! let counter = Rc::new(Counter { index: allocate_index(None), count: signal(0) });
//! assert_eq!(binding.render(&counter, ()), "Counter: 0");
//! ```

mod state;

use std::rc::Rc;

use spark_signals::effect;
use tracing::{debug, trace, warn};

use crate::engine;
use crate::error::{BindingError, ContractViolationReason};
use crate::host;
use crate::types::{Component, Property, RenderFn};

use state::BindingTables;

/// The only member name a render binding accepts.
pub const RENDER_METHOD: &str = "render";

/// Apply the render binding to a component member.
///
/// Fails with [`BindingError::ContractViolation`] unless `name` is exactly
/// `"render"` and `property` is a method. The check runs once, before any
/// instance exists; the wrapped function is never called on failure.
pub fn bind_render<C, A, R>(
    name: &str,
    property: Property<C, A, R>,
) -> Result<RenderBinding<C, A, R>, BindingError>
where
    C: Component,
    A: Clone + 'static,
    R: 'static,
{
    let violation = |reason: ContractViolationReason| {
        debug!(property = name, %reason, "render binding rejected");
        BindingError::ContractViolation {
            property: name.to_string(),
            reason,
        }
    };

    if name != RENDER_METHOD {
        return Err(violation(ContractViolationReason::NotRender));
    }
    match property {
        Property::Method(render_fn) => Ok(RenderBinding::from_fn(render_fn)),
        Property::Value => Err(violation(ContractViolationReason::NotCallable)),
    }
}

/// A render method bound to the reactive engine.
///
/// Holds the original render function and the per-instance side tables.
/// One binding serves every instance of a component type.
pub struct RenderBinding<C, A, R> {
    render_fn: RenderFn<C, A, R>,
    tables: Rc<BindingTables<R>>,
}

impl<C, A, R> RenderBinding<C, A, R>
where
    C: Component,
    A: Clone + 'static,
    R: 'static,
{
    /// Bind a function already known to be the render method.
    pub fn new(render_fn: impl Fn(&C, &A) -> R + 'static) -> Self {
        Self::from_fn(Rc::new(render_fn))
    }

    fn from_fn(render_fn: RenderFn<C, A, R>) -> Self {
        Self {
            render_fn,
            tables: Rc::new(BindingTables::new()),
        }
    }

    /// The bound render method. Called by the host for `component`.
    ///
    /// Returns the result of the latest recomputation if one is waiting.
    /// Otherwise starts a new render effect for the instance (stopping the
    /// previous one) and returns the effect's first result. `args` are kept
    /// by the effect and passed again on every recomputation.
    pub fn render(&self, component: &Rc<C>, args: A) -> R {
        let index = component.index();

        // Recomputation path: the effect re-ran and asked the host to render
        if let Some(result) = self.tables.take_result(index) {
            trace!(index, "delivering recomputed render result");
            return result;
        }

        self.subscribe(component, args.clone());
        self.install_teardown(index);

        self.take_first_result(component, &args)
    }

    /// Take the result left by a new effect's first run.
    ///
    /// The first run is assumed to happen inside `effect()`. If the engine
    /// ever defers it, the render function is called directly here, and the
    /// deferred run will still skip its update request.
    fn take_first_result(&self, component: &Rc<C>, args: &A) -> R {
        let index = component.index();
        match self.tables.take_result(index) {
            Some(result) => result,
            None => {
                warn!(index, "render effect produced no result, rendering directly");
                (self.render_fn)(component, args)
            }
        }
    }

    /// Start a render effect for the instance, stopping any live one first.
    fn subscribe(&self, component: &Rc<C>, args: A) {
        let index = component.index();

        if let Some(stop) = self.tables.take_dispose(index) {
            debug!(index, "replacing render subscription");
            stop();
        }

        let component = Rc::downgrade(component);
        let tables = Rc::downgrade(&self.tables);
        let render_fn = self.render_fn.clone();
        let mut first_run = true;

        let stop = effect(move || {
            let (Some(component), Some(tables)) = (component.upgrade(), tables.upgrade()) else {
                return;
            };

            let result = render_fn(&component, &args);
            tables.store_result(index, result);

            // The first run happens inside the host's own render call,
            // which returns this result itself.
            if first_run {
                first_run = false;
                return;
            }

            // Result is cached before the host is asked to render
            host::force_update(index);
        });

        self.tables.set_dispose(index, Box::new(stop));
        debug!(index, "render subscription established");
    }

    /// Register the teardown destroy callback once per instance.
    fn install_teardown(&self, index: usize) {
        if !self.tables.mark_teardown_installed(index) {
            return;
        }

        if engine::get_id(index).is_none() {
            warn!(index, "component index is not allocated, teardown will never run");
        }

        let tables = Rc::downgrade(&self.tables);
        engine::on_destroy(index, move || {
            if let Some(tables) = tables.upgrade() {
                teardown(&tables, index);
            }
        });
    }

    /// Whether the instance has a live render effect.
    pub fn is_subscribed(&self, index: usize) -> bool {
        self.tables.is_subscribed(index)
    }

    /// Whether a recomputed result is waiting for the host.
    pub fn has_pending_result(&self, index: usize) -> bool {
        self.tables.has_result(index)
    }

    /// Number of instances with any state in this binding.
    pub fn tracked_instances(&self) -> usize {
        self.tables.len()
    }
}

/// Stop the instance's effect and forget everything about it.
fn teardown<R>(tables: &BindingTables<R>, index: usize) {
    let Some(state) = tables.remove(index) else { return };

    if let Some(stop) = state.dispose {
        stop();
    }

    debug!(index, "render binding torn down");
}
