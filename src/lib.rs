//! # spark-render-binding
//!
//! Signal-driven render methods for host component frameworks.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A host framework owns the component lifecycle and decides when to call a
//! component's render method. This crate wraps that method in a
//! [`RenderBinding`]: every signal the render logic reads becomes a dependency
//! of an effect, and when one changes the effect recomputes the output, caches
//! it, and asks the host to re-render. The host's next call picks the cached
//! output up without running user code again, so the host scheduler and the
//! reactive engine never race or double-render.
//!
//! ```text
//! host render ─→ RenderBinding ─→ effect(render_fn) ─→ cached result
//!                       ↑                                  │
//!                       └──── host::force_update(index) ←──┘  (signal changed)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Cleanup, Component, RenderFn, Property)
//! - [`engine`] - Component registry: instance identity and destroy callbacks
//! - [`host`] - Force-update seam to the host framework
//! - [`binding`] - The render binding itself
//! - [`error`] - Binding contract errors

pub mod binding;
pub mod engine;
pub mod error;
pub mod host;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use binding::{bind_render, RenderBinding, RENDER_METHOD};

pub use engine::{
    allocate_index, destroy_callback_count, get_allocated_count, get_id, get_index, is_allocated,
    on_destroy, release_index, reset_registry,
};

pub use error::{BindingError, ContractViolationReason};

pub use host::{clear_host, force_update, has_host, set_host, Host};
