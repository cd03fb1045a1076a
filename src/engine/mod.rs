//! Component Engine - Instance identity and teardown.
//!
//! Components are NOT tracked as objects. Each live instance owns an index
//! allocated by the registry, and every piece of per-instance state kept
//! elsewhere (binding tables, host queues) is keyed by that index:
//!
//! ```text
//! Index 0: signal-component  (destroy callbacks: [binding teardown, own teardown])
//! Index 1: c0                (destroy callbacks: [])
//! ```
//!
//! Releasing an index is the permanent teardown of the instance.

mod registry;

pub use registry::*;
