//! Host Seam - Force-update requests to the host component framework.
//!
//! The host owns the render/update lifecycle. The render binding only ever
//! asks it for one thing: re-render a given instance outside its normal call
//! path. A host installs itself per thread with [`set_host`]:
//!
//! ```ignore
//! use spark_render_binding::host::{self, Host};
//!
//! struct Scheduler { queue: RefCell<Vec<usize>> }
//!
//! impl Host for Scheduler {
//!     fn force_update(&self, index: usize) {
//!         self.queue.borrow_mut().push(index);
//!     }
//! }
//!
//! host::set_host(Rc::new(Scheduler { queue: RefCell::new(Vec::new()) }));
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{trace, warn};

/// The host component framework's update scheduler.
pub trait Host {
    /// Re-validate and re-render the instance at `index`.
    ///
    /// Called synchronously from inside the reactive engine's notification
    /// dispatch; hosts are expected to schedule the render rather than
    /// perform it inline.
    fn force_update(&self, index: usize);
}

thread_local! {
    static HOST: RefCell<Option<Rc<dyn Host>>> = RefCell::new(None);
}

/// Install the host for the current thread, replacing any previous one.
pub fn set_host(host: Rc<dyn Host>) {
    HOST.with(|h| *h.borrow_mut() = Some(host));
}

/// Remove the installed host.
pub fn clear_host() {
    HOST.with(|h| *h.borrow_mut() = None);
}

/// Check if a host is installed on this thread.
pub fn has_host() -> bool {
    HOST.with(|h| h.borrow().is_some())
}

/// Ask the host to re-render the instance at `index`.
///
/// Dropped (with a warning) when no host is installed.
pub fn force_update(index: usize) {
    // Clone out so the host may call back into set_host/clear_host
    let host = HOST.with(|h| h.borrow().clone());
    match host {
        Some(host) => {
            trace!(index, "force update requested");
            host.force_update(index);
        }
        None => warn!(index, "force update requested with no host installed"),
    }
}
