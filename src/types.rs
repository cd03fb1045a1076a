//! Core types shared by the registry, the host seam and the render binding.

use std::fmt;
use std::rc::Rc;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function: stops an effect or tears something down.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Component
// =============================================================================

/// A host component instance that can carry a bound render method.
///
/// The index is the instance's identity in the registry
/// (see [`crate::engine::allocate_index`]). It must stay the same for the
/// whole life of the instance.
pub trait Component: 'static {
    /// Registry index of this instance.
    fn index(&self) -> usize;
}

// =============================================================================
// Render Function & Property Descriptor
// =============================================================================

/// A render method: reads the instance (and any signals it holds) plus the
/// call arguments, produces output for the host.
///
/// Using Rc<dyn Fn> so the same function can be shared between the binding
/// and every effect it creates.
pub type RenderFn<C, A, R> = Rc<dyn Fn(&C, &A) -> R>;

/// A component member the render binding may be applied to.
pub enum Property<C, A, R> {
    /// Callable member.
    Method(RenderFn<C, A, R>),
    /// Non-callable member (a field or constant).
    Value,
}

impl<C, A, R> Property<C, A, R> {
    /// Wrap a function as a method property.
    pub fn method(f: impl Fn(&C, &A) -> R + 'static) -> Self {
        Property::Method(Rc::new(f))
    }
}

impl<C, A, R> fmt::Debug for Property<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Method(_) => f.write_str("Property::Method(..)"),
            Property::Value => f.write_str("Property::Value"),
        }
    }
}
