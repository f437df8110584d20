//! Type-erased component values held by a registry.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Anything a registry can construct and hand out.
///
/// Usually implemented through `#[modkit_derive::component]`.
pub trait Component: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Recovers the concrete type behind a shared component.
#[must_use]
pub fn downcast<T: Component>(component: Arc<dyn Component>) -> Option<Arc<T>> {
    component.into_any().downcast::<T>().ok()
}
