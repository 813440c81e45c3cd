//! Opaque transition payload.

use std::any::Any;
use std::fmt;

/// Caller-defined value handed from a transition request to the entered
/// state's `on_enter` hook.
///
/// The machine never inspects it. Receivers recover the concrete value with
/// [`downcast_ref`](Payload::downcast_ref) or [`downcast`](Payload::downcast).
///
/// # Example
///
/// ```rust
/// use tickstate::core::Payload;
///
/// let payload = Payload::new(42u32);
/// assert!(payload.is::<u32>());
/// assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
/// assert!(payload.downcast::<String>().is_err());
/// ```
pub struct Payload(Box<dyn Any>);

impl Payload {
    /// Wrap any `'static` value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Check whether the payload holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Borrow the payload as a `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Take the payload as a `T`, handing it back unchanged on a type mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Payload> {
        self.0.downcast::<T>().map(|value| *value).map_err(Payload)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}
