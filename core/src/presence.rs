// core/src/presence.rs

//! "Is this field really there?" checks for loosely filled request bodies.
//!
//! Clients send `""` for untouched text inputs and `0` for unset numbers, so
//! a field counts as present only when it carries a meaningful value.

pub trait Presence {
  fn is_present(&self) -> bool;
}

impl Presence for String {
  fn is_present(&self) -> bool {
    !self.trim().is_empty()
  }
}

impl Presence for &str {
  fn is_present(&self) -> bool {
    !self.trim().is_empty()
  }
}

impl Presence for i32 {
  fn is_present(&self) -> bool {
    *self != 0
  }
}

impl Presence for i64 {
  fn is_present(&self) -> bool {
    *self != 0
  }
}

impl<T: Presence> Presence for Option<T> {
  fn is_present(&self) -> bool {
    self.as_ref().is_some_and(Presence::is_present)
  }
}

/// Keeps `value` only if it is present.
pub fn present<T: Presence>(value: Option<T>) -> Option<T> {
  value.filter(Presence::is_present)
}
