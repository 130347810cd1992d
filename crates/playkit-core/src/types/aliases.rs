//! Type aliases for commonly used shared-ownership types.
//!
//! The designer is single-threaded: a view mounts a session and hands shared
//! handles to the canvas surface and the autosave driver.
//!
//! ## Usage
//!
//! ```rust
//! use playkit_core::types::{shared, Shared};
//!
//! let counter: Shared<u32> = shared(0);
//! *counter.borrow_mut() += 1;
//! assert_eq!(*counter.borrow(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// Create a new `Shared<T>` from a value.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
