//! Callable metadata.
//!
//! Rust has no runtime reflection, so the metadata the matchers inspect is
//! captured ahead of time:
//!
//! - [`CallableDescriptor`] - built by hand with [`CallableDescriptor::builder`]
//! - [`Reflect`] - implemented by `#[reflect]` on inherent impl blocks and
//!   trait definitions
//!
//! # Example
//!
//! ```rust
//! use testkit_reflect::reflect::{Callable, Reflect};
//!
//! struct Counter(u32);
//!
//! #[testkit_reflect::reflect]
//! impl Counter {
//!     pub fn add(&mut self, by: u32) {
//!         self.0 += by;
//!     }
//! }
//!
//! let add = Counter::callable("add").unwrap();
//! assert_eq!(add.value_parameters()[0].name(), Some("by"));
//! ```

mod descriptor;
mod types;
mod visibility;

pub use descriptor::{
    Callable, CallableDescriptor, CallableDescriptorBuilder, Parameter, ParameterKind,
};
pub use types::TypeRef;
pub use visibility::Visibility;

use crate::error::{Error, Result};

/// A type or trait whose callable members are described ahead of time.
pub trait Reflect {
    /// Descriptors of every reflected member, in declaration order.
    fn callables() -> Vec<CallableDescriptor>;

    /// Descriptor of the first member named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCallable`] when no member has that name.
    fn callable(name: &str) -> Result<CallableDescriptor> {
        let mut callables = Self::callables();
        let position = callables.iter().position(|c| c.name() == name);
        match position {
            Some(i) => Ok(callables.swap_remove(i)),
            None => {
                let owner = callables
                    .first()
                    .and_then(CallableDescriptor::owner)
                    .map_or_else(|| std::any::type_name::<Self>().to_string(), str::to_string);
                Err(Error::unknown_callable(owner, name))
            }
        }
    }
}
