//! Fluent assertions over callable members.
//!
//! - [`matcher`] - the [`Matcher`](matcher::Matcher) trait, `should` / `should_not`
//!   and the [`assert_that!`](crate::assert_that) / [`assert_not!`](crate::assert_not) macros
//! - [`callable`] - visibility, modifier and parameter-shape matchers
//!
//! # Example
//!
//! ```rust
//! use testkit_reflect::assertions::callable::{be_final, should_be_abstract};
//! use testkit_reflect::assertions::matcher::should_not;
//! use testkit_reflect::reflect::{CallableDescriptor, TypeRef};
//!
//! let draw = CallableDescriptor::builder("draw")
//!     .receiver(TypeRef::named("gfx::Shape"))
//!     .is_final(false)
//!     .is_open(true)
//!     .is_abstract(true)
//!     .build();
//!
//! should_be_abstract(&draw);
//! should_not(&draw, be_final());
//! ```

pub mod callable;
pub mod matcher;
