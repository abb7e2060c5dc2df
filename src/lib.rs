//! # testkit-reflect
//!
//! > Fluent assertions over callable members
//!
//! **testkit-reflect** checks the shape of functions and methods in tests:
//! visibility, `final` / `open` / `abstract` / `async` modifiers, and parameter
//! types or names.
//!
//! ## Quick Start
//!
//! ```rust
//! use testkit_reflect::prelude::*;
//!
//! pub struct Account {
//!     balance: i64,
//! }
//!
//! #[testkit_reflect::reflect]
//! impl Account {
//!     pub fn deposit(&mut self, amount: i64, memo: Option<String>) {
//!         let _ = memo;
//!         self.balance += amount;
//!     }
//!
//!     pub(crate) async fn sync(&self) {}
//! }
//!
//! let deposit = Account::callable("deposit").unwrap();
//! should_have_visibility(&deposit, Visibility::Public);
//! should_be_final(&deposit);
//! should_have_parameters_with_name(&deposit, ["amount", "memo"]);
//! should_accept_parameters(&deposit, [TypeRef::of::<i64>(), TypeRef::of::<String>()]);
//!
//! let sync = Account::callable("sync").unwrap();
//! should_be_suspendable(&sync);
//! should_have_visibility(&sync, Visibility::Internal);
//! ```
//!
//! ## Features
//!
//! - **Callable Matchers** - visibility, modifiers, parameter types and names
//! - **Paired Messages** - every verdict carries positive and negated messages
//! - **Ahead-of-time Descriptors** - `#[reflect]` on impl blocks and traits
//! - **Builders** - describe any callable by hand

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod error;
pub mod reflect;

/// Prelude for convenient imports
///
/// ```rust
/// use testkit_reflect::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assertions::callable::*;
    pub use crate::assertions::matcher::{
        check, check_not, not, should, should_not, MatchResult, Matcher,
    };
    pub use crate::error::{Error, Result};
    pub use crate::reflect::{
        Callable, CallableDescriptor, Parameter, ParameterKind, Reflect, TypeRef, Visibility,
    };
}

// Re-exports
pub use error::{Error, Result};

// Re-export the descriptor macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use testkit_reflect_macros::reflect;
