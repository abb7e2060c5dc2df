// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Matcher system with paired failure messages.
//!
//! - [`Matcher`] trait producing a [`MatchResult`]
//! - [`should`] / [`should_not`] and their non-panicking forms [`check`] / [`check_not`]
//! - [`assert_that!`](crate::assert_that) / [`assert_not!`](crate::assert_not)
//! - [`not`] combinator
//!
//! A [`MatchResult`] always carries both messages: the positive form is
//! reported when `should` fails, the negated one when `should_not` fails.
//!
//! # Example
//!
//! ```rust
//! use testkit_reflect::assertions::matcher::{should, should_not, MatchResult, Matcher};
//!
//! struct IsEven;
//!
//! impl Matcher<i32> for IsEven {
//!     fn test(&self, value: &i32) -> MatchResult {
//!         MatchResult::new(
//!             value % 2 == 0,
//!             format!("{value} should be even"),
//!             format!("{value} should not be even"),
//!         )
//!     }
//! }
//!
//! should(&4, IsEven);
//! should_not(&3, IsEven);
//! ```

use crate::error::{Error, Result};

/// Verdict of a matcher plus the messages for both assertion forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    passed: bool,
    failure_message: String,
    negated_failure_message: String,
}

impl MatchResult {
    /// Create a result.
    pub fn new(
        passed: bool,
        failure_message: impl Into<String>,
        negated_failure_message: impl Into<String>,
    ) -> Self {
        Self {
            passed,
            failure_message: failure_message.into(),
            negated_failure_message: negated_failure_message.into(),
        }
    }

    /// Whether the value satisfied the matcher.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Message for a failed positive assertion.
    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    /// Message for a failed negated assertion.
    pub fn negated_failure_message(&self) -> &str {
        &self.negated_failure_message
    }

    /// Same verdict inverted, messages swapped.
    #[must_use]
    pub fn invert(self) -> Self {
        Self {
            passed: !self.passed,
            failure_message: self.negated_failure_message,
            negated_failure_message: self.failure_message,
        }
    }
}

/// A matcher for testing values.
///
/// # Implementing Custom Matchers
///
/// ```rust
/// use testkit_reflect::assertions::matcher::{MatchResult, Matcher};
///
/// struct NonEmpty;
///
/// impl Matcher<str> for NonEmpty {
///     fn test(&self, value: &str) -> MatchResult {
///         MatchResult::new(
///             !value.is_empty(),
///             format!("{value:?} should not be empty"),
///             format!("{value:?} should be empty"),
///         )
///     }
/// }
///
/// assert!(NonEmpty.matches("x"));
/// assert!(!NonEmpty.matches(""));
/// ```
pub trait Matcher<T: ?Sized> {
    /// Evaluate the value.
    fn test(&self, value: &T) -> MatchResult;

    /// Check if the value matches.
    fn matches(&self, value: &T) -> bool {
        self.test(value).passed()
    }
}

/// Evaluate `matcher` and fail unless it passed.
///
/// # Errors
///
/// Returns [`Error::AssertionFailed`] carrying the positive failure message.
pub fn check<T, M>(value: &T, matcher: M) -> Result<()>
where
    T: ?Sized,
    M: Matcher<T>,
{
    let result = matcher.test(value);
    tracing::trace!(passed = result.passed(), "evaluated matcher");
    if result.passed() {
        Ok(())
    } else {
        tracing::debug!(failure = %result.failure_message(), "assertion failed");
        Err(Error::AssertionFailed(result.failure_message))
    }
}

/// Evaluate `matcher` and fail if it passed.
///
/// # Errors
///
/// Returns [`Error::AssertionFailed`] carrying the negated failure message.
pub fn check_not<T, M>(value: &T, matcher: M) -> Result<()>
where
    T: ?Sized,
    M: Matcher<T>,
{
    check(value, not(matcher))
}

/// Assert that `value` satisfies `matcher`.
///
/// # Panics
///
/// Panics with the positive failure message if the matcher did not pass.
#[track_caller]
pub fn should<T, M>(value: &T, matcher: M)
where
    T: ?Sized,
    M: Matcher<T>,
{
    if let Err(err) = check(value, matcher) {
        panic!("{err}");
    }
}

/// Assert that `value` does not satisfy `matcher`.
///
/// # Panics
///
/// Panics with the negated failure message if the matcher passed.
#[track_caller]
pub fn should_not<T, M>(value: &T, matcher: M)
where
    T: ?Sized,
    M: Matcher<T>,
{
    if let Err(err) = check_not(value, matcher) {
        panic!("{err}");
    }
}

/// Assert that a value matches a matcher.
///
/// # Panics
///
/// Panics with the matcher's failure message if the value doesn't match.
///
/// # Example
///
/// ```rust
/// use testkit_reflect::assert_that;
/// use testkit_reflect::assertions::callable::be_final;
/// use testkit_reflect::reflect::CallableDescriptor;
///
/// let f = CallableDescriptor::builder("f").build();
/// assert_that!(f, be_final());
/// ```
#[macro_export]
macro_rules! assert_that {
    ($value:expr, $matcher:expr) => {{
        let result = $crate::assertions::matcher::Matcher::test(&$matcher, &$value);
        if !result.passed() {
            panic!("assertion failed: {}", result.failure_message());
        }
    }};
    ($value:expr, $matcher:expr, $($arg:tt)+) => {{
        let result = $crate::assertions::matcher::Matcher::test(&$matcher, &$value);
        if !result.passed() {
            panic!(
                "assertion failed: {}\n  message: {}",
                result.failure_message(),
                format_args!($($arg)+)
            );
        }
    }};
}

/// Assert that a value does not match a matcher.
///
/// # Panics
///
/// Panics with the matcher's negated failure message if the value matches.
///
/// # Example
///
/// ```rust
/// use testkit_reflect::assert_not;
/// use testkit_reflect::assertions::callable::be_abstract;
/// use testkit_reflect::reflect::CallableDescriptor;
///
/// let f = CallableDescriptor::builder("f").build();
/// assert_not!(f, be_abstract());
/// ```
#[macro_export]
macro_rules! assert_not {
    ($value:expr, $matcher:expr) => {{
        let result = $crate::assertions::matcher::Matcher::test(&$matcher, &$value);
        if result.passed() {
            panic!("assertion failed: {}", result.negated_failure_message());
        }
    }};
    ($value:expr, $matcher:expr, $($arg:tt)+) => {{
        let result = $crate::assertions::matcher::Matcher::test(&$matcher, &$value);
        if result.passed() {
            panic!(
                "assertion failed: {}\n  message: {}",
                result.negated_failure_message(),
                format_args!($($arg)+)
            );
        }
    }};
}

/// Create a negating matcher.
///
/// The verdict is inverted and the two messages trade places.
pub fn not<M>(matcher: M) -> NotMatcher<M> {
    NotMatcher { inner: matcher }
}

/// Matcher that negates another matcher.
pub struct NotMatcher<M> {
    inner: M,
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for NotMatcher<M> {
    fn test(&self, value: &T) -> MatchResult {
        self.inner.test(value).invert()
    }
}

// Implement Matcher for Box<dyn Matcher> to allow heterogeneous collections
impl<T: ?Sized> Matcher<T> for Box<dyn Matcher<T>> {
    fn test(&self, value: &T) -> MatchResult {
        (**self).test(value)
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn test(&self, value: &T) -> MatchResult {
        (**self).test(value)
    }
}
