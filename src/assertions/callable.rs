// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Matchers over callable members.
//!
//! - [`have_visibility`] - exact visibility
//! - [`be_final`], [`be_open`], [`be_abstract`], [`be_suspendable`] - modifiers
//! - [`accept_parameters_of_type`] - declared parameter types accept the given types
//! - [`have_parameters_with_name`] - declared parameter names
//!
//! Each matcher has `should_*` / `should_not_*` wrappers that assert on the
//! spot. Parameter matchers ignore the receiver at index 0 and require the
//! callable to have exactly one more parameter than expected.
//!
//! # Example
//!
//! ```rust
//! use testkit_reflect::assertions::callable::*;
//! use testkit_reflect::reflect::{CallableDescriptor, TypeRef, Visibility};
//!
//! let area = CallableDescriptor::builder("area")
//!     .receiver(TypeRef::named("shapes::Circle"))
//!     .parameter("scale", TypeRef::of::<f64>())
//!     .build();
//!
//! should_have_visibility(&area, Visibility::Public);
//! should_be_final(&area);
//! should_not_be_suspendable(&area);
//! should_accept_parameters(&area, [TypeRef::of::<f64>()]);
//! should_have_parameters_with_name(&area, ["scale"]);
//! ```

use std::fmt;

use super::matcher::{should, should_not, MatchResult, Matcher};
use crate::reflect::{Callable, Parameter, ParameterKind, TypeRef, Visibility};

/// Create a matcher for an exact visibility.
pub fn have_visibility(expected: Visibility) -> VisibilityMatcher {
    VisibilityMatcher { expected }
}

/// Matcher for callable visibility.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityMatcher {
    expected: Visibility,
}

impl<C: Callable + ?Sized> Matcher<C> for VisibilityMatcher {
    fn test(&self, value: &C) -> MatchResult {
        MatchResult::new(
            value.visibility() == self.expected,
            format!("Member {value} should have visibility {}", self.expected),
            format!("Member {value} should not have visibility {}", self.expected),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Final,
    Open,
    Abstract,
    Suspendable,
}

impl Modifier {
    fn holds<C: Callable + ?Sized>(self, callable: &C) -> bool {
        match self {
            Modifier::Final => callable.is_final(),
            Modifier::Open => callable.is_open(),
            Modifier::Abstract => callable.is_abstract(),
            Modifier::Suspendable => callable.is_suspend(),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modifier::Final => "final",
            Modifier::Open => "open",
            Modifier::Abstract => "abstract",
            Modifier::Suspendable => "suspendable",
        })
    }
}

/// Matcher for a single modifier flag.
#[derive(Debug, Clone, Copy)]
pub struct ModifierMatcher {
    modifier: Modifier,
}

impl<C: Callable + ?Sized> Matcher<C> for ModifierMatcher {
    fn test(&self, value: &C) -> MatchResult {
        MatchResult::new(
            self.modifier.holds(value),
            format!("Member {value} should be {}", self.modifier),
            format!("Member {value} should not be {}", self.modifier),
        )
    }
}

/// Create a matcher for final members.
pub fn be_final() -> ModifierMatcher {
    ModifierMatcher {
        modifier: Modifier::Final,
    }
}

/// Create a matcher for open (overridable) members.
pub fn be_open() -> ModifierMatcher {
    ModifierMatcher {
        modifier: Modifier::Open,
    }
}

/// Create a matcher for abstract members.
pub fn be_abstract() -> ModifierMatcher {
    ModifierMatcher {
        modifier: Modifier::Abstract,
    }
}

/// Create a matcher for `async` members.
pub fn be_suspendable() -> ModifierMatcher {
    ModifierMatcher {
        modifier: Modifier::Suspendable,
    }
}

/// Whether `parameters` is a receiver slot followed by one parameter per
/// `expected` entry, each satisfying `accepts`.
///
/// Members without a receiver never align: their first declared parameter
/// would otherwise be skipped unchecked.
fn parameters_align<E>(
    parameters: &[Parameter],
    expected: &[E],
    accepts: impl Fn(&Parameter, &E) -> bool,
) -> bool {
    parameters
        .first()
        .is_some_and(|p| p.kind() == ParameterKind::Instance)
        && parameters.len() == expected.len() + 1
        && parameters[1..]
            .iter()
            .zip(expected)
            .all(|(parameter, expected)| accepts(parameter, expected))
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create a matcher checking that each declared parameter accepts the
/// corresponding type.
///
/// A declared type may be broader than the expected one (a supertype, or the
/// nullable form) but not narrower.
///
/// # Example
///
/// ```rust
/// use testkit_reflect::assertions::callable::accept_parameters_of_type;
/// use testkit_reflect::assertions::matcher::Matcher;
/// use testkit_reflect::reflect::{CallableDescriptor, TypeRef};
///
/// let set = CallableDescriptor::builder("set")
///     .receiver(TypeRef::named("demo::Cell"))
///     .parameter("value", TypeRef::of::<Option<i64>>())
///     .build();
///
/// assert!(accept_parameters_of_type([TypeRef::of::<i64>()]).matches(&set));
/// assert!(!accept_parameters_of_type([TypeRef::of::<i32>()]).matches(&set));
/// ```
pub fn accept_parameters_of_type<I>(types: I) -> AcceptParametersMatcher
where
    I: IntoIterator<Item = TypeRef>,
{
    AcceptParametersMatcher {
        expected: types.into_iter().collect(),
    }
}

/// Matcher for declared parameter types.
#[derive(Debug, Clone)]
pub struct AcceptParametersMatcher {
    expected: Vec<TypeRef>,
}

impl<C: Callable + ?Sized> Matcher<C> for AcceptParametersMatcher {
    fn test(&self, value: &C) -> MatchResult {
        let passed = parameters_align(value.parameters(), &self.expected, |parameter, ty| {
            parameter.ty().is_supertype_of(ty)
        });
        let types = join(&self.expected);
        MatchResult::new(
            passed,
            format!("Member {value} should accept these parameters: {types}"),
            format!("Member {value} should not accept these parameters: {types}"),
        )
    }
}

/// Create a matcher for declared parameter names, in order.
///
/// # Example
///
/// ```rust
/// use testkit_reflect::assertions::callable::have_parameters_with_name;
/// use testkit_reflect::assertions::matcher::Matcher;
/// use testkit_reflect::reflect::{CallableDescriptor, TypeRef};
///
/// let move_to = CallableDescriptor::builder("move_to")
///     .receiver(TypeRef::named("demo::Sprite"))
///     .parameter("x", TypeRef::of::<f32>())
///     .parameter("y", TypeRef::of::<f32>())
///     .build();
///
/// assert!(have_parameters_with_name(["x", "y"]).matches(&move_to));
/// assert!(!have_parameters_with_name(["y", "x"]).matches(&move_to));
/// ```
pub fn have_parameters_with_name<I, S>(names: I) -> ParameterNamesMatcher
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ParameterNamesMatcher {
        expected: names.into_iter().map(Into::into).collect(),
    }
}

/// Matcher for declared parameter names.
#[derive(Debug, Clone)]
pub struct ParameterNamesMatcher {
    expected: Vec<String>,
}

impl<C: Callable + ?Sized> Matcher<C> for ParameterNamesMatcher {
    fn test(&self, value: &C) -> MatchResult {
        let passed = parameters_align(value.parameters(), &self.expected, |parameter, name| {
            parameter.name() == Some(name.as_str())
        });
        let names = self.expected.join(", ");
        MatchResult::new(
            passed,
            format!("Member {value} should have these parameters name: {names}"),
            format!("Member {value} should not have these parameters name: {names}"),
        )
    }
}

// =============================================================================
// Assertion wrappers
// =============================================================================

/// Assert the callable has `visibility`.
///
/// # Panics
///
/// Panics if the visibility differs.
#[track_caller]
pub fn should_have_visibility<C: Callable + ?Sized>(callable: &C, visibility: Visibility) {
    should(callable, have_visibility(visibility));
}

/// Assert the callable does not have `visibility`.
///
/// # Panics
///
/// Panics if the visibility matches.
#[track_caller]
pub fn should_not_have_visibility<C: Callable + ?Sized>(callable: &C, visibility: Visibility) {
    should_not(callable, have_visibility(visibility));
}

/// Assert the callable is final.
///
/// # Panics
///
/// Panics if it is not.
#[track_caller]
pub fn should_be_final<C: Callable + ?Sized>(callable: &C) {
    should(callable, be_final());
}

/// Assert the callable is not final.
///
/// # Panics
///
/// Panics if it is.
#[track_caller]
pub fn should_not_be_final<C: Callable + ?Sized>(callable: &C) {
    should_not(callable, be_final());
}

/// Assert the callable is open.
///
/// # Panics
///
/// Panics if it is not.
#[track_caller]
pub fn should_be_open<C: Callable + ?Sized>(callable: &C) {
    should(callable, be_open());
}

/// Assert the callable is not open.
///
/// # Panics
///
/// Panics if it is.
#[track_caller]
pub fn should_not_be_open<C: Callable + ?Sized>(callable: &C) {
    should_not(callable, be_open());
}

/// Assert the callable is abstract.
///
/// # Panics
///
/// Panics if it is not.
#[track_caller]
pub fn should_be_abstract<C: Callable + ?Sized>(callable: &C) {
    should(callable, be_abstract());
}

/// Assert the callable is not abstract.
///
/// # Panics
///
/// Panics if it is.
#[track_caller]
pub fn should_not_be_abstract<C: Callable + ?Sized>(callable: &C) {
    should_not(callable, be_abstract());
}

/// Assert the callable is `async`.
///
/// # Panics
///
/// Panics if it is not.
#[track_caller]
pub fn should_be_suspendable<C: Callable + ?Sized>(callable: &C) {
    should(callable, be_suspendable());
}

/// Assert the callable is not `async`.
///
/// # Panics
///
/// Panics if it is.
#[track_caller]
pub fn should_not_be_suspendable<C: Callable + ?Sized>(callable: &C) {
    should_not(callable, be_suspendable());
}

/// Assert the callable accepts parameters of `types`.
///
/// # Panics
///
/// Panics if the parameter count differs or a declared type does not accept
/// the expected one.
#[track_caller]
pub fn should_accept_parameters<C, I>(callable: &C, types: I)
where
    C: Callable + ?Sized,
    I: IntoIterator<Item = TypeRef>,
{
    should(callable, accept_parameters_of_type(types));
}

/// Assert the callable accepts parameters of `types`, then hand the full
/// parameter list (receiver included) to `inspect`.
///
/// # Panics
///
/// Panics like [`should_accept_parameters`]; `inspect` is not called then.
///
/// # Example
///
/// ```rust
/// use testkit_reflect::assertions::callable::should_accept_parameters_with;
/// use testkit_reflect::reflect::{CallableDescriptor, TypeRef};
///
/// let find = CallableDescriptor::builder("find")
///     .receiver(TypeRef::named("demo::Repo"))
///     .parameter("id", TypeRef::of::<Option<u64>>())
///     .build();
///
/// should_accept_parameters_with(&find, [TypeRef::of::<u64>()], |params| {
///     assert!(params[1].is_nullable());
/// });
/// ```
#[track_caller]
pub fn should_accept_parameters_with<C, I, F>(callable: &C, types: I, inspect: F)
where
    C: Callable + ?Sized,
    I: IntoIterator<Item = TypeRef>,
    F: FnOnce(&[Parameter]),
{
    should_accept_parameters(callable, types);
    inspect(callable.parameters());
}

/// Assert the callable does not accept parameters of `types`.
///
/// # Panics
///
/// Panics if it does.
#[track_caller]
pub fn should_not_accept_parameters<C, I>(callable: &C, types: I)
where
    C: Callable + ?Sized,
    I: IntoIterator<Item = TypeRef>,
{
    should_not(callable, accept_parameters_of_type(types));
}

/// Assert the callable's parameters are named `names`, in order.
///
/// # Panics
///
/// Panics if the count or any name differs.
#[track_caller]
pub fn should_have_parameters_with_name<C, I, S>(callable: &C, names: I)
where
    C: Callable + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    should(callable, have_parameters_with_name(names));
}

/// Assert the callable's parameters are named `names`, then hand the full
/// parameter list (receiver included) to `inspect`.
///
/// # Panics
///
/// Panics like [`should_have_parameters_with_name`]; `inspect` is not called then.
#[track_caller]
pub fn should_have_parameters_with_name_with<C, I, S, F>(callable: &C, names: I, inspect: F)
where
    C: Callable + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: FnOnce(&[Parameter]),
{
    should_have_parameters_with_name(callable, names);
    inspect(callable.parameters());
}

/// Assert the callable's parameters are not named `names`.
///
/// # Panics
///
/// Panics if they are.
#[track_caller]
pub fn should_not_have_parameters_with_name<C, I, S>(callable: &C, names: I)
where
    C: Callable + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    should_not(callable, have_parameters_with_name(names));
}
