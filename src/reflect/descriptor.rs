//! Callable descriptors.
//!
//! [`Callable`] is the capability the matchers read from; [`CallableDescriptor`]
//! is the concrete snapshot produced by [`CallableDescriptorBuilder`] or by the
//! `#[reflect]` attribute.
//!
//! # Example
//!
//! ```rust
//! use testkit_reflect::reflect::{Callable, CallableDescriptor, TypeRef, Visibility};
//!
//! let greet = CallableDescriptor::builder("greet")
//!     .owner("demo::Greeter")
//!     .receiver(TypeRef::named("demo::Greeter"))
//!     .parameter("name", TypeRef::of::<&str>())
//!     .returns(TypeRef::of::<String>())
//!     .build();
//!
//! assert_eq!(greet.visibility(), Visibility::Public);
//! assert_eq!(greet.parameters().len(), 2);
//! assert_eq!(greet.value_parameters()[0].name(), Some("name"));
//! ```

use std::borrow::Cow;
use std::fmt;

use super::types::TypeRef;
use super::visibility::Visibility;

/// Role of a parameter in a callable's parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// The receiver (`self`), always at index 0 when present.
    Instance,
    /// A declared parameter.
    Value,
}

/// A single parameter of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    index: usize,
    name: Option<String>,
    ty: TypeRef,
    kind: ParameterKind,
}

impl Parameter {
    /// Position in the full parameter list, receiver included.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared name; `None` for the receiver and for non-identifier patterns.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared type.
    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Receiver or declared parameter.
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Whether the declared type is `Option<_>`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.name.as_deref()) {
            (ParameterKind::Instance, _) => f.write_str("self"),
            (ParameterKind::Value, Some(name)) => write!(f, "{name}: {}", self.ty),
            (ParameterKind::Value, None) => write!(f, "_: {}", self.ty),
        }
    }
}

/// Read access to the metadata of a function or method.
///
/// `Display` renders the member in assertion messages.
pub trait Callable: fmt::Display {
    /// Simple name of the member.
    fn name(&self) -> &str;

    /// Declared visibility.
    fn visibility(&self) -> Visibility;

    /// Whether the member cannot be overridden.
    fn is_final(&self) -> bool;

    /// Whether the member can be overridden.
    fn is_open(&self) -> bool;

    /// Whether the member has no body.
    fn is_abstract(&self) -> bool;

    /// Whether the member is `async`.
    fn is_suspend(&self) -> bool;

    /// All parameters; index 0 is the receiver when the member has one.
    fn parameters(&self) -> &[Parameter];

    /// Declared parameters, without the receiver.
    fn value_parameters(&self) -> &[Parameter] {
        let parameters = self.parameters();
        match parameters.first() {
            Some(first) if first.kind() == ParameterKind::Instance => &parameters[1..],
            _ => parameters,
        }
    }
}

/// Immutable snapshot of a callable's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableDescriptor {
    owner: Option<Cow<'static, str>>,
    name: String,
    visibility: Visibility,
    is_final: bool,
    is_open: bool,
    is_abstract: bool,
    is_suspend: bool,
    parameters: Vec<Parameter>,
    return_type: Option<TypeRef>,
}

impl CallableDescriptor {
    /// Start describing a callable named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CallableDescriptorBuilder {
        CallableDescriptorBuilder::new(name.into())
    }

    /// Path of the declaring type or trait, if known.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Declared return type; `None` for `()`.
    #[must_use]
    pub fn return_type(&self) -> Option<&TypeRef> {
        self.return_type.as_ref()
    }
}

impl Callable for CallableDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn is_final(&self) -> bool {
        self.is_final
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn is_suspend(&self) -> bool {
        self.is_suspend
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl fmt::Display for CallableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_suspend {
            f.write_str("async ")?;
        }
        f.write_str("fn ")?;
        if let Some(owner) = &self.owner {
            write!(f, "{owner}::")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

/// Builder for [`CallableDescriptor`].
///
/// Defaults describe a plain public inherent method: final, not open, not
/// abstract, not async, no receiver.
#[derive(Debug, Clone)]
pub struct CallableDescriptorBuilder {
    owner: Option<Cow<'static, str>>,
    name: String,
    visibility: Visibility,
    is_final: bool,
    is_open: bool,
    is_abstract: bool,
    is_suspend: bool,
    receiver: Option<TypeRef>,
    values: Vec<(Option<String>, TypeRef)>,
    return_type: Option<TypeRef>,
}

impl CallableDescriptorBuilder {
    fn new(name: String) -> Self {
        Self {
            owner: None,
            name,
            visibility: Visibility::Public,
            is_final: true,
            is_open: false,
            is_abstract: false,
            is_suspend: false,
            receiver: None,
            values: Vec::new(),
            return_type: None,
        }
    }

    /// Set the declaring type or trait path.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<Cow<'static, str>>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the final flag.
    #[must_use]
    pub fn is_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    /// Set the open flag.
    #[must_use]
    pub fn is_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    /// Set the abstract flag.
    #[must_use]
    pub fn is_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Set the async flag.
    #[must_use]
    pub fn is_suspend(mut self, is_suspend: bool) -> Self {
        self.is_suspend = is_suspend;
        self
    }

    /// Give the callable a receiver of type `ty`.
    ///
    /// The receiver always lands at index 0, whatever the call order.
    #[must_use]
    pub fn receiver(mut self, ty: TypeRef) -> Self {
        self.receiver = Some(ty);
        self
    }

    /// Append a named parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.values.push((Some(name.into()), ty));
        self
    }

    /// Append a parameter bound by a pattern rather than a name.
    #[must_use]
    pub fn unnamed_parameter(mut self, ty: TypeRef) -> Self {
        self.values.push((None, ty));
        self
    }

    /// Set the return type.
    #[must_use]
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Finish the descriptor.
    #[must_use]
    pub fn build(self) -> CallableDescriptor {
        let receiver = self.receiver.map(|ty| (None, ty, ParameterKind::Instance));
        let values = self
            .values
            .into_iter()
            .map(|(name, ty)| (name, ty, ParameterKind::Value));
        let parameters = receiver
            .into_iter()
            .chain(values)
            .enumerate()
            .map(|(index, (name, ty, kind))| Parameter {
                index,
                name,
                ty,
                kind,
            })
            .collect();

        CallableDescriptor {
            owner: self.owner,
            name: self.name,
            visibility: self.visibility,
            is_final: self.is_final,
            is_open: self.is_open,
            is_abstract: self.is_abstract,
            is_suspend: self.is_suspend,
            parameters,
            return_type: self.return_type,
        }
    }
}
