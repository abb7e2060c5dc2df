//! Type references with a supertype-of relation.
//!
//! Rust has no runtime subtyping, so [`TypeRef`] carries the relation
//! explicitly: a type may declare ancestors with [`TypeRef::with_supertype`],
//! `Option<T>` is treated as the nullable form of `T`, and [`TypeRef::any`]
//! is the top type.
//!
//! # Example
//!
//! ```rust
//! use testkit_reflect::reflect::TypeRef;
//!
//! let declared = TypeRef::of::<Option<u32>>();
//! assert!(declared.is_supertype_of(&TypeRef::of::<u32>()));
//! assert!(!TypeRef::of::<u32>().is_supertype_of(&declared));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

// `type_name` output is not guaranteed stable across compiler releases;
// `test_type_name_spells_option_with_core_path` pins the form relied on here.
const OPTION_PREFIX: &str = "core::option::Option<";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Classifier {
    Any,
    Named(Cow<'static, str>),
}

/// A reference to a parameter or return type.
///
/// Two references are equal when they name the same type with the same
/// nullability; declared supertypes do not take part in equality.
#[derive(Debug, Clone)]
pub struct TypeRef {
    classifier: Classifier,
    nullable: bool,
    supertypes: Vec<TypeRef>,
}

impl TypeRef {
    /// Reference to `T`, named by [`std::any::type_name`].
    ///
    /// `Option<T>` is recorded as a nullable reference to `T`. The
    /// unwrapping reads the text of `type_name`, which the standard library
    /// documents as a diagnostic aid rather than a stable identifier.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        let name = std::any::type_name::<T>();
        match name
            .strip_prefix(OPTION_PREFIX)
            .and_then(|inner| inner.strip_suffix('>'))
        {
            Some(inner) => Self::named(inner).nullable(),
            None => Self::named(name),
        }
    }

    /// Reference to a type by name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            classifier: Classifier::Named(name.into()),
            nullable: false,
            supertypes: Vec::new(),
        }
    }

    /// The top type: a supertype of every non-nullable type.
    ///
    /// Combine with [`nullable`](Self::nullable) to accept everything.
    #[must_use]
    pub fn any() -> Self {
        Self {
            classifier: Classifier::Any,
            nullable: false,
            supertypes: Vec::new(),
        }
    }

    /// Mark this reference as nullable (`Option<_>`).
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Declare `supertype` as an ancestor of this type.
    ///
    /// ```rust
    /// use testkit_reflect::reflect::TypeRef;
    ///
    /// let animal = TypeRef::named("zoo::Animal");
    /// let dog = TypeRef::named("zoo::Dog").with_supertype(animal.clone());
    ///
    /// assert!(animal.is_supertype_of(&dog));
    /// assert!(!dog.is_supertype_of(&animal));
    /// ```
    #[must_use]
    pub fn with_supertype(mut self, supertype: TypeRef) -> Self {
        self.supertypes.push(supertype);
        self
    }

    /// Type name, `"Any"` for the top type.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.classifier {
            Classifier::Any => "Any",
            Classifier::Named(name) => name,
        }
    }

    /// Whether the reference is nullable.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether this is the top type.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.classifier == Classifier::Any
    }

    /// Declared direct ancestors.
    #[must_use]
    pub fn supertypes(&self) -> &[TypeRef] {
        &self.supertypes
    }

    /// Whether a value of `candidate` is acceptable where `self` is declared.
    ///
    /// Nullability only matters at the top level: a nullable candidate needs
    /// a nullable declared type, the reverse is always fine.
    #[must_use]
    pub fn is_supertype_of(&self, candidate: &TypeRef) -> bool {
        if candidate.nullable && !self.nullable {
            return false;
        }
        match &self.classifier {
            Classifier::Any => true,
            classifier => candidate.derives_from(classifier),
        }
    }

    fn derives_from(&self, classifier: &Classifier) -> bool {
        self.classifier == *classifier
            || self.supertypes.iter().any(|s| s.derives_from(classifier))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.classifier == other.classifier && self.nullable == other.nullable
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.classifier.hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.name())
        } else {
            f.write_str(self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_primitive() {
        let t = TypeRef::of::<i32>();
        assert_eq!(t.name(), "i32");
        assert!(!t.is_nullable());
        assert_eq!(t.to_string(), "i32");
    }

    #[test]
    fn test_of_option_is_nullable() {
        let t = TypeRef::of::<Option<String>>();
        assert!(t.is_nullable());
        assert_eq!(t, TypeRef::of::<String>().nullable());
        assert_eq!(t.to_string(), format!("Option<{}>", std::any::type_name::<String>()));
    }

    #[test]
    fn test_type_name_spells_option_with_core_path() {
        let name = std::any::type_name::<Option<u8>>();
        assert_eq!(name, "core::option::Option<u8>");
        assert!(name.starts_with(OPTION_PREFIX));

        let nested = TypeRef::of::<Option<Vec<u8>>>();
        assert!(nested.is_nullable());
        assert_eq!(nested.name(), std::any::type_name::<Vec<u8>>());
    }

    #[test]
    fn test_same_type_accepts_itself() {
        let t = TypeRef::of::<u64>();
        assert!(t.is_supertype_of(&TypeRef::of::<u64>()));
        assert!(!t.is_supertype_of(&TypeRef::of::<u32>()));
    }

    #[test]
    fn test_nullability_direction() {
        let plain = TypeRef::of::<u8>();
        let optional = TypeRef::of::<Option<u8>>();
        assert!(optional.is_supertype_of(&plain));
        assert!(optional.is_supertype_of(&optional));
        assert!(!plain.is_supertype_of(&optional));
    }

    #[test]
    fn test_any() {
        let any = TypeRef::any();
        assert!(any.is_any());
        assert!(any.is_supertype_of(&TypeRef::of::<bool>()));
        assert!(!any.is_supertype_of(&TypeRef::of::<Option<bool>>()));
        assert!(TypeRef::any().nullable().is_supertype_of(&TypeRef::of::<Option<bool>>()));
        assert!(!TypeRef::of::<bool>().is_supertype_of(&any));
    }

    #[test]
    fn test_transitive_supertypes() {
        let base = TypeRef::named("shapes::Shape");
        let polygon = TypeRef::named("shapes::Polygon").with_supertype(base.clone());
        let square = TypeRef::named("shapes::Square").with_supertype(polygon.clone());

        assert!(base.is_supertype_of(&square));
        assert!(polygon.is_supertype_of(&square));
        assert!(!square.is_supertype_of(&polygon));
        assert!(base.nullable().is_supertype_of(&square.clone().nullable()));
    }

    #[test]
    fn test_equality_ignores_supertypes() {
        let a = TypeRef::named("a::A");
        let b = TypeRef::named("a::A").with_supertype(TypeRef::named("a::Base"));
        assert_eq!(a, b);
        assert_ne!(a.clone(), a.nullable());
    }
}
