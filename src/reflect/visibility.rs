//! Member visibility.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Visibility of a callable member.
///
/// Compared as a flat value: `Public` is not "more visible" than `Internal`
/// for matching purposes.
///
/// | Rust            | `Visibility` |
/// |-----------------|--------------|
/// | `pub`           | `Public`     |
/// | `pub(crate)`    | `Internal`   |
/// | `pub(super)`, `pub(in path)` | `Protected` |
/// | private, `pub(self)` | `Private` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible everywhere.
    Public,
    /// Visible within the defining crate.
    Internal,
    /// Visible to an enclosing module.
    Protected,
    /// Visible within the defining module only.
    Private,
}

impl Visibility {
    /// All visibilities, most visible first.
    pub const ALL: [Visibility; 4] = [
        Visibility::Public,
        Visibility::Internal,
        Visibility::Protected,
        Visibility::Private,
    ];

    /// Lowercase name used in assertion messages.
    #[must_use]
    pub fn human_name(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_name())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Visibility::ALL
            .into_iter()
            .find(|v| v.human_name() == s)
            .ok_or_else(|| Error::InvalidVisibility(s.to_string()))
    }
}
