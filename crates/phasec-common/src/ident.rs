//! Package, version, and symbol identifiers.
//!
//! These three types are the identity backbone of the whole pipeline: every
//! declaration, every type, and every diagnostic that names a declaration
//! ultimately refers to one of these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package version: `(major, minor, patch, optional build, channel, variant)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<u32>,
    pub channel: Option<String>,
    pub variant: Option<String>,
}

impl Version {
    #[must_use]
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build: None,
            channel: None,
            variant: None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = self.build {
            write!(f, "+{build}")?;
        }
        if let Some(channel) = &self.channel {
            write!(f, "-{channel}")?;
        }
        Ok(())
    }
}

/// A package name is `(organization, name, version, optional assembly, optional alias)`.
///
/// Two packages are equal iff organization, name, and version all match —
/// assembly and alias are metadata, not identity, so they are excluded from
/// `PartialEq`/`Hash` via a custom impl rather than `derive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub organization: String,
    pub name: String,
    pub version: Version,
    pub assembly: Option<String>,
    pub alias: Option<String>,
}

impl Package {
    /// `self` may never be used as a package name; it is reserved so that
    /// `DependencyManager` can bind it to "the current package."
    pub const RESERVED_SELF_ALIAS: &'static str = "self";

    #[must_use]
    pub fn new(organization: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
            version,
            assembly: None,
            alias: None,
        }
    }

    /// `name` may not be `self`; that identifier is reserved as the alias
    /// meaning "the package I am currently compiling."
    #[must_use]
    pub fn is_reserved_name(name: &str) -> bool {
        name == Self::RESERVED_SELF_ALIAS
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.organization == other.organization
            && self.name == other.name
            && self.version == other.version
    }
}

impl Eq for Package {}

impl std::hash::Hash for Package {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.organization.hash(state);
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.organization, self.name, self.version)
    }
}

/// A fully qualified symbol: `(package, ordered path of segments)`.
///
/// The root symbol of a package has an empty path. Symbols are value-equal
/// and hashable so they can key the global symbol, method, and impl tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub package: Package,
    pub path: Vec<String>,
}

impl Symbol {
    #[must_use]
    pub fn root(package: Package) -> Self {
        Self {
            package,
            path: Vec::new(),
        }
    }

    /// Append a segment, producing a new symbol one level deeper.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Self {
            package: self.package.clone(),
            path,
        }
    }

    /// Drop the last segment. Undefined (panics) at the root symbol — callers
    /// must check `is_root` first, the same way the qualifier never calls
    /// `parent()` on a bare package reference.
    #[must_use]
    pub fn parent(&self) -> Self {
        assert!(!self.is_root(), "parent() is undefined at the root symbol");
        Self {
            package: self.package.clone(),
            path: self.path[..self.path.len() - 1].to_vec(),
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// `self.package == other.package` and `self.path` is a (non-strict)
    /// prefix of `other.path` — i.e. `other` is `self` or something nested
    /// under it.
    #[must_use]
    pub fn is_parent(&self, other: &Symbol) -> bool {
        self.package == other.package
            && other.path.len() >= self.path.len()
            && other.path[..self.path.len()] == self.path[..]
    }

    /// The last path segment, or `None` at the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.package, self.path.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg() -> Package {
        Package::new("acme", "widgets", Version::new(1, 0, 0))
    }

    #[test]
    fn child_appends_a_segment() {
        let root = Symbol::root(pkg());
        let widget = root.child("Widget");
        assert_eq!(widget.path, vec!["Widget".to_string()]);
    }

    #[test]
    fn parent_drops_the_last_segment() {
        let sym = Symbol::root(pkg()).child("Widget").child("render");
        assert_eq!(sym.parent().name(), Some("Widget"));
    }

    #[test]
    fn is_parent_requires_same_package_and_prefix() {
        let module = Symbol::root(pkg()).child("Widget");
        let method = module.child("render");
        assert!(module.is_parent(&method));
        assert!(!method.is_parent(&module));

        let other_pkg_module = Symbol::root(Package::new("acme", "gadgets", Version::new(1, 0, 0)));
        assert!(!module.is_parent(&other_pkg_module));
    }

    #[test]
    fn packages_equal_iff_org_name_version_match() {
        let mut a = pkg();
        a.alias = Some("w".to_string());
        let mut b = pkg();
        b.assembly = Some("widgets.dll".to_string());
        assert_eq!(a, b);

        let mut c = pkg();
        c.version = Version::new(2, 0, 0);
        assert_ne!(a, c);
    }

    #[test]
    fn self_is_a_reserved_package_name() {
        assert!(Package::is_reserved_name("self"));
        assert!(!Package::is_reserved_name("widgets"));
    }
}
