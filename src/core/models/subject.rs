//! Subject model

use crate::core::error::{RegistryError, Result};
use crate::core::tokens::{name_key, require_name, RESERVED_NAME_CHARS};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Whether a subject is required by its program
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectKind {
    /// Counted by transfer, advancement and graduation policy
    Mandatory,
    /// Elective subject
    Optional,
}

impl FromStr for SubjectKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mandatory" => Ok(Self::Mandatory),
            "optional" => Ok(Self::Optional),
            _ => Err(RegistryError::InvalidSubjectKind(s.to_string())),
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandatory => write!(f, "mandatory"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// A subject offered by a program in one of its courses.
///
/// Identity is the case-insensitive name together with the kind, so
/// `Algebra (mandatory)` and `algebra (mandatory)` are the same subject while
/// `Algebra (optional)` is a different one.
#[derive(Debug, Clone)]
pub struct Subject {
    name: String,
    kind: SubjectKind,
}

impl Subject {
    /// Create a subject
    ///
    /// # Errors
    /// Returns `EmptyField` when the name is blank, `ReservedCharacter` when it
    /// contains `|`, `;` or a line break
    pub fn new(name: &str, kind: SubjectKind) -> Result<Self> {
        let name = require_name("Subject", "name", name, &RESERVED_NAME_CHARS)?;
        Ok(Self {
            name: name.to_string(),
            kind,
        })
    }

    /// Create a subject from a textual kind (`mandatory` / `optional`, any case)
    ///
    /// # Errors
    /// Returns `EmptyField` for a blank name or `InvalidSubjectKind` for an unknown kind
    pub fn parse(name: &str, kind: &str) -> Result<Self> {
        let kind = kind.parse()?;
        Self::new(name, kind)
    }

    /// Subject name as written
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subject kind
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// Whether the subject is mandatory
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.kind == SubjectKind::Mandatory
    }

    /// Whether this subject has the given name, ignoring case
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }

    fn identity(&self) -> (String, SubjectKind) {
        (name_key(&self.name), self.kind)
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Subject {}

impl PartialOrd for Subject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Subject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_creation() {
        let subject = Subject::parse("Algorithms", "Mandatory").unwrap();
        assert_eq!(subject.name(), "Algorithms");
        assert_eq!(subject.kind(), SubjectKind::Mandatory);
        assert!(subject.is_mandatory());
    }

    #[test]
    fn test_subject_rejects_blank_name() {
        assert!(matches!(
            Subject::new("  ", SubjectKind::Optional),
            Err(RegistryError::EmptyField { field: "name", .. })
        ));
    }

    #[test]
    fn test_subject_rejects_separators_in_name() {
        assert!(matches!(
            Subject::new("Algebra; Geometry", SubjectKind::Mandatory),
            Err(RegistryError::ReservedCharacter { character: ';', .. })
        ));
        assert!(Subject::new("Algebra | Geometry", SubjectKind::Optional).is_err());
        assert!(Subject::new("Mechanics - Part 1", SubjectKind::Optional).is_ok());
    }

    #[test]
    fn test_subject_rejects_unknown_kind() {
        assert!(matches!(
            Subject::parse("Databases", "elective"),
            Err(RegistryError::InvalidSubjectKind(k)) if k == "elective"
        ));
    }

    #[test]
    fn test_identity_ignores_case_but_not_kind() {
        let a = Subject::new("Algebra", SubjectKind::Mandatory).unwrap();
        let b = Subject::new("ALGEBRA", SubjectKind::Mandatory).unwrap();
        let c = Subject::new("Algebra", SubjectKind::Optional).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_named("algebra"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SubjectKind::Mandatory.to_string(), "mandatory");
        assert_eq!(SubjectKind::Optional.to_string(), "optional");
    }
}
