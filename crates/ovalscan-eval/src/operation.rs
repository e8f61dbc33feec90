//! OVAL operation and datatype vocabularies
//!
//! Tags are kept exactly as they appear in OVAL definitions. Tags this engine
//! does not know survive deserialization and are rejected at evaluation time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison applied between an extracted value and the expected value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    #[default]
    Equals,
    NotEqual,
    CaseInsensitiveEquals,
    CaseInsensitiveNotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    BitwiseAnd,
    BitwiseOr,
    PatternMatch,
    SubsetOf,
    SupersetOf,
    /// A tag this engine does not implement
    Unrecognized(String),
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Equals => "equals",
            Operation::NotEqual => "not equal",
            Operation::CaseInsensitiveEquals => "case insensitive equals",
            Operation::CaseInsensitiveNotEqual => "case insensitive not equal",
            Operation::GreaterThan => "greater than",
            Operation::LessThan => "less than",
            Operation::GreaterThanOrEqual => "greater than or equal",
            Operation::LessThanOrEqual => "less than or equal",
            Operation::BitwiseAnd => "bitwise and",
            Operation::BitwiseOr => "bitwise or",
            Operation::PatternMatch => "pattern match",
            Operation::SubsetOf => "subset of",
            Operation::SupersetOf => "superset of",
            Operation::Unrecognized(tag) => tag,
        }
    }

    /// Whether the operation is decided by an ordering alone
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Operation::Equals
                | Operation::NotEqual
                | Operation::GreaterThan
                | Operation::LessThan
                | Operation::GreaterThanOrEqual
                | Operation::LessThanOrEqual
        )
    }

    /// Apply a relational operation to the ordering of `actual` relative to
    /// `expected`. Returns `None` for non-relational operations.
    pub fn test_ordering(&self, ord: Ordering) -> Option<bool> {
        let matched = match self {
            Operation::Equals => ord == Ordering::Equal,
            Operation::NotEqual => ord != Ordering::Equal,
            Operation::GreaterThan => ord == Ordering::Greater,
            Operation::LessThan => ord == Ordering::Less,
            Operation::GreaterThanOrEqual => ord != Ordering::Less,
            Operation::LessThanOrEqual => ord != Ordering::Greater,
            _ => return None,
        };
        Some(matched)
    }
}

impl From<&str> for Operation {
    fn from(tag: &str) -> Self {
        match tag {
            "equals" => Operation::Equals,
            "not equal" => Operation::NotEqual,
            "case insensitive equals" => Operation::CaseInsensitiveEquals,
            "case insensitive not equal" => Operation::CaseInsensitiveNotEqual,
            "greater than" => Operation::GreaterThan,
            "less than" => Operation::LessThan,
            "greater than or equal" => Operation::GreaterThanOrEqual,
            "less than or equal" => Operation::LessThanOrEqual,
            "bitwise and" => Operation::BitwiseAnd,
            "bitwise or" => Operation::BitwiseOr,
            "pattern match" => Operation::PatternMatch,
            "subset of" => Operation::SubsetOf,
            "superset of" => Operation::SupersetOf,
            other => Operation::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Operation {
    fn from(tag: String) -> Self {
        Operation::from(tag.as_str())
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How extracted and expected values are interpreted before comparing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Datatype {
    #[default]
    String,
    Int,
    Float,
    Boolean,
    /// Dotted version string, ordered like package versions
    Version,
    /// Full `epoch:version-release` string
    EvrString,
    Unrecognized(String),
}

impl Datatype {
    pub fn as_str(&self) -> &str {
        match self {
            Datatype::String => "string",
            Datatype::Int => "int",
            Datatype::Float => "float",
            Datatype::Boolean => "boolean",
            Datatype::Version => "version",
            Datatype::EvrString => "evr_string",
            Datatype::Unrecognized(tag) => tag,
        }
    }
}

impl From<&str> for Datatype {
    fn from(tag: &str) -> Self {
        match tag {
            "string" => Datatype::String,
            "int" => Datatype::Int,
            "float" => Datatype::Float,
            "boolean" => Datatype::Boolean,
            "version" => Datatype::Version,
            "evr_string" => Datatype::EvrString,
            other => Datatype::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Datatype {
    fn from(tag: String) -> Self {
        Datatype::from(tag.as_str())
    }
}

impl From<Datatype> for String {
    fn from(datatype: Datatype) -> Self {
        match datatype {
            Datatype::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
