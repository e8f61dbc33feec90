//! Field comparators
//!
//! A `ScalarComparator` checks one extracted value against an expected value
//! under a datatype. An `EvrComparator` checks a full package version against
//! an expected `epoch:version-release`, using a caller-supplied ordering.

use crate::evr::{compare_evr_partial, rpmvercmp, Evr};
use crate::operation::{Datatype, Operation};
use ovalscan_core::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Compares a single extracted value against an expected value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalarComparator {
    /// Comparison to apply
    #[serde(default, alias = "Op")]
    pub op: Operation,

    /// How both values are interpreted
    #[serde(default, alias = "Datatype")]
    pub datatype: Datatype,

    /// Expected value
    #[serde(alias = "Value")]
    pub value: String,

    #[serde(skip)]
    pattern: OnceLock<std::result::Result<Regex, regex::Error>>,
}

impl ScalarComparator {
    /// Create a string comparator
    pub fn new(op: Operation, value: impl Into<String>) -> Self {
        Self {
            op,
            datatype: Datatype::String,
            value: value.into(),
            pattern: OnceLock::new(),
        }
    }

    pub fn equals(value: impl Into<String>) -> Self {
        Self::new(Operation::Equals, value)
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::new(Operation::PatternMatch, pattern)
    }

    /// Set the datatype
    pub fn with_datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = datatype;
        self
    }

    /// Evaluate the comparator against an extracted value
    pub fn eval(&self, actual: &str) -> Result<bool> {
        match &self.op {
            Operation::Unrecognized(_) => return Err(self.unsupported()),
            Operation::PatternMatch => {
                if let Datatype::Unrecognized(tag) = &self.datatype {
                    return Err(Error::UnsupportedDatatype(tag.clone()));
                }
                return Ok(self.compiled_pattern()?.is_match(actual));
            }
            _ => {}
        }

        match &self.datatype {
            Datatype::String => self.eval_string(actual),
            Datatype::Int => self.eval_int(actual),
            Datatype::Float => {
                let a = parse_float(actual)?;
                let e = parse_float(&self.value)?;
                // NaN was rejected while parsing
                self.relational(a.partial_cmp(&e).unwrap_or(Ordering::Equal))
            }
            Datatype::Boolean => match self.op {
                Operation::Equals | Operation::NotEqual => {
                    self.relational(parse_bool(actual)?.cmp(&parse_bool(&self.value)?))
                }
                _ => Err(self.unsupported()),
            },
            Datatype::Version => self.relational(rpmvercmp(actual, &self.value)),
            Datatype::EvrString => {
                let a = Evr::parse(actual)?;
                let e = Evr::parse(&self.value)?;
                self.relational(a.compare(&e))
            }
            Datatype::Unrecognized(tag) => Err(Error::UnsupportedDatatype(tag.clone())),
        }
    }

    fn eval_string(&self, actual: &str) -> Result<bool> {
        let expected = self.value.as_str();
        match self.op {
            Operation::Equals => Ok(actual == expected),
            Operation::NotEqual => Ok(actual != expected),
            Operation::CaseInsensitiveEquals => Ok(actual.to_lowercase() == expected.to_lowercase()),
            Operation::CaseInsensitiveNotEqual => {
                Ok(actual.to_lowercase() != expected.to_lowercase())
            }
            Operation::SubsetOf => Ok(split_set(actual).is_subset(&split_set(expected))),
            Operation::SupersetOf => Ok(split_set(actual).is_superset(&split_set(expected))),
            _ => Err(self.unsupported()),
        }
    }

    fn eval_int(&self, actual: &str) -> Result<bool> {
        let a = parse_int(actual)?;
        let e = parse_int(&self.value)?;
        match self.op {
            Operation::BitwiseAnd => Ok(a & e == e),
            Operation::BitwiseOr => Ok(a | e == e),
            _ => self.relational(a.cmp(&e)),
        }
    }

    fn relational(&self, ord: Ordering) -> Result<bool> {
        self.op.test_ordering(ord).ok_or_else(|| self.unsupported())
    }

    fn compiled_pattern(&self) -> Result<&Regex> {
        self.pattern
            .get_or_init(|| Regex::new(&self.value))
            .as_ref()
            .map_err(|e| Error::PatternCompile {
                pattern: self.value.clone(),
                source: e.clone(),
            })
    }

    fn unsupported(&self) -> Error {
        Error::UnsupportedOperation {
            operation: self.op.to_string(),
            datatype: self.datatype.to_string(),
        }
    }
}

impl PartialEq for ScalarComparator {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op && self.datatype == other.datatype && self.value == other.value
    }
}

/// Compares a full package version against an expected `epoch:version-release`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvrComparator {
    /// Relational comparison to apply
    #[serde(default, alias = "Op")]
    pub op: Operation,

    /// Expected version; epoch and release may be omitted
    #[serde(alias = "Value")]
    pub value: String,
}

impl EvrComparator {
    pub fn new(op: Operation, value: impl Into<String>) -> Self {
        Self {
            op,
            value: value.into(),
        }
    }

    pub fn less_than(value: impl Into<String>) -> Self {
        Self::new(Operation::LessThan, value)
    }

    /// Evaluate against a raw package version, ordering version and release
    /// components with `cmp`
    pub fn eval<F>(&self, actual: &str, cmp: F) -> Result<bool>
    where
        F: Fn(&str, &str) -> Ordering,
    {
        if !self.op.is_relational() {
            return Err(Error::UnsupportedOperation {
                operation: self.op.to_string(),
                datatype: Datatype::EvrString.to_string(),
            });
        }

        let expected = Evr::parse(&self.value)?;
        let actual = Evr::parse(actual)?;
        let ord = compare_evr_partial(&actual, &expected, cmp);

        Ok(self.op.test_ordering(ord).unwrap_or(false))
    }
}

/// A comparator bound to one state field
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    Scalar(ScalarComparator),
    Evr(EvrComparator),
}

impl Comparator {
    /// Evaluate against an extracted value, ordering EVR components with
    /// `rpmvercmp`
    pub fn eval(&self, actual: &str) -> Result<bool> {
        match self {
            Comparator::Scalar(c) => c.eval(actual),
            Comparator::Evr(c) => c.eval(actual, rpmvercmp),
        }
    }
}

impl From<ScalarComparator> for Comparator {
    fn from(c: ScalarComparator) -> Self {
        Comparator::Scalar(c)
    }
}

impl From<EvrComparator> for Comparator {
    fn from(c: EvrComparator) -> Self {
        Comparator::Evr(c)
    }
}

fn split_set(value: &str) -> BTreeSet<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_int(value: &str) -> Result<i64> {
    value.parse().map_err(|_| Error::InvalidValue {
        value: value.to_string(),
        datatype: Datatype::Int.to_string(),
    })
}

fn parse_float(value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(f) if !f.is_nan() => Ok(f),
        _ => Err(Error::InvalidValue {
            value: value.to_string(),
            datatype: Datatype::Float.to_string(),
        }),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::InvalidValue {
            value: value.to_string(),
            datatype: Datatype::Boolean.to_string(),
        }),
    }
}
