//! Logical operators that fold per-field results into one verdict

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical operator of a state
///
/// Accepts both the OVAL operator tags (`AND`, `ONE`, `OR`, `XOR`) and the
/// check enumeration tags (`all`, `at least one`, `only one`, `none satisfy`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// All results are true
    #[default]
    #[serde(rename = "AND", alias = "all")]
    And,
    /// At least one result is true
    #[serde(rename = "OR")]
    Or,
    /// Same as `Or`, kept distinct for definitions that name it
    #[serde(rename = "AT_LEAST_ONE", alias = "at least one")]
    AtLeastOne,
    /// Exactly one result is true
    #[serde(rename = "ONLY_ONE", alias = "ONE", alias = "only one")]
    OnlyOne,
    /// An odd number of results are true
    #[serde(rename = "XOR")]
    Xor,
    /// No result is true
    #[serde(rename = "NONE", alias = "NONE_SATISFY", alias = "none satisfy")]
    NoneSatisfy,
}

impl Operator {
    /// Fold the results.
    ///
    /// Callers must pass at least one result.
    pub fn eval(&self, results: &[bool]) -> bool {
        debug_assert!(!results.is_empty(), "operator applied to no results");

        let trues = results.iter().filter(|r| **r).count();
        match self {
            Operator::And => trues == results.len(),
            Operator::Or | Operator::AtLeastOne => trues > 0,
            Operator::OnlyOne => trues == 1,
            Operator::Xor => trues % 2 == 1,
            Operator::NoneSatisfy => trues == 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::AtLeastOne => "AT_LEAST_ONE",
            Operator::OnlyOne => "ONLY_ONE",
            Operator::Xor => "XOR",
            Operator::NoneSatisfy => "NONE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_folding() {
        let mixed = [true, true, false];

        assert!(!Operator::And.eval(&mixed));
        assert!(Operator::Or.eval(&mixed));
        assert!(Operator::AtLeastOne.eval(&mixed));
        assert!(!Operator::OnlyOne.eval(&mixed));
        assert!(Operator::OnlyOne.eval(&[true, false, false]));
        assert!(Operator::NoneSatisfy.eval(&[false, false]));
        assert!(!Operator::NoneSatisfy.eval(&[false, true]));
        assert!(Operator::And.eval(&[true]));
    }

    #[test]
    fn test_xor_is_parity() {
        assert!(Operator::Xor.eval(&[true, false]));
        assert!(!Operator::Xor.eval(&[true, true]));
        assert!(Operator::Xor.eval(&[true, true, true]));
        assert!(!Operator::Xor.eval(&[false, false]));
    }

    #[test]
    fn test_operator_tags() {
        let op: Operator = serde_json::from_str(r#""ONE""#).unwrap();
        assert_eq!(op, Operator::OnlyOne);
        let op: Operator = serde_json::from_str(r#""none satisfy""#).unwrap();
        assert_eq!(op, Operator::NoneSatisfy);
        let op: Operator = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(op, Operator::And);
        assert!(serde_json::from_str::<Operator>(r#""NAND""#).is_err());
        assert_eq!(serde_json::to_string(&Operator::Xor).unwrap(), r#""XOR""#);
    }
}
