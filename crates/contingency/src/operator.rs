//! Threshold comparison operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContingencyError;

/// Comparison applied to both the forecast and the observed value.
///
/// Serialised as its symbol (`">"`, `">="`, `"<"`, `"<="`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Strictly greater than.
    #[default]
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,
    /// Strictly less than.
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,
}

impl Operator {
    /// Returns true when `value` crosses `threshold` under this operator.
    #[inline]
    pub fn crosses(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Ge => value >= threshold,
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
        }
    }

    /// The operator's symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ContingencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" | "gt" => Ok(Self::Gt),
            ">=" | "ge" => Ok(Self::Ge),
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" => Ok(Self::Le),
            other => Err(ContingencyError::UnknownOperator {
                symbol: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crosses_at_boundary() {
        assert!(!Operator::Gt.crosses(10.0, 10.0));
        assert!(Operator::Ge.crosses(10.0, 10.0));
        assert!(!Operator::Lt.crosses(10.0, 10.0));
        assert!(Operator::Le.crosses(10.0, 10.0));
    }

    #[test]
    fn test_crosses_off_boundary() {
        assert!(Operator::Gt.crosses(10.1, 10.0));
        assert!(Operator::Ge.crosses(10.1, 10.0));
        assert!(!Operator::Lt.crosses(10.1, 10.0));
        assert!(!Operator::Le.crosses(10.1, 10.0));
    }

    #[test]
    fn test_parse_symbols_and_names() {
        assert_eq!(">".parse::<Operator>().unwrap(), Operator::Gt);
        assert_eq!(" >= ".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("lt".parse::<Operator>().unwrap(), Operator::Lt);
        assert_eq!("<=".parse::<Operator>().unwrap(), Operator::Le);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "==".parse::<Operator>().unwrap_err();
        assert!(matches!(err, ContingencyError::UnknownOperator { symbol } if symbol == "=="));
    }

    #[test]
    fn test_display_matches_parse() {
        for op in [Operator::Gt, Operator::Ge, Operator::Lt, Operator::Le] {
            assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_serde_uses_symbols() {
        assert_eq!(serde_json::to_string(&Operator::Le).unwrap(), "\"<=\"");
        let op: Operator = serde_json::from_str("\">\"").unwrap();
        assert_eq!(op, Operator::Gt);
    }
}
