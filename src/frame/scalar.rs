//! JSON-native scalar values

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single feature or prediction value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view used by scalers and models
    ///
    /// Bools count as 0/1, null becomes NaN and text must parse as a float.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Scalar::Null => Some(f64::NAN),
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }

    /// True for integer and float values
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    /// Interpret the value as an index into a label list
    ///
    /// Integers are used directly and finite floats are truncated toward zero.
    /// Negative values never index.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Scalar::Int(i) => usize::try_from(*i).ok(),
            Scalar::Float(f) if f.is_finite() && *f > -1.0 => Some(f.trunc() as usize),
            _ => None,
        }
    }

    /// Category comparison that tolerates `1` vs `1.0`
    pub fn same_category(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                (*a as f64) == *b
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<Scalar> = serde_json::from_str(r#"[null, true, 3, 2.5, "red"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Null,
                Scalar::Bool(true),
                Scalar::Int(3),
                Scalar::Float(2.5),
                Scalar::Text("red".into()),
            ]
        );
    }

    #[test]
    fn test_as_index() {
        assert_eq!(Scalar::Int(1).as_index(), Some(1));
        assert_eq!(Scalar::Float(2.0).as_index(), Some(2));
        assert_eq!(Scalar::Float(1.7).as_index(), Some(1));
        assert_eq!(Scalar::Int(-1).as_index(), None);
        assert_eq!(Scalar::Float(-3.0).as_index(), None);
        assert_eq!(Scalar::Float(f64::NAN).as_index(), None);
        assert_eq!(Scalar::Text("1".into()).as_index(), None);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Scalar::Text(" 4.5 ".into()).to_f64(), Some(4.5));
        assert_eq!(Scalar::Bool(true).to_f64(), Some(1.0));
        assert!(Scalar::Null.to_f64().unwrap().is_nan());
        assert_eq!(Scalar::Text("blue".into()).to_f64(), None);
    }

    #[test]
    fn test_same_category() {
        assert!(Scalar::Int(1).same_category(&Scalar::Float(1.0)));
        assert!(!Scalar::Int(1).same_category(&Scalar::Text("1".into())));
    }
}
