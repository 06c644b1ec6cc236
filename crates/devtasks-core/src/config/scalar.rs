//! Scalar values produced by config resolution

use serde_json::Number;
use std::fmt;

/// A resolved replacement value: either a string or a number
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(Number::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_is_verbatim() {
        assert_eq!(Scalar::from("a {{b}} $c").to_string(), "a {{b}} $c");
    }

    #[test]
    fn test_display_number() {
        assert_eq!(Scalar::from(2024).to_string(), "2024");
        let float = Scalar::Number(Number::from_f64(1.5).unwrap());
        assert_eq!(float.to_string(), "1.5");
    }
}
