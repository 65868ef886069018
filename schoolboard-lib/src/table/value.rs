//! Cell values produced by column accessors.

use std::cmp::Ordering;
use std::fmt;

/// A single cell value.
///
/// Accessors map a row to one of these; filtering works on the display
/// text and sorting on the typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or null field.
    #[default]
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Converts a JSON value. Null becomes `Empty`; arrays and objects are
    /// kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Empty),
            },
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Ascending comparison of two non-empty values.
    ///
    /// Numbers compare numerically across `Integer`/`Float`, text compares
    /// case-insensitively with the raw text as tie-breaker, and values of
    /// different kinds order as bool < number < text.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Integer(a), Self::Float(b)) => cmp_int_float(*a, *b),
            (Self::Float(a), Self::Integer(b)) => cmp_int_float(*b, *a).reverse(),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

/// Exact comparison of an integer with a float, without rounding the
/// integer through `f64`. NaN orders like `f64::total_cmp`.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    // 2^63 is exactly representable; i64 covers [-2^63, 2^63)
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= BOUND {
        return Ordering::Less;
    }
    if float < -BOUND {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    int.cmp(&(whole as i64)).then_with(|| {
        let fraction = float - whole;
        0.0_f64.partial_cmp(&fraction).unwrap_or(Ordering::Equal)
    })
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from(90).to_string(), "90");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from("Ana").to_string(), "Ana");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(CellValue::from_json(&serde_json::json!(null)), CellValue::Empty);
        assert_eq!(CellValue::from_json(&serde_json::json!(7)), CellValue::Integer(7));
        assert_eq!(CellValue::from_json(&serde_json::json!(7.5)), CellValue::Float(7.5));
        assert_eq!(
            CellValue::from_json(&serde_json::json!("x")),
            CellValue::Text("x".into())
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(CellValue::from(2).compare(&CellValue::from(10)), Ordering::Less);
        assert_eq!(CellValue::from(2.5).compare(&CellValue::from(2)), Ordering::Greater);
        assert_eq!(CellValue::from("budi").compare(&CellValue::from("Cici")), Ordering::Less);
        assert_eq!(CellValue::from(100).compare(&CellValue::from("a")), Ordering::Less);
    }

    #[test]
    fn test_compare_int_float_exact_past_f64_precision() {
        let big = 1_i64 << 53;
        let above = CellValue::Integer(big + 1);
        let float = CellValue::Float(big as f64);

        assert_eq!(above.compare(&float), Ordering::Greater);
        assert_eq!(float.compare(&above), Ordering::Less);
        assert_eq!(CellValue::Integer(big).compare(&float), Ordering::Equal);
        assert_eq!(CellValue::Integer(-1).compare(&CellValue::Float(-1.5)), Ordering::Greater);
        assert_eq!(CellValue::Integer(i64::MAX).compare(&CellValue::Float(1e19)), Ordering::Less);
        assert_eq!(CellValue::Integer(0).compare(&CellValue::Float(f64::NAN)), Ordering::Less);
        assert_eq!(CellValue::Float(-0.0).compare(&CellValue::Float(0.0)), Ordering::Equal);
    }
}
