use std::fmt::Display;

/// A single untyped spreadsheet cell value.
///
/// Carries what the source actually stored; interpretation (missing-value
/// detection, numeric coercion) happens at the point of use so that raw
/// tables stay faithful to the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent cell, or a cell the source reports as an error
    #[default]
    Missing,
    /// Numeric cell
    Number(f64),
    /// Boolean cell
    Bool(bool),
    /// Text cell
    Text(String),
}

impl Value {
    /// Returns true if this cell counts as a missing value.
    /// Blank text is missing; spreadsheets routinely store it for empty cells.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Attempts numeric coercion. Booleans map to 0/1, text is parsed.
    /// Non-finite results ("nan", "inf", overflowing literals) never
    /// coerce; downstream tables hold finite numbers only.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number).filter(|number| number.is_finite()),
            Value::Bool(boolean) => Some(if *boolean { 1.0 } else { 0.0 }),
            Value::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite()),
            Value::Missing => None,
        }
    }
}

impl Display for Value {
    /// Renders the cell the way a header label should read:
    /// integral numbers without a trailing ".0", missing cells as empty text.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(number) if number.fract() == 0.0 && number.is_finite() => {
                write!(f, "{}", *number as i64)
            }
            Value::Number(number) => write!(f, "{number}"),
            Value::Bool(boolean) => write!(f, "{boolean}"),
            Value::Text(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_detection() {
        assert!(Value::Missing.is_missing());
        assert!(Value::Text("".to_owned()).is_missing());
        assert!(Value::Text("  ".to_owned()).is_missing());
        assert!(!Value::Text("0".to_owned()).is_missing());
        assert!(!Value::Number(0.0).is_missing());
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
        assert_eq!(Value::Bool(true).as_number(), Some(1.0));
        assert_eq!(Value::Text(" 3.25 ".to_owned()).as_number(), Some(3.25));
        assert_eq!(Value::Text("three".to_owned()).as_number(), None);
        assert_eq!(Value::Missing.as_number(), None);
    }

    #[test]
    fn non_finite_values_do_not_coerce() {
        assert_eq!(Value::Text("nan".to_owned()).as_number(), None);
        assert_eq!(Value::Text("inf".to_owned()).as_number(), None);
        assert_eq!(Value::Text("1e999".to_owned()).as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn header_rendering() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(7.5).to_string(), "7.5");
        assert_eq!(Value::Text("Area".to_owned()).to_string(), "Area");
        assert_eq!(Value::Missing.to_string(), "");
    }
}
