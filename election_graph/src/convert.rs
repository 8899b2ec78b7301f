//! Converters from raw input values to typed values.
//!
//! Input records come either from JSON exports, where values already carry
//! some type information, or from delimited files, where everything is a
//! string. All the converters accept both shapes.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde_json::Value as JSValue;
use snafu::{ResultExt, Snafu};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Snafu)]
pub enum ConvertError {
    #[snafu(display("expected {expected}"))]
    WrongType { expected: &'static str },
    #[snafu(display("not a base-10 integer"))]
    NotAnInteger { source: std::num::ParseIntError },
    #[snafu(display("not a boolean"))]
    NotABool {},
    #[snafu(display("not a date in the format {format}"))]
    BadDate {
        source: chrono::ParseError,
        format: &'static str,
    },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Parses an id. Numbers are accepted and rendered as decimal strings.
pub fn parse_id(value: &JSValue) -> ConvertResult<String> {
    debug!("parse_id: {:?}", value);
    match value {
        JSValue::String(s) => Ok(s.clone()),
        JSValue::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => WrongTypeSnafu { expected: "a string or integer id" }.fail(),
    }
}

/// Parses a list of ids, given either as a space-separated string or as an
/// array of ids.
pub fn parse_ids(value: &JSValue) -> ConvertResult<Vec<String>> {
    match value {
        JSValue::String(s) => Ok(s.split_whitespace().map(|x| x.to_string()).collect()),
        JSValue::Array(elts) => elts.iter().map(parse_id).collect(),
        _ => WrongTypeSnafu {
            expected: "a space-separated list of ids",
        }
        .fail(),
    }
}

pub fn parse_int(value: &JSValue) -> ConvertResult<Option<i64>> {
    debug!("parse_int: {:?}", value);
    match value {
        JSValue::Null => Ok(None),
        JSValue::Number(n) => match n.as_i64() {
            Some(x) => Ok(Some(x)),
            None => WrongTypeSnafu {
                expected: "an integer",
            }
            .fail(),
        },
        JSValue::String(s) if s.trim().is_empty() => Ok(None),
        JSValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .context(NotAnIntegerSnafu),
        _ => WrongTypeSnafu {
            expected: "an integer",
        }
        .fail(),
    }
}

/// Tri-state boolean: `None` when the value is empty.
///
/// Strings starting with one of `YyTt1` are true, with one of `NnFf0` are
/// false. Other integer strings are true when nonzero.
pub fn parse_bool(value: &JSValue) -> ConvertResult<Option<bool>> {
    debug!("parse_bool: {:?}", value);
    match value {
        JSValue::Null => Ok(None),
        JSValue::Bool(b) => Ok(Some(*b)),
        JSValue::Number(n) => match n.as_i64() {
            Some(x) => Ok(Some(x != 0)),
            None => NotABoolSnafu.fail(),
        },
        JSValue::String(s) => match s.chars().next() {
            None => Ok(None),
            Some(c) if "YyTt1".contains(c) => Ok(Some(true)),
            Some(c) if "NnFf0".contains(c) => Ok(Some(false)),
            Some(_) => match s.trim().parse::<i64>() {
                Ok(x) => Ok(Some(x != 0)),
                Err(_) => NotABoolSnafu.fail(),
            },
        },
        _ => NotABoolSnafu.fail(),
    }
}

pub fn parse_date(value: &JSValue) -> ConvertResult<NaiveDate> {
    debug!("parse_date: {:?}", value);
    let s = value.as_str().ok_or(ConvertError::WrongType {
        expected: "a date string",
    })?;
    NaiveDate::parse_from_str(s, DATE_FORMAT).context(BadDateSnafu {
        format: DATE_FORMAT,
    })
}

pub fn parse_date_time(value: &JSValue) -> ConvertResult<NaiveDateTime> {
    debug!("parse_date_time: {:?}", value);
    let s = value.as_str().ok_or(ConvertError::WrongType {
        expected: "a date time string",
    })?;
    NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT).context(BadDateSnafu {
        format: DATE_TIME_FORMAT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_values() {
        assert_eq!(parse_bool(&json!("Y")).unwrap(), Some(true));
        assert_eq!(parse_bool(&json!("n")).unwrap(), Some(false));
        assert_eq!(parse_bool(&json!("")).unwrap(), None);
        assert_eq!(parse_bool(&json!("2")).unwrap(), Some(true));
        assert_eq!(parse_bool(&json!("true")).unwrap(), Some(true));
        assert_eq!(parse_bool(&json!("False")).unwrap(), Some(false));
        assert_eq!(parse_bool(&json!(0)).unwrap(), Some(false));
        assert_eq!(parse_bool(&json!(7)).unwrap(), Some(true));
        assert_eq!(parse_bool(&json!(false)).unwrap(), Some(false));
        assert!(matches!(
            parse_bool(&json!("maybe")),
            Err(ConvertError::NotABool {})
        ));
        assert!(parse_bool(&json!([1])).is_err());
    }

    #[test]
    fn int_values() {
        assert_eq!(parse_int(&json!("")).unwrap(), None);
        assert_eq!(parse_int(&json!("042")).unwrap(), Some(42));
        assert_eq!(parse_int(&json!(" 7 ")).unwrap(), Some(7));
        assert_eq!(parse_int(&json!(-3)).unwrap(), Some(-3));
        assert!(matches!(
            parse_int(&json!("abc")),
            Err(ConvertError::NotAnInteger { .. })
        ));
        assert!(parse_int(&json!(1.5)).is_err());
    }

    #[test]
    fn dates() {
        let d = parse_date(&json!("2016-11-08")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2016, 11, 8).unwrap());
        assert!(parse_date(&json!("11/08/2016")).is_err());
        assert!(parse_date(&json!(20161108)).is_err());

        let dt = parse_date_time(&json!("2018-06-05 20:51:00")).unwrap();
        assert_eq!(dt.to_string(), "2018-06-05 20:51:00");
        assert!(parse_date_time(&json!("2018-06-05")).is_err());
    }

    #[test]
    fn ids() {
        assert_eq!(parse_id(&json!("42")).unwrap(), "42");
        assert_eq!(parse_id(&json!(100)).unwrap(), "100");
        assert!(parse_id(&json!(true)).is_err());
        assert_eq!(
            parse_ids(&json!("RSReg  RSCst RSTot")).unwrap(),
            vec!["RSReg", "RSCst", "RSTot"]
        );
        assert_eq!(parse_ids(&json!(["a", 2])).unwrap(), vec!["a", "2"]);
        assert!(parse_ids(&json!("")).unwrap().is_empty());
    }
}
