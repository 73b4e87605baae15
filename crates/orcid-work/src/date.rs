//! Publication dates from loosely structured metadata

use serde_json::Value;

/// Year, month and day as far as the metadata states them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicationDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PublicationDate {
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Self {
        Self { year, month, day }
    }

    /// A date counts as present once its year is known
    pub fn is_present(&self) -> bool {
        self.year.is_some()
    }
}

/// Reads publication dates from the shapes registries emit:
///
/// - `{"year": 2020, "month": 5, "day": 1}`, values numeric or strings
/// - CSL `{"date-parts": [[2020, 5, 1]]}`, with `raw` / `literal` fallbacks
/// - `"2020-05-01"`, `"2020-05"`, `"2020"`, optionally followed by a time
/// - a bare year number
///
/// Components that are missing, non-numeric or out of range are left empty;
/// nothing is filled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver;

impl DateResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, value: Option<&Value>) -> PublicationDate {
        let Some(value) = value else {
            return PublicationDate::default();
        };
        match value {
            Value::Object(map) => {
                if let Some(parts) = map.get("date-parts") {
                    let first = match parts {
                        Value::Array(rows) => rows.first(),
                        _ => None,
                    };
                    if let Some(Value::Array(row)) = first {
                        return from_components(row.first(), row.get(1), row.get(2));
                    }
                }
                if map.contains_key("year") {
                    return from_components(map.get("year"), map.get("month"), map.get("day"));
                }
                match map.get("raw").or_else(|| map.get("literal")) {
                    Some(Value::String(s)) => from_string(s),
                    _ => PublicationDate::default(),
                }
            }
            Value::String(s) => from_string(s),
            Value::Number(_) => from_components(Some(value), None, None),
            _ => PublicationDate::default(),
        }
    }
}

fn from_components(
    year: Option<&Value>,
    month: Option<&Value>,
    day: Option<&Value>,
) -> PublicationDate {
    PublicationDate {
        year: year.and_then(integer).and_then(|y| i32::try_from(y).ok()),
        month: month.and_then(integer).and_then(|m| in_range(m, 12)),
        day: day.and_then(integer).and_then(|d| in_range(d, 31)),
    }
}

fn from_string(value: &str) -> PublicationDate {
    let date = value.trim();
    let date = date.split(|c: char| c == 'T' || c == ' ').next().unwrap_or(date);
    let mut parts = date.splitn(3, '-').map(|p| Value::String(p.to_string()));
    let year = parts.next();
    let month = parts.next();
    let day = parts.next();
    from_components(year.as_ref(), month.as_ref(), day.as_ref())
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn in_range(value: i64, max: i64) -> Option<u32> {
    if (1..=max).contains(&value) {
        u32::try_from(value).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"year": 2020, "month": 5, "day": 1}), Some(2020), Some(5), Some(1))]
    #[case(json!({"year": "2020", "month": "05"}), Some(2020), Some(5), None)]
    #[case(json!({"year": 2020, "day": 3}), Some(2020), None, Some(3))]
    #[case(json!({"date-parts": [[2020, 5]]}), Some(2020), Some(5), None)]
    #[case(json!({"date-parts": [["2019", "12", "31"]]}), Some(2019), Some(12), Some(31))]
    #[case(json!({"date-parts": [[null]]}), None, None, None)]
    #[case(json!({"raw": "2018-07"}), Some(2018), Some(7), None)]
    #[case(json!("2020-05-01"), Some(2020), Some(5), Some(1))]
    #[case(json!("2020-05-01T12:00:00Z"), Some(2020), Some(5), Some(1))]
    #[case(json!("2020"), Some(2020), None, None)]
    #[case(json!(2021), Some(2021), None, None)]
    #[case(json!({"year": "unknown", "month": 5}), None, Some(5), None)]
    #[case(json!({"year": 2020, "month": 13, "day": 0}), Some(2020), None, None)]
    #[case(json!("soon"), None, None, None)]
    #[case(json!([2020]), None, None, None)]
    fn test_resolve(
        #[case] value: Value,
        #[case] year: Option<i32>,
        #[case] month: Option<u32>,
        #[case] day: Option<u32>,
    ) {
        let date = DateResolver::new().resolve(Some(&value));
        assert_eq!(date, PublicationDate::new(year, month, day));
    }

    #[test]
    fn test_absent_value() {
        let date = DateResolver::new().resolve(None);
        assert_eq!(date, PublicationDate::default());
        assert!(!date.is_present());
    }

    #[test]
    fn test_presence_needs_year() {
        assert!(PublicationDate::new(Some(2020), None, None).is_present());
        assert!(!PublicationDate::new(None, Some(5), Some(1)).is_present());
    }
}
