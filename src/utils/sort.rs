//! Ordering of listed records by an arbitrary JSON field.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort records by `field`.
///
/// Missing and null values compare as the empty string. Two numbers compare
/// numerically; anything else compares as case-insensitive text. The sort is
/// stable, so records with equal keys keep their incoming order.
pub fn sort_records(mut records: Vec<Value>, field: &str, direction: SortDirection) -> Vec<Value> {
    records.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    records
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    if let (Some(Value::Number(x)), Some(Value::Number(y))) = (a, b)
        && let (Some(x), Some(y)) = (x.as_f64(), y.as_f64())
    {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.to_lowercase(),
        Some(other) => other.to_string().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(records: &[Value]) -> Vec<i64> {
        records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn numbers_sort_numerically() {
        let records = vec![
            json!({"id": 1, "quantidade_total": 10}),
            json!({"id": 2, "quantidade_total": 9}),
            json!({"id": 3, "quantidade_total": 100}),
        ];
        let sorted = sort_records(records, "quantidade_total", SortDirection::Asc);
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn text_ignores_case_and_nulls_sort_first() {
        let records = vec![
            json!({"id": 1, "titulo": "banana"}),
            json!({"id": 2, "titulo": null}),
            json!({"id": 3, "titulo": "Abacaxi"}),
            json!({"id": 4}),
        ];
        let sorted = sort_records(records, "titulo", SortDirection::Asc);
        assert_eq!(ids(&sorted), vec![2, 4, 3, 1]);
    }

    #[test]
    fn descending_reverses_and_stays_stable() {
        let records = vec![
            json!({"id": 1, "status": "ativo"}),
            json!({"id": 2, "status": "devolvido"}),
            json!({"id": 3, "status": "ativo"}),
        ];
        let sorted = sort_records(records, "status", SortDirection::Desc);
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn direction_parses_from_lowercase() {
        let d: SortDirection = serde_json::from_str(r#""desc""#).unwrap();
        assert_eq!(d, SortDirection::Desc);
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }
}
