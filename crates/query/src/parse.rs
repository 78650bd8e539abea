//! Text forms of filter conditions and sort specs for command-line use.
//!
//! Conditions read `<field> <operator> [value]`, e.g. `title contains weekly
//! report`, `date < 2024-03-01`, `hours >= 4`, `status = approved`,
//! `employee isnull`. Symbolic operators are mapped by field type, so `<`
//! means `before` on dates and `lt` on hours.

use std::str::FromStr;
use worklog_core::{parse_day, TaskStatus};
use crate::filter::{Condition, Field, FieldKind, FilterValue, Operator};
use crate::sort::{Direction, SortSpec};
use crate::QueryError;

impl FromStr for Field {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "title" => Ok(Field::Title),
            "date" | "day" => Ok(Field::Date),
            "hours" | "hoursworked" => Ok(Field::HoursWorked),
            "status" => Ok(Field::Status),
            "employee" | "username" | "user" => Ok(Field::UserName),
            _ => Err(QueryError::UnknownField(s.to_string())),
        }
    }
}

fn operator_for(token: &str, kind: FieldKind) -> Option<Operator> {
    use Operator::*;
    let token = token.to_lowercase();
    let op = match (token.as_str(), kind) {
        ("=" | "==" | "eq" | "equals" | "is", FieldKind::Date) => On,
        ("=" | "==" | "eq" | "equals" | "is", _) => Equals,
        ("!=" | "<>" | "ne" | "neq" | "not", FieldKind::Date) => NotOn,
        ("!=" | "<>" | "ne" | "neq" | "not", _) => NotEquals,
        ("on", _) => On,
        ("noton", _) => NotOn,
        ("before", _) => Before,
        ("after", _) => After,
        ("onorbefore", _) => OnOrBefore,
        ("onorafter", _) => OnOrAfter,
        ("<" | "lt", FieldKind::Date) => Before,
        ("<" | "lt", _) => Less,
        ("<=" | "lte", FieldKind::Date) => OnOrBefore,
        ("<=" | "lte", _) => LessOrEqual,
        (">" | "gt", FieldKind::Date) => After,
        (">" | "gt", _) => Greater,
        (">=" | "gte", FieldKind::Date) => OnOrAfter,
        (">=" | "gte", _) => GreaterOrEqual,
        ("contains" | "~", _) => Contains,
        ("doesnotcontain" | "!contains" | "!~", _) => DoesNotContain,
        ("startswith", _) => StartsWith,
        ("endswith", _) => EndsWith,
        ("isnull", _) => IsNull,
        ("isnotnull", _) => IsNotNull,
        _ => return None,
    };
    Some(op)
}

fn value_for(field: Field, raw: &str) -> Result<FilterValue, QueryError> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    if raw.is_empty() {
        return Ok(FilterValue::Empty);
    }
    let invalid = || QueryError::InvalidValue { field, value: raw.to_string() };
    match field.kind() {
        FieldKind::Text => Ok(FilterValue::Text(raw.to_string())),
        FieldKind::Date => parse_day(raw).map(FilterValue::Date).ok_or_else(invalid),
        FieldKind::Number => raw.parse().map(FilterValue::Number).map_err(|_| invalid()),
        FieldKind::Status => raw.parse::<TaskStatus>().map(FilterValue::Status).map_err(|_| invalid()),
    }
}

impl FromStr for Condition {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.splitn(3, char::is_whitespace);
        let field: Field = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| QueryError::Malformed(s.to_string()))?
            .parse()?;
        let token = parts.next().ok_or_else(|| QueryError::Malformed(s.to_string()))?;
        let operator = operator_for(token, field.kind())
            .ok_or_else(|| QueryError::UnknownOperator(token.to_string()))?;
        if !operator.supports(field.kind()) {
            return Err(QueryError::UnsupportedOperator { field, operator });
        }
        let value = if operator.takes_value() {
            value_for(field, parts.next().unwrap_or_default())?
        } else {
            FilterValue::Empty
        };
        Condition::new(field, operator, value)
    }
}

impl FromStr for SortSpec {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.trim().split_once(':') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_lowercase().as_str() {
                    "asc" | "ascending" => Direction::Ascending,
                    "desc" | "descending" => Direction::Descending,
                    _ => return Err(QueryError::Malformed(s.to_string())),
                };
                (field, direction)
            }
            None => (s, Direction::Ascending),
        };
        Ok(SortSpec { field: field.parse()?, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_conditions() {
        let c: Condition = "title contains weekly report".parse().unwrap();
        assert_eq!(c.field(), Field::Title);
        assert_eq!(c.operator(), Operator::Contains);
        assert_eq!(c.value(), &FilterValue::Text("weekly report".into()));

        let c: Condition = "date < 2024-03-01".parse().unwrap();
        assert_eq!(c.operator(), Operator::Before);
        assert_eq!(c.value(), &FilterValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));

        let c: Condition = "hours >= 4".parse().unwrap();
        assert_eq!(c.operator(), Operator::GreaterOrEqual);
        assert_eq!(c.value(), &FilterValue::Number(4));

        let c: Condition = "status = approved".parse().unwrap();
        assert_eq!(c.value(), &FilterValue::Status(TaskStatus::Approved));

        let c: Condition = "employee isnull".parse().unwrap();
        assert_eq!(c.operator(), Operator::IsNull);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("colour = red".parse::<Condition>(), Err(QueryError::UnknownField(_))));
        assert!(matches!("title ?? x".parse::<Condition>(), Err(QueryError::UnknownOperator(_))));
        assert!(matches!("hours = lots".parse::<Condition>(), Err(QueryError::InvalidValue { .. })));
        assert!(matches!("date contains 2024".parse::<Condition>(), Err(QueryError::UnsupportedOperator { .. })));
        assert!(matches!("title".parse::<Condition>(), Err(QueryError::Malformed(_))));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!("date:desc".parse::<SortSpec>().unwrap(), SortSpec::descending(Field::Date));
        assert_eq!("hours".parse::<SortSpec>().unwrap(), SortSpec::ascending(Field::HoursWorked));
        assert!("date:sideways".parse::<SortSpec>().is_err());
    }
}
