//! Structured filter - a predicate tree over task fields.

use chrono::NaiveDate;
use worklog_core::{Task, TaskStatus};
use crate::QueryError;

/// Task attributes the query engine can filter and sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Task title
    Title,
    /// Calendar day
    Date,
    /// Hours worked
    HoursWorked,
    /// Approval status
    Status,
    /// Owner's display name
    UserName,
}

/// Value type of a [`Field`], which decides the operators it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, compared case-insensitively
    Text,
    /// Calendar day
    Date,
    /// Whole number
    Number,
    /// Approval status
    Status,
}

impl Field {
    /// All fields.
    pub const ALL: [Field; 5] = [Field::Title, Field::Date, Field::HoursWorked, Field::Status, Field::UserName];

    /// Value type of this field.
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Title | Field::UserName => FieldKind::Text,
            Field::Date => FieldKind::Date,
            Field::HoursWorked => FieldKind::Number,
            Field::Status => FieldKind::Status,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Date => "date",
            Field::HoursWorked => "hoursWorked",
            Field::Status => "status",
            Field::UserName => "userName",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (text, number, status)
    Equals,
    /// Not equal (text, number, status)
    NotEquals,
    /// Substring match
    Contains,
    /// Negated substring match
    DoesNotContain,
    /// Prefix match
    StartsWith,
    /// Suffix match
    EndsWith,
    /// Same day
    On,
    /// Different day
    NotOn,
    /// Strictly earlier day
    Before,
    /// Strictly later day
    After,
    /// Same or earlier day
    OnOrBefore,
    /// Same or later day
    OnOrAfter,
    /// Strictly greater number
    Greater,
    /// Greater or equal number
    GreaterOrEqual,
    /// Strictly smaller number
    Less,
    /// Smaller or equal number
    LessOrEqual,
    /// Value is absent
    IsNull,
    /// Value is present
    IsNotNull,
}

impl Operator {
    /// Whether this operator applies to fields of `kind`.
    pub fn supports(&self, kind: FieldKind) -> bool {
        use Operator::*;
        match kind {
            FieldKind::Text => matches!(
                self,
                Equals | NotEquals | Contains | DoesNotContain | StartsWith | EndsWith | IsNull | IsNotNull
            ),
            FieldKind::Date => matches!(
                self,
                On | NotOn | Before | After | OnOrBefore | OnOrAfter | IsNull | IsNotNull
            ),
            FieldKind::Number => matches!(
                self,
                Equals | NotEquals | Greater | GreaterOrEqual | Less | LessOrEqual
            ),
            FieldKind::Status => matches!(self, Equals | NotEquals),
        }
    }

    /// Whether the operator compares against a value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "neq",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesnotcontain",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::On => "on",
            Operator::NotOn => "noton",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::OnOrBefore => "onorbefore",
            Operator::OnOrAfter => "onorafter",
            Operator::Greater => "gt",
            Operator::GreaterOrEqual => "gte",
            Operator::Less => "lt",
            Operator::LessOrEqual => "lte",
            Operator::IsNull => "isnull",
            Operator::IsNotNull => "isnotnull",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a [`Condition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// No value entered
    Empty,
    /// Text
    Text(String),
    /// Calendar day
    Date(NaiveDate),
    /// Whole number
    Number(u32),
    /// Approval status
    Status(TaskStatus),
}

impl FilterValue {
    fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FilterValue::Empty, FieldKind::Text | FieldKind::Date)
                | (FilterValue::Text(_), FieldKind::Text)
                | (FilterValue::Date(_), FieldKind::Date)
                | (FilterValue::Number(_), FieldKind::Number)
                | (FilterValue::Status(_), FieldKind::Status)
        )
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Empty => Ok(()),
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Status(s) => write!(f, "{}", s),
        }
    }
}

/// A leaf predicate: `field operator value`.
///
/// Construction checks that the operator and value suit the field, so a
/// built condition always evaluates without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    field: Field,
    operator: Operator,
    value: FilterValue,
}

impl Condition {
    /// Build a checked condition. Null checks ignore `value`.
    pub fn new(field: Field, operator: Operator, value: FilterValue) -> Result<Self, QueryError> {
        if !operator.supports(field.kind()) {
            return Err(QueryError::UnsupportedOperator { field, operator });
        }
        let value = if operator.takes_value() { value } else { FilterValue::Empty };
        if !value.fits(field.kind()) {
            return Err(QueryError::InvalidValue { field, value: value.to_string() });
        }
        Ok(Self { field, operator, value })
    }

    /// Filtered field.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Applied operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Compared value.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Evaluate against `task`.
    pub fn matches(&self, task: &Task) -> bool {
        match self.field {
            Field::Title => self.match_text(Some(task.title.as_str())),
            Field::UserName => self.match_text(task.user_name.as_deref()),
            Field::Date => self.match_date(task.date),
            Field::HoursWorked => self.match_number(task.hours_worked),
            Field::Status => self.match_status(task.status),
        }
    }

    fn match_text(&self, actual: Option<&str>) -> bool {
        let wanted = match &self.value {
            FilterValue::Text(s) => s.to_lowercase(),
            _ => String::new(),
        };
        let Some(actual) = actual else {
            return match self.operator {
                Operator::IsNull => true,
                Operator::NotEquals | Operator::DoesNotContain => !wanted.is_empty(),
                Operator::IsNotNull => false,
                _ => wanted.is_empty(),
            };
        };
        let actual = actual.to_lowercase();
        match self.operator {
            Operator::Equals => actual == wanted,
            Operator::NotEquals => actual != wanted,
            Operator::Contains => actual.contains(&wanted),
            Operator::DoesNotContain => !actual.contains(&wanted),
            Operator::StartsWith => actual.starts_with(&wanted),
            Operator::EndsWith => actual.ends_with(&wanted),
            Operator::IsNotNull => true,
            _ => false,
        }
    }

    fn match_date(&self, actual: Option<NaiveDate>) -> bool {
        let wanted = match &self.value {
            FilterValue::Date(d) => Some(*d),
            _ => None,
        };
        match (self.operator, actual, wanted) {
            (Operator::IsNull, a, _) => a.is_none(),
            (Operator::IsNotNull, a, _) => a.is_some(),
            (Operator::On, None, w) => w.is_none(),
            (Operator::NotOn, None, w) => w.is_some(),
            (Operator::NotOn, Some(_), None) => true,
            (_, None, _) | (_, _, None) => false,
            (op, Some(a), Some(w)) => match op {
                Operator::On => a == w,
                Operator::NotOn => a != w,
                Operator::Before => a < w,
                Operator::After => a > w,
                Operator::OnOrBefore => a <= w,
                Operator::OnOrAfter => a >= w,
                _ => false,
            },
        }
    }

    fn match_number(&self, actual: u32) -> bool {
        let FilterValue::Number(wanted) = self.value else {
            return false;
        };
        match self.operator {
            Operator::Equals => actual == wanted,
            Operator::NotEquals => actual != wanted,
            Operator::Greater => actual > wanted,
            Operator::GreaterOrEqual => actual >= wanted,
            Operator::Less => actual < wanted,
            Operator::LessOrEqual => actual <= wanted,
            _ => false,
        }
    }

    fn match_status(&self, actual: TaskStatus) -> bool {
        let FilterValue::Status(wanted) = self.value else {
            return false;
        };
        match self.operator {
            Operator::Equals => actual == wanted,
            Operator::NotEquals => actual != wanted,
            _ => false,
        }
    }
}

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    /// Every child must match
    And,
    /// At least one child must match
    Or,
}

/// A node of the structured filter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    /// Leaf predicate
    Condition(Condition),
    /// Children combined with `logic`. An empty group matches everything.
    Group {
        /// Combinator
        logic: Logic,
        /// Child nodes
        filters: Vec<FilterNode>,
    },
}

impl FilterNode {
    /// Group `filters` with AND.
    pub fn all(filters: Vec<FilterNode>) -> Self {
        FilterNode::Group { logic: Logic::And, filters }
    }

    /// Group `filters` with OR.
    pub fn any(filters: Vec<FilterNode>) -> Self {
        FilterNode::Group { logic: Logic::Or, filters }
    }

    /// Evaluate against `task`.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            FilterNode::Condition(c) => c.matches(task),
            FilterNode::Group { filters, .. } if filters.is_empty() => true,
            FilterNode::Group { logic: Logic::And, filters } => filters.iter().all(|f| f.matches(task)),
            FilterNode::Group { logic: Logic::Or, filters } => filters.iter().any(|f| f.matches(task)),
        }
    }
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        FilterNode::Condition(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::{TaskId, UserId};

    fn task(title: &str, date: Option<(i32, u32, u32)>, hours: u32, user_name: Option<&str>) -> Task {
        Task {
            id: TaskId::from(1),
            title: title.to_string(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            hours_worked: hours,
            status: TaskStatus::Pending,
            user_id: UserId::from(1),
            user_name: user_name.map(str::to_string),
        }
    }

    fn cond(field: Field, op: Operator, value: FilterValue) -> Condition {
        Condition::new(field, op, value).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> FilterValue {
        FilterValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let t = task("Quarterly REPORT", None, 1, None);
        assert!(cond(Field::Title, Operator::Contains, FilterValue::Text("report".into())).matches(&t));
        assert!(cond(Field::Title, Operator::StartsWith, FilterValue::Text("quart".into())).matches(&t));
        assert!(cond(Field::Title, Operator::Equals, FilterValue::Text("quarterly report".into())).matches(&t));
        assert!(!cond(Field::Title, Operator::DoesNotContain, FilterValue::Text("Rep".into())).matches(&t));
    }

    #[test]
    fn test_null_text_matches_only_empty_value() {
        let t = task("x", None, 1, None);
        assert!(!cond(Field::UserName, Operator::Contains, FilterValue::Text("a".into())).matches(&t));
        assert!(!cond(Field::UserName, Operator::Equals, FilterValue::Text("a".into())).matches(&t));
        assert!(cond(Field::UserName, Operator::Equals, FilterValue::Empty).matches(&t));
        assert!(cond(Field::UserName, Operator::Contains, FilterValue::Text(String::new())).matches(&t));
        assert!(cond(Field::UserName, Operator::NotEquals, FilterValue::Text("a".into())).matches(&t));
        assert!(cond(Field::UserName, Operator::IsNull, FilterValue::Empty).matches(&t));
    }

    #[test]
    fn test_date_operators() {
        let t = task("x", Some((2024, 3, 1)), 1, None);
        assert!(cond(Field::Date, Operator::On, day(2024, 3, 1)).matches(&t));
        assert!(cond(Field::Date, Operator::Before, day(2024, 3, 2)).matches(&t));
        assert!(!cond(Field::Date, Operator::Before, day(2024, 3, 1)).matches(&t));
        assert!(cond(Field::Date, Operator::OnOrBefore, day(2024, 3, 1)).matches(&t));
        assert!(cond(Field::Date, Operator::After, day(2024, 2, 29)).matches(&t));
        assert!(cond(Field::Date, Operator::NotOn, day(2024, 2, 29)).matches(&t));
    }

    #[test]
    fn test_undated_never_matches_date_comparisons() {
        let t = task("x", None, 1, None);
        for op in [Operator::On, Operator::Before, Operator::After, Operator::OnOrAfter] {
            assert!(!cond(Field::Date, op, day(2024, 3, 1)).matches(&t), "{}", op);
        }
        assert!(cond(Field::Date, Operator::On, FilterValue::Empty).matches(&t));
        assert!(cond(Field::Date, Operator::IsNull, FilterValue::Empty).matches(&t));
    }

    #[test]
    fn test_number_operators() {
        let t = task("x", None, 8, None);
        assert!(cond(Field::HoursWorked, Operator::Equals, FilterValue::Number(8)).matches(&t));
        assert!(cond(Field::HoursWorked, Operator::Greater, FilterValue::Number(4)).matches(&t));
        assert!(!cond(Field::HoursWorked, Operator::Less, FilterValue::Number(8)).matches(&t));
        assert!(cond(Field::HoursWorked, Operator::LessOrEqual, FilterValue::Number(8)).matches(&t));
    }

    #[test]
    fn test_condition_rejects_mismatched_operator_and_value() {
        assert!(matches!(
            Condition::new(Field::Date, Operator::Contains, FilterValue::Text("x".into())),
            Err(QueryError::UnsupportedOperator { field: Field::Date, .. })
        ));
        assert!(matches!(
            Condition::new(Field::HoursWorked, Operator::Equals, FilterValue::Text("8".into())),
            Err(QueryError::InvalidValue { field: Field::HoursWorked, .. })
        ));
    }

    #[test]
    fn test_groups() {
        let t = task("Report", Some((2024, 3, 1)), 8, Some("ana"));
        let report = FilterNode::from(cond(Field::Title, Operator::Contains, FilterValue::Text("report".into())));
        let long = FilterNode::from(cond(Field::HoursWorked, Operator::Greater, FilterValue::Number(10)));

        assert!(!FilterNode::all(vec![report.clone(), long.clone()]).matches(&t));
        assert!(FilterNode::any(vec![report, long]).matches(&t));
        assert!(FilterNode::all(vec![]).matches(&t));
        assert!(FilterNode::any(vec![]).matches(&t));
    }
}
