//! Single-column stable sort.

use std::cmp::Ordering;
use chrono::NaiveDate;
use worklog_core::Task;
use crate::filter::Field;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// The active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Sorted field
    pub field: Field,
    /// Direction
    pub direction: Direction,
}

impl SortSpec {
    /// Ascending sort on `field`.
    pub fn ascending(field: Field) -> Self {
        Self { field, direction: Direction::Ascending }
    }

    /// Descending sort on `field`.
    pub fn descending(field: Field) -> Self {
        Self { field, direction: Direction::Descending }
    }

    /// Compare two tasks under this sort.
    ///
    /// Missing values (undated tasks, absent names) come first regardless of
    /// direction; the direction only orders present values.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self.field {
            Field::Title => self.direction.apply(cmp_text(&a.title, &b.title)),
            Field::UserName => self.nulls_first(a.user_name.as_deref(), b.user_name.as_deref(), cmp_text),
            Field::Date => self.nulls_first(a.date.as_ref(), b.date.as_ref(), |x: &NaiveDate, y: &NaiveDate| x.cmp(y)),
            Field::HoursWorked => self.direction.apply(a.hours_worked.cmp(&b.hours_worked)),
            Field::Status => self.direction.apply(a.status.cmp(&b.status)),
        }
    }

    fn nulls_first<T: ?Sized>(
        &self,
        a: Option<&T>,
        b: Option<&T>,
        cmp: impl Fn(&T, &T) -> Ordering,
    ) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.direction.apply(cmp(a, b)),
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort `rows` in place. Equal keys keep their input order.
pub fn sort_rows(rows: &mut [&Task], spec: &SortSpec) {
    rows.sort_by(|a, b| spec.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::{TaskId, TaskStatus, UserId};

    fn task(id: i64, title: &str, day: Option<u32>, hours: u32) -> Task {
        Task {
            id: TaskId::from(id),
            title: title.to_string(),
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 3, d)),
            hours_worked: hours,
            status: TaskStatus::Pending,
            user_id: UserId::from(1),
            user_name: None,
        }
    }

    fn ids(rows: &[&Task]) -> Vec<String> {
        rows.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_undated_first_in_both_directions() {
        let tasks = vec![task(1, "a", Some(5), 1), task(2, "b", None, 1), task(3, "c", Some(1), 1), task(4, "d", None, 1)];

        let mut rows: Vec<&Task> = tasks.iter().collect();
        sort_rows(&mut rows, &SortSpec::ascending(Field::Date));
        assert_eq!(ids(&rows), ["2", "4", "3", "1"]);

        let mut rows: Vec<&Task> = tasks.iter().collect();
        sort_rows(&mut rows, &SortSpec::descending(Field::Date));
        assert_eq!(ids(&rows), ["2", "4", "1", "3"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let tasks = vec![task(1, "x", None, 4), task(2, "y", None, 2), task(3, "z", None, 4), task(4, "w", None, 2)];

        let mut rows: Vec<&Task> = tasks.iter().collect();
        sort_rows(&mut rows, &SortSpec::descending(Field::HoursWorked));
        assert_eq!(ids(&rows), ["1", "3", "2", "4"]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let tasks = vec![task(1, "beta", None, 1), task(2, "Alpha", None, 1), task(3, "alpha", None, 1)];

        let mut rows: Vec<&Task> = tasks.iter().collect();
        sort_rows(&mut rows, &SortSpec::ascending(Field::Title));
        assert_eq!(ids(&rows), ["2", "3", "1"]);
    }
}
