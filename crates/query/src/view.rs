//! Deriving the displayed page from a task collection.
//!
//! [`compute_view`] is the single entry point: filter tree, then overlays,
//! then sort, then the page window. It keeps no state between calls, so a
//! view recomputed after a collection changes can never show stale rows.

use serde::Serialize;
use worklog_core::Task;
use crate::filter::FilterNode;
use crate::overlay::Overlays;
use crate::page::PageRequest;
use crate::sort::{sort_rows, SortSpec};

/// One page of rows plus the number of rows that matched before paging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    /// Rows in display order
    pub rows: Vec<Task>,
    /// Rows matching the filters, before pagination
    pub total: usize,
}

/// Rows of `tasks` matching both filter layers, in input order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    filter: Option<&FilterNode>,
    overlays: &Overlays,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| filter.map_or(true, |f| f.matches(t)))
        .filter(|t| overlays.matches(t))
        .collect()
}

/// Filter, sort and paginate `tasks`.
pub fn compute_view(
    tasks: &[Task],
    filter: Option<&FilterNode>,
    overlays: &Overlays,
    sort: Option<&SortSpec>,
    page: PageRequest,
) -> View {
    let mut rows = filter_tasks(tasks, filter, overlays);
    if let Some(spec) = sort {
        sort_rows(&mut rows, spec);
    }
    View {
        total: rows.len(),
        rows: page.slice(&rows).iter().map(|t| (*t).clone()).collect(),
    }
}

/// The query inputs of one screen.
///
/// The structured filter and the overlays are reset independently. Changing
/// either one rewinds to the first page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    filter: Option<FilterNode>,
    overlays: Overlays,
    sort: Option<SortSpec>,
    page: PageRequest,
}

impl QueryState {
    /// Unfiltered, unsorted state showing the first page of `page_size` rows.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: PageRequest::first(page_size),
            ..Self::default()
        }
    }

    /// Structured filter.
    pub fn filter(&self) -> Option<&FilterNode> {
        self.filter.as_ref()
    }

    /// Overlay filters.
    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// Active sort.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Current window.
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Replace the structured filter.
    pub fn set_filter(&mut self, filter: Option<FilterNode>) {
        self.filter = filter;
        self.rewind();
    }

    /// Clear the structured filter, keeping overlays.
    pub fn reset_filter(&mut self) {
        self.set_filter(None);
    }

    /// Replace the overlays.
    pub fn set_overlays(&mut self, overlays: Overlays) {
        self.overlays = overlays;
        self.rewind();
    }

    /// Clear the overlays, keeping the structured filter.
    pub fn reset_overlays(&mut self) {
        self.set_overlays(Overlays::none());
    }

    /// Replace the active sort. The last sort set wins.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Replace the window.
    pub fn set_page(&mut self, page: PageRequest) {
        self.page = page;
    }

    /// Pull the window back onto the last page if `total` rows no longer reach it.
    pub fn clamp_page(&mut self, total: usize) {
        self.page = self.page.clamp(total);
    }

    fn rewind(&mut self) {
        self.page = PageRequest::first(self.page.limit);
    }

    /// Compute the view of `tasks` under this state.
    pub fn view(&self, tasks: &[Task]) -> View {
        compute_view(tasks, self.filter.as_ref(), &self.overlays, self.sort.as_ref(), self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use worklog_core::{TaskId, TaskStatus, UserId};
    use crate::filter::{Condition, Field, FilterValue, Operator};

    fn task(id: i64, status: TaskStatus, name: &str, hours: u32, day: Option<u32>) -> Task {
        Task {
            id: TaskId::from(id),
            title: format!("task {}", id),
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d)),
            hours_worked: hours,
            status,
            user_id: UserId::from(1),
            user_name: Some(name.to_string()),
        }
    }

    fn sample() -> Vec<Task> {
        let names = ["ana", "bob", "carla", "dan"];
        (0..23)
            .map(|i| {
                let status = TaskStatus::ALL[i % 3];
                let day = if i % 5 == 0 { None } else { Some((i % 28) as u32 + 1) };
                task(i as i64, status, names[i % 4], (i % 9) as u32 + 1, day)
            })
            .collect()
    }

    fn filters() -> Vec<Option<FilterNode>> {
        let long = Condition::new(Field::HoursWorked, Operator::GreaterOrEqual, FilterValue::Number(5)).unwrap();
        let early = Condition::new(
            Field::Date,
            Operator::Before,
            FilterValue::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
        )
        .unwrap();
        let named = Condition::new(Field::UserName, Operator::Contains, FilterValue::Text("a".into())).unwrap();
        vec![
            None,
            Some(FilterNode::from(long.clone())),
            Some(FilterNode::all(vec![long.clone().into(), early.clone().into()])),
            Some(FilterNode::any(vec![early.into(), named.into()])),
        ]
    }

    #[test]
    fn test_pages_of_23() {
        let tasks = sample();
        let first = compute_view(&tasks, None, &Overlays::none(), None, PageRequest::page(0, 10));
        assert_eq!(first.total, 23);
        assert_eq!(first.rows, tasks[0..10].to_vec());

        let last = compute_view(&tasks, None, &Overlays::none(), None, PageRequest::page(2, 10));
        assert_eq!(last.total, 23);
        assert_eq!(last.rows, tasks[20..23].to_vec());
    }

    #[test]
    fn test_total_matches_filtered_length() {
        let tasks = sample();
        for filter in filters() {
            let expected = filter_tasks(&tasks, filter.as_ref(), &Overlays::none()).len();
            let view = compute_view(&tasks, filter.as_ref(), &Overlays::none(), None, PageRequest::page(0, 4));
            assert_eq!(view.total, expected);
            assert!(view.rows.len() <= 4);
        }
    }

    #[test]
    fn test_pages_concatenate_to_filtered_rows() {
        let tasks = sample();
        let sort = SortSpec::descending(Field::Date);
        for filter in filters() {
            for size in [1, 3, 7, 10, 50] {
                let full = compute_view(&tasks, filter.as_ref(), &Overlays::none(), Some(&sort), PageRequest::page(0, usize::MAX));
                let pages = PageRequest::first(size).page_count(full.total);
                let joined: Vec<Task> = (0..pages)
                    .flat_map(|k| {
                        compute_view(&tasks, filter.as_ref(), &Overlays::none(), Some(&sort), PageRequest::page(k, size)).rows
                    })
                    .collect();
                assert_eq!(joined, full.rows, "page size {}", size);
            }
        }
    }

    #[test]
    fn test_overlays_commute_with_structured_filter() {
        let tasks = sample();
        let overlays = Overlays::none().with_employee_name("A").with_status(TaskStatus::Approved);
        for filter in filters() {
            let structured_first: Vec<&Task> = filter_tasks(&tasks, filter.as_ref(), &Overlays::none())
                .into_iter()
                .filter(|t| overlays.matches(t))
                .collect();
            let overlay_first: Vec<&Task> = tasks
                .iter()
                .filter(|t| overlays.matches(t))
                .filter(|t| filter.as_ref().map_or(true, |f| f.matches(t)))
                .collect();
            assert_eq!(structured_first, overlay_first);
            assert_eq!(filter_tasks(&tasks, filter.as_ref(), &overlays), overlay_first);
        }
    }

    #[test]
    fn test_status_overlay_selects_one_row() {
        let tasks = vec![
            task(1, TaskStatus::Pending, "ana", 1, Some(1)),
            task(2, TaskStatus::Approved, "ana", 1, Some(2)),
            task(3, TaskStatus::Rejected, "ana", 1, Some(3)),
        ];
        let view = compute_view(&tasks, None, &Overlays::none().with_status(TaskStatus::Approved), None, PageRequest::default());
        assert_eq!(view.total, 1);
        assert_eq!(view.rows[0].id, TaskId::from(2));
    }

    #[test]
    fn test_undated_rows_lead_under_date_sort() {
        let tasks = sample();
        for sort in [SortSpec::ascending(Field::Date), SortSpec::descending(Field::Date)] {
            let view = compute_view(&tasks, None, &Overlays::none(), Some(&sort), PageRequest::page(0, usize::MAX));
            let undated = view.rows.iter().filter(|t| t.date.is_none()).count();
            assert!(view.rows[..undated].iter().all(|t| t.date.is_none()));
            assert!(view.rows[undated..].iter().all(|t| t.date.is_some()));
        }
    }

    #[test]
    fn test_view_reflects_removed_rows() {
        let mut tasks = sample();
        let state = QueryState::new(10);
        assert!(state.view(&tasks).rows.iter().any(|t| t.id == TaskId::from(3)));

        tasks.retain(|t| t.id != TaskId::from(3));
        let view = state.view(&tasks);
        assert_eq!(view.total, 22);
        assert!(view.rows.iter().all(|t| t.id != TaskId::from(3)));
    }

    #[test]
    fn test_query_state_resets_independently() {
        let mut state = QueryState::new(5);
        state.set_page(PageRequest::page(3, 5));
        state.set_filter(filters().pop().flatten());
        assert_eq!(state.page(), PageRequest::page(0, 5));

        state.set_overlays(Overlays::none().with_status(TaskStatus::Pending));
        state.reset_filter();
        assert!(state.filter().is_none());
        assert_eq!(state.overlays().status, Some(TaskStatus::Pending));

        state.set_filter(filters().pop().flatten());
        state.reset_overlays();
        assert!(state.filter().is_some());
        assert!(!state.overlays().is_active());
    }

    #[test]
    fn test_last_sort_wins() {
        let tasks = sample();
        let mut state = QueryState::new(usize::MAX);
        state.set_sort(Some(SortSpec::ascending(Field::Title)));
        state.set_sort(Some(SortSpec::descending(Field::HoursWorked)));
        let view = state.view(&tasks);
        assert!(view.rows.windows(2).all(|w| w[0].hours_worked >= w[1].hours_worked));
    }
}
