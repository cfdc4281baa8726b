//! Task grid: the deterministic enumeration the whole engine walks.

use super::partners::CANONICAL_PARTNERS;
use super::task::FetchTask;

/// The full (year, partner) cross-product for one reporting country.
///
/// Pure value: same inputs always produce the same order, which is what makes
/// the persisted cursor meaningful across invocations. Years run ascending
/// over the inclusive range; partners follow the canonical list order (their
/// position in the list, not their numeric value). The reporter itself is
/// never emitted as a partner.
#[derive(Debug, Clone)]
pub struct TaskGrid {
    reporter_code: u32,
    start_year: i32,
    end_year: i32,
    partners: Vec<u32>,
}

impl TaskGrid {
    pub fn new(
        reporter_code: u32,
        start_year: i32,
        end_year: i32,
        partners: impl Into<Vec<u32>>,
    ) -> Self {
        Self {
            reporter_code,
            start_year,
            end_year,
            partners: partners.into(),
        }
    }

    /// Grid over the built-in canonical partner list.
    pub fn canonical(reporter_code: u32, start_year: i32, end_year: i32) -> Self {
        Self::new(reporter_code, start_year, end_year, CANONICAL_PARTNERS)
    }

    pub fn reporter_code(&self) -> u32 {
        self.reporter_code
    }

    /// Number of tasks the grid will emit.
    pub fn len(&self) -> usize {
        if self.end_year < self.start_year {
            return 0;
        }
        let years = (self.end_year - self.start_year + 1) as usize;
        let partners = self
            .partners
            .iter()
            .filter(|&&code| code != self.reporter_code)
            .count();
        years * partners
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tasks in grid order.
    pub fn iter(&self) -> impl Iterator<Item = FetchTask> + '_ {
        (self.start_year..=self.end_year).flat_map(move |year| {
            self.partners
                .iter()
                .filter(move |&&code| code != self.reporter_code)
                .map(move |&code| FetchTask::new(year, code))
        })
    }

    /// Position of a partner code in the canonical list order.
    pub fn partner_rank(&self, code: u32) -> Option<usize> {
        self.partners.iter().position(|&c| c == code)
    }

    /// Absolute position of a task in grid order, if the task is addressable
    /// by this grid at all (year in range, partner in list).
    pub fn ordinal(&self, task: FetchTask) -> Option<u64> {
        if task.year < self.start_year || task.year > self.end_year {
            return None;
        }
        let rank = self.partner_rank(task.partner_code)? as u64;
        let year_index = (task.year - self.start_year) as u64;
        Some(year_index * self.partners.len() as u64 + rank)
    }

    /// Strict grid ordering: does `a` sort before `b`?
    ///
    /// False when either side is not addressable by the grid; the caller
    /// decides what a dangling cursor means.
    pub fn precedes(&self, a: FetchTask, b: FetchTask) -> bool {
        match (self.ordinal(a), self.ordinal(b)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn emits_years_times_partners_minus_self() {
        let grid = TaskGrid::new(842, 2019, 2021, vec![4, 8, 842, 12]);
        assert_eq!(grid.len(), 3 * 3);
        assert_eq!(grid.iter().count(), grid.len());
    }

    #[test]
    fn reporter_absent_from_list_keeps_full_width() {
        let grid = TaskGrid::new(999, 2020, 2020, vec![4, 8, 12]);
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn canonical_grid_matches_list_width() {
        let grid = TaskGrid::canonical(842, 2020, 2020);
        assert_eq!(grid.len(), CANONICAL_PARTNERS.len() - 1);
    }

    #[test]
    fn order_is_year_major_then_list_position() {
        // Partner order is positional, deliberately not numerically sorted.
        let grid = TaskGrid::new(1, 2020, 2021, vec![12, 4, 8]);
        let tasks: Vec<_> = grid.iter().collect();
        assert_eq!(
            tasks,
            vec![
                FetchTask::new(2020, 12),
                FetchTask::new(2020, 4),
                FetchTask::new(2020, 8),
                FetchTask::new(2021, 12),
                FetchTask::new(2021, 4),
                FetchTask::new(2021, 8),
            ]
        );
    }

    #[test]
    fn no_duplicate_tasks() {
        let grid = TaskGrid::canonical(842, 2018, 2020);
        let mut seen = std::collections::HashSet::new();
        for task in grid.iter() {
            assert!(seen.insert(task), "duplicate task {task}");
            assert_ne!(task.partner_code, 842);
        }
        assert_eq!(seen.len(), grid.len());
    }

    #[rstest]
    #[case::earlier_year(FetchTask::new(2020, 8), FetchTask::new(2021, 12), true)]
    #[case::same_year_list_order(FetchTask::new(2020, 12), FetchTask::new(2020, 4), true)]
    #[case::equal(FetchTask::new(2020, 4), FetchTask::new(2020, 4), false)]
    #[case::after(FetchTask::new(2021, 12), FetchTask::new(2020, 8), false)]
    fn precedes_follows_grid_order(
        #[case] a: FetchTask,
        #[case] b: FetchTask,
        #[case] expected: bool,
    ) {
        let grid = TaskGrid::new(1, 2020, 2021, vec![12, 4, 8]);
        assert_eq!(grid.precedes(a, b), expected);
    }

    #[test]
    fn unaddressable_task_never_precedes() {
        let grid = TaskGrid::new(1, 2020, 2021, vec![12, 4, 8]);
        assert!(!grid.precedes(FetchTask::new(2019, 12), FetchTask::new(2020, 4)));
        assert!(!grid.precedes(FetchTask::new(2020, 99), FetchTask::new(2020, 4)));
        assert_eq!(grid.ordinal(FetchTask::new(2022, 4)), None);
    }

    #[test]
    fn inverted_year_range_is_empty() {
        let grid = TaskGrid::new(1, 2021, 2020, vec![4, 8]);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
    }
}
