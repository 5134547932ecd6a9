// Store trait for month record access
use crate::domain::record::{MonthKey, OrgRecord};

pub trait RecordStore: Send + Sync {
    /// Months that have a dataset, in calendar order
    fn months(&self) -> Vec<MonthKey>;

    /// Records for a month; empty when the month has no dataset
    fn records(&self, month: MonthKey) -> &[OrgRecord];

    /// The most recent month with a dataset
    fn latest_month(&self) -> Option<MonthKey> {
        self.months().last().copied()
    }

    /// The nearest earlier month with a dataset, used for month-over-month deltas
    fn previous_month(&self, month: MonthKey) -> Option<MonthKey> {
        self.months().into_iter().filter(|m| *m < month).last()
    }
}
