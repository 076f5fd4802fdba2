//! Calendar grouping by due date

use chrono::NaiveDate;
use mx_models::WorkOrder;
use std::collections::BTreeMap;

/// Work orders grouped by due date
#[derive(Debug, Clone, Default)]
pub struct CalendarGroups<'a> {
    pub by_date: BTreeMap<NaiveDate, Vec<&'a WorkOrder>>,
    /// Work orders without a due date; they have no calendar cell
    pub undated: Vec<&'a WorkOrder>,
}

impl<'a> CalendarGroups<'a> {
    /// Work orders due on the given day
    pub fn on(&self, date: NaiveDate) -> &[&'a WorkOrder] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days of one month that have work orders due
    ///
    /// An invalid month yields an empty map.
    pub fn month_view(&self, year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&'a WorkOrder>> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return BTreeMap::new();
        };
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };

        let range = match next {
            Some(next) => self.by_date.range(first..next),
            None => self.by_date.range(first..),
        };
        range.map(|(date, items)| (*date, items.clone())).collect()
    }

    pub fn dated_count(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }
}

/// Group work orders by due date, keeping input order within a day
pub fn group_by_due_date<'a, I>(records: I) -> CalendarGroups<'a>
where
    I: IntoIterator<Item = &'a WorkOrder>,
{
    let mut groups = CalendarGroups::default();
    for work_order in records {
        match work_order.due_date {
            Some(due) => groups.by_date.entry(due).or_default().push(work_order),
            None => groups.undated.push(work_order),
        }
    }
    groups
}
