// Selection state for one dashboard session
use super::record::{MonthKey, OrgRecord};
use super::table::{SortDirection, SortKey};
use serde::Serialize;

/// Immutable snapshot; every transition returns a new state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub month: MonthKey,
    pub query: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub focused: Option<OrgRecord>,
}

impl SelectionState {
    pub fn initial(month: MonthKey) -> Self {
        Self {
            month,
            query: String::new(),
            sort_key: SortKey::AudienceSize,
            direction: SortDirection::Desc,
            focused: None,
        }
    }

    /// Query and sort carry over to the new month.
    pub fn select_month(&self, month: MonthKey) -> Self {
        Self {
            month,
            ..self.clone()
        }
    }

    pub fn set_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    /// Same key flips the direction, a new key starts descending.
    pub fn sort_by(&self, key: SortKey) -> Self {
        let direction = if key == self.sort_key {
            self.direction.flipped()
        } else {
            SortDirection::Desc
        };
        Self {
            sort_key: key,
            direction,
            ..self.clone()
        }
    }

    pub fn focus(&self, record: OrgRecord) -> Self {
        Self {
            focused: Some(record),
            ..self.clone()
        }
    }

    pub fn unfocus(&self) -> Self {
        Self {
            focused: None,
            ..self.clone()
        }
    }
}
