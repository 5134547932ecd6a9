// Table search and column sort
use super::record::OrgRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    AudienceSize,
    AvgLikesPerPost,
    AvgViewsPerPost,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` or `desc`, any case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl SortKey {
    /// Column name as serialized (`audienceSize`, `name`, ...), any case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "audiencesize" => Some(SortKey::AudienceSize),
            "avglikesperpost" => Some(SortKey::AvgLikesPerPost),
            "avgviewsperpost" => Some(SortKey::AvgViewsPerPost),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }

    fn compare(&self, a: &OrgRecord, b: &OrgRecord) -> Ordering {
        match self {
            SortKey::AudienceSize => a.audience_size.cmp(&b.audience_size),
            SortKey::AvgLikesPerPost => a.avg_likes_per_post.total_cmp(&b.avg_likes_per_post),
            SortKey::AvgViewsPerPost => a.avg_views_per_post.total_cmp(&b.avg_views_per_post),
            SortKey::Name => compare_names(&a.name, &b.name),
        }
    }
}

/// Approximates locale-aware name order: case-folded comparison of Unicode
/// scalar values, with raw order only between names that fold to the same
/// text. Accents are not collated, so "Émile" sorts after "Zed".
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Case-insensitive substring match on name or handle. Empty matches all.
pub fn matches_query(record: &OrgRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record.name.to_lowercase().contains(&needle) || record.handle.to_lowercase().contains(&needle)
}

/// Rows for the detail table. Ties keep input order.
pub fn filter_and_sort<'a>(
    records: &'a [OrgRecord],
    query: &str,
    sort_key: SortKey,
    direction: SortDirection,
) -> Vec<&'a OrgRecord> {
    let mut rows: Vec<&OrgRecord> = records.iter().filter(|r| matches_query(r, query)).collect();
    rows.sort_by(|a, b| {
        let ordering = sort_key.compare(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows
}
