// Month summary aggregation
use super::record::{round_to, OrgRecord};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub record_count: usize,
    pub total_audience: u64,
    /// Unrounded mean of per-record engagement rates.
    pub avg_engagement_rate: f64,
    /// Unrounded mean of average likes per post.
    pub avg_likes: f64,
    pub top_record: Option<OrgRecord>,
    /// Audience growth against the previous month, 0 without one.
    pub audience_delta: i64,
}

impl Summary {
    /// Engagement rate as shown on the dashboard (2 decimal places).
    pub fn engagement_rate_display(&self) -> f64 {
        round_to(self.avg_engagement_rate, 2)
    }

    /// Average likes as shown on the dashboard (1 decimal place).
    pub fn avg_likes_display(&self) -> f64 {
        round_to(self.avg_likes, 1)
    }
}

pub fn total_audience(records: &[OrgRecord]) -> u64 {
    records.iter().map(|r| r.audience_size).sum()
}

/// Aggregate one month's records. `previous` is the adjacent month chosen by
/// the caller; without it the delta is 0.
pub fn summarize(records: &[OrgRecord], previous: Option<&[OrgRecord]>) -> Summary {
    // No data for the month: everything zero, including the delta.
    if records.is_empty() {
        return Summary::default();
    }

    let count = records.len() as f64;
    let total = total_audience(records);

    let avg_engagement_rate =
        records.iter().map(OrgRecord::engagement_rate).sum::<f64>() / count;
    let avg_likes = records.iter().map(|r| r.avg_likes_per_post).sum::<f64>() / count;

    // Strict comparison keeps the first of equally large records.
    let top_record = records
        .iter()
        .skip(1)
        .fold(&records[0], |best, current| {
            if current.audience_size > best.audience_size {
                current
            } else {
                best
            }
        })
        .clone();

    let audience_delta =
        previous.map_or(0, |prev| total as i64 - total_audience(prev) as i64);

    Summary {
        record_count: records.len(),
        total_audience: total,
        avg_engagement_rate,
        avg_likes,
        top_record: Some(top_record),
        audience_delta,
    }
}
