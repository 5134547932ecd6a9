// Top-N selection for charts
use super::record::OrgRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankKey {
    AudienceSize,
    AvgLikesPerPost,
    AvgViewsPerPost,
    AvgPostsPerMonth,
}

impl RankKey {
    pub fn value(&self, record: &OrgRecord) -> f64 {
        match self {
            RankKey::AudienceSize => record.audience_size as f64,
            RankKey::AvgLikesPerPost => record.avg_likes_per_post,
            RankKey::AvgViewsPerPost => record.avg_views_per_post,
            RankKey::AvgPostsPerMonth => record.avg_posts_per_month,
        }
    }
}

/// The `n` records with the largest `key`, largest first.
/// Records with equal keys keep their input order.
pub fn top_n(records: &[OrgRecord], key: RankKey, n: usize) -> Vec<&OrgRecord> {
    top_n_by(records, n, |r| key.value(r))
}

/// Same as [`top_n`] for any derived per-record value.
pub fn top_n_by<F>(records: &[OrgRecord], n: usize, value: F) -> Vec<&OrgRecord>
where
    F: Fn(&OrgRecord) -> f64,
{
    let mut ranked: Vec<(f64, &OrgRecord)> = records.iter().map(|r| (value(r), r)).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(n).map(|(_, r)| r).collect()
}
