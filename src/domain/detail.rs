// Per-record detail metrics
use super::record::{percent_of, round_to, OrgRecord};
use serde::Serialize;

/// Posts per month that fill the content activity bar.
const POSTING_TARGET_PER_MONTH: f64 = 30.0;
/// Audience size that fills the audience reach bar.
const AUDIENCE_REACH_TARGET: f64 = 100_000.0;
/// The engagement bar is drawn at ten times the engagement rate.
const ENGAGEMENT_BAR_SCALE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBars {
    pub engagement: f64,
    pub content_activity: f64,
    pub audience_reach: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub record: OrgRecord,
    pub engagement_rate: f64,
    pub audience_thousands: f64,
    pub bars: PerformanceBars,
}

impl RecordDetail {
    pub fn new(record: OrgRecord) -> Self {
        let engagement_rate = record.engagement_rate();
        let bars = PerformanceBars {
            engagement: bar(engagement_rate * ENGAGEMENT_BAR_SCALE),
            content_activity: bar(percent_of(record.avg_posts_per_month, POSTING_TARGET_PER_MONTH)),
            audience_reach: bar(percent_of(record.audience_size as f64, AUDIENCE_REACH_TARGET)),
        };

        Self {
            engagement_rate: round_to(engagement_rate, 2),
            audience_thousands: round_to(record.audience_size as f64 / 1000.0, 1),
            bars,
            record,
        }
    }
}

fn bar(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}
