// Organization record domain model
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month tokens, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthKey {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl MonthKey {
    pub const ALL: [MonthKey; 12] = [
        MonthKey::Jan,
        MonthKey::Feb,
        MonthKey::Mar,
        MonthKey::Apr,
        MonthKey::May,
        MonthKey::Jun,
        MonthKey::Jul,
        MonthKey::Aug,
        MonthKey::Sep,
        MonthKey::Oct,
        MonthKey::Nov,
        MonthKey::Dec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonthKey::Jan => "jan",
            MonthKey::Feb => "feb",
            MonthKey::Mar => "mar",
            MonthKey::Apr => "apr",
            MonthKey::May => "may",
            MonthKey::Jun => "jun",
            MonthKey::Jul => "jul",
            MonthKey::Aug => "aug",
            MonthKey::Sep => "sep",
            MonthKey::Oct => "oct",
            MonthKey::Nov => "nov",
            MonthKey::Dec => "dec",
        }
    }

    /// Parse a month token ("jan", "Feb", ...). Unknown tokens yield None.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record exactly as it appears in the upstream dataset files.
/// Every numeric field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "name")]
    pub company_name: String,
    #[serde(alias = "handle")]
    pub username: String,
    #[serde(default, alias = "followers")]
    pub subscribers: Option<u64>,
    #[serde(default, alias = "avg_views_per_video")]
    pub avg_views_per_post: Option<f64>,
    #[serde(default, alias = "avg_likes_per_video")]
    pub avg_likes_per_post: Option<f64>,
    #[serde(default)]
    pub avg_posts_per_month: Option<f64>,
    #[serde(default)]
    pub total_posts: Option<u64>,
    #[serde(default)]
    pub total_views: Option<u64>,
    #[serde(default)]
    pub channel_created_date: Option<String>,
    #[serde(default)]
    pub last_updated_date: Option<String>,
    #[serde(default)]
    pub videos_fetched: Option<u64>,
}

/// One organization's metrics snapshot for a month, with all defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRecord {
    pub name: String,
    pub handle: String,
    pub audience_size: u64,
    pub avg_views_per_post: f64,
    pub avg_likes_per_post: f64,
    pub avg_posts_per_month: f64,
    pub total_posts: u64,
    pub total_views: u64,
    pub channel_created_date: String,
    pub last_updated_date: String,
    pub videos_fetched: u64,
}

impl OrgRecord {
    /// Likes per view as a percentage; 0 when there are no views.
    pub fn engagement_rate(&self) -> f64 {
        percent_of(self.avg_likes_per_post, self.avg_views_per_post)
    }
}

/// Apply the null-coalescing policy once so downstream code never sees gaps.
pub fn normalize(raw: RawRecord) -> OrgRecord {
    OrgRecord {
        name: raw.company_name,
        handle: raw.username,
        audience_size: raw.subscribers.unwrap_or(0),
        avg_views_per_post: finite_or_zero(raw.avg_views_per_post),
        avg_likes_per_post: finite_or_zero(raw.avg_likes_per_post),
        avg_posts_per_month: finite_or_zero(raw.avg_posts_per_month),
        total_posts: raw.total_posts.unwrap_or(0),
        total_views: raw.total_views.unwrap_or(0),
        channel_created_date: raw.channel_created_date.unwrap_or_default(),
        last_updated_date: raw.last_updated_date.unwrap_or_default(),
        videos_fetched: raw.videos_fetched.unwrap_or(0),
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// `numerator / denominator * 100`, defined as 0 for a zero denominator.
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Round half away from zero to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
pub(crate) fn sample(name: &str, audience: u64, likes: f64, views: f64) -> OrgRecord {
    normalize(RawRecord {
        company_name: name.to_string(),
        username: name.to_lowercase(),
        subscribers: Some(audience),
        avg_views_per_post: Some(views),
        avg_likes_per_post: Some(likes),
        ..Default::default()
    })
}
