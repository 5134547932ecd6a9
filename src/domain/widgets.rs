// Dashboard widget domain models: summary tiles and ranked charts
use super::ranking::{top_n, top_n_by, RankKey};
use super::record::{round_to, OrgRecord};
use super::summary::Summary;
use serde::{Deserialize, Serialize};

const CHART_LABEL_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileMetric {
    TotalAudience,
    AvgEngagementRate,
    AvgLikes,
    TopRecord,
    AudienceDelta,
    RecordCount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TileValue {
    Number(f64),
    Text(String),
}

impl TileValue {
    /// Round numbers to `places` decimals; text is left as is.
    pub fn rounded(self, places: i32) -> Self {
        match self {
            TileValue::Number(value) => TileValue::Number(round_to(value, places)),
            text => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: TileValue,
    pub subtitle: Option<String>,
}

impl TileData {
    pub fn new(id: String, title: String, unit: String, value: TileValue, subtitle: Option<String>) -> Self {
        Self {
            id,
            title,
            unit,
            value,
            subtitle,
        }
    }
}

impl TileMetric {
    /// Unrounded tile value and optional subtitle for a summary.
    pub fn read(&self, summary: &Summary) -> (TileValue, Option<String>) {
        match self {
            TileMetric::TotalAudience => (TileValue::Number(summary.total_audience as f64), None),
            TileMetric::AvgEngagementRate => (TileValue::Number(summary.avg_engagement_rate), None),
            TileMetric::AvgLikes => (TileValue::Number(summary.avg_likes), None),
            TileMetric::AudienceDelta => (TileValue::Number(summary.audience_delta as f64), None),
            TileMetric::RecordCount => (TileValue::Number(summary.record_count as f64), None),
            TileMetric::TopRecord => match &summary.top_record {
                Some(top) => (
                    TileValue::Text(top.name.clone()),
                    Some(top.audience_size.to_string()),
                ),
                None => (TileValue::Text(String::new()), None),
            },
        }
    }
}

/// Value a chart ranks and plots its records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartMetric {
    AudienceSize,
    AvgLikesPerPost,
    AvgViewsPerPost,
    AvgPostsPerMonth,
    EngagementRate,
}

impl ChartMetric {
    fn rank_key(&self) -> Option<RankKey> {
        match self {
            ChartMetric::AudienceSize => Some(RankKey::AudienceSize),
            ChartMetric::AvgLikesPerPost => Some(RankKey::AvgLikesPerPost),
            ChartMetric::AvgViewsPerPost => Some(RankKey::AvgViewsPerPost),
            ChartMetric::AvgPostsPerMonth => Some(RankKey::AvgPostsPerMonth),
            ChartMetric::EngagementRate => None,
        }
    }

    pub fn value(&self, record: &OrgRecord) -> f64 {
        match self.rank_key() {
            Some(key) => key.value(record),
            None => record.engagement_rate(),
        }
    }

    pub fn rank<'a>(&self, records: &'a [OrgRecord], n: usize) -> Vec<&'a OrgRecord> {
        match self.rank_key() {
            Some(key) => top_n(records, key, n),
            None => top_n_by(records, n, OrgRecord::engagement_rate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelStyle {
    /// "1", "2", ... by rank
    #[default]
    Rank,
    /// Record name cut to a fixed width
    ShortName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// One plotted record. `handle` identifies the record a click selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub handle: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub metric: ChartMetric,
    pub y_max: Option<f64>,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn new(
        id: String,
        title: String,
        unit: Option<String>,
        kind: ChartKind,
        metric: ChartMetric,
        y_max: Option<f64>,
        points: Vec<ChartPoint>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            kind,
            metric,
            y_max,
            points,
        }
    }
}

/// Label/value/record triples for the top `limit` records by `metric`.
pub fn chart_points(
    records: &[OrgRecord],
    metric: ChartMetric,
    limit: usize,
    labels: LabelStyle,
) -> Vec<ChartPoint> {
    metric
        .rank(records, limit)
        .into_iter()
        .enumerate()
        .map(|(index, record)| ChartPoint {
            label: match labels {
                LabelStyle::Rank => (index + 1).to_string(),
                LabelStyle::ShortName => record.name.chars().take(CHART_LABEL_CHARS).collect(),
            },
            value: metric.value(record),
            handle: record.handle.clone(),
            name: record.name.clone(),
        })
        .collect()
}
