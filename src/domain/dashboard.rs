// Dashboard domain model
use super::detail::RecordDetail;
use super::record::{MonthKey, OrgRecord};
use super::summary::Summary;
use super::widgets::{ChartData, TileData};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub month: Option<MonthKey>,
    pub previous_month: Option<MonthKey>,
    pub summary: Summary,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
    pub table: Vec<OrgRecord>,
    pub focused: Option<RecordDetail>,
}
