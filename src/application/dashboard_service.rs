// Dashboard service - Use cases for summaries, charts, tables and record detail
use crate::application::error::DashboardError;
use crate::application::record_store::RecordStore;
use crate::domain::dashboard::Dashboard;
use crate::domain::detail::RecordDetail;
use crate::domain::record::{MonthKey, OrgRecord};
use crate::domain::selection::SelectionState;
use crate::domain::summary::{summarize, Summary};
use crate::domain::table::{filter_and_sort, SortDirection, SortKey};
use crate::domain::widgets::{chart_points, ChartData, TileData};
use crate::infrastructure::config::WidgetsConfig;
use std::sync::Arc;

/// Month to fall back to when the dataset holds no months at all.
const FALLBACK_MONTH: MonthKey = MonthKey::Dec;

/// Every method takes `Option<MonthKey>`: an unknown month token resolves to
/// `None` and reads as a month without data.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
    widgets_config: WidgetsConfig,
    title: String,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>, widgets_config: WidgetsConfig, title: String) -> Self {
        Self {
            store,
            widgets_config,
            title,
        }
    }

    pub fn months(&self) -> Vec<MonthKey> {
        self.store.months()
    }

    /// Month a new session starts on.
    pub fn initial_month(&self) -> MonthKey {
        self.store.latest_month().unwrap_or(FALLBACK_MONTH)
    }

    pub fn records(&self, month: Option<MonthKey>) -> &[OrgRecord] {
        match month {
            Some(month) => self.store.records(month),
            None => &[],
        }
    }

    pub fn previous_month(&self, month: Option<MonthKey>) -> Option<MonthKey> {
        month.and_then(|m| self.store.previous_month(m))
    }

    pub fn summary(&self, month: Option<MonthKey>) -> Summary {
        let previous = self
            .previous_month(month)
            .map(|prev| self.store.records(prev));
        summarize(self.records(month), previous)
    }

    pub fn tiles(&self, summary: &Summary) -> Vec<TileData> {
        self.widgets_config
            .tiles
            .iter()
            .map(|tile| {
                let (value, subtitle) = tile.metric.read(summary);
                TileData::new(
                    tile.id.clone(),
                    tile.title.clone(),
                    tile.unit.clone(),
                    value.rounded(tile.precision),
                    subtitle,
                )
            })
            .collect()
    }

    pub fn charts(&self, month: Option<MonthKey>) -> Vec<ChartData> {
        let records = self.records(month);

        self.widgets_config
            .charts
            .iter()
            .map(|chart| {
                ChartData::new(
                    chart.id.clone(),
                    chart.title.clone(),
                    chart.unit.clone(),
                    chart.kind,
                    chart.metric,
                    chart.y_max,
                    chart_points(records, chart.metric, chart.limit, chart.labels),
                )
            })
            .collect()
    }

    pub fn table(
        &self,
        month: Option<MonthKey>,
        query: &str,
        sort_key: SortKey,
        direction: SortDirection,
    ) -> Vec<OrgRecord> {
        filter_and_sort(self.records(month), query, sort_key, direction)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn find_record(&self, month: Option<MonthKey>, handle: &str) -> Result<OrgRecord, DashboardError> {
        self.records(month)
            .iter()
            .find(|r| r.handle == handle)
            .cloned()
            .ok_or_else(|| DashboardError::record_not_found(month, handle))
    }

    pub fn detail(&self, month: Option<MonthKey>, handle: &str) -> Result<RecordDetail, DashboardError> {
        self.find_record(month, handle).map(RecordDetail::new)
    }

    /// Full dashboard view for a session: tiles, charts, table rows and the
    /// focused record's detail.
    pub fn dashboard(&self, state: &SelectionState) -> Dashboard {
        self.build_dashboard(
            Some(state.month),
            &state.query,
            state.sort_key,
            state.direction,
            state.focused.clone(),
        )
    }

    /// Dashboard view for a month without session state.
    pub fn month_dashboard(
        &self,
        month: Option<MonthKey>,
        query: &str,
        sort_key: SortKey,
        direction: SortDirection,
    ) -> Dashboard {
        self.build_dashboard(month, query, sort_key, direction, None)
    }

    fn build_dashboard(
        &self,
        month: Option<MonthKey>,
        query: &str,
        sort_key: SortKey,
        direction: SortDirection,
        focused: Option<OrgRecord>,
    ) -> Dashboard {
        let summary = self.summary(month);
        let tiles = self.tiles(&summary);
        let charts = self.charts(month);
        let table = self.table(month, query, sort_key, direction);

        let month_label = month.map_or_else(|| "no data".to_string(), |m| m.to_string());
        tracing::debug!(
            "Built dashboard for {}: {} tiles, {} charts, {} rows",
            month_label,
            tiles.len(),
            charts.len(),
            table.len()
        );

        Dashboard {
            title: format!("{} ({})", self.title, month_label),
            month,
            previous_month: self.previous_month(month),
            summary,
            tiles,
            charts,
            table,
            focused: focused.map(RecordDetail::new),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::record::RawRecord;
    use crate::domain::widgets::{ChartKind, ChartMetric, LabelStyle, TileMetric, TileValue};
    use crate::infrastructure::config::{ChartConfig, TileConfig};
    use crate::infrastructure::static_store::StaticRecordStore;

    fn raw(name: &str, subscribers: u64, likes: f64, views: f64) -> RawRecord {
        RawRecord {
            company_name: name.to_string(),
            username: name.to_lowercase(),
            subscribers: Some(subscribers),
            avg_likes_per_post: Some(likes),
            avg_views_per_post: Some(views),
            ..Default::default()
        }
    }

    pub(crate) fn service() -> DashboardService {
        let store = StaticRecordStore::from_raw(vec![
            (
                MonthKey::Sep,
                vec![raw("Alpha", 100, 0.0, 0.0), raw("Beta", 150, 0.0, 0.0)],
            ),
            (
                MonthKey::Oct,
                vec![raw("Alpha", 100, 10.0, 100.0), raw("Beta", 200, 0.0, 0.0)],
            ),
        ]);

        let widgets = WidgetsConfig {
            tiles: vec![
                TileConfig {
                    id: "total".to_string(),
                    title: "Total subscribers".to_string(),
                    unit: String::new(),
                    precision: 0,
                    metric: TileMetric::TotalAudience,
                },
                TileConfig {
                    id: "growth".to_string(),
                    title: "Growth".to_string(),
                    unit: String::new(),
                    precision: 0,
                    metric: TileMetric::AudienceDelta,
                },
                TileConfig {
                    id: "rate".to_string(),
                    title: "Engagement rate".to_string(),
                    unit: "%".to_string(),
                    precision: 2,
                    metric: TileMetric::AvgEngagementRate,
                },
                TileConfig {
                    id: "likes".to_string(),
                    title: "Average likes".to_string(),
                    unit: String::new(),
                    precision: 1,
                    metric: TileMetric::AvgLikes,
                },
            ],
            charts: vec![ChartConfig {
                id: "audience".to_string(),
                title: "Largest audiences".to_string(),
                unit: None,
                kind: ChartKind::Bar,
                metric: ChartMetric::AudienceSize,
                limit: 1,
                labels: LabelStyle::Rank,
                y_max: None,
            }],
        };

        DashboardService::new(Arc::new(store), widgets, "Channels".to_string())
    }

    #[test]
    fn test_summary_with_previous_month() {
        let service = service();
        let summary = service.summary(Some(MonthKey::Oct));

        assert_eq!(summary.total_audience, 300);
        assert_eq!(summary.audience_delta, 50);
        assert_eq!(summary.engagement_rate_display(), 5.0);
    }

    #[test]
    fn test_first_month_has_no_delta() {
        let service = service();
        assert_eq!(service.summary(Some(MonthKey::Sep)).audience_delta, 0);
    }

    #[test]
    fn test_unknown_month_is_empty() {
        let service = service();

        assert_eq!(service.summary(None), Summary::default());
        assert!(service.table(None, "", SortKey::Name, SortDirection::Asc).is_empty());
        assert!(service.charts(None).iter().all(|c| c.points.is_empty()));
        assert_eq!(
            service.detail(None, "alpha").unwrap_err(),
            DashboardError::RecordNotFound {
                month: "unknown month".to_string(),
                handle: "alpha".to_string()
            }
        );
    }

    #[test]
    fn test_dashboard_view() {
        let service = service();
        let state = SelectionState::initial(service.initial_month()).set_query("alp");
        let dashboard = service.dashboard(&state);

        assert_eq!(dashboard.month, Some(MonthKey::Oct));
        assert_eq!(dashboard.previous_month, Some(MonthKey::Sep));
        assert_eq!(dashboard.title, "Channels (oct)");
        assert_eq!(dashboard.tiles[0].value, TileValue::Number(300.0));
        assert_eq!(dashboard.tiles[1].value, TileValue::Number(50.0));
        assert_eq!(dashboard.charts[0].points.len(), 1);
        assert_eq!(dashboard.charts[0].points[0].handle, "beta");
        assert_eq!(dashboard.table.len(), 1);
        assert_eq!(dashboard.table[0].name, "Alpha");
        assert!(dashboard.focused.is_none());
    }

    #[test]
    fn test_tiles_use_configured_precision() {
        let service = service();
        let summary = Summary {
            total_audience: 300,
            avg_engagement_rate: 3.14159,
            avg_likes: 12.345,
            ..Default::default()
        };

        let tiles = service.tiles(&summary);
        assert_eq!(tiles[0].value, TileValue::Number(300.0));
        assert_eq!(tiles[2].value, TileValue::Number(3.14));
        assert_eq!(tiles[3].value, TileValue::Number(12.3));
    }

    #[test]
    fn test_dashboard_for_unknown_month() {
        let service = service();
        let dashboard = service.month_dashboard(None, "", SortKey::AudienceSize, SortDirection::Desc);

        assert_eq!(dashboard.title, "Channels (no data)");
        assert_eq!(dashboard.summary, Summary::default());
        assert!(dashboard.table.is_empty());
        assert_eq!(dashboard.tiles[0].value, TileValue::Number(0.0));
    }

    #[test]
    fn test_dashboard_carries_focus_detail() {
        let service = service();
        let alpha = service.find_record(Some(MonthKey::Oct), "alpha").unwrap();
        let state = SelectionState::initial(MonthKey::Oct).focus(alpha);

        let detail = service.dashboard(&state).focused.unwrap();
        assert_eq!(detail.record.handle, "alpha");
        assert_eq!(detail.engagement_rate, 10.0);
    }

    #[test]
    fn test_detail_lookup() {
        let service = service();
        let detail = service.detail(Some(MonthKey::Oct), "alpha").unwrap();

        assert_eq!(detail.engagement_rate, 10.0);
        assert!(service.detail(Some(MonthKey::Oct), "gamma").is_err());
    }
}
