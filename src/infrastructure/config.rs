use crate::domain::widgets::{ChartKind, ChartMetric, LabelStyle, TileMetric};
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const MAX_CHART_LIMIT: usize = 50;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub data: DataSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub title: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Channel statistics".to_string(),
        }
    }
}

/// Idle sessions without observers are dropped after `idle_timeout_secs`.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WidgetsConfig {
    #[serde(default)]
    pub tiles: Vec<TileConfig>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub unit: String,
    /// Decimal places for numeric values; 0 rounds to whole numbers.
    #[serde(default)]
    pub precision: i32,
    pub metric: TileMetric,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub metric: ChartMetric,
    #[serde(default = "default_chart_limit")]
    pub limit: usize,
    #[serde(default)]
    pub labels: LabelStyle,
    pub y_max: Option<f64>,
}

fn default_chart_limit() -> usize {
    10
}

/// Server and data settings from `config/dashboard`, overridable with
/// `DASHBOARD__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(File::with_name("config/dashboard"))
        .add_source(
            Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_widgets_config() -> anyhow::Result<WidgetsConfig> {
    let settings = config::Config::builder()
        .add_source(File::with_name("config/widgets"))
        .build()?;

    let widgets: WidgetsConfig = settings.try_deserialize()?;
    validate_widgets(&widgets)?;
    Ok(widgets)
}

/// Parse widget definitions from TOML text.
pub fn parse_widgets_config(toml: &str) -> anyhow::Result<WidgetsConfig> {
    let settings = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;

    let widgets: WidgetsConfig = settings.try_deserialize()?;
    validate_widgets(&widgets)?;
    Ok(widgets)
}

fn validate_widgets(widgets: &WidgetsConfig) -> anyhow::Result<()> {
    for chart in &widgets.charts {
        if chart.limit == 0 || chart.limit > MAX_CHART_LIMIT {
            anyhow::bail!(
                "chart '{}' has limit {}, expected 1..={}",
                chart.id,
                chart.limit,
                MAX_CHART_LIMIT
            );
        }
    }
    Ok(())
}
