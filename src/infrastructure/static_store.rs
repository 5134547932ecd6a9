// Record store backed by per-month JSON files loaded once at startup
use crate::application::record_store::RecordStore;
use crate::domain::record::{normalize, MonthKey, OrgRecord, RawRecord};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct StaticRecordStore {
    months: BTreeMap<MonthKey, Vec<OrgRecord>>,
}

impl StaticRecordStore {
    /// Build from raw month datasets, normalizing every record and keeping
    /// the first record for each handle.
    pub fn from_raw<I>(datasets: I) -> Self
    where
        I: IntoIterator<Item = (MonthKey, Vec<RawRecord>)>,
    {
        let mut months = BTreeMap::new();

        for (month, raw_records) in datasets {
            let mut seen = HashSet::new();
            let mut records = Vec::with_capacity(raw_records.len());

            for raw in raw_records {
                let record = normalize(raw);
                if !seen.insert(record.handle.clone()) {
                    tracing::warn!(
                        "Dropping duplicate handle {} in {} dataset",
                        record.handle,
                        month
                    );
                    continue;
                }
                records.push(record);
            }

            months.insert(month, records);
        }

        Self { months }
    }

    /// Load `<dir>/<month>.json` for every month token. Missing files leave the month out.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut datasets = Vec::new();

        for month in MonthKey::ALL {
            let path = dir.join(format!("{}.json", month));
            if !path.exists() {
                tracing::debug!("No dataset for {} at {}", month, path.display());
                continue;
            }

            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read dataset {}", path.display()))?;
            let raw: Vec<RawRecord> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

            tracing::info!("Loaded {} records for {}", raw.len(), month);
            datasets.push((month, raw));
        }

        Ok(Self::from_raw(datasets))
    }
}

impl RecordStore for StaticRecordStore {
    fn months(&self) -> Vec<MonthKey> {
        self.months.keys().copied().collect()
    }

    fn records(&self, month: MonthKey) -> &[OrgRecord] {
        self.months.get(&month).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn raw(name: &str, handle: &str, subscribers: Option<u64>) -> RawRecord {
        RawRecord {
            company_name: name.to_string(),
            username: handle.to_string(),
            subscribers,
            ..Default::default()
        }
    }

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("channel-metrics-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_months_and_adjacency() {
        let store = StaticRecordStore::from_raw(vec![
            (MonthKey::Oct, vec![raw("Alpha", "alpha", Some(10))]),
            (MonthKey::Aug, vec![raw("Alpha", "alpha", Some(8))]),
        ]);

        assert_eq!(store.months(), vec![MonthKey::Aug, MonthKey::Oct]);
        assert_eq!(store.latest_month(), Some(MonthKey::Oct));
        assert_eq!(store.previous_month(MonthKey::Oct), Some(MonthKey::Aug));
        assert_eq!(store.previous_month(MonthKey::Sep), Some(MonthKey::Aug));
        assert_eq!(store.previous_month(MonthKey::Aug), None);
    }

    #[test]
    fn test_missing_month_is_empty() {
        let store = StaticRecordStore::default();

        assert!(store.records(MonthKey::Mar).is_empty());
        assert_eq!(store.latest_month(), None);
    }

    #[test]
    fn test_duplicate_handles_keep_first() {
        let store = StaticRecordStore::from_raw(vec![(
            MonthKey::Jan,
            vec![
                raw("Alpha", "alpha", Some(1)),
                raw("Alpha Again", "alpha", Some(2)),
                raw("Beta", "beta", None),
            ],
        )]);

        let records = store.records(MonthKey::Jan);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alpha");
        assert_eq!(records[1].audience_size, 0);
    }

    #[test]
    fn test_load_dir() {
        let dir = fixture_dir("load");
        std::fs::write(
            dir.join("sep.json"),
            r#"[{"company_name": "Alpha", "username": "alpha", "subscribers": 1200,
                 "avg_views_per_post": null, "avg_likes_per_post": 4.5}]"#,
        )
        .unwrap();
        std::fs::write(dir.join("oct.json"), "[]").unwrap();

        let store = StaticRecordStore::load_dir(&dir).unwrap();

        assert_eq!(store.months(), vec![MonthKey::Sep, MonthKey::Oct]);
        let sep = store.records(MonthKey::Sep);
        assert_eq!(sep[0].audience_size, 1200);
        assert_eq!(sep[0].avg_views_per_post, 0.0);
        assert!(store.records(MonthKey::Oct).is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_dir_reports_bad_json() {
        let dir = fixture_dir("bad");
        std::fs::write(dir.join("jan.json"), "{ not json").unwrap();

        let err = StaticRecordStore::load_dir(&dir).unwrap_err();
        assert!(err.to_string().contains("jan.json"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
