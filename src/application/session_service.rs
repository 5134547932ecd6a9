// Session service - Selection state per dashboard session with observers
use crate::application::dashboard_service::DashboardService;
use crate::application::error::DashboardError;
use crate::domain::record::MonthKey;
use crate::domain::selection::SelectionState;
use crate::domain::table::SortKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::watch;

pub type SessionId = u64;

struct Session {
    tx: watch::Sender<SelectionState>,
    last_active: Mutex<Instant>,
}

impl Session {
    fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last_active = *self.last_active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        now.saturating_duration_since(last_active)
    }
}

/// Holds the current snapshot of every open session. Transitions replace the
/// snapshot and notify every registered observer of that session.
///
/// A session lives until `end` is called or until `evict_idle` finds it
/// untouched for longer than the idle timeout with no observer attached.
#[derive(Clone)]
pub struct SessionService {
    dashboard: DashboardService,
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    next_id: Arc<AtomicU64>,
}

impl SessionService {
    pub fn new(dashboard: DashboardService) -> Self {
        Self {
            dashboard,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }

    pub fn create(&self) -> (SessionId, SelectionState) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let state = SelectionState::initial(self.dashboard.initial_month());
        let (tx, _rx) = watch::channel(state.clone());
        let session = Session {
            tx,
            last_active: Mutex::new(Instant::now()),
        };

        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, session);

        tracing::info!("Created session {} on {}", id, state.month);
        (id, state)
    }

    pub fn get(&self, id: SessionId) -> Result<SelectionState, DashboardError> {
        let sessions = self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let session = sessions.get(&id).ok_or(DashboardError::SessionNotFound(id))?;
        session.touch();
        let state = session.tx.borrow().clone();
        Ok(state)
    }

    /// Register an observer; it sees the current snapshot and every later one.
    pub fn subscribe(&self, id: SessionId) -> Result<watch::Receiver<SelectionState>, DashboardError> {
        let sessions = self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let session = sessions.get(&id).ok_or(DashboardError::SessionNotFound(id))?;
        session.touch();
        Ok(session.tx.subscribe())
    }

    pub fn end(&self, id: SessionId) -> Result<(), DashboardError> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id);

        match removed {
            Some(_) => {
                tracing::info!("Ended session {}", id);
                Ok(())
            }
            None => Err(DashboardError::SessionNotFound(id)),
        }
    }

    /// Drop sessions idle for longer than `max_idle` that have no observer.
    /// Returns how many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = sessions.len();

        sessions.retain(|id, session| {
            let keep = session.tx.receiver_count() > 0 || session.idle_for(now) <= max_idle;
            if !keep {
                tracing::info!("Evicted idle session {}", id);
            }
            keep
        });

        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn select_month(&self, id: SessionId, month: MonthKey) -> Result<SelectionState, DashboardError> {
        self.transition(id, "select_month", |state| Ok(state.select_month(month)))
    }

    pub fn set_query(&self, id: SessionId, query: &str) -> Result<SelectionState, DashboardError> {
        self.transition(id, "set_query", |state| Ok(state.set_query(query)))
    }

    pub fn sort_by(&self, id: SessionId, key: SortKey) -> Result<SelectionState, DashboardError> {
        self.transition(id, "sort_by", |state| Ok(state.sort_by(key)))
    }

    /// Focus a record of the session's active month by handle.
    pub fn focus(&self, id: SessionId, handle: &str) -> Result<SelectionState, DashboardError> {
        self.transition(id, "focus", |state| {
            let record = self.dashboard.find_record(Some(state.month), handle)?;
            Ok(state.focus(record))
        })
    }

    pub fn unfocus(&self, id: SessionId) -> Result<SelectionState, DashboardError> {
        self.transition(id, "unfocus", |state| Ok(state.unfocus()))
    }

    /// Read, apply and publish under the channel's write lock, so concurrent
    /// transitions on one session are applied one after another.
    fn transition<F>(&self, id: SessionId, name: &str, apply: F) -> Result<SelectionState, DashboardError>
    where
        F: FnOnce(&SelectionState) -> Result<SelectionState, DashboardError>,
    {
        let sessions = self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let session = sessions.get(&id).ok_or(DashboardError::SessionNotFound(id))?;
        session.touch();

        let mut outcome = Err(DashboardError::SessionNotFound(id));
        session.tx.send_if_modified(|state| match apply(state) {
            Ok(next) => {
                *state = next.clone();
                outcome = Ok(next);
                true
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });

        let next = outcome?;
        tracing::debug!("Session {} {}: {:?}", id, name, next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::service;
    use crate::domain::table::SortDirection;

    #[test]
    fn test_create_starts_on_latest_month() {
        let sessions = SessionService::new(service());
        let (id, state) = sessions.create();

        assert_eq!(state.month, MonthKey::Oct);
        assert_eq!(sessions.get(id).unwrap(), state);
    }

    #[test]
    fn test_sessions_are_independent() {
        let sessions = SessionService::new(service());
        let (first, _) = sessions.create();
        let (second, _) = sessions.create();

        sessions.set_query(first, "beta").unwrap();

        assert_eq!(sessions.get(first).unwrap().query, "beta");
        assert_eq!(sessions.get(second).unwrap().query, "");
    }

    #[test]
    fn test_transitions() {
        let sessions = SessionService::new(service());
        let (id, _) = sessions.create();

        let state = sessions.sort_by(id, SortKey::AudienceSize).unwrap();
        assert_eq!(state.direction, SortDirection::Asc);

        let state = sessions.select_month(id, MonthKey::Sep).unwrap();
        assert_eq!(state.month, MonthKey::Sep);
        assert_eq!(state.direction, SortDirection::Asc);

        let state = sessions.focus(id, "beta").unwrap();
        assert_eq!(state.focused.as_ref().map(|r| r.audience_size), Some(150));

        // focus survives a month change
        let state = sessions.select_month(id, MonthKey::Oct).unwrap();
        assert_eq!(state.focused.as_ref().map(|r| r.audience_size), Some(150));

        assert!(sessions.unfocus(id).unwrap().focused.is_none());
    }

    #[test]
    fn test_focus_unknown_handle_keeps_state() {
        let sessions = SessionService::new(service());
        let (id, before) = sessions.create();

        let err = sessions.focus(id, "nobody").unwrap_err();
        assert!(matches!(err, DashboardError::RecordNotFound { .. }));
        assert_eq!(sessions.get(id).unwrap(), before);
    }

    #[test]
    fn test_unknown_and_ended_sessions() {
        let sessions = SessionService::new(service());
        assert_eq!(sessions.get(42).unwrap_err(), DashboardError::SessionNotFound(42));

        let (id, _) = sessions.create();
        sessions.end(id).unwrap();
        assert!(sessions.set_query(id, "x").is_err());
        assert!(sessions.end(id).is_err());
    }

    #[test]
    fn test_concurrent_toggles_are_not_lost() {
        for _ in 0..5 {
            let sessions = SessionService::new(service());
            let (id, _) = sessions.create();

            // 3 * 1001 toggles from Desc is odd, so the session must end Asc
            std::thread::scope(|scope| {
                for _ in 0..3 {
                    scope.spawn(|| {
                        for _ in 0..1001 {
                            sessions.sort_by(id, SortKey::AudienceSize).unwrap();
                        }
                    });
                }
            });

            assert_eq!(sessions.get(id).unwrap().direction, SortDirection::Asc);
        }
    }

    #[test]
    fn test_evict_idle_sessions() {
        let sessions = SessionService::new(service());
        let (idle, _) = sessions.create();
        let (watched, _) = sessions.create();
        let _rx = sessions.subscribe(watched).unwrap();

        assert_eq!(sessions.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(sessions.len(), 2);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(sessions.evict_idle(Duration::ZERO), 1);
        assert!(sessions.get(idle).is_err());
        assert!(sessions.get(watched).is_ok());
    }

    #[tokio::test]
    async fn test_observer_sees_transitions() {
        let sessions = SessionService::new(service());
        let (id, _) = sessions.create();
        let mut rx = sessions.subscribe(id).unwrap();

        sessions.set_query(id, "alp").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().query, "alp");

        sessions.sort_by(id, SortKey::Name).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().sort_key, SortKey::Name);
    }
}
