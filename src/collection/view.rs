use std::{
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
};

use reqwest::StatusCode;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{SyncError, SyncErrorCode};
use crate::net;
use crate::session::{Session, UserId};
use crate::transport::{ApiRequest, Transport};

use super::helpers::{check_status, created_id, decode_records};
use super::state::{ReadSequencer, ViewState};
use super::types::{ReadOutcome, ViewEvent, ViewPhase, ViewSnapshot};
use super::{Collection, RecordId};

#[derive(Serialize)]
struct CreateBody<'a, D: Serialize> {
    #[serde(flatten)]
    draft: &'a D,
    user_id: UserId,
}

/// One screen's cached copy of a server-held collection.
pub struct CollectionView<C: Collection, T: Transport> {
    id: Uuid,
    transport: T,
    base_url: Url,
    session: Arc<Session>,
    state: Mutex<ViewState<C::Record>>,
    reads: ReadSequencer,
    events: Option<UnboundedSender<ViewEvent>>,
    _collection: PhantomData<fn() -> C>,
}

impl<C: Collection, T: Transport> CollectionView<C, T> {
    pub fn new(transport: T, base_url: Url, session: Arc<Session>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            base_url,
            session,
            state: Mutex::new(ViewState::default()),
            reads: ReadSequencer::default(),
            events: None,
            _collection: PhantomData,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<ViewEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> ViewPhase {
        self.lock_state().phase
    }

    pub fn records(&self) -> Vec<C::Record> {
        self.lock_state().records.clone()
    }

    pub fn last_error(&self) -> Option<SyncError> {
        self.lock_state().last_error.clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot<C::Record> {
        let state = self.lock_state();
        ViewSnapshot {
            phase: state.phase,
            records: state.records.clone(),
            last_error: state.last_error.clone(),
        }
    }

    pub async fn list(&self) -> Result<ReadOutcome, SyncError> {
        let user = self.require_user()?;
        let url = self.endpoint(C::LIST_PATH, &[("user_id", user.to_string())])?;
        self.read(ApiRequest::get(url), false, user).await
    }

    pub async fn search(&self, term: &str) -> Result<ReadOutcome, SyncError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list().await;
        }
        let user = self.require_user()?;
        let Some(path) = C::SEARCH_PATH else {
            return Err(self.fail(SyncError::new(
                SyncErrorCode::Unsupported,
                format!("{} cannot be searched", C::NAME),
            )));
        };
        let url = self.endpoint(path, &[("name", term.to_string())])?;
        self.read(ApiRequest::get(url), true, user).await
    }

    /// Submits a new record, then refreshes the whole list. The draft is only
    /// borrowed so the caller can amend and resubmit it after a failure.
    pub async fn create(&self, draft: &C::Draft) -> Result<Option<RecordId>, SyncError> {
        let user = self.require_user()?;
        let generation = self.reads.generation();
        let url = self.endpoint(C::CREATE_PATH, &[])?;
        let body = serde_json::to_value(CreateBody {
            draft,
            user_id: user,
        })
        .map_err(|e| {
            self.fail(SyncError::invalid_input(format!(
                "could not encode {} draft: {e}",
                C::NAME
            )))
        })?;

        self.set_phase(ViewPhase::Loading);
        let created = self
            .transport
            .send(ApiRequest::post(url, body))
            .await
            .and_then(|response| check_status(response, C::CREATE_FAILED))
            .map(|response| created_id(&response.body, C::CREATED_ID_FIELD))
            .map_err(|err| self.fail(err))?;

        info!(
            collection = C::NAME,
            view_id = %self.id,
            user_id = %user,
            created_id = ?created,
            "record created"
        );
        if self.closed_since(generation) {
            return Ok(created);
        }
        // Refresh failures surface through the view state and event channel.
        let _ = self.list().await;
        Ok(created)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), SyncError> {
        let user = self.require_user()?;
        let generation = self.reads.generation();
        let mut query = vec![(C::DELETE_ID_PARAM, id.to_string())];
        if C::DELETE_SENDS_USER {
            query.push(("user_id", user.to_string()));
        }
        let url = self.endpoint(C::DELETE_PATH, &query)?;

        self.set_phase(ViewPhase::Loading);
        self.transport
            .send(ApiRequest::delete(url))
            .await
            .and_then(|response| check_status(response, C::DELETE_FAILED))
            .map_err(|err| self.fail(err))?;

        info!(
            collection = C::NAME,
            view_id = %self.id,
            user_id = %user,
            record_id = id,
            "record deleted"
        );
        if self.closed_since(generation) {
            return Ok(());
        }
        self.lock_state()
            .records
            .retain(|record| C::record_id(record) != id);
        let _ = self.list().await;
        Ok(())
    }

    /// Drops in-flight reads and the cached list, returning the view to idle.
    /// Mutations already on the wire still complete but leave the view alone.
    pub fn close(&self) {
        self.reads.cancel_all();
        *self.lock_state() = ViewState::default();
        debug!(collection = C::NAME, view_id = %self.id, "view closed");
    }

    async fn read(
        &self,
        request: ApiRequest,
        search: bool,
        user: UserId,
    ) -> Result<ReadOutcome, SyncError> {
        let ticket = self.reads.begin();
        self.set_phase(ViewPhase::Loading);

        let response = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => {
                debug!(
                    collection = C::NAME,
                    view_id = %self.id,
                    seq = ticket.seq,
                    "read cancelled by a newer request"
                );
                return Ok(ReadOutcome::Superseded);
            }
            response = self.transport.send(request) => response,
        };

        let fallback = if search {
            C::SEARCH_FAILED
        } else {
            C::LIST_FAILED
        };
        let result = response.and_then(|response| {
            if search && response.status == StatusCode::NOT_FOUND {
                return Ok(Vec::new());
            }
            let response = check_status(response, fallback)?;
            let mut records = decode_records::<C::Record>(&response.body, fallback)?;
            if search {
                records.retain(|record| {
                    C::record_owner(record).map_or(true, |owner| owner == user)
                });
            }
            Ok(records)
        });
        self.apply_read(ticket.seq, result)
    }

    fn apply_read(
        &self,
        seq: u64,
        result: Result<Vec<C::Record>, SyncError>,
    ) -> Result<ReadOutcome, SyncError> {
        let mut state = self.lock_state();
        if !self.reads.complete(seq) {
            debug!(
                collection = C::NAME,
                view_id = %self.id,
                seq,
                "discarding stale response"
            );
            return Ok(ReadOutcome::Superseded);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                state.records = records;
                state.phase = ViewPhase::Loaded;
                state.last_error = None;
                drop(state);
                self.emit(ViewEvent::Loaded {
                    collection: C::NAME,
                    count,
                });
                Ok(ReadOutcome::Applied { count })
            }
            Err(err) => {
                drop(state);
                Err(self.fail(err))
            }
        }
    }

    fn closed_since(&self, generation: u64) -> bool {
        let closed = self.reads.generation() != generation;
        if closed {
            debug!(
                collection = C::NAME,
                view_id = %self.id,
                "view closed during mutation, skipping refresh"
            );
        }
        closed
    }

    fn require_user(&self) -> Result<UserId, SyncError> {
        self.session.require_user().map_err(|err| self.fail(err))
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, SyncError> {
        net::endpoint_url(&self.base_url, path, query).map_err(|err| self.fail(err))
    }

    /// Records a failure without touching the cached list.
    fn fail(&self, err: SyncError) -> SyncError {
        warn!(
            collection = C::NAME,
            view_id = %self.id,
            code = err.code.as_str(),
            local = err.code.is_local(),
            "{}",
            err.message
        );
        {
            let mut state = self.lock_state();
            state.phase = ViewPhase::Failed;
            state.last_error = Some(err.clone());
        }
        self.emit(ViewEvent::Failed {
            collection: C::NAME,
            error: err.clone(),
        });
        err
    }

    fn set_phase(&self, phase: ViewPhase) {
        self.lock_state().phase = phase;
    }

    fn emit(&self, event: ViewEvent) {
        if let Some(events) = self.events.as_ref() {
            let _ = events.send(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState<C::Record>> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl<C: Collection, T: Transport> Drop for CollectionView<C, T> {
    fn drop(&mut self) {
        self.reads.cancel_all();
    }
}
