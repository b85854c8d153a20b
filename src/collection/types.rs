use serde::Serialize;

use crate::error::SyncError;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The response replaced the visible list.
    Applied { count: usize },
    /// A newer read was issued before this one resolved; its result was dropped.
    Superseded,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEvent {
    Loaded {
        collection: &'static str,
        count: usize,
    },
    Failed {
        collection: &'static str,
        error: SyncError,
    },
}

#[derive(Serialize, Clone, Debug)]
pub struct ViewSnapshot<R> {
    pub phase: ViewPhase,
    pub records: Vec<R>,
    pub last_error: Option<SyncError>,
}
