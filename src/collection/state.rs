use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use crate::error::SyncError;

use super::types::ViewPhase;

pub(crate) struct ViewState<R> {
    pub phase: ViewPhase,
    pub records: Vec<R>,
    pub last_error: Option<SyncError>,
}

impl<R> Default for ViewState<R> {
    fn default() -> Self {
        Self {
            phase: ViewPhase::Idle,
            records: Vec::new(),
            last_error: None,
        }
    }
}

pub(crate) struct ReadTicket {
    pub seq: u64,
    pub token: CancellationToken,
}

#[derive(Default)]
struct LatestRead {
    seq: u64,
    token: Option<CancellationToken>,
    closes: u64,
}

/// Hands out read tickets. Only the most recent ticket may apply its
/// response; starting a read cancels the one before it.
#[derive(Default)]
pub(crate) struct ReadSequencer {
    latest: Mutex<LatestRead>,
}

impl ReadSequencer {
    pub fn begin(&self) -> ReadTicket {
        let mut guard = self.latest.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = guard.token.take() {
            previous.cancel();
        }
        guard.seq = guard.seq.saturating_add(1);
        let token = CancellationToken::new();
        guard.token = Some(token.clone());
        ReadTicket {
            seq: guard.seq,
            token,
        }
    }

    /// Returns true when `seq` is still the latest ticket, releasing it.
    pub fn complete(&self, seq: u64) -> bool {
        let mut guard = self.latest.lock().unwrap_or_else(|p| p.into_inner());
        if guard.seq != seq {
            return false;
        }
        guard.token = None;
        true
    }

    /// Invalidates every outstanding ticket.
    pub fn cancel_all(&self) {
        let mut guard = self.latest.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(token) = guard.token.take() {
            token.cancel();
        }
        guard.seq = guard.seq.saturating_add(1);
        guard.closes = guard.closes.saturating_add(1);
    }

    /// Bumped by every `cancel_all`; mutations compare it before touching state.
    pub fn generation(&self) -> u64 {
        self.latest
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .closes
    }
}
