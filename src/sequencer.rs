//! Request-generation tokens for overlapping fetches.
//!
//! Each fetch takes a [`RequestTicket`] before it starts. When its response
//! arrives, [`ViewState::settle`] applies it only if no newer fetch has begun
//! since, so a slow stale response can never overwrite a fresher view.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::error::Result;

/// Monotonic generation number issued by a [`FetchSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation, superseding all earlier tickets.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// What a view shows for one fetched data set.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// Terminal fetch failure. Replaces any previous data.
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    /// Mark the view as loading for a new request and return its ticket.
    pub fn start(&mut self, sequencer: &FetchSequencer) -> RequestTicket {
        *self = ViewState::Loading;
        sequencer.begin()
    }

    /// Apply a fetch result if `ticket` is still the latest generation.
    ///
    /// Returns `false` (and leaves the state untouched) for stale results.
    pub fn settle(&mut self, sequencer: &FetchSequencer, ticket: RequestTicket, result: Result<T>) -> bool {
        if !sequencer.is_current(ticket) {
            debug!(
                "Discarding stale response for generation {}",
                ticket.generation()
            );
            return false;
        }
        *self = match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e.to_string()),
        };
        true
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
