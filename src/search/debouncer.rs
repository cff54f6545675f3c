use std::time::Duration;

use tokio::time::Instant;

/// Default quiet period after the last edit.
pub const DEBOUNCE_MS: u64 = 300;

/// Wait used when nothing is pending.
const IDLE_WAIT: Duration = Duration::from_secs(86400);

/// Pure debouncer for query edits: only handles timing and deduplication.
pub struct SearchDebouncer {
    quiet: Duration,
    pending: Option<String>,
    last_edit: Option<Instant>,
    /// Last query handed out; an identical settled query is not repeated.
    last_taken: Option<String>,
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_edit: None,
            last_taken: None,
        }
    }

    /// Record an edit: replaces the pending query and restarts the quiet period.
    pub fn push(&mut self, query: &str) {
        crate::debug!("search"; "edit: {:?}", query);
        self.pending = Some(query.trim().to_string());
        self.last_edit = Some(Instant::now());
    }

    pub fn is_ready(&self) -> bool {
        let Some(last_edit) = self.last_edit else {
            return false;
        };
        self.pending.is_some() && last_edit.elapsed() >= self.quiet
    }

    /// Take the settled query if the quiet period has elapsed.
    pub fn take_if_ready(&mut self) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        self.flush()
    }

    /// Take the pending query without waiting for the quiet period.
    ///
    /// Used when no further edits can arrive.
    pub fn flush(&mut self) -> Option<String> {
        self.last_edit = None;
        let query = self.pending.take()?;
        if self.last_taken.as_deref() == Some(query.as_str()) {
            crate::debug!("search"; "unchanged: {:?}", query);
            return None;
        }
        self.last_taken = Some(query.clone());
        Some(query)
    }

    /// Precise sleep duration until the pending query may settle.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_edit) = self.last_edit else {
            return IDLE_WAIT;
        };

        self.quiet
            .saturating_sub(last_edit.elapsed())
            .max(Duration::from_millis(1))
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}
