//! Inter-page wait policy.
//!
//! The fetch loop pauses between successive page requests (never before the
//! first or after the last). Tests use [`WaitPolicy::none`]; production uses
//! a randomized range.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

/// Produces the delay to sleep before the next page request.
#[derive(Clone)]
pub struct WaitPolicy {
    next: Arc<dyn Fn() -> Duration + Send + Sync>,
    label: String,
}

impl WaitPolicy {
    /// Never waits.
    #[must_use]
    pub fn none() -> Self {
        Self {
            next: Arc::new(|| Duration::ZERO),
            label: "none".to_string(),
        }
    }

    /// Always waits exactly `delay`.
    #[must_use]
    pub fn fixed(delay: Duration) -> Self {
        Self {
            next: Arc::new(move || delay),
            label: format!("fixed({}ms)", delay.as_millis()),
        }
    }

    /// Waits a uniformly random number of milliseconds in `range_ms`.
    ///
    /// A reversed range is treated as its swapped counterpart.
    #[must_use]
    pub fn uniform_ms(range_ms: RangeInclusive<u64>) -> Self {
        let (lo, hi) = if range_ms.start() <= range_ms.end() {
            (*range_ms.start(), *range_ms.end())
        } else {
            (*range_ms.end(), *range_ms.start())
        };
        Self {
            next: Arc::new(move || Duration::from_millis(rand::rng().random_range(lo..=hi))),
            label: format!("uniform({lo}..={hi}ms)"),
        }
    }

    /// Wraps an arbitrary delay source.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Duration + Send + Sync + 'static,
    {
        Self {
            next: Arc::new(f),
            label: "custom".to_string(),
        }
    }

    /// The delay to apply before the next request.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        (self.next)()
    }

    /// Sleeps for [`Self::next_delay`], skipping the timer entirely for zero.
    pub(crate) async fn pause(&self, next_page: u32) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!(
            next_page,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "waiting before next page"
        );
        tokio::time::sleep(delay).await;
    }
}

impl Default for WaitPolicy {
    /// The production pacing: 700–1500 ms between pages.
    fn default() -> Self {
        Self::uniform_ms(700..=1500)
    }
}

impl fmt::Debug for WaitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WaitPolicy").field(&self.label).finish()
    }
}
