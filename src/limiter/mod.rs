//! In-process rate limiting keyed by (identity, action).
//!
//! Fixed-window-reset counting: a key's window starts on its first request
//! and every request inside the window increments the same counter; once
//! the window expires the next request starts a fresh one. O(1) memory and
//! O(1) work per key, at the cost of not being a true sliding window.
//!
//! Counters live in a process-local map, so the guarantee is best-effort
//! per-process limiting. The map is owned by [`RateLimiter`] and injected
//! through app state rather than held in a module-level singleton, which
//! keeps independent limiters possible in tests and leaves room for a
//! shared backend behind the same call contract.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Action names with their own budgets across the platform.
pub mod actions {
    /// Shared budget for the gated API surface.
    pub const API: &str = "api";
    /// AI assistant conversation turns.
    pub const CHAT: &str = "chat";
    /// AI food-photo analysis.
    pub const ANALYZE: &str = "analyze";
}

/// Max-requests-per-window policy for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

/// Budgets the gate enforces, snapshotted from config into app state.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub api: RateLimitPolicy,
    pub chat: RateLimitPolicy,
    pub analyze: RateLimitPolicy,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_in: Duration,
}

/// Per-key window counter. Expired records behave as fresh on next access.
#[derive(Debug)]
struct RateLimitRecord {
    count: u32,
    window_reset_at: Instant,
}

/// Once the map holds this many keys, expired records are swept before the
/// next insert so distinct identities seen long ago do not accumulate for
/// the life of the process.
const SWEEP_WATERMARK: usize = 4096;

#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request against `(identity, action)` and decide whether it
    /// may proceed under `policy`.
    ///
    /// The increment happens before the decision: the request that tips
    /// the counter over the limit is itself counted and denied, and
    /// further over-limit requests keep counting (saturating) without
    /// resetting the window early. Budgets for different actions are fully
    /// independent, as are different identities.
    pub fn check(&self, identity: &str, action: &str, policy: RateLimitPolicy) -> RateLimitDecision {
        self.check_at(Instant::now(), identity, action, policy)
    }

    /// Read the current quota for `(identity, action)` without counting a
    /// request. Used by quota introspection endpoints.
    pub fn quota(&self, identity: &str, action: &str, policy: RateLimitPolicy) -> RateLimitDecision {
        self.quota_at(Instant::now(), identity, action, policy)
    }

    fn check_at(
        &self,
        now: Instant,
        identity: &str,
        action: &str,
        policy: RateLimitPolicy,
    ) -> RateLimitDecision {
        let key = Self::key(identity, action);

        // The lock is held across the whole increment-then-compare
        // sequence; two concurrent requests for the same key can never
        // both observe a count one below the limit.
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_WATERMARK {
            windows.retain(|_, record| now <= record.window_reset_at);
        }

        let record = windows.entry(key).or_insert(RateLimitRecord {
            count: 0,
            window_reset_at: now + policy.window,
        });

        if now > record.window_reset_at {
            record.count = 0;
            record.window_reset_at = now + policy.window;
        }

        record.count = record.count.saturating_add(1);

        RateLimitDecision {
            allowed: record.count <= policy.max_requests,
            remaining: policy.max_requests.saturating_sub(record.count),
            reset_in: record.window_reset_at.saturating_duration_since(now),
        }
    }

    fn quota_at(
        &self,
        now: Instant,
        identity: &str,
        action: &str,
        policy: RateLimitPolicy,
    ) -> RateLimitDecision {
        let windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match windows.get(&Self::key(identity, action)) {
            Some(record) if now <= record.window_reset_at => RateLimitDecision {
                allowed: record.count < policy.max_requests,
                remaining: policy.max_requests.saturating_sub(record.count),
                reset_in: record.window_reset_at.saturating_duration_since(now),
            },
            // No live window: the next request starts a fresh one.
            _ => RateLimitDecision {
                allowed: policy.max_requests > 0,
                remaining: policy.max_requests,
                reset_in: Duration::ZERO,
            },
        }
    }

    fn key(identity: &str, action: &str) -> String {
        format!("{}:{}", identity, action)
    }
}
