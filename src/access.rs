//! # Access Module
//!
//! Entitlement and quota guard: the per-user rate limit, the free-attempt
//! allowance, and the lifetime entitlement bought through `buy_access`.
//!
//! All checks operate on a locked [`UserRecord`], so each check-and-update
//! is atomic with respect to other events of the same user.

use chrono::{DateTime, Utc};

use crate::config::AccessPolicy;
use crate::errors::RequestError;
use crate::store::UserRecord;

/// Result of granting lifetime access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Granted,
    AlreadyGranted,
}

impl UserRecord {
    /// Allow one cooking request per rate-limit window.
    ///
    /// A rejected request does not move the window.
    pub fn check_rate_limit(
        &mut self,
        now: DateTime<Utc>,
        policy: &AccessPolicy,
    ) -> Result<(), RequestError> {
        if let Some(last) = self.last_request_at {
            let elapsed = now - last;
            let window = policy.rate_limit_window();
            if elapsed < window {
                let remaining = window - elapsed;
                // Round up so "0 seconds left" is never shown
                let retry_in_secs = (remaining.num_milliseconds() + 999) / 1000;
                return Err(RequestError::RateLimited { retry_in_secs });
            }
        }
        self.last_request_at = Some(now);
        Ok(())
    }

    /// Consume a free attempt unless the user is entitled
    pub fn check_quota(&mut self, policy: &AccessPolicy) -> Result<(), RequestError> {
        if self.entitled {
            return Ok(());
        }
        if self.free_attempts_used >= policy.free_attempts {
            return Err(RequestError::QuotaExceeded);
        }
        self.free_attempts_used += 1;
        Ok(())
    }

    /// Unlock unlimited requests; a repeated grant changes nothing
    pub fn grant_entitlement(&mut self) -> Grant {
        if self.entitled {
            return Grant::AlreadyGranted;
        }
        self.entitled = true;
        self.free_attempts_used = 0;
        self.cached = None;
        Grant::Granted
    }
}
