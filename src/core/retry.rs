//! Rate-limit aware rename.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::slack::{ApiError, ChannelApi};

/// Blocking pause used for backoff and pacing.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Rename one validated, active channel.
///
/// Rate-limit signals are retried after the signaled wait (or the configured
/// fallback) until `max_rename_attempts` calls have been made. Any other
/// failure is returned immediately.
pub fn rename_channel<A, S>(
    api: &A,
    sleeper: &S,
    settings: &Settings,
    channel_id: &str,
    asis: &str,
    tobe: &str,
) -> Result<()>
where
    A: ChannelApi + ?Sized,
    S: Sleeper + ?Sized,
{
    let max_attempts = settings.max_rename_attempts;

    for attempt in 1..=max_attempts {
        match api.rename_channel(channel_id, tobe) {
            Ok(()) => return Ok(()),
            Err(ApiError::RateLimited(hint)) => {
                let wait = settings.backoff_for(hint);
                log_status!(
                    "rename",
                    "rate limited renaming {} -> {}, retrying after {:?} (attempt {}/{})",
                    asis,
                    tobe,
                    wait,
                    attempt,
                    max_attempts
                );
                sleeper.sleep(wait);
            }
            Err(ApiError::Failed(err)) => return Err(err),
        }
    }

    Err(Error::rename_retries_exhausted(max_attempts, asis, tobe))
}
