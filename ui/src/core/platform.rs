//! Platform glue: timers and the local calendar date.

use std::time::Duration;

use time::{Date, OffsetDateTime};

/// Suspend the current task for `delay`. A zero delay returns immediately.
pub async fn sleep(delay: Duration) {
    if delay.is_zero() {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(delay).await;
    }
}

/// Today's date in the local offset, falling back to UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
