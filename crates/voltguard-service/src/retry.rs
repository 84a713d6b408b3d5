//! Backoff for rate-limited upstream calls.

use std::{future::Future, time::Duration};

use voltguard_core::{Error, Result};

/// Retries after the initial attempt: 1s, 2s, 4s.
const MAX_RETRIES: u32 = 3;
const INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Run `op`, retrying only on [`Error::RateLimited`] with doubling delays.
/// Any other error, and the fourth rate-limit in a row, surface to the
/// caller.
pub async fn with_backoff<T, F, Fut>(mut op: F) -> Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T>>,
{
  let mut delay = INITIAL_DELAY;
  let mut retries = 0;
  loop {
    match op().await {
      Err(Error::RateLimited) if retries < MAX_RETRIES => {
        retries += 1;
        tracing::warn!(retries, delay_ms = delay.as_millis() as u64,
          "upstream rate limited, backing off");
        tokio::time::sleep(delay).await;
        delay *= 2;
      }
      other => return other,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use tokio::time::Instant;

  use super::*;

  #[tokio::test(start_paused = true)]
  async fn retries_rate_limits_then_succeeds() {
    let calls = AtomicU32::new(0);
    let start = Instant::now();

    let out = with_backoff(|| async {
      let n = calls.fetch_add(1, Ordering::SeqCst);
      if n < 2 { Err(Error::RateLimited) } else { Ok(n) }
    })
    .await
    .unwrap();

    assert_eq!(out, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // Two waits: 1s + 2s of (paused) virtual time.
    assert_eq!(start.elapsed(), Duration::from_secs(3));
  }

  #[tokio::test(start_paused = true)]
  async fn gives_up_after_three_retries() {
    let calls = AtomicU32::new(0);

    let out: Result<()> = with_backoff(|| async {
      calls.fetch_add(1, Ordering::SeqCst);
      Err(Error::RateLimited)
    })
    .await;

    assert!(matches!(out, Err(Error::RateLimited)));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }

  #[tokio::test(start_paused = true)]
  async fn other_errors_are_not_retried() {
    let calls = AtomicU32::new(0);

    let out: Result<()> = with_backoff(|| async {
      calls.fetch_add(1, Ordering::SeqCst);
      Err(Error::Forbidden)
    })
    .await;

    assert!(matches!(out, Err(Error::Forbidden)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
