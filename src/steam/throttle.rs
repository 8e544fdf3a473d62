use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(6);

/// Enforces a minimum interval between consecutive outgoing requests.
///
/// A single throttle is shared by every client talking to the market, so the
/// interval holds globally and not per endpoint. The lock is held while
/// waiting, which serializes callers: no two dispatches start closer than
/// `interval` apart.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Waits until the interval since the previous dispatch has passed, then
    /// records now as the latest dispatch. Returns how long it slept.
    pub async fn wait(&self) -> Duration {
        let mut last_dispatch = self.last_dispatch.lock().await;

        let waited = match *last_dispatch {
            Some(previous) => {
                let elapsed = previous.elapsed();
                match self.interval.checked_sub(elapsed) {
                    Some(remaining) if !remaining.is_zero() => {
                        tracing::debug!("Throttling for {:?}", remaining);
                        tokio::time::sleep(remaining).await;
                        remaining
                    }
                    _ => Duration::ZERO,
                }
            }
            None => Duration::ZERO,
        };

        *last_dispatch = Some(Instant::now());

        waited
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
