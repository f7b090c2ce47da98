//! Bounded topic discovery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::source::SnapshotSource;
use crate::error::{Result, VizError};

const DISCOVERY_POLL: Duration = Duration::from_millis(50);

/// Poll `source` until the wanted topics are visible or `wait` elapses.
///
/// With `requested` set, succeeds as soon as that topic is visible and
/// returns only it. Otherwise succeeds once any topic is visible and returns
/// every topic found. Discovery runs at least once unless `interrupt` is
/// already raised; a raised flag ends the wait with [`VizError::Interrupted`].
pub fn wait_for_topics(
    source: &dyn SnapshotSource,
    requested: Option<&str>,
    wait: Duration,
    interrupt: &AtomicBool,
) -> Result<Vec<String>> {
    let deadline = Instant::now() + wait;

    loop {
        if interrupt.load(Ordering::SeqCst) {
            log::info!("Topic discovery interrupted");
            return Err(VizError::Interrupted);
        }

        let found = source.discover()?;
        match requested {
            Some(topic) if found.iter().any(|t| t == topic) => {
                return Ok(vec![topic.to_string()]);
            }
            None if !found.is_empty() => return Ok(found),
            _ => {}
        }

        let now = Instant::now();
        if now >= deadline {
            log::info!("Topic discovery timed out after {:?}", wait);
            return Err(match requested {
                Some(topic) => VizError::topic_not_found(topic),
                None => VizError::no_topics(source.kind()),
            });
        }
        std::thread::sleep(DISCOVERY_POLL.min(deadline - now));
    }
}
