//! The current-time source.
//!
//! Every other module takes explicit instants; this is the one place that
//! reads a clock. The effective source is resolved in two scopes: a
//! process-wide [`TimeSource`] and a per-thread override that takes
//! precedence while set. Overrides are plain values — a child thread
//! inherits the parent's override by snapshot at spawn time
//! ([`ClockSnapshot`], [`spawn_inheriting`]), not by reference, so a
//! child's later override never affects the parent or its siblings.

use std::cell::Cell;
use std::sync::RwLock;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::instant::Instant;

/// Where "now" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    /// The operating system clock.
    System,
    /// A frozen instant; reads never advance.
    Fixed(Instant),
    /// The system clock shifted by a constant number of milliseconds.
    Offset(i64),
}

impl TimeSource {
    fn read(self) -> Instant {
        match self {
            TimeSource::System => system_now(),
            TimeSource::Fixed(instant) => instant,
            TimeSource::Offset(delta) => {
                Instant::from_millis(system_now().millis().saturating_add(delta))
            }
        }
    }
}

fn system_now() -> Instant {
    let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(before_epoch) => -(before_epoch.duration().as_millis() as i64),
    };
    Instant::from_millis(millis)
}

static PROCESS_SOURCE: RwLock<TimeSource> = RwLock::new(TimeSource::System);

thread_local! {
    static THREAD_SOURCE: Cell<Option<TimeSource>> = const { Cell::new(None) };
}

/// The current instant from the effective source: this thread's override
/// when one is set, the process-wide source otherwise.
///
/// A thread observes its own override immediately after setting it.
pub fn now() -> Instant {
    effective_source().read()
}

/// The source [`now`] would use on this thread.
pub fn effective_source() -> TimeSource {
    THREAD_SOURCE
        .with(Cell::get)
        .unwrap_or_else(process_source)
}

pub fn process_source() -> TimeSource {
    *PROCESS_SOURCE.read().expect("clock source poisoned")
}

/// Replace the process-wide source, returning the previous one.
pub fn set_process_source(source: TimeSource) -> TimeSource {
    std::mem::replace(
        &mut PROCESS_SOURCE.write().expect("clock source poisoned"),
        source,
    )
}

/// This thread's override, if set.
pub fn thread_source() -> Option<TimeSource> {
    THREAD_SOURCE.with(Cell::get)
}

/// Override the source for the current thread only.
pub fn set_thread_source(source: TimeSource) {
    THREAD_SOURCE.with(|cell| cell.set(Some(source)));
}

/// Return this thread to the process-wide source. Needs no knowledge of
/// any previously set override.
pub fn reset_thread_source() {
    THREAD_SOURCE.with(|cell| cell.set(None));
}

/// A copy of the calling thread's override state, for installing into a
/// child thread.
///
/// Capturing the override (rather than the resolved source) keeps a child
/// without an inherited override following later changes to the
/// process-wide source, exactly like its parent.
#[derive(Debug, Clone, Copy)]
pub struct ClockSnapshot {
    thread_override: Option<TimeSource>,
}

/// Snapshot the current thread's override state.
pub fn snapshot() -> ClockSnapshot {
    ClockSnapshot {
        thread_override: thread_source(),
    }
}

impl ClockSnapshot {
    /// Install this snapshot as the current thread's override state.
    pub fn install(self) {
        THREAD_SOURCE.with(|cell| cell.set(self.thread_override));
    }
}

/// Spawn a thread that starts with the calling thread's override state.
///
/// The snapshot is taken at the call, so overrides the child sets later are
/// its own and never visible to the parent or siblings.
pub fn spawn_inheriting<F, T>(f: F) -> thread::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let snapshot = snapshot();
    thread::spawn(move || {
        snapshot.install();
        f()
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    // The process-wide source is shared state; tests that touch it stick to
    // thread overrides, which are isolated per test thread.

    #[test]
    fn test_thread_override_takes_precedence_and_resets() {
        let frozen = Instant::from_millis(1_000_000);
        set_thread_source(TimeSource::Fixed(frozen));
        assert_eq!(now(), frozen);
        assert_eq!(thread_source(), Some(TimeSource::Fixed(frozen)));
        reset_thread_source();
        assert_eq!(thread_source(), None);
        assert_eq!(effective_source(), process_source());
    }

    #[test]
    fn test_offset_source_shifts_system_time() {
        set_thread_source(TimeSource::Offset(-5_000));
        let shifted = now();
        reset_thread_source();
        let unshifted = now();
        let drift = unshifted.millis() - shifted.millis();
        assert!((4_000..=60_000).contains(&drift), "drift was {drift}ms");
    }

    #[test]
    fn test_override_is_invisible_to_other_threads() {
        let frozen = Instant::from_millis(42);
        set_thread_source(TimeSource::Fixed(frozen));
        let other = thread::spawn(|| thread_source());
        assert_eq!(other.join().unwrap(), None);
        assert_eq!(now(), frozen);
        reset_thread_source();
    }

    #[test]
    fn test_child_inherits_snapshot_and_diverges_freely() {
        let parent_view = Instant::from_millis(10_000);
        let child_view = Instant::from_millis(20_000);
        set_thread_source(TimeSource::Fixed(parent_view));

        let (tx, rx) = mpsc::channel();
        let child = spawn_inheriting(move || {
            // Inherited at spawn.
            tx.send(now()).unwrap();
            // The child's own override is not shared back.
            set_thread_source(TimeSource::Fixed(child_view));
            now()
        });
        assert_eq!(rx.recv().unwrap(), parent_view);
        assert_eq!(child.join().unwrap(), child_view);
        // The parent still observes its own override.
        assert_eq!(now(), parent_view);
        reset_thread_source();
    }

    #[test]
    fn test_spawn_without_override_follows_process_source() {
        reset_thread_source();
        let child = spawn_inheriting(|| thread_source());
        assert_eq!(child.join().unwrap(), None);
    }
}
