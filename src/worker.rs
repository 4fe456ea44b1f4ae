use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::error::{CleanError, Result};

/// Handle to a result being produced on a background thread.
pub struct Task<T> {
    receiver: Receiver<T>,
}

impl<T: Send + 'static> Task<T> {
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(work());
        });
        Self { receiver: rx }
    }
}

impl<T> Task<T> {
    /// Block until the worker finishes.
    pub fn wait(self) -> Result<T> {
        self.receiver.recv().map_err(|_| CleanError::WorkerLost)
    }

    /// Non-blocking poll: `None` while the worker is still running.
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CleanError::WorkerLost)),
        }
    }
}

/// Idle/running state for one component. A second start while running is
/// rejected, not queued.
#[derive(Debug, Clone)]
pub struct BusyFlag {
    name: &'static str,
    running: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Move idle -> running. The returned guard moves it back when dropped.
    pub fn try_begin(&self) -> Result<BusyGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CleanError::Busy(self.name))?;
        Ok(BusyGuard {
            running: Arc::clone(&self.running),
        })
    }

    /// Run `work` in the background while holding this flag.
    pub fn spawn<T, F>(&self, work: F) -> Result<Task<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let guard = self.try_begin()?;
        Ok(Task::spawn(move || {
            let _guard = guard;
            work()
        }))
    }
}

/// Releases the flag on drop, including when the worker panics.
#[derive(Debug)]
pub struct BusyGuard {
    running: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn task_delivers_result() {
        let task = Task::spawn(|| 40 + 2);
        assert_eq!(task.wait().unwrap(), 42);
    }

    #[test]
    fn try_result_is_none_until_done() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let task = Task::spawn(move || {
            release_rx.recv().unwrap();
            "done"
        });
        assert!(task.try_result().is_none());
        release_tx.send(()).unwrap();

        let mut result = None;
        for _ in 0..200 {
            if let Some(r) = task.try_result() {
                result = Some(r);
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(result.unwrap().unwrap(), "done");
    }

    #[test]
    fn panicking_worker_reports_lost() {
        let task: Task<u32> = Task::spawn(|| panic!("boom"));
        assert!(matches!(task.wait(), Err(CleanError::WorkerLost)));
    }

    #[test]
    fn busy_flag_rejects_overlap() {
        let flag = BusyFlag::new("scan");
        let guard = flag.try_begin().unwrap();
        assert!(flag.is_running());
        assert!(matches!(flag.try_begin(), Err(CleanError::Busy("scan"))));
        drop(guard);
        assert!(!flag.is_running());
        assert!(flag.try_begin().is_ok());
    }

    #[test]
    fn spawn_holds_flag_until_worker_finishes() {
        let flag = BusyFlag::new("clean");
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let task = flag
            .spawn(move || {
                release_rx.recv().unwrap();
                7
            })
            .unwrap();

        assert!(flag.spawn(|| 0).is_err());
        release_tx.send(()).unwrap();
        assert_eq!(task.wait().unwrap(), 7);
        // The guard is dropped before the result is sent.
        assert!(!flag.is_running());
    }

    #[test]
    fn flag_released_after_panic() {
        let flag = BusyFlag::new("prune");
        let task: Task<()> = flag.spawn(|| panic!("boom")).unwrap();
        assert!(task.wait().is_err());
        assert!(!flag.is_running());
    }
}
