// manager/manager.rs
use futures::stream::{self, BoxStream, StreamExt};
use std::any::Any;
use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

use crate::manager::queue::Queue;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Anything the pool can run. The key identifies the item in logs and outcomes.
pub trait WorkItem: Send + 'static {
    fn key(&self) -> String;
}

impl WorkItem for String {
    fn key(&self) -> String {
        self.clone()
    }
}

/// Why an item produced no result.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{}", error_chain(.0.as_ref()))]
    Failed(BoxError),

    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("worker was cancelled")]
    Cancelled,
}

/// Result of one item, tagged with the item's key.
#[derive(Debug)]
pub struct TaskOutcome<T> {
    pub key: String,
    pub result: Result<T, TaskError>,
}

/// Renders an error followed by its `source()` chain, `outer: inner: root`.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn into_outcome<T>(
    key: String,
    joined: Result<Result<T, BoxError>, JoinError>,
) -> TaskOutcome<T> {
    let result = match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TaskError::Failed(e)),
        Err(e) if e.is_panic() => Err(TaskError::Panicked(panic_message(e.into_panic()))),
        Err(_) => Err(TaskError::Cancelled),
    };
    TaskOutcome { key, result }
}

/// Runs batches of independent items with at most `max_concurrent` in flight.
///
/// Each item gets its own tokio task, so a worker that errors or panics only
/// loses its own item. Failures are logged here with the item key; workers do
/// not need to handle them.
///
/// Isolation is per task, not per process: `run_blocking` workers share the
/// pipeline process, so a native abort or OOM inside a worker (for example in
/// the tree-sitter parser) ends the whole batch. Untrusted submissions are
/// never run here; the executor starts them as child processes.
#[derive(Clone)]
pub struct WorkerPool {
    queue: Arc<Mutex<Queue>>,
}

impl WorkerPool {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::new(max_concurrent))),
        }
    }

    /// Waits until a slot is free and takes it.
    async fn acquire(&self) {
        let maybe_notify = {
            let mut queue = self.queue.lock().await;
            queue.try_acquire_slot()
        };

        // If we got a notify, wait for it outside the mutex
        if let Some(notify) = maybe_notify {
            notify.notified().await;
        }
    }

    async fn release(&self) {
        let mut queue = self.queue.lock().await;
        queue.release_slot();
    }

    /// Runs a synchronous, CPU-bound `worker` over `items` on the blocking
    /// thread pool. Each blocking thread lives across many items, so
    /// thread-local state in the worker is initialised once per thread.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run_blocking<I, T, E, F>(&self, items: Vec<I>, worker: F) -> BoxStream<'static, TaskOutcome<T>>
    where
        I: WorkItem,
        T: Send + 'static,
        E: Into<BoxError>,
        F: Fn(I) -> Result<T, E> + Send + Sync + 'static,
    {
        let worker = Arc::new(worker);
        self.dispatch(items, move |item| {
            let worker = Arc::clone(&worker);
            tokio::task::spawn_blocking(move || worker(item).map_err(Into::into))
        })
    }

    /// Runs an async `worker` (typically one waiting on a child process)
    /// over `items`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run_async<I, T, E, F, Fut>(&self, items: Vec<I>, worker: F) -> BoxStream<'static, TaskOutcome<T>>
    where
        I: WorkItem,
        T: Send + 'static,
        E: Into<BoxError>,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let worker = Arc::new(worker);
        self.dispatch(items, move |item| {
            let worker = Arc::clone(&worker);
            tokio::spawn(async move { worker(item).await.map_err(Into::into) })
        })
    }

    fn dispatch<I, T, S>(&self, items: Vec<I>, spawn: S) -> BoxStream<'static, TaskOutcome<T>>
    where
        I: WorkItem,
        T: Send + 'static,
        S: Fn(I) -> JoinHandle<Result<T, BoxError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let pool = self.clone();

        tokio::spawn(async move {
            for item in items {
                pool.acquire().await;

                let key = item.key();
                let handle = spawn(item);
                let tx = tx.clone();
                let pool = pool.clone();

                tokio::spawn(async move {
                    let outcome = into_outcome(key, handle.await);
                    pool.release().await;

                    match &outcome.result {
                        Ok(_) => debug!(item = %outcome.key, "task finished"),
                        Err(e) => error!(item = %outcome.key, "{} generated an exception: {}", outcome.key, e),
                    }
                    if let Err(TaskError::Failed(e)) = &outcome.result {
                        debug!(item = %outcome.key, "failure detail: {:?}", e);
                    }

                    // The receiver may be gone if the caller stopped listening.
                    let _ = tx.send(outcome);
                });
            }
        });

        stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|outcome| (outcome, rx)) }).boxed()
    }
}

/// Drains `outcomes`, calling `on_outcome` for each one, and keeps the
/// successful results in completion order.
pub async fn collect_ok<T>(
    mut outcomes: BoxStream<'static, TaskOutcome<T>>,
    mut on_outcome: impl FnMut(&TaskOutcome<T>),
) -> (Vec<T>, usize) {
    let mut results = Vec::new();
    let mut failed = 0usize;
    while let Some(outcome) = outcomes.next().await {
        on_outcome(&outcome);
        match outcome.result {
            Ok(value) => results.push(value),
            Err(_) => failed += 1,
        }
    }
    (results, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }

    impl StdError for Boom {}

    #[test]
    fn error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.py");
        let err = TaskError::Failed(Box::new(io));
        assert_eq!(err.to_string(), "missing.py");
    }

    #[tokio::test]
    async fn empty_batch_yields_nothing() {
        let pool = WorkerPool::new(2);
        let stream = pool.run_blocking(Vec::<String>::new(), |s: String| Ok::<_, Boom>(s));
        let (results, failed) = collect_ok(stream, |_| {}).await;
        assert!(results.is_empty());
        assert_eq!(failed, 0);
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let pool = WorkerPool::new(3);
        let items: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let stream = pool.run_blocking(items, |s: String| {
            let n: u32 = s.parse().unwrap();
            if n == 4 { Err(Boom) } else { Ok(n) }
        });
        let mut failed_keys = Vec::new();
        let (mut results, failed) = collect_ok(stream, |o| {
            if o.result.is_err() {
                failed_keys.push(o.key.clone());
            }
        })
        .await;
        results.sort();
        assert_eq!(results, vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);
        assert_eq!(failed, 1);
        assert_eq!(failed_keys, vec!["4".to_string()]);
    }

    #[tokio::test]
    async fn panics_are_isolated() {
        let pool = WorkerPool::new(2);
        let items: Vec<String> = vec!["a".into(), "panic".into(), "b".into()];
        let mut stream = pool.run_blocking(items, |s: String| {
            if s == "panic" {
                panic!("worker exploded");
            }
            Ok::<_, Boom>(s)
        });

        let mut ok = Vec::new();
        let mut panicked = None;
        while let Some(outcome) = stream.next().await {
            match outcome.result {
                Ok(v) => ok.push(v),
                Err(TaskError::Panicked(msg)) => panicked = Some((outcome.key, msg)),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        ok.sort();
        assert_eq!(ok, vec!["a".to_string(), "b".to_string()]);
        let (key, msg) = panicked.expect("panic should surface as an outcome");
        assert_eq!(key, "panic");
        assert!(msg.contains("worker exploded"));
    }

    #[tokio::test]
    async fn async_workers_run_too() {
        let pool = WorkerPool::new(2);
        let items: Vec<String> = vec!["x".into(), "y".into()];
        let stream = pool.run_async(items, |s: String| async move {
            tokio::task::yield_now().await;
            Ok::<_, Boom>(s.to_uppercase())
        });
        let (mut results, failed) = collect_ok(stream, |_| {}).await;
        results.sort();
        assert_eq!(results, vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(failed, 0);
    }
}
