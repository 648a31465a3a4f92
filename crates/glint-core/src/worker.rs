//! Worker threads and main-thread task dispatch.

use std::io;
use std::thread::JoinHandle;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// A named background execution context.
///
/// Each worker owns one OS thread. Dispatched tasks run asynchronously on
/// that thread, one at a time, in submission order. Dropping the worker
/// closes the channel and joins the thread; tasks already submitted still run
/// before the join completes.
pub struct Worker {
    sender: Option<Sender<Task>>,
    thread: Option<JoinHandle<()>>,
    name: String,
}

impl Worker {
    /// Spawn a worker with the given thread name.
    pub fn spawn(name: impl Into<String>) -> io::Result<Self> {
        let name = name.into();
        let (sender, receiver) = channel::unbounded::<Task>();

        let thread = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    task();
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
            name,
        })
    }

    /// Submit a task for asynchronous execution on the worker thread.
    ///
    /// # Panics
    /// Panics if the worker thread has terminated (a previous task panicked).
    pub fn dispatch(&self, task: impl FnOnce() + Send + 'static) {
        let sender = self
            .sender
            .as_ref()
            .expect("worker channel open while the worker is alive");
        if sender.send(Box::new(task)).is_err() {
            panic!("worker thread '{}' has terminated", self.name);
        }
    }

    /// The worker's thread name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain remaining tasks and exit.
        drop(self.sender.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("worker thread '{}' panicked", self.name);
            }
        }
    }
}

/// Receiving side of the main-thread dispatch queue.
///
/// Owned by the host run loop, which calls [`run_pending`](Self::run_pending)
/// once per event-loop turn on the UI/render thread. Tasks dispatched through
/// a [`MainThreadHandle`] run there, in dispatch order, at the next turn.
pub struct MainThreadQueue {
    receiver: Receiver<Task>,
}

/// Cloneable, sendable handle for marshaling tasks onto the main thread.
#[derive(Clone)]
pub struct MainThreadHandle {
    sender: Sender<Task>,
}

impl MainThreadQueue {
    /// Create a queue and the handle used to dispatch into it.
    pub fn new() -> (Self, MainThreadHandle) {
        let (sender, receiver) = channel::unbounded::<Task>();
        (Self { receiver }, MainThreadHandle { sender })
    }

    /// Run every task dispatched since the last call, in dispatch order.
    pub fn run_pending(&self) {
        loop {
            match self.receiver.try_recv() {
                Ok(task) => task(),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
}

impl MainThreadHandle {
    /// Enqueue a task to run on the main thread at its next queue drain.
    ///
    /// Silently drops the task if the queue side is gone (run loop shut down).
    pub fn dispatch(&self, task: impl FnOnce() + Send + 'static) {
        let _ = self.sender.send(Box::new(task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;

    #[test]
    fn worker_runs_tasks_in_submission_order() {
        let worker = Worker::spawn("test-worker").expect("worker spawns");
        let (done_tx, done_rx) = mpsc::channel();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..8 {
            let order = Arc::clone(&order);
            let done_tx = done_tx.clone();
            worker.dispatch(move || {
                order.lock().push(i);
                if i == 7 {
                    done_tx.send(()).expect("receiver alive");
                }
            });
        }

        done_rx.recv().expect("last task ran");
        assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn worker_thread_carries_its_name() {
        let worker = Worker::spawn("glint-io").expect("worker spawns");
        let (tx, rx) = mpsc::channel();
        worker.dispatch(move || {
            let name = std::thread::current().name().map(String::from);
            tx.send(name).expect("receiver alive");
        });
        assert_eq!(rx.recv().expect("task ran").as_deref(), Some("glint-io"));
        assert_eq!(worker.name(), "glint-io");
    }

    #[test]
    fn drop_joins_after_draining_submitted_tasks() {
        let counter = Arc::new(AtomicU32::new(0));
        let worker = Worker::spawn("drain-test").expect("worker spawns");
        for _ in 0..16 {
            let counter = Arc::clone(&counter);
            worker.dispatch(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        drop(worker);
        assert_eq!(counter.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn main_thread_queue_runs_tasks_on_draining_thread() {
        let (queue, handle) = MainThreadQueue::new();
        let ran_on = Arc::new(parking_lot::Mutex::new(None));

        let dispatcher = {
            let handle = handle.clone();
            let ran_on = Arc::clone(&ran_on);
            std::thread::spawn(move || {
                handle.dispatch(move || {
                    *ran_on.lock() = std::thread::current().name().map(String::from);
                });
            })
        };
        dispatcher.join().expect("dispatcher thread completed");

        // Nothing runs until the owning thread drains the queue.
        assert!(ran_on.lock().is_none());
        queue.run_pending();
        assert_eq!(
            ran_on.lock().as_deref(),
            std::thread::current().name(),
        );
    }

    #[test]
    fn main_thread_queue_preserves_dispatch_order() {
        let (queue, handle) = MainThreadQueue::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            handle.dispatch(move || order.lock().push(i));
        }

        queue.run_pending();
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }
}
