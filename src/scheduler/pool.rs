//! A small, owned thread pool: §4.H's `execute(task)` black box, adapted from this
//! codebase's general-purpose task executor to the scheduler's narrower needs (no
//! `spawn`/`scope` result futures. The scheduler only ever needs fire-and-forget
//! dispatch plus its own atomic-counter/condvar completion barrier).

use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};

type Task = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Task(Task),
    Shutdown,
}

struct Worker {
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(receiver: Receiver<Message>) -> Self {
        let handle = thread::spawn(move || loop {
            match receiver.recv() {
                Ok(Message::Task(task)) => task(),
                Ok(Message::Shutdown) => break,
                Err(_) => break,
            }
        });
        Worker {
            handle: Some(handle),
        }
    }
}

/// A fixed-size collection of persistent OS threads consuming boxed tasks from a shared
/// queue. Created once with the world and torn down with it; performs no access tracking
/// of its own. [`crate::scheduler`] is solely responsible for only ever dispatching
/// conflict-free tasks together.
pub(crate) struct WorkerPool {
    sender: Sender<Message>,
    workers: Vec<Worker>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "worker pool size must be greater than 0");

        let (sender, receiver) = unbounded();
        let workers = (0..size).map(|_| Worker::new(receiver.clone())).collect();

        WorkerPool { sender, workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Enqueue a task; returns immediately. Tasks run in FIFO order but complete in an
    /// unspecified order.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Message::Task(Box::new(f)))
            .expect("worker pool's receiving threads outlive the pool itself");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            let _ = self.sender.send(Message::Shutdown);
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}
