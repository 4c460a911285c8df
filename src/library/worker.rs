use std::sync::mpsc::{channel, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single background thread that runs submitted jobs one at a time, in submission order.
pub struct SingleWorker {
    name: String,
    sender: Mutex<Option<Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SingleWorker {
    pub fn new(name: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (sender, receiver) = channel::<Job>();

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for job in receiver {
                    job();
                }
            })?;

        Ok(Self {
            name: name.to_string(),
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn execute<F>(&self, job: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);

        match sender.as_ref() {
            Some(sender) => sender
                .send(Box::new(job))
                .map_err(|_| format!("worker {} has stopped", self.name).into()),
            None => Err(format!("worker {} is shut down", self.name).into()),
        }
    }

    /// Stops accepting jobs, lets queued jobs finish, and joins the thread. Idempotent.
    pub fn shutdown(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

impl Drop for SingleWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
