use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread::{self, JoinHandle},
};

use tracing::error;

use super::{OrganizeError, OrganizeFinished, OrganizeMessage, OrganizeOptions};
use super::{transfer_file, worker::run_organize_with_progress};

/// Handle to a background organize run.
pub struct OrganizeJob {
    receiver: Receiver<OrganizeMessage>,
    handle: JoinHandle<OrganizeFinished>,
}

impl OrganizeJob {
    /// Channel carrying the worker's progress stream.
    pub fn messages(&self) -> &Receiver<OrganizeMessage> {
        &self.receiver
    }

    /// Block until the worker exits and return its summary.
    pub fn wait(self) -> Result<OrganizeFinished, OrganizeError> {
        self.handle.join().map_err(|_| {
            error!("Organize worker panicked");
            OrganizeError::WorkerPanicked
        })
    }
}

/// Validate `options` and run the organize loop on a new background thread.
pub fn spawn_organize(options: OrganizeOptions) -> Result<OrganizeJob, OrganizeError> {
    options.validate()?;
    let (tx, receiver) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("sampson-organize".to_string())
        .spawn(move || {
            run_organize_with_progress(
                &options,
                |message| {
                    let _ = tx.send(message);
                },
                transfer_file,
            )
        })
        .map_err(OrganizeError::Spawn)?;
    Ok(OrganizeJob { receiver, handle })
}

/// Owns at most one organize job at a time.
///
/// Front-ends call [`OrganizeRunner::poll`] from their event loop, or
/// [`OrganizeRunner::recv`] when they can block.
#[derive(Default)]
pub struct OrganizeRunner {
    job: Option<OrganizeJob>,
}

impl OrganizeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Start a run unless one is already active.
    pub fn start(&mut self, options: OrganizeOptions) -> Result<(), OrganizeError> {
        if self.job.is_some() {
            return Err(OrganizeError::AlreadyRunning);
        }
        self.job = Some(spawn_organize(options)?);
        Ok(())
    }

    /// Drain queued messages without blocking.
    pub fn poll(&mut self) -> Vec<OrganizeMessage> {
        let mut drained = Vec::new();
        let mut done = false;
        if let Some(job) = &self.job {
            loop {
                match job.receiver.try_recv() {
                    Ok(message) => {
                        done |= matches!(message, OrganizeMessage::Finished(_));
                        drained.push(message);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        done = true;
                        break;
                    }
                }
            }
        }
        if done {
            self.reap();
        }
        drained
    }

    /// Block for the next message; `None` once the active run has ended.
    pub fn recv(&mut self) -> Option<OrganizeMessage> {
        let message = self.job.as_ref()?.receiver.recv().ok();
        match &message {
            Some(OrganizeMessage::Finished(_)) | None => self.reap(),
            Some(_) => {}
        }
        message
    }

    fn reap(&mut self) {
        if let Some(job) = self.job.take() {
            let _ = job.wait();
        }
    }
}
