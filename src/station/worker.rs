use std::{
    sync::{mpsc, Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result};
use tokio::sync::oneshot;

use crate::{error::StationError, models::Reading};

use super::ReadingService;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

type StationTask = Box<dyn FnOnce(&mut ReadingService) + Send + 'static>;

enum StationCommand {
    Execute(StationTask),
    Shutdown,
}

struct StationInner {
    sender: mpsc::Sender<StationCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for StationInner {
    fn drop(&mut self) {
        // Last handle gone: nobody can queue more work, so stop the thread
        // after whatever it is running (possibly a blink) finishes.
        let Some(handle) = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        if self.sender.send(StationCommand::Shutdown).is_err() {
            log_warn!("Station thread already stopped before shutdown");
        }
        if handle.join().is_err() {
            log_error!("Station thread panicked; LED state and log tail are unknown");
        }
    }
}

/// Cloneable handle to the thread that owns the sensor, the LED and the log.
///
/// Commands run one at a time in submission order, so a blinking alert holds
/// up every request queued behind it.
#[derive(Clone)]
pub struct Station {
    inner: Arc<StationInner>,
}

impl Station {
    /// Moves `service` onto its own thread, initializes the log there and
    /// returns once it is ready to take commands.
    pub fn spawn(service: ReadingService) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<StationCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("envwatch-station".into())
            .spawn(move || {
                let mut service = service;

                let init_result = service
                    .store()
                    .initialize()
                    .context("failed to initialize reading log");
                let init_failed = init_result.is_err();
                if ready_tx.send(init_result).is_err() {
                    log_error!("Station initialization receiver dropped before ready signal");
                    return;
                }
                if init_failed {
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        StationCommand::Execute(task) => task(&mut service),
                        StationCommand::Shutdown => break,
                    }
                }

                log_info!("Station thread shutting down");
            })
            .context("failed to spawn station worker thread")?;

        let ready = ready_rx
            .recv()
            .context("station worker exited before signaling readiness")
            .and_then(|result| result);
        if let Err(err) = ready {
            let _ = worker.join();
            return Err(err);
        }

        log_info!("Station worker started");

        Ok(Self {
            inner: Arc::new(StationInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// Runs `task` on the station thread and waits for its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T, StationError>
    where
        F: FnOnce(&mut ReadingService) -> Result<T, StationError> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        let job: StationTask = Box::new(move |service| {
            // A request abandoned mid-blink still ran to completion; only the
            // answer is lost.
            if result_tx.send(task(service)).is_err() {
                log_warn!("Station request abandoned before its result was ready");
            }
        });

        if self.inner.sender.send(StationCommand::Execute(job)).is_err() {
            return Err(unavailable("station thread is not accepting requests"));
        }

        match result_rx.await {
            Ok(result) => result,
            Err(_) => Err(unavailable("station thread stopped while handling a request")),
        }
    }

    pub async fn sample(&self) -> Result<Reading, StationError> {
        self.execute(|service| service.sample()).await
    }

    pub async fn read_log(&self) -> Result<Vec<Reading>, StationError> {
        self.execute(|service| service.store().read_all()).await
    }

    pub async fn clear_log(&self) -> Result<(), StationError> {
        self.execute(|service| service.store().clear()).await
    }
}

fn unavailable(reason: &str) -> StationError {
    log_error!("{reason}");
    StationError::Unavailable("Station unavailable".into())
}
