//! Background worker draining the durable publish queue.

use std::{sync::Arc, time::Duration};

use {
    tokio::{
        sync::{Mutex, Notify, RwLock, Semaphore},
        task::JoinHandle,
    },
    tracing::{debug, info, warn},
};

use crate::{dispatcher::PublishDispatcher, queue::PublishQueue, types::ClaimedJob};

/// Polls the publish queue and executes claimed jobs through the
/// dispatcher. One worker per process; `concurrency` bounds how many
/// claimed jobs run at once.
pub struct PublishWorker {
    queue: Arc<dyn PublishQueue>,
    dispatcher: Arc<PublishDispatcher>,
    poll_interval: Duration,
    semaphore: Arc<Semaphore>,
    running: RwLock<bool>,
    wake: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PublishWorker {
    pub fn new(
        queue: Arc<dyn PublishQueue>,
        dispatcher: Arc<PublishDispatcher>,
        poll_interval: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            queue,
            dispatcher,
            poll_interval,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            running: RwLock::new(false),
            wake: Arc::new(Notify::new()),
            handle: Mutex::new(None),
        }
    }

    /// Start the poll loop.
    pub async fn start(self: &Arc<Self>) {
        *self.running.write().await = true;

        let worker = Arc::clone(self);
        let handle = tokio::spawn(async move {
            worker.run_loop().await;
        });

        *self.handle.lock().await = Some(handle);
        info!("publish worker started");
    }

    /// Stop the poll loop. Jobs already claimed keep running to completion.
    pub async fn stop(&self) {
        *self.running.write().await = false;
        self.wake.notify_one();

        let mut handle = self.handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
        }
        info!("publish worker stopped");
    }

    async fn run_loop(self: Arc<Self>) {
        loop {
            if !*self.running.read().await {
                break;
            }

            self.process_available().await;

            let wake = self.wake.clone();
            tokio::select! {
                () = tokio::time::sleep(self.poll_interval) => {},
                () = wake.notified() => {
                    debug!("publish worker woken early");
                },
            }
        }
    }

    /// Claim and launch every pending job, bounded by the semaphore.
    async fn process_available(&self) {
        loop {
            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };

            let claimed = match self.queue.claim().await {
                Ok(Some(claimed)) => claimed,
                Ok(None) => return,
                Err(e) => {
                    warn!(error = %e, "queue claim failed");
                    return;
                },
            };

            let queue = self.queue.clone();
            let dispatcher = self.dispatcher.clone();
            tokio::spawn(async move {
                Self::process(&queue, &dispatcher, claimed).await;
                drop(permit);
            });
        }
    }

    /// Drain the queue in the calling task until it is empty. Returns the
    /// number of jobs processed.
    pub async fn drain(&self) -> crate::Result<u64> {
        let mut processed = 0;
        while let Some(claimed) = self.queue.claim().await? {
            Self::process(&self.queue, &self.dispatcher, claimed).await;
            processed += 1;
        }
        Ok(processed)
    }

    async fn process(
        queue: &Arc<dyn PublishQueue>,
        dispatcher: &Arc<PublishDispatcher>,
        claimed: ClaimedJob,
    ) {
        let outcome = dispatcher.execute_and_record(&claimed.job).await;

        let settle = if outcome.success {
            queue.complete(claimed.id).await
        } else {
            let error = outcome.error.as_deref().unwrap_or("publish failed");
            warn!(
                job_id = claimed.id,
                listing_id = %claimed.job.listing_id,
                platform = %claimed.job.platform,
                error,
                "publish job failed"
            );
            queue.fail(claimed.id, error).await
        };

        // The job stays claimed; stuck-claim recovery is operational.
        if let Err(e) = settle {
            warn!(job_id = claimed.id, error = %e, "failed to settle queue item");
        }
    }
}
