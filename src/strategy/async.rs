//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Events are read in batches and partitioned by
//! payment request; payment requests are then reconstructed in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BTreeMap<PaymentRequestId, Vec<PaymentRequestEvent>> (partitions)
//!     ├── AttemptReconstructor (shared across tasks)
//!     └── DashMap<PaymentRequestId, Vec<PaymentAttempt>> (task results)
//! ```
//!
//! # Parallelism
//!
//! - Batches are read sequentially so each payment request keeps its file order
//! - Each batch is partitioned by payment request id into an ordered map
//! - Once the file is exhausted, every payment request is reconstructed in its
//!   own tokio task, with at most `max_concurrent_batches` running at once
//! - Tasks write their attempts into a DashMap concurrently
//! - Attempts are drained in payment request id order, so output matches the
//!   sync strategy
//! - A read failure of the input aborts the run, as in the sync strategy

use crate::core::{partition_by_payment_request, AttemptReconstructor};
use crate::io::async_reader::AsyncReader;
use crate::io::write_attempts;
use crate::strategy::{reconstruct_request, ProcessingOptions, ProcessingStrategy};
use crate::types::{AttemptError, PaymentAttempt, PaymentRequestEvent, PaymentRequestId};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

/// Configuration for batch processing
///
/// Controls how many events are read per batch and how many payment requests
/// are reconstructed concurrently.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of events per batch
    pub batch_size: usize,
    /// Maximum number of payment requests reconstructing concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by their defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid concurrency limit, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// AsyncProcessingStrategy is Send + Sync. It builds its own tokio runtime per
/// call to `process`, so it can be used from synchronous code.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    options: ProcessingOptions,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, options: ProcessingOptions) -> Self {
        Self { config, options }
    }

    /// Read every batch of the input into per payment request partitions
    async fn read_partitions(
        &self,
        input_path: &Path,
    ) -> Result<BTreeMap<PaymentRequestId, Vec<PaymentRequestEvent>>, AttemptError> {
        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    AttemptError::file_not_found(&input_path.display().to_string())
                }
                _ => AttemptError::from(e),
            })?;

        // Wrap tokio file in a compatibility layer for csv-async
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);

        let mut partitions: BTreeMap<PaymentRequestId, Vec<PaymentRequestEvent>> = BTreeMap::new();
        let mut batches = 0usize;
        loop {
            let batch = reader.read_batch(self.config.batch_size).await?;
            if batch.is_empty() {
                break;
            }
            batches += 1;

            for (payment_request_id, events) in partition_by_payment_request(batch) {
                partitions
                    .entry(payment_request_id)
                    .or_default()
                    .extend(events);
            }
        }

        debug!(batches, payment_requests = partitions.len(), "read event batches");
        Ok(partitions)
    }

    /// Reconstruct every partition in bounded parallel tasks
    ///
    /// Tasks publish their attempts into a shared DashMap as they finish; the
    /// attempts are then drained in the partitions' id order.
    async fn reconstruct_partitions(
        &self,
        partitions: BTreeMap<PaymentRequestId, Vec<PaymentRequestEvent>>,
    ) -> Result<Vec<PaymentAttempt>, AttemptError> {
        let reconstructor = Arc::new(AttemptReconstructor::new());
        let amounts = Arc::new(self.options.amounts.clone());
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_batches));
        let reconstructed: Arc<DashMap<PaymentRequestId, Vec<PaymentAttempt>>> =
            Arc::new(DashMap::with_capacity(partitions.len()));

        let order: Vec<PaymentRequestId> = partitions.keys().copied().collect();

        let mut tasks = Vec::with_capacity(partitions.len());
        for (payment_request_id, events) in partitions {
            let reconstructor = Arc::clone(&reconstructor);
            let amounts = Arc::clone(&amounts);
            let reconstructed = Arc::clone(&reconstructed);
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| AttemptError::runtime_error(e.to_string()))?;

            tasks.push(tokio::spawn(async move {
                let attempts =
                    reconstruct_request(&reconstructor, &amounts, &payment_request_id, &events);
                reconstructed.insert(payment_request_id, attempts);
                drop(permit);
            }));
        }

        for task in tasks {
            if let Err(e) = task.await {
                error!(error = %e, "reconstruction task failed");
                return Err(AttemptError::runtime_error(e.to_string()));
            }
        }

        Ok(order
            .iter()
            .filter_map(|payment_request_id| reconstructed.remove(payment_request_id))
            .flat_map(|(_, attempts)| attempts)
            .collect())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Reconstruct attempts from the input file and write them to output
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads events in batches with AsyncReader, partitioning each batch
    /// 3. Reconstructs payment requests concurrently
    /// 4. Writes all attempts, ordered by payment request id
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), AttemptError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| {
                AttemptError::runtime_error(format!("Failed to create tokio runtime: {}", e))
            })?;

        let attempts = runtime.block_on(async {
            let partitions = self.read_partitions(input_path).await?;
            self.reconstruct_partitions(partitions).await
        })?;

        write_attempts(self.options.format, &attempts, output)
    }
}
