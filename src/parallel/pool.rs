use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// One unit of work: a single input file plus its position in the batch.
///
/// Created once at dispatch time, consumed exactly once by a worker. The
/// 1-based index exists for progress reporting only; nothing downstream
/// depends on completion order.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// 1-based position in the original input ordering
    pub index: usize,
    /// File name used to correlate results after the pool drains
    pub file_name: String,
    /// Full path handed to the worker function
    pub path: PathBuf,
    /// Total number of items in this batch
    pub total: usize,
}

impl WorkItem {
    /// Build one work item per path, preserving the input ordering.
    pub fn from_paths(paths: Vec<PathBuf>) -> Vec<WorkItem> {
        let total = paths.len();
        paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| WorkItem {
                index: i + 1,
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path,
                total,
            })
            .collect()
    }
}

/// A work item the pool could not complete
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub file_name: String,
    pub path: PathBuf,
    pub diagnostic: String,
}

/// Everything the pool produced for one batch, available only after the
/// drain barrier. Every dispatched item appears in exactly one of the two
/// lists.
#[derive(Debug)]
pub struct BatchResults<R> {
    /// `(file name, worker output)` pairs, in completion order
    pub completed: Vec<(String, R)>,
    /// Items whose worker function returned an error
    pub failed: Vec<FileFailure>,
    /// Number of items dispatched
    pub total: usize,
}

impl<R> BatchResults<R> {
    fn empty() -> Self {
        Self { completed: Vec::new(), failed: Vec::new(), total: 0 }
    }
}

/// Typed per-item report sent from workers to the collector
enum WorkReport<R> {
    Completed { file_name: String, value: R },
    Failed(FileFailure),
}

/// Cooperative cancellation flag checked between items.
///
/// Cancelling never interrupts an in-flight computation; items not yet
/// started report as failures so the batch accounting stays complete.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<std::sync::atomic::AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Bounded worker pool for CPU-bound per-file computations.
///
/// The pool blocks the caller until every item has either completed or
/// failed; `run` returning is the barrier after which the batch results are
/// frozen and safe to consume.
pub struct WorkerPool {
    workers: usize,
    /// Progress line update frequency (every N items)
    progress_every: usize,
    cancel: CancelToken,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self::with_cancel(workers, CancelToken::new())
    }

    /// Build a pool whose workers stop picking up new items once `cancel`
    /// fires. Items skipped this way report as failures.
    pub fn with_cancel(workers: usize, cancel: CancelToken) -> Self {
        Self { workers: workers.max(1), progress_every: 5, cancel }
    }

    /// Process all items, invoking `worker_fn` exactly once per item.
    ///
    /// A failing item contributes a [`FileFailure`] instead of aborting the
    /// pool; the only error `run` itself returns is a worker thread panic.
    pub fn run<R, F>(
        &self,
        items: Vec<WorkItem>,
        worker_fn: F,
        progress_label: &str,
    ) -> Result<BatchResults<R>>
    where
        R: Send,
        F: Fn(&WorkItem) -> Result<R> + Sync,
    {
        let total = items.len();
        if total == 0 {
            return Ok(BatchResults::empty());
        }

        // Never spawn more workers than there is work
        let workers = self.workers.min(total);

        let (work_tx, work_rx): (Sender<WorkItem>, Receiver<WorkItem>) = bounded(workers * 2);
        let (report_tx, report_rx): (Sender<WorkReport<R>>, Receiver<WorkReport<R>>) =
            bounded(workers * 4);

        let progress_counter = Arc::new(AtomicUsize::new(0));
        let worker_fn = &worker_fn;

        let reports = crossbeam::thread::scope(|s| {
            // Spawn worker threads
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let report_tx = report_tx.clone();
                let progress_counter = progress_counter.clone();

                s.spawn(move |_| {
                    while let Ok(item) = work_rx.recv() {
                        if self.cancel.is_cancelled() {
                            let report = WorkReport::Failed(FileFailure {
                                file_name: item.file_name,
                                path: item.path,
                                diagnostic: "cancelled before processing".to_string(),
                            });
                            if report_tx.send(report).is_err() {
                                break;
                            }
                            progress_counter.fetch_add(1, Ordering::Relaxed);
                            continue;
                        }

                        let started = Instant::now();
                        debug!("processing {} ({}/{})", item.file_name, item.index, item.total);

                        let report = match worker_fn(&item) {
                            Ok(value) => WorkReport::Completed { file_name: item.file_name, value },
                            Err(e) => {
                                warn!("failed to process {}: {:#}", item.file_name, e);
                                WorkReport::Failed(FileFailure {
                                    file_name: item.file_name,
                                    path: item.path,
                                    diagnostic: format!("{e:#}"),
                                })
                            }
                        };

                        if report_tx.send(report).is_err() {
                            break; // Collector dropped
                        }

                        debug!("done in {:.2}s", started.elapsed().as_secs_f64());

                        // Update progress (throttled to limit contention)
                        let current = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
                        if current % self.progress_every == 0 || current == total {
                            print!(
                                "\r⚡ {}: {}/{} files ({:.1}%)",
                                progress_label,
                                current,
                                total,
                                current as f64 / total as f64 * 100.0
                            );
                            std::io::Write::flush(&mut std::io::stdout()).ok();
                        }
                    }
                });
            }

            // Producer thread: send work to workers
            let work_tx_clone = work_tx.clone();
            s.spawn(move |_| {
                for item in items {
                    if work_tx_clone.send(item).is_err() {
                        break; // Workers dropped
                    }
                }
                drop(work_tx_clone);
            });

            // Drop the original senders so receivers know when work is done
            drop(work_tx);
            drop(report_tx);

            // Collector: the single consumer of the report channel
            collect_reports(report_rx, total)
        })
        .map_err(|_| anyhow::anyhow!("worker thread panicked during batch processing"))?;

        // Clear progress line
        print!("\r");
        std::io::Write::flush(&mut std::io::stdout()).ok();

        let mut results = BatchResults { completed: Vec::new(), failed: Vec::new(), total };
        for report in reports {
            match report {
                WorkReport::Completed { file_name, value } => {
                    results.completed.push((file_name, value));
                }
                WorkReport::Failed(failure) => results.failed.push(failure),
            }
        }
        Ok(results)
    }
}

/// Drain the report channel until every dispatched item is accounted for.
fn collect_reports<R>(report_rx: Receiver<WorkReport<R>>, total: usize) -> Vec<WorkReport<R>> {
    let mut reports = Vec::with_capacity(total);

    while let Ok(report) = report_rx.recv() {
        reports.push(report);
        if reports.len() >= total {
            break;
        }
    }

    reports
}
