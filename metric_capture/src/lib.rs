//! In-process [`MetricsRegistry`] for `metric_capture_facade`.
//!
//! The facade itself only calls `mark`/`count`; keeping totals and writing
//! them out is this registry's job. A worker thread accumulates per-name
//! totals and can write them as CSV.

use std::{
    collections::BTreeMap,
    fs::File,
    path::{Path, PathBuf},
    thread::JoinHandle,
};

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use csv::Writer;
pub use metric_capture_facade::*;

pub mod config;

pub use config::RecorderConfig;

/// Registry handle backed by a [`CaptureRecorder`]'s worker thread.
///
/// Sends are fire-and-forget; once the recorder is dropped they are ignored.
#[derive(Debug, Clone)]
pub struct RecorderHandle(Sender<Command>);

impl MetricsRegistry for RecorderHandle {
    fn mark(&self, name: &str) {
        let _ = self.0.send(Command::Record {
            op: Operation::Mark,
            name: name.into(),
        });
    }

    fn count(&self, name: &str) {
        let _ = self.0.send(Command::Record {
            op: Operation::Count,
            name: name.into(),
        });
    }
}

#[derive(Debug)]
enum Command {
    Record {
        op: Operation,
        name: String,
    },
    Snapshot {
        reply: Sender<Vec<MetricTotal>>,
    },
    Flush {
        reply: Sender<Result<(), RecorderError>>,
    },
    Exit,
}

/// Accumulated total for one metric name and operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTotal {
    pub name: String,
    pub op: Operation,
    pub total: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("recorder worker is not running")]
    Disconnected,
}

pub struct CaptureRecorder {
    handle: Option<JoinHandle<Result<(), RecorderError>>>,
    cmd_tx: Sender<Command>,
}

impl CaptureRecorder {
    pub fn new(config: RecorderConfig) -> Result<Self, RecorderError> {
        config.validate()?;

        let (cmd_tx, cmd_rx) = unbounded();
        let (start_tx, start_rx) = bounded(1);

        let handle = Some(Worker::spawn(config, cmd_rx, start_tx));
        start_rx.recv().map_err(|_| RecorderError::Disconnected)??;
        Ok(Self { handle, cmd_tx })
    }

    pub fn handle(&self) -> RecorderHandle {
        RecorderHandle(self.cmd_tx.clone())
    }

    /// Bind this recorder as the process-wide registry of the capture entry
    /// points. Returns `false` if a registry was already installed.
    pub fn install(&self) -> bool {
        metric_capture_facade::set_registry(self.handle())
    }

    /// Totals of everything recorded before this call, sorted by name.
    pub fn snapshot(&self) -> Result<Vec<MetricTotal>, RecorderError> {
        let (reply, reply_rx) = bounded(1);
        self.cmd_tx
            .send(Command::Snapshot { reply })
            .map_err(|_| RecorderError::Disconnected)?;
        reply_rx.recv().map_err(|_| RecorderError::Disconnected)
    }

    /// Total for one name, zero if it was never recorded.
    pub fn total(&self, name: &str, op: Operation) -> Result<u64, RecorderError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .find(|m| m.name == name && m.op == op)
            .map_or(0, |m| m.total))
    }

    /// Rewrite the configured CSV output with the current totals.
    pub fn flush(&self) -> Result<(), RecorderError> {
        let (reply, reply_rx) = bounded(1);
        self.cmd_tx
            .send(Command::Flush { reply })
            .map_err(|_| RecorderError::Disconnected)?;
        reply_rx.recv().map_err(|_| RecorderError::Disconnected)?
    }
}

impl Drop for CaptureRecorder {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Exit);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct Worker {
    output: Option<PathBuf>,
    flush_on_exit: bool,
    cmd_rx: Receiver<Command>,
    totals: BTreeMap<(String, Operation), u64>,
}

impl Worker {
    fn spawn(
        config: RecorderConfig,
        cmd_rx: Receiver<Command>,
        start_result_tx: Sender<Result<(), RecorderError>>,
    ) -> JoinHandle<Result<(), RecorderError>> {
        std::thread::spawn(move || match Self::new(config, cmd_rx) {
            Err(e) => {
                let _ = start_result_tx.send(Err(e));
                Ok(())
            }
            Ok(mut worker) => {
                let _ = start_result_tx.send(Ok(()));
                worker.run()
            }
        })
    }

    fn new(config: RecorderConfig, cmd_rx: Receiver<Command>) -> Result<Self, RecorderError> {
        let worker = Self {
            output: config.output,
            flush_on_exit: config.flush_on_exit,
            cmd_rx,
            totals: BTreeMap::new(),
        };
        // Surface an unwritable output path at construction.
        worker.flush()?;
        Ok(worker)
    }

    fn run(&mut self) -> Result<(), RecorderError> {
        tracing::debug!(output = ?self.output, "capture recorder started");
        while let Ok(msg) = self.cmd_rx.recv() {
            match msg {
                Command::Record { op, name } => {
                    *self.totals.entry((name, op)).or_default() += 1;
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                Command::Flush { reply } => {
                    let _ = reply.send(self.flush());
                }
                Command::Exit => break,
            }
        }
        tracing::debug!(metrics = self.totals.len(), "capture recorder exiting");
        if self.flush_on_exit {
            if let Err(e) = self.flush() {
                tracing::warn!(error = %e, "final capture flush failed");
                return Err(e);
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<MetricTotal> {
        self.totals
            .iter()
            .map(|((name, op), total)| MetricTotal {
                name: name.clone(),
                op: *op,
                total: *total,
            })
            .collect()
    }

    fn flush(&self) -> Result<(), RecorderError> {
        let Some(path) = self.output.as_deref() else {
            return Ok(());
        };
        self.write_csv(path)
    }

    fn write_csv(&self, path: &Path) -> Result<(), RecorderError> {
        let mut writer = Writer::from_writer(File::create(path)?);
        writer.write_record(["name", "kind", "total"])?;
        for ((name, op), total) in &self.totals {
            let total = total.to_string();
            writer.write_record([name.as_str(), op.as_str(), total.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }
}
