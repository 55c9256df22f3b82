//! Per-step timing reports.
//!
//! The engine stamps the start of every step and, once the new generation is
//! published, hands a [`StepReport`] to the installed [`StepObserver`].
//! Observers are sinks only; nothing they do feeds back into the simulation.

use std::fmt;
use std::time::Duration;

/// How a generation step was computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Single-threaded row-major pass.
    #[default]
    Serial,
    /// One task per row partition.
    Parallel { workers: usize },
    /// One task per cell.
    PerCell,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Serial => f.write_str("UpdateSerial"),
            Strategy::Parallel { .. } => f.write_str("UpdateParallel"),
            Strategy::PerCell => f.write_str("UpdatePerCell"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StepReport {
    pub strategy: Strategy,
    pub rows: usize,
    pub columns: usize,
    /// Generation number after the step.
    pub generation: u64,
    pub elapsed: Duration,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} took {:?}", self.strategy, self.elapsed)?;
        if let Strategy::Parallel { workers } = self.strategy {
            write!(f, " with {workers} threads")?;
        }
        write!(f, " for dimensions: {}x{}", self.rows, self.columns)
    }
}

pub trait StepObserver: Send {
    fn on_step(&mut self, report: &StepReport);
}

impl<F> StepObserver for F
where
    F: FnMut(&StepReport) + Send,
{
    fn on_step(&mut self, report: &StepReport) {
        self(report)
    }
}

/// Writes every report to the `log` facade at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl StepObserver for LogObserver {
    fn on_step(&mut self, report: &StepReport) {
        log::info!("{report}");
    }
}
