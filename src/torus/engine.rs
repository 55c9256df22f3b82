use rayon::prelude::*;
use std::sync::OnceLock;
use std::time::Instant;

use super::grid::{Cell, Grid};
use super::partition::partition_rows;
use super::report::{StepObserver, StepReport, Strategy};
use super::rules::{advance_cell, advance_rows};
use crate::error::{LifeError, Result};

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

/// Resolve the pool size from a config, falling back to the physical core
/// count.
fn resolve_thread_count(config: &TorusLifeConfig) -> usize {
    let mut threads = config.thread_count.unwrap_or_else(physical_core_count);
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// Configuration for a TorusLife engine instance.
///
/// Use `TorusLifeConfig::default()` for a serial engine with an auto-sized
/// pool, or customise individual knobs via the builder methods.
#[derive(Clone, Copy, Debug, Default)]
pub struct TorusLifeConfig {
    /// Number of threads in the compute pool.
    /// `None` means one per physical core.
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of auto-detection.
    pub max_threads: Option<usize>,
    /// Strategy used by [`TorusLife::step`].
    pub strategy: Strategy,
}

impl TorusLifeConfig {
    /// Set an explicit thread count for the compute pool.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Game of Life on a torus, advanced one generation at a time.
///
/// Every strategy reads only the current grid and writes only the spare
/// buffer; the two are swapped once all writers are done, so the visible
/// grid is never partially updated.
pub struct TorusLife {
    grid: Grid,
    /// Write target for the next generation. Holds the retired generation
    /// between steps; every cell is overwritten before it is published.
    next: Vec<Cell>,
    generation: u64,
    config: TorusLifeConfig,
    pool: rayon::ThreadPool,
    observer: Option<Box<dyn StepObserver>>,
}

impl TorusLife {
    pub fn new(grid: Grid) -> Result<Self> {
        Self::with_config(grid, TorusLifeConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(grid: Grid, config: TorusLifeConfig) -> Result<Self> {
        if let Strategy::Parallel { workers: 0 } = config.strategy {
            return Err(LifeError::InvalidWorkerCount(0));
        }
        let threads = resolve_thread_count(&config);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("torus-life-{i}"))
            .build()?;
        log::debug!(
            "torus-life engine: {}x{} grid, {threads} pool threads, {:?}",
            grid.rows(),
            grid.columns(),
            config.strategy
        );

        Ok(Self {
            next: vec![Cell::Dead; grid.len()],
            grid,
            generation: 0,
            config,
            pool,
            observer: None,
        })
    }

    /// Install a sink for per-step timing reports.
    pub fn with_observer<O: StepObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn StepObserver>>) {
        self.observer = observer;
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Swap in a new starting grid and reset the generation counter.
    pub fn replace_grid(&mut self, grid: Grid) -> Grid {
        self.next.resize(grid.len(), Cell::Dead);
        self.generation = 0;
        std::mem::replace(&mut self.grid, grid)
    }

    pub fn set_cell(&mut self, row: i64, column: i64, cell: Cell) {
        self.grid.set_cell(row, column, cell);
    }

    #[inline]
    pub fn config(&self) -> &TorusLifeConfig {
        &self.config
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> u64 {
        self.grid.population()
    }

    /// Advance one generation with the configured strategy.
    pub fn step(&mut self) -> Result<()> {
        match self.config.strategy {
            Strategy::Serial => self.step_serial(),
            Strategy::Parallel { workers } => self.step_parallel(workers)?,
            Strategy::PerCell => self.step_per_cell(),
        }
        Ok(())
    }

    pub fn step_n(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Row-major pass over every cell on the calling thread.
    pub fn step_serial(&mut self) {
        let start = Instant::now();
        advance_rows(&self.grid, 0, &mut self.next);
        self.publish(Strategy::Serial, start);
    }

    /// Fork one task per row partition and join before publishing.
    ///
    /// The next-generation buffer is split into disjoint row slices up
    /// front, one per task, so the compute phase needs no locking. Tasks
    /// with an empty partition return immediately.
    pub fn step_parallel(&mut self, workers: usize) -> Result<()> {
        let partitions = partition_rows(self.grid.rows(), workers)?;
        let start = Instant::now();

        let grid = &self.grid;
        let columns = grid.columns();
        let mut rest: &mut [Cell] = &mut self.next;
        self.pool.scope(|scope| {
            for part in &partitions {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(part.len() * columns);
                rest = tail;
                let first_row = part.start_row;
                scope.spawn(move |_| advance_rows(grid, first_row, chunk));
            }
        });
        debug_assert!(rest.is_empty());

        self.publish(Strategy::Parallel { workers }, start);
        Ok(())
    }

    /// One task per cell. Same result as [`step_parallel`](Self::step_parallel)
    /// at much higher scheduling overhead.
    pub fn step_per_cell(&mut self) {
        let start = Instant::now();

        let grid = &self.grid;
        let columns = grid.columns();
        let next = &mut self.next;
        self.pool.install(|| {
            next.par_iter_mut()
                .with_max_len(1)
                .enumerate()
                .for_each(|(idx, slot)| {
                    *slot = advance_cell(grid, idx / columns, idx % columns);
                });
        });

        self.publish(Strategy::PerCell, start);
    }

    fn publish(&mut self, strategy: Strategy, start: Instant) {
        self.grid.swap_cells(&mut self.next);
        self.generation += 1;
        let elapsed = start.elapsed();

        if let Some(observer) = self.observer.as_mut() {
            observer.on_step(&StepReport {
                strategy,
                rows: self.grid.rows(),
                columns: self.grid.columns(),
                generation: self.generation,
                elapsed,
            });
        }
    }
}
