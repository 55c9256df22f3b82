//! Strong and weak scaling runs over the parallel update.
//!
//! Strong scaling keeps the grid fixed and re-runs one step from the same
//! seeded start with 1..=N workers. Weak scaling grows the column count in
//! step with the worker count so each worker keeps the same share.

use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::error::{LifeError, Result};
use crate::torus::{Grid, LogObserver, TorusLife, TorusLifeConfig};

#[derive(Clone, Copy, Debug)]
pub struct ScalingConfig {
    pub rows: usize,
    /// Columns for strong scaling; per-worker columns for weak scaling.
    pub columns: usize,
    pub max_workers: usize,
    pub seed: u64,
    /// Pool size; `None` lets the engine pick.
    pub thread_count: Option<usize>,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            rows: 1000,
            columns: 1000,
            max_workers: 10,
            seed: 1,
            thread_count: None,
        }
    }
}

impl ScalingConfig {
    fn engine_config(&self) -> TorusLifeConfig {
        match self.thread_count {
            Some(n) => TorusLifeConfig::default().thread_count(n),
            None => TorusLifeConfig::default(),
        }
    }

    fn check(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(LifeError::InvalidWorkerCount(0));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ScalingSample {
    pub workers: usize,
    pub rows: usize,
    pub columns: usize,
    pub elapsed: Duration,
    pub population: u64,
}

fn timed_step(engine: &mut TorusLife, workers: usize) -> Result<ScalingSample> {
    let start = Instant::now();
    engine.step_parallel(workers)?;
    let elapsed = start.elapsed();
    let grid = engine.grid();
    Ok(ScalingSample {
        workers,
        rows: grid.rows(),
        columns: grid.columns(),
        elapsed,
        population: grid.population(),
    })
}

pub fn strong_scaling(config: &ScalingConfig) -> Result<Vec<ScalingSample>> {
    config.check()?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    let initial = Grid::random(config.rows, config.columns, &mut rng)?;
    let mut engine =
        TorusLife::with_config(initial.clone(), config.engine_config())?.with_observer(LogObserver);

    let mut samples = Vec::with_capacity(config.max_workers);
    for workers in 1..=config.max_workers {
        engine.replace_grid(initial.clone());
        samples.push(timed_step(&mut engine, workers)?);
    }
    Ok(samples)
}

pub fn weak_scaling(config: &ScalingConfig) -> Result<Vec<ScalingSample>> {
    config.check()?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    let first = Grid::random(config.rows, config.columns, &mut rng)?;
    let mut engine =
        TorusLife::with_config(first, config.engine_config())?.with_observer(LogObserver);

    let mut samples = Vec::with_capacity(config.max_workers);
    for workers in 1..=config.max_workers {
        let columns = config
            .columns
            .checked_mul(workers)
            .ok_or(LifeError::InvalidDimensions {
                rows: config.rows,
                columns: config.columns,
            })?;
        if workers > 1 {
            engine.replace_grid(Grid::random(config.rows, columns, &mut rng)?);
        }
        samples.push(timed_step(&mut engine, workers)?);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::{ScalingConfig, strong_scaling, weak_scaling};
    use crate::error::LifeError;

    fn small() -> ScalingConfig {
        ScalingConfig {
            rows: 24,
            columns: 16,
            max_workers: 5,
            seed: 9,
            thread_count: Some(2),
        }
    }

    #[test]
    fn strong_scaling_results_do_not_depend_on_workers() {
        let samples = strong_scaling(&small()).unwrap();
        assert_eq!(samples.len(), 5);
        let first = samples[0].population;
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.workers, i + 1);
            assert_eq!((sample.rows, sample.columns), (24, 16));
            assert_eq!(sample.population, first);
        }
    }

    #[test]
    fn weak_scaling_grows_columns_with_workers() {
        let samples = weak_scaling(&small()).unwrap();
        let columns: Vec<usize> = samples.iter().map(|s| s.columns).collect();
        assert_eq!(columns, vec![16, 32, 48, 64, 80]);
    }

    #[test]
    fn zero_max_workers_is_rejected() {
        let config = ScalingConfig {
            max_workers: 0,
            ..small()
        };
        assert!(matches!(
            strong_scaling(&config),
            Err(LifeError::InvalidWorkerCount(0))
        ));
        assert!(weak_scaling(&config).is_err());
    }
}
