//! Splitting simulation work into batches for progress reporting and pooled execution.

use crate::data::Catalogs;
use crate::game::SetupError;
use crate::optimizer::monte_carlo::{run_monte_carlo_parallel, SimulationResult};
use crate::optimizer::Placement;
use crate::parallel::WorkerPool;

/// Splits `total` items into at most `num_batches` contiguous `[start, end)` ranges whose
/// sizes differ by at most one, larger ones first.
///
/// ```
/// # use quintal::parallel::batch_ranges;
/// assert_eq!(batch_ranges(10, 3), vec![(0, 4), (4, 7), (7, 10)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;

    let mut start = 0;
    (0..num_batches)
        .map(|index| {
            let end = start + base + usize::from(index < remainder);
            let range = (start, end);
            start = end;
            range
        })
        .collect()
}

/// Simulates each layout in turn, with the games of every layout spread over `pool`.
pub fn run_simulation_batches(
    layouts: &[Vec<Placement>],
    catalogs: &Catalogs,
    games: usize,
    seed: u64,
    pool: &WorkerPool,
) -> Result<Vec<SimulationResult>, SetupError> {
    pool.install(|| {
        layouts
            .iter()
            .map(|layout| run_monte_carlo_parallel(layout, catalogs, games, seed))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_DATA_DIR;
    use crate::game::{Path, Zone};

    #[test]
    fn ranges_split_evenly() {
        assert_eq!(batch_ranges(100, 4), vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
    }

    #[test]
    fn ranges_never_exceed_item_count() {
        assert_eq!(batch_ranges(3, 10), vec![(0, 1), (1, 2), (2, 3)]);
        assert!(batch_ranges(0, 5).is_empty());
        assert!(batch_ranges(10, 0).is_empty());
    }

    #[test]
    fn pooled_batches_match_unpooled_run() {
        let catalogs = Catalogs::load(DEFAULT_DATA_DIR).expect("bundled data");
        let layout: Vec<Placement> = Path::ALL
            .into_iter()
            .map(|path| Placement::new("weapon-3", path, Zone::Yard))
            .collect();

        let pooled = run_simulation_batches(
            std::slice::from_ref(&layout),
            &catalogs,
            20,
            11,
            &WorkerPool::with_workers(2),
        )
        .expect("valid layout");
        let direct = run_monte_carlo_parallel(&layout, &catalogs, 20, 11).expect("valid layout");

        assert_eq!(pooled, vec![direct]);
    }
}
