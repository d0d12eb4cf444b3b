pub mod monte_carlo;
pub mod ranking;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Catalogs;
use crate::game::{Path, SetupError, Zone, MAX_ESCAPED};
use crate::optimizer::monte_carlo::SimulationResult;
use crate::optimizer::ranking::{rank_results, RankedLayout};
use crate::parallel::{batch_ranges, run_simulation_batches, WorkerPool};

/// Number of progress-reporting batches when ranking many layouts.
const RANKING_PROGRESS_BATCH_COUNT: usize = 8;

/// One weapon on one cell, as requested by a caller before the game exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub weapon_id: String,
    pub path: Path,
    pub zone: Zone,
}

impl Placement {
    pub fn new(weapon_id: impl Into<String>, path: Path, zone: Zone) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            path,
            zone,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.weapon_id, self.path, self.zone)
    }
}

/// Parses the CLI form `weapon-id@path:zone`, e.g. `weapon-2@left:yard`.
impl FromStr for Placement {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (weapon_id, cell) = raw
            .split_once('@')
            .ok_or_else(|| format!("expected weapon@path:zone, got '{raw}'"))?;
        let (path, zone) = cell
            .split_once(':')
            .ok_or_else(|| format!("expected path:zone after '@', got '{cell}'"))?;
        if weapon_id.trim().is_empty() {
            return Err(format!("missing weapon id in '{raw}'"));
        }
        Ok(Self {
            weapon_id: weapon_id.trim().to_string(),
            path: Path::parse(path).ok_or_else(|| format!("unknown path '{path}'"))?,
            zone: Zone::parse(zone).ok_or_else(|| format!("unknown zone '{zone}'"))?,
        })
    }
}

/// Parses a comma-separated layout, e.g. `weapon-2@left:yard,weapon-3@center:yard`.
pub fn parse_layout_list(raw: &str) -> Result<Vec<Placement>, String> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Placement>())
        .collect()
}

/// The layout the CLI and API fall back to: the heaviest catalog weapon in every yard.
pub fn default_layout(catalogs: &Catalogs) -> Vec<Placement> {
    let Some(strongest) = catalogs.weapons.iter().max_by_key(|weapon| weapon.firepower) else {
        return Vec::new();
    };
    Path::ALL
        .into_iter()
        .map(|path| Placement::new(strongest.id.clone(), path, Zone::Yard))
        .collect()
}

/// Simulates every candidate layout on `pool` and ranks them, reporting
/// `on_progress(done, total)` after each batch.
pub fn rank_layouts_with_progress<F>(
    candidates: &[Vec<Placement>],
    catalogs: &Catalogs,
    games: usize,
    seed: u64,
    pool: &WorkerPool,
    mut on_progress: F,
) -> Result<Vec<RankedLayout>, SetupError>
where
    F: FnMut(usize, usize),
{
    let total = candidates.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    on_progress(0, total);

    let mut all_results: Vec<SimulationResult> = Vec::with_capacity(total);
    for (start, end) in batch_ranges(total, RANKING_PROGRESS_BATCH_COUNT) {
        all_results.extend(run_simulation_batches(
            &candidates[start..end],
            catalogs,
            games.max(1),
            seed,
            pool,
        )?);
        on_progress(end, total);
    }

    Ok(rank_results(all_results, MAX_ESCAPED))
}
