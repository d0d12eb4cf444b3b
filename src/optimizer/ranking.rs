use crate::optimizer::monte_carlo::SimulationResult;
use crate::optimizer::Placement;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankingScore {
    pub value: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLayout {
    pub layout: Vec<Placement>,
    pub win_rate: f64,
    pub avg_defeated: f64,
    pub avg_escaped: f64,
    pub score: RankingScore,
}

/// Orders layouts by a blend of win rate and how few monsters got through.
pub fn rank_results(simulation_results: Vec<SimulationResult>, max_escaped: u32) -> Vec<RankedLayout> {
    let escape_budget = f64::from(max_escaped.max(1));
    let mut ranked: Vec<RankedLayout> = simulation_results
        .into_iter()
        .map(|result| {
            let held = (1.0 - result.avg_escaped / escape_budget).clamp(0.0, 1.0);
            let score = (result.win_rate * 0.8 + held * 0.2) as f32;
            RankedLayout {
                layout: result.layout,
                win_rate: result.win_rate,
                avg_defeated: result.avg_defeated,
                avg_escaped: result.avg_escaped,
                score: RankingScore { value: score },
            }
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .score
            .value
            .total_cmp(&left.score.value)
            .then_with(|| right.win_rate.total_cmp(&left.win_rate))
            .then_with(|| left.avg_escaped.total_cmp(&right.avg_escaped))
    });

    ranked
}
