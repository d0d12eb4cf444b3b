use serde::{Deserialize, Serialize};

use crate::combat::{entropy_seed, resolve_combat, CombatResult, DefenderProfile, Rng, WeaponProfile};
use crate::data::{Catalogs, MonsterTemplate, Recipe, WeaponRecord};
use crate::game::{
    advance_turn, CombatLogEntry, GameState, SetupError, MAX_ACTIVE_MONSTERS, MAX_ESCAPED,
    MAX_TURNS,
};
use crate::optimizer::monte_carlo::{run_monte_carlo_parallel, setup_state, SimulationResult};
use crate::optimizer::ranking::RankedLayout;
use crate::optimizer::{rank_layouts_with_progress, Placement};
use crate::parallel::WorkerPool;

const DEFAULT_GAMES: usize = 500;
const MAX_GAMES: usize = 50_000;
const MAX_RANKED_LAYOUTS: usize = 32;

/// Failure kinds surfaced by the HTTP boundary; each maps to one status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    ReferenceNotFound(String),
    #[error("internal server error: {0}")]
    InternalFault(String),
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::InvalidRequest(_) => (400, "Bad Request"),
            Self::ReferenceNotFound(_) => (404, "Not Found"),
            Self::InternalFault(_) => (500, "Internal Server Error"),
        }
    }
}

impl From<SetupError> for ApiError {
    fn from(err: SetupError) -> Self {
        match err {
            SetupError::UnknownWeapon(_) | SetupError::UnknownPlacement(_) => {
                Self::ReferenceNotFound(err.to_string())
            }
            SetupError::NoSpawnableMonsters => Self::InternalFault(err.to_string()),
            _ => Self::InvalidRequest(err.to_string()),
        }
    }
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::InvalidRequest(format!("Invalid request body: {err}")))
}

fn to_json<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(payload).map_err(|err| ApiError::InternalFault(err.to_string()))
}

/// Present and non-blank, or an InvalidRequest naming both required ids.
fn required_id(value: Option<&str>) -> Result<&str, ApiError> {
    match value.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::InvalidRequest(
            "Weapon ID and Monster ID are required".to_string(),
        )),
    }
}

pub fn health_payload(catalogs: &Catalogs) -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "quintal-api",
        "version": env!("CARGO_PKG_VERSION"),
        "weapons": catalogs.weapons.len(),
        "monsters": catalogs.monsters.len(),
    }))
}

pub fn weapons_payload(catalogs: &Catalogs) -> Result<String, ApiError> {
    let weapons: &[WeaponRecord] = catalogs.weapons.as_slice();
    to_json(&serde_json::json!({ "weapons": weapons }))
}

pub fn monsters_payload(catalogs: &Catalogs) -> Result<String, ApiError> {
    let monsters: &[MonsterTemplate] = catalogs.monsters.as_slice();
    to_json(&serde_json::json!({ "monsters": monsters }))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatRequest {
    pub weapon_id: Option<String>,
    pub monster_id: Option<String>,
    pub current_monster_hp: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombatResponse {
    pub success: bool,
    pub result: CombatResult,
    pub seed: u64,
}

/// Looks both ids up, substitutes the current HP when given, and resolves one attack.
pub fn combat_payload(body: &str, catalogs: &Catalogs) -> Result<String, ApiError> {
    let request: CombatRequest = parse_body(body)?;
    let weapon_id = required_id(request.weapon_id.as_deref())?;
    let monster_id = required_id(request.monster_id.as_deref())?;

    let weapon = catalogs
        .weapons
        .get(weapon_id)
        .ok_or_else(|| ApiError::ReferenceNotFound("Weapon not found".to_string()))?;
    let monster = catalogs
        .monsters
        .get(monster_id)
        .ok_or_else(|| ApiError::ReferenceNotFound("Monster not found".to_string()))?;

    let seed = request.seed.unwrap_or_else(entropy_seed);
    let defender = DefenderProfile::from_template(
        monster,
        request.current_monster_hp.unwrap_or(monster.hp),
    );
    let result = resolve_combat(&WeaponProfile::from(weapon), &defender, &mut Rng::new(seed));
    tracing::debug!(
        weapon = weapon_id,
        monster = monster_id,
        damage = result.total_damage,
        defeated = result.monster_defeated,
        "combat resolved"
    );

    to_json(&CombatResponse {
        success: true,
        result,
        seed,
    })
}

pub fn craft_payload(body: &str, catalogs: &Catalogs) -> Result<String, ApiError> {
    let recipe: Recipe = parse_body(body)?;
    let weapon = catalogs.weapons.weapon_by_recipe(&recipe).ok_or_else(|| {
        ApiError::ReferenceNotFound("No weapon is crafted from these cards".to_string())
    })?;
    to_json(&serde_json::json!({ "weapon": weapon }))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub placements: Vec<Placement>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    pub state: GameState,
    pub seed: u64,
}

pub fn game_start_payload(body: &str, catalogs: &Catalogs) -> Result<String, ApiError> {
    let request: StartRequest = parse_body(body)?;
    let seed = request.seed.unwrap_or_else(entropy_seed);
    let mut state = setup_state(&request.placements, catalogs)?;
    state.start(&catalogs.monsters, &mut Rng::new(seed))?;
    to_json(&StartResponse { state, seed })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub state: GameState,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvanceResponse {
    pub state: GameState,
    pub log: Vec<CombatLogEntry>,
    pub escaped: Vec<String>,
    pub seed: u64,
}

/// Rejects a caller-held state that no sequence of legal turns could have produced.
pub fn check_client_state(state: &GameState, catalogs: &Catalogs) -> Result<(), ApiError> {
    let invalid = |message: String| Err(ApiError::InvalidRequest(message));

    if state.max_turns != MAX_TURNS || state.max_escaped != MAX_ESCAPED {
        return invalid(format!(
            "maxTurns and maxEscaped must be {MAX_TURNS} and {MAX_ESCAPED}"
        ));
    }
    if state.current_turn > state.max_turns {
        return invalid(format!("currentTurn {} exceeds maxTurns", state.current_turn));
    }
    // Several monsters can slip through on the turn that ends the game.
    let escape_ceiling = MAX_ESCAPED - 1 + MAX_ACTIVE_MONSTERS as u32;
    if state.monsters_escaped > escape_ceiling {
        return invalid(format!(
            "monstersEscaped {} exceeds {escape_ceiling}",
            state.monsters_escaped
        ));
    }
    let defeat_ceiling = state.current_turn.saturating_mul(MAX_ACTIVE_MONSTERS as u32);
    if state.monsters_defeated > defeat_ceiling {
        return invalid(format!(
            "monstersDefeated {} is impossible by turn {}",
            state.monsters_defeated, state.current_turn
        ));
    }
    if state.monsters.len() > MAX_ACTIVE_MONSTERS {
        return invalid(format!("at most {MAX_ACTIVE_MONSTERS} monsters can be active"));
    }

    for (index, placed) in state.placed_weapons.iter().enumerate() {
        if catalogs.weapons.get(&placed.weapon_id).is_none() {
            return invalid(format!("unknown weapon '{}'", placed.weapon_id));
        }
        let clash = state.placed_weapons[..index]
            .iter()
            .any(|earlier| earlier.path == placed.path && earlier.zone == placed.zone);
        if clash {
            return invalid(format!("{}/{} holds two weapons", placed.path, placed.zone));
        }
    }

    for monster in &state.monsters {
        let Some(template) = catalogs.monsters.get(&monster.monster_id) else {
            return invalid(format!("unknown monster '{}'", monster.monster_id));
        };
        if monster.current_hp > template.max_hp {
            return invalid(format!(
                "{} has {} hp, above its maximum {}",
                monster.id, monster.current_hp, template.max_hp
            ));
        }
        if monster.target_room != monster.path.target_room() {
            return invalid(format!("{} targets the wrong room for its path", monster.id));
        }
    }

    Ok(())
}

/// One turn against the caller-held state. The server keeps no sessions.
pub fn game_advance_payload(body: &str, catalogs: &Catalogs) -> Result<String, ApiError> {
    let request: AdvanceRequest = parse_body(body)?;
    check_client_state(&request.state, catalogs)?;
    let seed = request.seed.unwrap_or_else(entropy_seed);
    let outcome = advance_turn(
        &request.state,
        &catalogs.monsters,
        &catalogs.weapons,
        &mut Rng::new(seed),
    );
    to_json(&AdvanceResponse {
        state: outcome.state,
        log: outcome.log,
        escaped: outcome.escaped,
        seed,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub placements: Vec<Placement>,
    pub games: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    #[serde(flatten)]
    pub result: SimulationResult,
    pub seed: u64,
}

fn games_in_range(games: Option<usize>) -> Result<usize, ApiError> {
    let games = games.unwrap_or(DEFAULT_GAMES);
    if games == 0 || games > MAX_GAMES {
        return Err(ApiError::InvalidRequest(format!(
            "games must be between 1 and {MAX_GAMES}"
        )));
    }
    Ok(games)
}

pub fn simulate_payload(body: &str, catalogs: &Catalogs) -> Result<String, ApiError> {
    let request: SimulateRequest = parse_body(body)?;
    let games = games_in_range(request.games)?;
    let seed = request.seed.unwrap_or_else(entropy_seed);
    let result = run_monte_carlo_parallel(&request.placements, catalogs, games, seed)?;
    to_json(&SimulateResponse { result, seed })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub layouts: Vec<Vec<Placement>>,
    pub games: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub ranked: Vec<RankedLayout>,
    pub games: usize,
    pub seed: u64,
}

/// Simulates each candidate layout with the same seeds and returns them best first.
pub fn rank_payload(body: &str, catalogs: &Catalogs, pool: &WorkerPool) -> Result<String, ApiError> {
    let request: RankRequest = parse_body(body)?;
    if request.layouts.is_empty() || request.layouts.len() > MAX_RANKED_LAYOUTS {
        return Err(ApiError::InvalidRequest(format!(
            "layouts must hold between 1 and {MAX_RANKED_LAYOUTS} candidates"
        )));
    }
    let games = games_in_range(request.games)?;
    let seed = request.seed.unwrap_or_else(entropy_seed);

    let ranked = rank_layouts_with_progress(&request.layouts, catalogs, games, seed, pool, |done, total| {
        tracing::debug!(done, total, "ranking layouts")
    })?;
    to_json(&RankResponse { ranked, games, seed })
}
