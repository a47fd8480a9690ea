//! Game state and core simulation types
//!
//! One owned aggregate holds everything a tick reads or writes. Only
//! `Progression` survives a save/load; the rest is rebuilt fresh.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::timer::TickTimer;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen until the active gate is acknowledged
    Paused,
    /// Run ended; only a restart leaves this phase
    GameOver,
}

/// Why the game is paused. Each gate has exactly one acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseGate {
    /// Player asked for a pause
    User,
    /// Level completed, waiting for the level-up screen
    LevelUp,
    /// Creature evolved, waiting for the evolution screen
    Evolution,
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// The player's creature
#[derive(Debug, Clone, Default)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks of hit immunity remaining
    pub invuln_frames: u32,
    /// Ticks of shield immunity remaining
    pub shield_frames: u32,
}

impl Player {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// Immune to contact damage this tick
    pub fn is_protected(&self) -> bool {
        self.invuln_frames > 0 || self.shield_frames > 0
    }

    /// Raise invulnerability to at least `frames` (never lowers it)
    pub fn raise_invuln(&mut self, frames: u32) {
        self.invuln_frames = self.invuln_frames.max(frames);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '−',
        }
    }
}

/// An arithmetic question. Replaced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub num1: u32,
    pub num2: u32,
    pub operator: Operator,
    pub answer: u32,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} = ?", self.num1, self.operator.symbol(), self.num2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    Small,
    Medium,
    Large,
}

impl AsteroidSize {
    /// Index into the per-size tuning tables
    pub fn index(&self) -> usize {
        match self {
            AsteroidSize::Small => 0,
            AsteroidSize::Medium => 1,
            AsteroidSize::Large => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Asteroid(AsteroidSize),
    Alien,
}

/// Destructible obstacle that hurts on contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub kind: HazardKind,
    pub hp: u8,
    /// Render rotation (radians)
    pub rotation: f32,
    /// Rotation added per tick
    pub spin: f32,
}

/// Feedback state of an answer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenVisual {
    #[default]
    Normal,
    Correct,
    Wrong,
}

/// A falling bubble carrying one candidate answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerToken {
    pub value: u32,
    pub is_correct: bool,
    pub visual: TokenVisual,
}

/// Player projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beam {
    /// Weapon tier (1-5)
    pub tier: u8,
    /// Ticks until the beam fizzles
    pub life: u32,
}

/// Per-kind entity payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Hazard(Hazard),
    Token(AnswerToken),
    Beam(Beam),
}

/// A live entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, EntityKind::Hazard(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self.kind, EntityKind::Token(_))
    }

    pub fn is_beam(&self) -> bool {
        matches!(self.kind, EntityKind::Beam(_))
    }

    pub fn as_token(&self) -> Option<&AnswerToken> {
        match &self.kind {
            EntityKind::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_hazard(&self) -> Option<&Hazard> {
        match &self.kind {
            EntityKind::Hazard(h) => Some(h),
            _ => None,
        }
    }
}

/// Achievement identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Streak5,
    Streak10,
    Speed,
    Perfect,
    Century,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::Streak5,
        Badge::Streak10,
        Badge::Speed,
        Badge::Perfect,
        Badge::Century,
    ];

    /// Stable key used in save files
    pub fn key(&self) -> &'static str {
        match self {
            Badge::Streak5 => "badge-streak5",
            Badge::Streak10 => "badge-streak10",
            Badge::Speed => "badge-speed",
            Badge::Perfect => "badge-perfect",
            Badge::Century => "badge-century",
        }
    }
}

/// Unlocked achievements (monotonic within a run)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Badges {
    pub streak5: bool,
    pub streak10: bool,
    pub speed: bool,
    pub perfect: bool,
    pub century: bool,
}

impl Badges {
    pub fn get(&self, badge: Badge) -> bool {
        match badge {
            Badge::Streak5 => self.streak5,
            Badge::Streak10 => self.streak10,
            Badge::Speed => self.speed,
            Badge::Perfect => self.perfect,
            Badge::Century => self.century,
        }
    }

    /// Set a badge. Returns true if it was newly unlocked.
    pub fn unlock(&mut self, badge: Badge) -> bool {
        let slot = match badge {
            Badge::Streak5 => &mut self.streak5,
            Badge::Streak10 => &mut self.streak10,
            Badge::Speed => &mut self.speed,
            Badge::Perfect => &mut self.perfect,
            Badge::Century => &mut self.century,
        };
        let newly = !*slot;
        *slot = true;
        newly
    }
}

/// Everything that persists between sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub health: u8,
    pub max_health: u8,
    pub streak: u32,
    pub best_streak: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    /// Correct answers given in under 3 seconds
    pub fast_answers: u32,
    /// Answers given in the current level (0..questions_per_level)
    pub questions_in_level: u32,
    pub creature_stage: u8,
    /// Cosmetic XP total
    pub xp: u64,
    pub badges: Badges,
}

impl Progression {
    pub fn new(max_health: u8) -> Self {
        Self {
            level: 1,
            health: max_health,
            max_health,
            streak: 0,
            best_streak: 0,
            total_correct: 0,
            total_wrong: 0,
            fast_answers: 0,
            questions_in_level: 0,
            creature_stage: 1,
            xp: 0,
            badges: Badges::default(),
        }
    }
}

/// Things that happened during a tick, drained by the host afterwards
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ProblemPresented { problem: Problem },
    BeamFired { tier: u8 },
    /// Beam hit a hazard that survived
    HazardDamaged { pos: Vec2 },
    HazardDestroyed { pos: Vec2, kind: HazardKind },
    /// Player body ran into a hazard
    PlayerHit { pos: Vec2 },
    /// Player body touched an answer token
    TokenCollected { pos: Vec2 },
    AnswerResolved { value: u32, visual: TokenVisual, pos: Vec2 },
    CorrectAnswer { xp: u32, fast: bool },
    WrongAnswer,
    LevelUp { level: u32, title: &'static str },
    Evolved { from: u8, to: u8 },
    BadgeUnlocked(Badge),
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: GamePhase,
    /// Active gate while `phase == Paused`
    pub gate: Option<PauseGate>,
    /// Playing ticks elapsed in this run
    pub time_ticks: u64,
    pub player: Player,
    /// Live hazards, tokens and beams (sorted by id)
    pub entities: Vec<Entity>,
    pub progress: Progression,
    /// Question currently on screen
    pub problem: Option<Problem>,
    /// `time_ticks` when the current problem was shown
    pub problem_started_tick: u64,
    /// Delay before the next problem appears
    pub next_problem: TickTimer,
    pub spawn_cooldown: TickTimer,
    pub beam_cooldown: TickTimer,
    /// No firing until the new token set is fully on screen
    pub shooting_disabled: bool,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game in the menu phase
    pub fn new(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        let progress = Progression::new(tuning.max_health);
        let player = Player::at(Vec2::new(arena.width / 2.0, arena.height * 0.8));
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            phase: GamePhase::Menu,
            gate: None,
            time_ticks: 0,
            player,
            entities: Vec::new(),
            progress,
            problem: None,
            problem_started_tick: 0,
            next_problem: TickTimer::idle(),
            spawn_cooldown: TickTimer::idle(),
            beam_cooldown: TickTimer::idle(),
            shooting_disabled: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Player collision radius at the current creature stage
    pub fn player_radius(&self) -> f32 {
        self.tuning.player_radius_for_stage(self.progress.creature_stage)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_token())
    }

    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    pub fn hazard_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_hazard()).count()
    }

    pub fn beam_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_beam()).count()
    }

    pub fn remove_tokens(&mut self) {
        self.entities.retain(|e| !e.is_token());
    }

    pub fn clear_beams(&mut self) {
        self.entities.retain(|e| !e.is_beam());
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds the current problem has been on screen (Playing time only)
    pub fn problem_elapsed_secs(&self) -> f32 {
        let ticks = self.time_ticks.saturating_sub(self.problem_started_tick);
        ticks as f32 / crate::consts::TICKS_PER_SECOND as f32
    }

    /// Grant shield immunity for `frames` ticks (never shortens an active shield)
    pub fn grant_shield(&mut self, frames: u32) {
        self.player.shield_frames = self.player.shield_frames.max(frames);
    }

    /// Drop every transient: entities, problem, timers, player motion
    pub(crate) fn reset_transient(&mut self) {
        self.entities.clear();
        self.events.clear();
        self.problem = None;
        self.problem_started_tick = 0;
        self.next_problem.cancel();
        self.spawn_cooldown.cancel();
        self.beam_cooldown.cancel();
        self.shooting_disabled = false;
        self.time_ticks = 0;
        self.gate = None;
        self.player = Player::at(Vec2::new(self.arena.width / 2.0, self.arena.height * 0.8));
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu() {
        let state = GameState::new(1, Arena::new(800.0, 600.0), Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.progress.level, 1);
        assert_eq!(state.progress.health, 3);
        assert_eq!(state.progress.creature_stage, 1);
        assert!(state.entities.is_empty());
        assert_eq!(state.player.pos, Vec2::new(400.0, 480.0));
    }

    #[test]
    fn test_badges_unlock_once() {
        let mut badges = Badges::default();
        assert!(badges.unlock(Badge::Speed));
        assert!(!badges.unlock(Badge::Speed));
        assert!(badges.get(Badge::Speed));
        assert!(!badges.get(Badge::Century));
    }

    #[test]
    fn test_raise_invuln_never_lowers() {
        let mut p = Player::default();
        p.invuln_frames = 50;
        p.raise_invuln(20);
        assert_eq!(p.invuln_frames, 50);
        p.invuln_frames = 5;
        p.raise_invuln(20);
        assert_eq!(p.invuln_frames, 20);
    }

    #[test]
    fn test_problem_display() {
        let p = Problem {
            num1: 12,
            num2: 5,
            operator: Operator::Add,
            answer: 17,
        };
        assert_eq!(p.to_string(), "12 + 5 = ?");
    }

    #[test]
    fn test_elapsed_uses_playing_ticks() {
        let mut state = GameState::new(1, Arena::new(800.0, 600.0), Tuning::default());
        state.problem_started_tick = 30;
        state.time_ticks = 150;
        assert!((state.problem_elapsed_secs() - 2.0).abs() < 1e-5);
    }
}
