//! Math Monster Arena entry point
//!
//! Native headless runner: the autopilot plays a fixed number of ticks,
//! gates are acknowledged automatically, sounds and HUD updates go to the
//! log and progress is saved at the end.
//!
//! Usage: `math-monster-arena [--ticks N] [--seed S] [--tuning FILE] [--save FILE] [--load]`

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use math_monster_arena::audio::AudioManager;
use math_monster_arena::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, TICKS_PER_SECOND};
use math_monster_arena::persistence::{FileStore, load_progress, save_progress};
use math_monster_arena::platform::{
    HudSink, InputSource, LogRender, RenderSink, ScriptedInput, dispatch_events,
};
use math_monster_arena::sim::{Arena, GameEvent, GamePhase, GameState, TickInput, tick};
use math_monster_arena::{HudSnapshot, Tuning};

const DEFAULT_TICKS: u64 = 60 * TICKS_PER_SECOND as u64;

struct Options {
    ticks: u64,
    seed: Option<u64>,
    tuning: Option<PathBuf>,
    save: PathBuf,
    load: bool,
}

impl Options {
    fn parse() -> Self {
        let mut opts = Options {
            ticks: DEFAULT_TICKS,
            seed: None,
            tuning: None,
            save: PathBuf::from("math-monster-arena-save.json"),
            load: false,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ticks" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(n) => opts.ticks = n,
                    None => log::warn!("--ticks needs a number, using {}", opts.ticks),
                },
                "--seed" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(s) => opts.seed = Some(s),
                    None => log::warn!("--seed needs a number, using a random seed"),
                },
                "--tuning" => opts.tuning = args.next().map(PathBuf::from),
                "--save" => {
                    if let Some(path) = args.next() {
                        opts.save = PathBuf::from(path);
                    }
                }
                "--load" => opts.load = true,
                other => log::warn!("Ignoring unknown argument {}", other),
            }
        }
        opts
    }
}

/// HUD that logs whenever the level or health line changes
#[derive(Default)]
struct LogHud {
    last: Option<HudSnapshot>,
}

impl HudSink for LogHud {
    fn push(&mut self, hud: &HudSnapshot) {
        if self.last.as_ref() != Some(hud) {
            log::info!("{}", hud);
            self.last = Some(hud.clone());
        }
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path.display());
            tuning
        }
        Err(e) => {
            log::warn!("Could not load tuning {}: {}; using defaults", path.display(), e);
            Tuning::default()
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Math Monster Arena (headless) starting...");

    let opts = Options::parse();
    let tuning = load_tuning(opts.tuning.as_ref());
    let seed = opts.seed.unwrap_or_else(time_seed);
    let mut state = GameState::new(seed, Arena::new(DEFAULT_WIDTH, DEFAULT_HEIGHT), tuning);
    let mut store = FileStore::new(&opts.save);

    let restored = if opts.load {
        match load_progress(&store, &state.tuning) {
            Ok(progress) => progress,
            Err(e) => {
                log::warn!("Could not load {}: {}", store.path().display(), e);
                None
            }
        }
    } else {
        None
    };
    match restored {
        Some(progress) => state.apply_save(progress),
        None => state.start_game(),
    }
    log::info!("Game initialized with seed: {}", seed);

    let mut input = ScriptedInput::new(TickInput {
        idle_mode: true,
        ..Default::default()
    });
    let mut audio = AudioManager::new();
    let mut hud = LogHud::default();
    let mut render = LogRender::default();

    for _ in 0..opts.ticks {
        tick(&mut state, &input.poll());
        render.present(&state);

        for event in dispatch_events(&mut state, &mut audio, &mut hud) {
            match event {
                GameEvent::Evolved { from, to } => {
                    log::info!("Creature evolved from stage {} to {}", from, to)
                }
                GameEvent::BadgeUnlocked(badge) => log::info!("Badge unlocked: {}", badge.key()),
                _ => {}
            }
        }

        // Stand-in for the overlay buttons
        if state.acknowledge_level_up() || state.acknowledge_evolution() {
            continue;
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let p = &state.progress;
    log::info!(
        "Finished after {} ticks ({} frames): level {}, {} correct, {} wrong, best streak {}, {} sounds",
        state.time_ticks,
        render.frames(),
        p.level,
        p.total_correct,
        p.total_wrong,
        p.best_streak,
        audio.played()
    );

    if state.phase == GamePhase::GameOver {
        log::info!("Game over - progress not saved");
        return;
    }
    if let Err(e) = save_progress(&mut store, &state.progress) {
        log::error!("Save failed: {}", e);
        std::process::exit(1);
    }
}
