//! Meteor Dodge entry point
//!
//! Headless runner: walks the menus, plays one game on autopilot at ~60 fps
//! and logs the HUD once a second. Set `RUST_LOG=debug` to see every sound.

use std::collections::VecDeque;
use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use meteor_dodge::assets::FileAssets;
use meteor_dodge::audio::{AudioSink, LogAudio, play_events};
use meteor_dodge::clock::SystemClock;
use meteor_dodge::settings::SETTINGS_FILE;
use meteor_dodge::sim::{Game, GamePhase, MenuCommand, ScoreManager, TickInput, World, tick};
use meteor_dodge::{GameError, Settings};

const FRAME: Duration = Duration::from_micros(16_667);

/// Runner state wrapped around the simulation
struct Runner {
    game: Game,
    audio: LogAudio,
    /// Menu presses still to make, one per frame
    script: VecDeque<MenuCommand>,
    autopilot: bool,
    last_time: Instant,
    last_phase: GamePhase,
    last_hud_secs: u64,
}

impl Runner {
    fn new(settings: &Settings) -> Result<Self, GameError> {
        settings.validate()?;

        let world = match &settings.level_path {
            Some(path) => World::load(path)?,
            None => World::default(),
        };
        let mut assets = FileAssets::new(&settings.asset_dir);
        assets.preload();
        let audio = LogAudio::new(&mut assets, settings);

        let score = ScoreManager::new(Some(settings.highscore_path.clone()));
        let seed = settings.seed.unwrap_or_else(time_seed);
        let mut game = Game::new(world, score, Box::new(SystemClock::new()), seed);
        game.player_name = settings.player_name.clone();

        Ok(Self {
            game,
            audio,
            script: VecDeque::from([
                MenuCommand::Play,
                MenuCommand::SelectDifficulty(settings.difficulty),
            ]),
            autopilot: settings.autopilot,
            last_time: Instant::now(),
            last_phase: GamePhase::Menu,
            last_hud_secs: 0,
        })
    }

    fn run(&mut self) {
        self.audio.play_music();
        while self.game.is_running() {
            let frame_start = Instant::now();
            let dt = frame_start.duration_since(self.last_time).as_secs_f32();
            self.last_time = frame_start;

            self.update(dt);

            if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
        self.audio.stop_music();
    }

    fn update(&mut self, dt: f32) {
        let mut input = TickInput {
            autopilot: self.autopilot,
            ..Default::default()
        };
        match self.game.phase() {
            GamePhase::Menu | GamePhase::DifficultySelect => {
                input.command = self.script.pop_front();
            }
            GamePhase::GameOver => input.quit = true,
            _ => {}
        }

        tick(&mut self.game, &input, dt);
        play_events(&mut self.audio, &self.game.drain_events());

        let phase = self.game.phase();
        if phase != self.last_phase {
            log::info!("{} -> {}", self.last_phase.as_str(), phase.as_str());
            self.last_phase = phase;
        }
        if phase == GamePhase::Countdown {
            log::debug!("Countdown: {}", self.game.countdown_remaining());
        }
        self.log_hud();
    }

    /// Once-a-second HUD line while a run is in progress
    fn log_hud(&mut self) {
        if self.game.phase() != GamePhase::Playing || self.game.is_dying() {
            return;
        }
        let secs = self.game.game_time_secs();
        if secs == self.last_hud_secs {
            return;
        }
        self.last_hud_secs = secs;

        let score = &self.game.score;
        let effects = self.game.active_effects();
        log::info!(
            "[{:>3}s] score {} | dodged {} | meteorites {} | fall {:.2} | {}",
            secs,
            score.current_score,
            score.dodge_count,
            self.game.meteorites.len(),
            self.game.difficulty.fall_speed(),
            if effects.is_empty() {
                String::from("-")
            } else {
                effects.join(", ")
            }
        );
    }

    fn report(&self) {
        let score = &self.game.score;
        log::info!(
            "Final score {} ({} meteorites dodged, {:.0}s)",
            score.current_score,
            score.dodge_count,
            score.time_elapsed
        );
        for (i, entry) in score.high_scores().scores.iter().enumerate() {
            log::info!(
                "{:>2}. {:<12} {:>7}  {:>4}s  {:>3} dodged",
                i + 1,
                entry.name,
                entry.score,
                entry.time,
                entry.meteorites_dodged
            );
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Meteor Dodge (headless) starting...");

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let mut runner = match Runner::new(&settings) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runner.run();
    runner.report();
    ExitCode::SUCCESS
}
