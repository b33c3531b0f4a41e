//! Simulation tick
//!
//! One call advances the game by one frame. Every subsystem runs in a fixed
//! order (difficulty, player, meteorites, collisions, power-ups, score) and
//! entity removal is always deferred to a single pass after iteration.

use std::cmp::Ordering;

use super::collision::Rect;
use super::difficulty::Difficulty;
use super::game::{Game, GameEvent};
use super::player::PlayerInput;
use super::powerup::{EffectContext, PowerUpKind};
use super::ragdoll::Ragdoll;
use super::state::GamePhase;
use crate::clock::Clock;
use crate::consts::*;

/// Menu button presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Play,
    Tutorial,
    Back,
    SelectDifficulty(Difficulty),
    MainMenu,
    Quit,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub left: bool,
    pub right: bool,
    /// Held jump key (the player edge-triggers it)
    pub jump: bool,
    /// Pause toggle (pressed this frame)
    pub pause: bool,
    /// Window closed / quit key
    pub quit: bool,
    /// Menu button pressed this frame
    pub command: Option<MenuCommand>,
    /// Demo mode - AI drives the player
    pub autopilot: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    game.events.clear();

    if input.quit {
        log::info!("Quit requested");
        game.running = false;
        return;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    // Pause toggle; a death sequence always plays out
    if input.pause && !game.is_dying() {
        match game.phase() {
            GamePhase::Playing => {
                game.phases.transition_to(GamePhase::Paused);
                return;
            }
            GamePhase::Paused => game.phases.return_to_previous(),
            _ => {}
        }
    }

    if let Some(command) = input.command {
        handle_command(game, command);
    }

    match game.phase() {
        GamePhase::Countdown => update_countdown(game),
        GamePhase::Playing if game.is_dying() => update_death(game, dt),
        GamePhase::Playing => update_playing(game, input, dt),
        GamePhase::Menu
        | GamePhase::DifficultySelect
        | GamePhase::Tutorial
        | GamePhase::Paused
        | GamePhase::GameOver => {}
    }
}

fn handle_command(game: &mut Game, command: MenuCommand) {
    let accepted = match (game.phase(), command) {
        (GamePhase::Menu, MenuCommand::Play) | (GamePhase::GameOver, MenuCommand::Play) => {
            game.phases.transition_to(GamePhase::DifficultySelect);
            true
        }
        (GamePhase::Menu, MenuCommand::Tutorial) => {
            game.phases.transition_to(GamePhase::Tutorial);
            true
        }
        (GamePhase::Menu, MenuCommand::Quit) => {
            log::info!("Quit from main menu");
            game.running = false;
            true
        }
        (GamePhase::DifficultySelect, MenuCommand::SelectDifficulty(difficulty)) => {
            game.start_game(difficulty);
            true
        }
        (GamePhase::DifficultySelect, MenuCommand::Back)
        | (GamePhase::Tutorial, MenuCommand::Back)
        | (GamePhase::GameOver, MenuCommand::MainMenu) => {
            game.phases.transition_to(GamePhase::Menu);
            true
        }
        (phase, command) => {
            log::debug!("Ignoring {:?} in {}", command, phase.as_str());
            false
        }
    };
    if accepted {
        game.events.push(GameEvent::MenuClick);
    }
}

fn update_countdown(game: &mut Game) {
    let now = game.clock.now_ms();
    let elapsed_secs = now.saturating_sub(game.countdown_started_ms) / 1000;
    let elapsed_secs = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
    game.countdown_remaining = COUNTDOWN_SECONDS.saturating_sub(elapsed_secs);

    if game.countdown_remaining == 0 {
        game.game_started_ms = now;
        game.phases.transition_to(GamePhase::Playing);
    }
}

fn update_playing(game: &mut Game, input: &TickInput, dt: f32) {
    let now = game.clock.now_ms();

    // 1. Difficulty
    game.difficulty.update(dt);

    // 2. Player
    let player_input = if input.autopilot {
        autopilot_input(game)
    } else {
        PlayerInput {
            left: input.left,
            right: input.right,
            jump: input.jump,
        }
    };
    if game.player.update(player_input, dt) {
        let pos = game.player.pos();
        game.particles.emit_jump(&mut game.rng, pos);
        game.events.push(GameEvent::Jump);
    }

    // 3. Meteorites: one spawn roll per tick
    if game.difficulty.should_spawn_meteorite(&mut game.rng) {
        game.spawn_meteorite();
    }

    // 4. Collisions, with removal deferred until iteration is done
    let mut removed: Vec<u32> = Vec::new();
    let mut dodged = 0u32;
    let mut fatal = false;
    for meteorite in &mut game.meteorites {
        meteorite.update(dt);
        if !meteorite.grounded() {
            game.particles
                .emit_meteorite_trail(&mut game.rng, meteorite.pos());
        }

        if meteorite.check_collision(&game.player.hitbox) {
            if game.player.has_shield {
                log::info!("Shield absorbed meteorite {}", meteorite.id);
                game.player.has_shield = false;
                removed.push(meteorite.id);
                game.particles
                    .emit_collision(&mut game.rng, meteorite.hitbox.center());
                game.events.push(GameEvent::Collision);
                continue;
            }
            fatal = true;
            break;
        }

        if meteorite.grounded() {
            removed.push(meteorite.id);
            dodged += 1;
        }
    }
    for _ in 0..dodged {
        game.score.add_meteorite_dodge();
    }
    if !removed.is_empty() {
        game.meteorites.retain(|m| !removed.contains(&m.id));
    }
    if fatal {
        start_death(game, now);
        return;
    }

    // 5. Power-ups
    let columns = game.world.columns();
    game.powerups.update(dt, columns, &mut game.rng);
    for kind in game.powerups.check_collisions(&game.player.hitbox) {
        collect_powerup(game, kind, now);
    }

    // 6. Score
    game.score.update(dt);
    game.score.check_multiplier_expiry(now);

    game.particles.update(dt);
}

fn collect_powerup(game: &mut Game, kind: PowerUpKind, now_ms: u64) {
    let center = game.player.rect().center();
    game.particles.emit_powerup_collect(&mut game.rng, center);

    let mut ctx = EffectContext {
        player: &mut game.player,
        meteorites: &mut game.meteorites,
        score: &mut game.score,
        now_ms,
    };
    kind.apply(&mut ctx);

    log::info!("Collected power-up: {}", kind.label());
    game.events.push(GameEvent::PowerUp(kind));
}

fn start_death(game: &mut Game, now_ms: u64) {
    log::info!(
        "Player hit at {} points, {} meteorites dodged",
        game.score.current_score,
        game.score.dodge_count
    );
    let center = game.player.rect().center();
    game.particles.emit_collision(&mut game.rng, center);
    game.ragdoll = Some(Ragdoll::new(game.player.pos(), &mut game.rng));
    game.death_started_ms = Some(now_ms);
    game.events.push(GameEvent::Collision);
    game.events.push(GameEvent::GameOver);
}

/// One step of the death animation; ends the run once the limbs settle or
/// the timeout passes
fn update_death(game: &mut Game, dt: f32) {
    let now = game.clock.now_ms();
    if let Some(ragdoll) = game.ragdoll.as_mut() {
        ragdoll.update(dt);
    }
    game.particles.update(dt);

    let settled = game.ragdoll.as_ref().is_none_or(|r| r.finished);
    let timed_out = game
        .death_started_ms
        .is_some_and(|start| now.saturating_sub(start) >= DEATH_ANIMATION_TIMEOUT_MS);
    if settled || timed_out {
        finish_run(game);
    }
}

fn finish_run(game: &mut Game) {
    game.death_started_ms = None;

    if game.score.is_high_score() {
        if let Some(rank) = game.score.save_high_score(&game.player_name) {
            log::info!("New high score #{}: {}", rank, game.score.current_score);
            game.events.push(GameEvent::HighScore { rank });
        }
    }

    log::info!(
        "Game over: {} points in {:.0}s",
        game.score.current_score,
        game.score.time_elapsed
    );
    game.phases.transition_to(GamePhase::GameOver);
}

/// Demo AI: run out from under the lowest meteorite that threatens the
/// player, otherwise walk to the nearest power-up and jump for it.
fn autopilot_input(game: &Game) -> PlayerInput {
    let hitbox = game.player.hitbox;
    let px = hitbox.center().x;
    let danger = (PLAYER_HITBOX_WIDTH + METEORITE_HITBOX_WIDTH) / 2.0 + 20.0;

    let threat = game
        .meteorites
        .iter()
        .filter(|m| !m.grounded() && m.hitbox.top() < hitbox.bottom())
        .filter(|m| (m.hitbox.center().x - px).abs() < danger)
        .max_by(|a, b| {
            a.hitbox
                .top()
                .partial_cmp(&b.hitbox.top())
                .unwrap_or(Ordering::Equal)
        });

    if let Some(meteorite) = threat {
        let left_blocked = game.player.pos().x <= 0.0;
        let right_blocked = game.player.pos().x >= SCREEN_WIDTH - PLAYER_SIZE;
        let mut go_left = meteorite.hitbox.center().x >= px;
        if go_left && left_blocked {
            go_left = false;
        } else if !go_left && right_blocked {
            go_left = true;
        }
        return PlayerInput {
            left: go_left,
            right: !go_left,
            jump: false,
        };
    }

    let target = game
        .powerups
        .powerups
        .iter()
        .filter(|p| !p.collected)
        .min_by(|a, b| {
            let da = (a.pos.x - px).abs();
            let db = (b.pos.x - px).abs();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });

    match target {
        Some(powerup) if (powerup.pos.x - px).abs() > PLAYER_SPEED => PlayerInput {
            left: powerup.pos.x < px,
            right: powerup.pos.x > px,
            jump: false,
        },
        Some(powerup) => PlayerInput {
            jump: reachable(&hitbox, &powerup.rect) && game.player.can_jump,
            ..Default::default()
        },
        None => PlayerInput::default(),
    }
}

/// Directly overhead and low enough to touch at the top of a jump
fn reachable(hitbox: &Rect, target: &Rect) -> bool {
    // v0 = 15 px/frame, g = 1 px/frame^2
    let jump_height = JUMP_VELOCITY * JUMP_VELOCITY / (2.0 * GRAVITY);
    target.bottom() > hitbox.top() - jump_height
}
