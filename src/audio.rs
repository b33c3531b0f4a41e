//! Audio sink
//!
//! Sound is fire-and-forget: the game loop turns each tick's events into
//! sound effects and hands them to whatever `AudioSink` the front end
//! provides. Nothing reads audio state back into the simulation.

use std::collections::HashMap;
use std::path::Path;

use crate::assets::{AssetProvider, SoundHandle, paths};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Jump,
    /// Meteorite hit, shielded or fatal
    Collision,
    MenuClick,
    /// Power-up collected
    PowerUp,
    GameOver,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 5] = [
        SoundEffect::Jump,
        SoundEffect::Collision,
        SoundEffect::MenuClick,
        SoundEffect::PowerUp,
        SoundEffect::GameOver,
    ];

    /// Sound file stem
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Collision => "collision",
            SoundEffect::MenuClick => "menu_click",
            SoundEffect::PowerUp => "powerup_collect",
            SoundEffect::GameOver => "game_over",
        }
    }

    /// The sound a game event makes, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::MenuClick => Some(SoundEffect::MenuClick),
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Collision => Some(SoundEffect::Collision),
            GameEvent::PowerUp(_) => Some(SoundEffect::PowerUp),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::HighScore { .. } => None,
        }
    }
}

/// Somewhere to send sound
pub trait AudioSink {
    fn play_sfx(&mut self, effect: SoundEffect);
    /// Start the looping background track (no-op if already playing)
    fn play_music(&mut self);
    fn stop_music(&mut self);
}

/// Play the sound for every event in order
pub fn play_events(sink: &mut dyn AudioSink, events: &[GameEvent]) {
    for effect in events.iter().filter_map(SoundEffect::for_event) {
        sink.play_sfx(effect);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sfx(&mut self, _effect: SoundEffect) {}
    fn play_music(&mut self) {}
    fn stop_music(&mut self) {}
}

/// Headless sink: resolves sounds through an asset provider and logs what
/// would be played
#[derive(Debug)]
pub struct LogAudio {
    sounds: HashMap<SoundEffect, SoundHandle>,
    music: Option<SoundHandle>,
    sfx_volume: f32,
    music_volume: f32,
    sfx_enabled: bool,
    music_enabled: bool,
    music_playing: bool,
    sfx_played: u32,
}

impl LogAudio {
    pub fn new(assets: &mut dyn AssetProvider, settings: &Settings) -> Self {
        let sounds: HashMap<_, _> = SoundEffect::ALL
            .iter()
            .filter_map(|&effect| {
                assets
                    .load_sound(&paths::sfx(effect.asset_name()))
                    .map(|handle| (effect, handle))
            })
            .collect();
        let music = assets.load_sound(Path::new(paths::MUSIC_FILE));
        log::info!(
            "Audio ready: {}/{} sound effects, music {}",
            sounds.len(),
            SoundEffect::ALL.len(),
            if music.is_some() { "found" } else { "missing" }
        );

        Self {
            sounds,
            music,
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            sfx_enabled: settings.sfx_enabled,
            music_enabled: settings.music_enabled,
            music_playing: false,
            sfx_played: 0,
        }
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn toggle_sfx(&mut self) {
        self.sfx_enabled = !self.sfx_enabled;
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        if self.music_enabled {
            self.play_music();
        } else {
            self.stop_music();
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Sound effects actually played so far
    pub fn sfx_played(&self) -> u32 {
        self.sfx_played
    }
}

impl AudioSink for LogAudio {
    fn play_sfx(&mut self, effect: SoundEffect) {
        if !self.sfx_enabled || self.sfx_volume <= 0.0 {
            return;
        }
        let Some(handle) = self.sounds.get(&effect) else {
            return;
        };
        log::debug!(
            "sfx {} (sound {}, volume {:.2})",
            effect.asset_name(),
            handle.0,
            self.sfx_volume
        );
        self.sfx_played += 1;
    }

    fn play_music(&mut self) {
        if !self.music_enabled || self.music_playing {
            return;
        }
        if let Some(handle) = self.music {
            log::debug!("music start (sound {}, volume {:.2})", handle.0, self.music_volume);
            self.music_playing = true;
        }
    }

    fn stop_music(&mut self) {
        if self.music_playing {
            log::debug!("music stop");
        }
        self.music_playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageHandle;
    use crate::sim::PowerUpKind;

    /// Provider where every sound exists
    struct AllSounds(u32);

    impl AssetProvider for AllSounds {
        fn load_image(&mut self, _path: &Path, _scale: Option<(u32, u32)>) -> ImageHandle {
            ImageHandle {
                id: 0,
                width: 1,
                height: 1,
                placeholder: true,
            }
        }

        fn load_sound(&mut self, _path: &Path) -> Option<SoundHandle> {
            self.0 += 1;
            Some(SoundHandle(self.0))
        }

        fn load_sprite_sheet(&mut self, _path: &Path, _w: u32, _h: u32) -> Vec<ImageHandle> {
            Vec::new()
        }
    }

    /// Provider with no sounds at all
    struct NoSounds;

    impl AssetProvider for NoSounds {
        fn load_image(&mut self, path: &Path, scale: Option<(u32, u32)>) -> ImageHandle {
            AllSounds(0).load_image(path, scale)
        }

        fn load_sound(&mut self, _path: &Path) -> Option<SoundHandle> {
            None
        }

        fn load_sprite_sheet(&mut self, _path: &Path, _w: u32, _h: u32) -> Vec<ImageHandle> {
            Vec::new()
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerUp(PowerUpKind::Shield)),
            Some(SoundEffect::PowerUp)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::HighScore { rank: 1 }),
            None
        );
    }

    #[test]
    fn test_plays_events() {
        let mut audio = LogAudio::new(&mut AllSounds(0), &Settings::default());
        play_events(
            &mut audio,
            &[
                GameEvent::Jump,
                GameEvent::HighScore { rank: 2 },
                GameEvent::GameOver,
            ],
        );
        assert_eq!(audio.sfx_played(), 2);
    }

    #[test]
    fn test_disabled_or_muted_sfx() {
        let settings = Settings {
            sfx_enabled: false,
            ..Default::default()
        };
        let mut audio = LogAudio::new(&mut AllSounds(0), &settings);
        audio.play_sfx(SoundEffect::Jump);
        assert_eq!(audio.sfx_played(), 0);

        audio.toggle_sfx();
        audio.set_sfx_volume(0.0);
        audio.play_sfx(SoundEffect::Jump);
        assert_eq!(audio.sfx_played(), 0);

        audio.set_sfx_volume(2.0);
        audio.play_sfx(SoundEffect::Jump);
        assert_eq!(audio.sfx_played(), 1);
    }

    #[test]
    fn test_missing_sounds_are_skipped() {
        let mut audio = LogAudio::new(&mut NoSounds, &Settings::default());
        audio.play_sfx(SoundEffect::Collision);
        audio.play_music();
        assert_eq!(audio.sfx_played(), 0);
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_music_toggle() {
        let mut audio = LogAudio::new(&mut AllSounds(0), &Settings::default());
        audio.play_music();
        assert!(audio.is_music_playing());
        audio.toggle_music();
        assert!(!audio.is_music_playing());
        audio.toggle_music();
        assert!(audio.is_music_playing());
        audio.stop_music();
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_silent_audio_accepts_everything() {
        let mut sink = SilentAudio;
        play_events(&mut sink, &[GameEvent::MenuClick, GameEvent::Collision]);
        sink.play_music();
        sink.stop_music();
    }
}
