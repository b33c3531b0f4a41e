//! Asset provider
//!
//! The simulation never touches pixels or samples; it only needs opaque
//! handles that a front end can resolve. `FileAssets` decodes the images on
//! disk and caches one handle per request. Missing or corrupt images resolve
//! to a placeholder handle so a broken install still runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::ImageReader;

use crate::consts::TILE_SIZE;
use crate::sim::PowerUpKind;

/// Asset locations relative to the asset root
pub mod paths {
    use std::path::PathBuf;

    use crate::sim::PowerUpKind;

    pub const SKY_IMAGE: &str = "img/sky.png";
    pub const SUN_IMAGE: &str = "img/sun.png";
    pub const DIRT_IMAGE: &str = "img/dirt.png";
    pub const GRASS_IMAGE: &str = "img/grass.png";
    pub const PLAYER_SPRITE_SHEET: &str = "Sprites/doux.png";
    /// Player sheet frame size (pixels)
    pub const PLAYER_FRAME: (u32, u32) = (24, 23);
    pub const MUSIC_FILE: &str = "audio/music/background.ogg";
    /// Number of rock sprite variants
    pub const ROCK_VARIANTS: u32 = 2;

    pub fn rock_image(variant: u32) -> PathBuf {
        PathBuf::from(format!("rocks/rock{}.png", variant))
    }

    pub fn powerup_image(kind: PowerUpKind) -> PathBuf {
        PathBuf::from(format!("powerups/{}.png", kind.asset_name()))
    }

    pub fn sfx(name: &str) -> PathBuf {
        PathBuf::from(format!("audio/sfx/{}.wav", name))
    }
}

/// Opaque reference to a loaded image or sprite frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    /// Stand-in for an image that could not be loaded
    pub placeholder: bool,
}

/// Opaque reference to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Source of images and sounds
pub trait AssetProvider {
    /// Load an image, optionally scaled. Never fails: a placeholder handle
    /// is returned (and a warning logged) when the file is unusable.
    fn load_image(&mut self, path: &Path, scale: Option<(u32, u32)>) -> ImageHandle;

    /// Load a sound, `None` if it is missing
    fn load_sound(&mut self, path: &Path) -> Option<SoundHandle>;

    /// Split a sheet into `frame_width` x `frame_height` frames, row-major.
    /// Empty if the sheet could not be loaded.
    fn load_sprite_sheet(
        &mut self,
        path: &Path,
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<ImageHandle>;
}

/// Assets read from a directory tree
#[derive(Debug)]
pub struct FileAssets {
    root: PathBuf,
    images: HashMap<(PathBuf, Option<(u32, u32)>), ImageHandle>,
    sounds: HashMap<PathBuf, Option<SoundHandle>>,
    sheets: HashMap<(PathBuf, u32, u32), Vec<ImageHandle>>,
    next_id: u32,
}

impl FileAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
            sounds: HashMap::new(),
            sheets: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every asset the game uses up front. Returns how many images
    /// ended up as placeholders.
    pub fn preload(&mut self) -> usize {
        let tile = Some((TILE_SIZE as u32, TILE_SIZE as u32));
        let mut images = vec![
            self.load_image(Path::new(paths::SKY_IMAGE), None),
            self.load_image(Path::new(paths::SUN_IMAGE), None),
            self.load_image(Path::new(paths::DIRT_IMAGE), tile),
            self.load_image(Path::new(paths::GRASS_IMAGE), tile),
        ];
        for variant in 1..=paths::ROCK_VARIANTS {
            images.push(self.load_image(&paths::rock_image(variant), tile));
        }
        for kind in PowerUpKind::ALL {
            images.push(self.load_image(&paths::powerup_image(kind), Some((40, 40))));
        }
        let (fw, fh) = paths::PLAYER_FRAME;
        let frames = self.load_sprite_sheet(Path::new(paths::PLAYER_SPRITE_SHEET), fw, fh);

        let missing = images.iter().filter(|h| h.placeholder).count();
        log::info!(
            "Assets preloaded: {} images ({} missing), {} player frames",
            images.len(),
            missing,
            frames.len()
        );
        missing
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn image(&mut self, width: u32, height: u32, placeholder: bool) -> ImageHandle {
        ImageHandle {
            id: self.next_id(),
            width,
            height,
            placeholder,
        }
    }
}

impl AssetProvider for FileAssets {
    fn load_image(&mut self, path: &Path, scale: Option<(u32, u32)>) -> ImageHandle {
        let key = (path.to_path_buf(), scale);
        if let Some(handle) = self.images.get(&key) {
            return *handle;
        }

        let full = self.resolve(path);
        let handle = match image_size(&full) {
            Ok((w, h)) => {
                let (w, h) = scale.unwrap_or((w, h));
                self.image(w, h, false)
            }
            Err(e) => {
                log::warn!("Failed to load image {}: {}", full.display(), e);
                let tile = TILE_SIZE as u32;
                let (w, h) = scale.unwrap_or((tile, tile));
                self.image(w, h, true)
            }
        };
        self.images.insert(key, handle);
        handle
    }

    fn load_sound(&mut self, path: &Path) -> Option<SoundHandle> {
        if let Some(handle) = self.sounds.get(path) {
            return *handle;
        }

        let full = self.resolve(path);
        let handle = if full.is_file() {
            Some(SoundHandle(self.next_id()))
        } else {
            log::warn!("Sound not found: {}", full.display());
            None
        };
        self.sounds.insert(path.to_path_buf(), handle);
        handle
    }

    fn load_sprite_sheet(
        &mut self,
        path: &Path,
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<ImageHandle> {
        let key = (path.to_path_buf(), frame_width, frame_height);
        if let Some(frames) = self.sheets.get(&key) {
            return frames.clone();
        }

        let sheet = self.load_image(path, None);
        let frames = if sheet.placeholder || frame_width == 0 || frame_height == 0 {
            log::warn!("Failed to load sprite sheet {}", path.display());
            Vec::new()
        } else {
            let count = (sheet.width / frame_width) * (sheet.height / frame_height);
            (0..count)
                .map(|_| self.image(frame_width, frame_height, false))
                .collect()
        };
        self.sheets.insert(key, frames.clone());
        frames
    }
}

/// Decode an image fully and return its dimensions
fn image_size(path: &Path) -> Result<(u32, u32), image::ImageError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok((img.width(), img.height()))
}
