/// Sprite sheet: resolves every `SpriteId` to a terminal glyph.
///
/// Glyph text comes from the `[sprites]` config table. Each glyph must be
/// one or two terminal columns wide, since a tile is two columns. A glyph
/// that is empty or too wide stops the game from launching.

use crossterm::style::Color;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::config::SpriteConfig;
use crate::domain::entity::SpriteId;

/// Terminal columns per tile.
pub const TILE_COLUMNS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("sprite '{0}' has no visible glyph")]
    Empty(&'static str),
    #[error("sprite '{name}' is {width} columns wide (a tile fits 2)")]
    TooWide { name: &'static str, width: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub text: String,
    pub width: usize,
    pub color: Color,
}

pub struct SpriteSheet {
    glyphs: Vec<Glyph>, // indexed like SpriteId::ALL
}

impl SpriteSheet {
    /// Validate and load every sprite. Fails on the first bad one.
    pub fn load(cfg: &SpriteConfig) -> Result<Self, SpriteError> {
        let glyphs = SpriteId::ALL.iter()
            .map(|&id| glyph_for(id, cfg.glyph(id)))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("loaded {} sprites", glyphs.len());
        Ok(SpriteSheet { glyphs })
    }

    pub fn get(&self, id: SpriteId) -> &Glyph {
        &self.glyphs[id as usize]
    }
}

fn glyph_for(id: SpriteId, text: &str) -> Result<Glyph, SpriteError> {
    let width = UnicodeWidthStr::width(text);
    if text.trim().is_empty() || width == 0 {
        return Err(SpriteError::Empty(id.name()));
    }
    if width > TILE_COLUMNS {
        return Err(SpriteError::TooWide { name: id.name(), width });
    }
    Ok(Glyph { text: text.to_string(), width, color: color_of(id) })
}

fn color_of(id: SpriteId) -> Color {
    match id {
        SpriteId::Wall => Color::Rgb { r: 33, g: 33, b: 222 },
        SpriteId::RedGhost => Color::Red,
        SpriteId::BlueGhost => Color::Cyan,
        SpriteId::PinkGhost => Color::Rgb { r: 255, g: 184, b: 255 },
        SpriteId::OrangeGhost => Color::Rgb { r: 255, g: 184, b: 82 },
        SpriteId::ScaredGhost => Color::Blue,
        SpriteId::Cherry => Color::Red,
        SpriteId::PowerFood => Color::White,
        SpriteId::PacmanUp
        | SpriteId::PacmanDown
        | SpriteId::PacmanLeft
        | SpriteId::PacmanRight => Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn default_sprites_all_load() {
        let sheet = SpriteSheet::load(&GameConfig::default().sprites).unwrap();
        for id in SpriteId::ALL {
            let g = sheet.get(id);
            assert!((1..=TILE_COLUMNS).contains(&g.width), "{}", id.name());
        }
        assert_eq!(sheet.get(SpriteId::Wall).width, 2);
        assert_eq!(sheet.get(SpriteId::Cherry).width, 2);
    }

    #[test]
    fn sheet_is_indexed_by_sprite_id() {
        let mut cfg = GameConfig::default().sprites;
        cfg.pacman_left = "<".into();
        let sheet = SpriteSheet::load(&cfg).unwrap();
        assert_eq!(sheet.get(SpriteId::PacmanLeft).text, "<");
        assert_eq!(sheet.get(SpriteId::PacmanLeft).color, Color::Yellow);
        assert_eq!(sheet.get(SpriteId::RedGhost).color, Color::Red);
    }

    #[test]
    fn blank_sprite_is_fatal() {
        let mut cfg = GameConfig::default().sprites;
        cfg.scared_ghost = "  ".into();
        assert_eq!(SpriteSheet::load(&cfg).err(), Some(SpriteError::Empty("scared_ghost")));
    }

    #[test]
    fn wide_sprite_is_fatal() {
        let mut cfg = GameConfig::default().sprites;
        cfg.wall = "###".into();
        assert_eq!(
            SpriteSheet::load(&cfg).err(),
            Some(SpriteError::TooWide { name: "wall", width: 3 }),
        );
    }
}
