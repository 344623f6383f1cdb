//! Tiles and the kind → tile table. Overrides load from `tile[K]="#RRGGBB"` files.

use crate::piece::TetrominoKind;
use ratatui::style::Color;
use std::path::Path;
use thiserror::Error;

/// Opaque per-cell marker. Carries the colour a front end would draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub Color);

#[derive(Debug, Error)]
pub enum TileSetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("unknown piece kind: {0}")]
    UnknownKind(String),
}

/// Kind → tile table, built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    entries: [(TetrominoKind, Tile); 7],
}

impl Default for TileSet {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl TileSet {
    /// One Dark colours, one per kind.
    pub fn onedark_default() -> Self {
        Self::from_fn(|kind| {
            Tile(match kind {
                TetrominoKind::I => Color::Rgb(0x56, 0xB6, 0xC2), // cyan
                TetrominoKind::O => Color::Rgb(0xE5, 0xC0, 0x7B), // yellow
                TetrominoKind::T => Color::Rgb(0xC6, 0x78, 0xDD), // magenta
                TetrominoKind::J => Color::Rgb(0x61, 0xAF, 0xEF), // blue
                TetrominoKind::L => Color::Rgb(0xD1, 0x9A, 0x66), // orange
                TetrominoKind::S => Color::Rgb(0x98, 0xC3, 0x79), // green
                TetrominoKind::Z => Color::Rgb(0xE0, 0x6C, 0x75), // red
            })
        })
    }

    /// Build from a per-kind function, in `TetrominoKind::ALL` order.
    pub fn from_fn(mut f: impl FnMut(TetrominoKind) -> Tile) -> Self {
        Self {
            entries: TetrominoKind::ALL.map(|k| (k, f(k))),
        }
    }

    /// Load overrides from a tile file. Falls back to defaults if path is None or missing.
    pub fn load(path: Option<&Path>) -> Result<Self, TileSetError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        Self::parse(&s)
    }

    /// Parse tile file contents on top of the defaults.
    pub fn parse(s: &str) -> Result<Self, TileSetError> {
        let mut set = Self::default();
        for (key, value) in parse_tile_file(s) {
            let kind =
                TetrominoKind::from_letter(&key).ok_or_else(|| TileSetError::UnknownKind(key))?;
            let tile = Tile(parse_hex(&value)?);
            if let Some(entry) = set.entries.iter_mut().find(|(k, _)| *k == kind) {
                entry.1 = tile;
            }
        }
        Ok(set)
    }

    pub fn tile_for(&self, kind: TetrominoKind) -> Tile {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, t)| t)
            .unwrap_or(self.entries[0].1)
    }

    /// First kind whose tile matches, if any.
    pub fn resolve(&self, tile: Tile) -> Option<TetrominoKind> {
        self.entries.iter().find(|(_, t)| *t == tile).map(|&(k, _)| k)
    }

    /// Like [`resolve`](Self::resolve), but an unknown tile reads as the first enumerated kind.
    pub fn kind_of(&self, tile: Tile) -> TetrominoKind {
        self.resolve(tile).unwrap_or(TetrominoKind::ALL[0])
    }

    pub fn entries(&self) -> &[(TetrominoKind, Tile); 7] {
        &self.entries
    }
}

/// Parse a tile file into (key, value) pairs, in file order.
fn parse_tile_file(s: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("tile[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(value) = rest.strip_prefix('=') {
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if !value.is_empty() {
                        out.push((key.to_string(), value.to_string()));
                    }
                }
            }
        }
    }
    out
}

/// Parse hex colour "#RRGGBB" or "#RGB".
pub fn parse_hex(s: &str) -> Result<Color, TileSetError> {
    let s = s.trim().trim_start_matches('#');
    // channels are byte-sliced
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TileSetError::InvalidHex(s.to_string()));
    }
    let channel = |part: &str, scale: u8| {
        u8::from_str_radix(part, 16)
            .map(|v| v * scale)
            .map_err(|_| TileSetError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2], 1)?, channel(&s[2..4], 1)?, channel(&s[4..6], 1)?),
        3 => (channel(&s[0..1], 17)?, channel(&s[1..2], 17)?, channel(&s[2..3], 17)?),
        _ => return Err(TileSetError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
