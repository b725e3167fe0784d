//! Sprites and the asset registry
//!
//! Every sprite is built at startup, either from pixel art embedded in the
//! binary or procedurally. Nothing is optional: a sprite that fails to build
//! aborts startup, so drawing never sees a missing handle.

use std::f32::consts::TAU;
use std::fmt;

use crate::config::Config;
use crate::consts::*;
use crate::geom::Rect;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const OUTLINE: Rgb = Rgb(60, 40, 30);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GOLD: Rgb = BIRD_Y;
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Sprite has no pixels
    Empty { name: String },
    /// Pixel art row with a different width than the first row
    Ragged { name: String, row: usize },
    /// Pixel art character missing from the palette
    UnknownColor { name: String, ch: char },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Empty { name } => write!(f, "sprite '{}' is empty", name),
            AssetError::Ragged { name, row } => {
                write!(f, "sprite '{}' row {} has the wrong width", name, row)
            }
            AssetError::UnknownColor { name, ch } => {
                write!(f, "sprite '{}' uses unknown color '{}'", name, ch)
            }
        }
    }
}

impl std::error::Error for AssetError {}

// ── Sprite ──────────────────────────────────────────────────────────────────

/// A drawable: a texel grid (None = transparent) stretched over a size in
/// world units.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub width: f32,
    pub height: f32,
    tex_w: usize,
    tex_h: usize,
    texels: Vec<Option<Rgb>>,
}

impl Sprite {
    fn from_texels(
        name: impl Into<String>,
        tex_w: usize,
        tex_h: usize,
        texels: Vec<Option<Rgb>>,
        width: f32,
        height: f32,
    ) -> Result<Self, AssetError> {
        let name = name.into();
        if tex_w == 0 || tex_h == 0 || texels.len() != tex_w * tex_h || width <= 0.0 || height <= 0.0
        {
            return Err(AssetError::Empty { name });
        }
        Ok(Self {
            name,
            width,
            height,
            tex_w,
            tex_h,
            texels,
        })
    }

    /// Build a sprite by evaluating `f(x, y)` for every texel.
    fn generate(
        name: &str,
        tex_w: usize,
        tex_h: usize,
        width: f32,
        height: f32,
        f: impl Fn(usize, usize) -> Option<Rgb>,
    ) -> Result<Self, AssetError> {
        let mut texels = Vec::with_capacity(tex_w * tex_h);
        for y in 0..tex_h {
            for x in 0..tex_w {
                texels.push(f(x, y));
            }
        }
        Self::from_texels(name, tex_w, tex_h, texels, width, height)
    }

    #[cfg(test)]
    fn texture_size(&self) -> (usize, usize) {
        (self.tex_w, self.tex_h)
    }

    /// Nearest texel at normalized coordinates (u, v) in [0, 1).
    pub fn sample(&self, u: f32, v: f32) -> Option<Rgb> {
        let x = ((u * self.tex_w as f32) as isize).clamp(0, self.tex_w as isize - 1) as usize;
        let y = ((v * self.tex_h as f32) as isize).clamp(0, self.tex_h as isize - 1) as usize;
        self.texels[y * self.tex_w + x]
    }
}

/// Non-owning draw handle: a sprite placed at a rectangle.
#[derive(Debug, Clone, Copy)]
pub struct SpriteView<'a> {
    pub sprite: &'a Sprite,
    pub rect: Rect,
}

impl<'a> SpriteView<'a> {
    pub fn new(sprite: &'a Sprite, rect: Rect) -> Self {
        Self { sprite, rect }
    }

    /// Sprite at (x, y) with its natural size
    pub fn at(sprite: &'a Sprite, x: f32, y: f32) -> Self {
        Self::new(sprite, Rect::new(x, y, sprite.width, sprite.height))
    }
}

// ── Pixel art ───────────────────────────────────────────────────────────────

fn palette(ch: char) -> Option<Option<Rgb>> {
    Some(match ch {
        '.' => None,
        'K' => Some(OUTLINE),
        'Y' => Some(BIRD_Y),
        'H' => Some(BIRD_HI),
        'W' => Some(BIRD_WING),
        'E' => Some(BIRD_EYE),
        'P' => Some(BIRD_PUPIL),
        'B' => Some(BIRD_BEAK),
        _ => return None,
    })
}

/// Parse rows of palette characters into a sprite of the given world size.
pub fn parse_pixel_art(
    name: &str,
    rows: &[&str],
    width: f32,
    height: f32,
) -> Result<Sprite, AssetError> {
    let tex_w = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    let mut texels = Vec::with_capacity(tex_w * rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.chars().count() != tex_w {
            return Err(AssetError::Ragged {
                name: name.to_string(),
                row: i,
            });
        }
        for ch in row.chars() {
            let color = palette(ch).ok_or_else(|| AssetError::UnknownColor {
                name: name.to_string(),
                ch,
            })?;
            texels.push(color);
        }
    }
    Sprite::from_texels(name, tex_w, rows.len(), texels, width, height)
}

#[rustfmt::skip]
const BIRD_UP: [&str; 12] = [
    ".....KKKKKK.....",
    "...KKHHHHKEEK...",
    "..KHYYYYKEEEEK..",
    ".KWWWYYYKEEEPK..",
    "KWWWWWYYKEEEPK..",
    "KKKKKYYYYKKKKKK.",
    "KYYYYYYYKBBBBBBK",
    ".KYYYYYKBKKKKKK.",
    "..KYYYYYKBBBBBK.",
    "...KKYYYYKKKKK..",
    ".....KKKKK......",
    "................",
];

#[rustfmt::skip]
const BIRD_MID: [&str; 12] = [
    ".....KKKKKK.....",
    "...KKHHHHKEEK...",
    "..KHYYYYKEEEEK..",
    ".KYYYYYYKEEEPK..",
    "KWWWWYYYKEEEPK..",
    "KWWWWWYYYKKKKKK.",
    "KYWWWYYYKBBBBBBK",
    ".KYYYYYKBKKKKKK.",
    "..KYYYYYKBBBBBK.",
    "...KKYYYYKKKKK..",
    ".....KKKKK......",
    "................",
];

#[rustfmt::skip]
const BIRD_DOWN: [&str; 12] = [
    ".....KKKKKK.....",
    "...KKHHHHKEEK...",
    "..KHYYYYKEEEEK..",
    ".KYYYYYYKEEEPK..",
    "KYYYYYYYKEEEPK..",
    "KKKKKYYYYKKKKKK.",
    "KWWWWWYYKBBBBBBK",
    ".KWWWWKKBKKKKKK.",
    "..KWWKYYKBBBBBK.",
    "...KKYYYYKKKKK..",
    ".....KKKKK......",
    "................",
];

// ── Bitmap font ─────────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 1,1,1], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // O
    [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0], // P
    [1,1,1, 1,0,1, 1,0,1, 1,1,1, 0,0,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

const BLANK: [u8; 15] = [0; 15];

fn glyph(ch: char) -> &'static [u8; 15] {
    match ch.to_ascii_uppercase() {
        c @ '0'..='9' => &DIGITS[c as usize - '0' as usize],
        c @ 'A'..='Z' => &LETTERS[c as usize - 'A' as usize],
        _ => &BLANK,
    }
}

/// World units per font texel
pub const FONT_TEXEL: f32 = 6.0;

/// Render `text` with the 3x5 font and a drop shadow. Each glyph takes four
/// texel columns; the shadow adds one row and one column.
pub fn measure_text(text: &str, fg: Rgb, texel: f32) -> Result<Sprite, AssetError> {
    let chars: Vec<char> = text.chars().collect();
    let tex_w = chars.len() * 4;
    let tex_h = 6;
    let mut texels = vec![None; tex_w * tex_h];
    for pass in [true, false] {
        for (i, &ch) in chars.iter().enumerate() {
            let g = glyph(ch);
            for row in 0..5 {
                for col in 0..3 {
                    if g[row * 3 + col] == 0 {
                        continue;
                    }
                    let (x, y, c) = if pass {
                        (i * 4 + col + 1, row + 1, SHADOW)
                    } else {
                        (i * 4 + col, row, fg)
                    };
                    texels[y * tex_w + x] = Some(c);
                }
            }
        }
    }
    Sprite::from_texels(
        text,
        tex_w,
        tex_h,
        texels,
        tex_w as f32 * texel,
        tex_h as f32 * texel,
    )
}

// ── Procedural sprites ──────────────────────────────────────────────────────

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

const PIPE_TEX_W: usize = 26;
const PIPE_TEX_H: usize = 160;
const PIPE_CAP_H: usize = 6;

/// A pipe with its cap at the gap end (bottom for the upper pipe).
fn pipe_sprite(name: &str, cap_at_bottom: bool) -> Result<Sprite, AssetError> {
    let w = PIPE_TEX_W;
    let h = PIPE_TEX_H;
    Sprite::generate(name, w, h, PIPE_WIDTH, PIPE_HEIGHT, |x, y| {
        let in_cap = if cap_at_bottom {
            y >= h - PIPE_CAP_H
        } else {
            y < PIPE_CAP_H
        };
        if in_cap {
            let edge = if cap_at_bottom {
                y == h - PIPE_CAP_H || y == h - 1
            } else {
                y == 0 || y == PIPE_CAP_H - 1
            };
            if edge {
                Some(CAP_DARK)
            } else {
                Some(pipe_shade(x as i32, w as i32))
            }
        } else if x == 0 || x == w - 1 {
            // Body is one texel narrower than the cap on each side
            None
        } else {
            Some(pipe_shade(x as i32 - 1, w as i32 - 2))
        }
    })
}

const GROUND_TEX_W: usize = 168;
const GROUND_TEX_H: usize = 56;

fn ground_sprite() -> Result<Sprite, AssetError> {
    Sprite::generate(
        "ground",
        GROUND_TEX_W,
        GROUND_TEX_H,
        GROUND_WIDTH,
        GROUND_HEIGHT,
        |x, y| {
            Some(match y {
                0 => CAP_DARK,
                1..=3 => {
                    if ((x + y) / 3) % 2 == 0 {
                        GRASS
                    } else {
                        GRASS_LIGHT
                    }
                }
                4 => GRASS,
                _ => {
                    if (x + y * 2) % 12 < 6 {
                        DIRT
                    } else {
                        DIRT_DARK
                    }
                }
            })
        },
    )
}

const BACKGROUND_TEX_W: usize = 144;

/// Sky gradient with two layers of hills. Hill heights are periodic over
/// the tile width so the strip tiles without seams.
fn background_sprite(screen_height: f32) -> Result<Sprite, AssetError> {
    let tex_w = BACKGROUND_TEX_W;
    let tex_h = (screen_height / 2.0).round().max(1.0) as usize;
    // Hills sit on the ground line
    let base = ((screen_height - GROUND_HEIGHT) / 2.0).max(0.0) as i32;
    let sky_h = base.max(1);
    Sprite::generate(
        "background",
        tex_w,
        tex_h,
        BACKGROUND_WIDTH,
        screen_height,
        |x, y| {
            let phase = x as f32 / tex_w as f32 * TAU;
            let far = base - (14.0 + phase.sin() * 8.0 + (phase * 3.0).sin() * 4.0) as i32;
            let near = base - (6.0 + (phase * 2.0).sin() * 4.0 + (phase * 5.0).sin() * 2.0) as i32;
            let y = y as i32;
            Some(if y >= near {
                HILL_NEAR
            } else if y >= far {
                HILL_FAR
            } else {
                let t = (y.min(sky_h) as u32 * 256 / sky_h as u32) as u16;
                Rgb::lerp(SKY_TOP, SKY_BOT, t)
            })
        },
    )
}

/// Translucent-looking panel behind the game-over text
fn panel_sprite(width: f32, height: f32) -> Result<Sprite, AssetError> {
    let w = 40;
    let h = 16;
    Sprite::generate("panel", w, h, width, height, |x, y| {
        Some(if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            SHADOW
        } else if x == 1 || y == 1 || x == w - 2 || y == h - 2 {
            DIRT
        } else {
            Rgb(220, 195, 120)
        })
    })
}

// ── Registry ────────────────────────────────────────────────────────────────

/// Handle into the asset registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Background,
    Ground,
    UpperPipe,
    LowerPipe,
    /// Flap animation frame (0..BIRD_FRAMES)
    Bird(usize),
    Digit(u8),
    HighScoreLabel,
    GameOver,
    RestartHint,
    Paused,
    Panel,
}

pub const BIRD_FRAMES: usize = 3;

/// Owns every sprite in the game
#[derive(Debug)]
pub struct Assets {
    background: Sprite,
    ground: Sprite,
    upper_pipe: Sprite,
    lower_pipe: Sprite,
    bird: Vec<Sprite>,
    digits: Vec<Sprite>,
    high_score_label: Sprite,
    game_over: Sprite,
    restart_hint: Sprite,
    paused: Sprite,
    panel: Sprite,
}

impl Assets {
    /// Build every sprite. Fails on the first malformed asset.
    pub fn load(config: &Config) -> Result<Self, AssetError> {
        let bird = [("bird-up", &BIRD_UP), ("bird-mid", &BIRD_MID), ("bird-down", &BIRD_DOWN)]
            .into_iter()
            .map(|(name, rows)| parse_pixel_art(name, rows, PLAYER_WIDTH, PLAYER_HEIGHT))
            .collect::<Result<Vec<_>, _>>()?;

        let digits = (0..10)
            .map(|d| measure_text(&d.to_string(), WHITE, FONT_TEXEL))
            .collect::<Result<Vec<_>, _>>()?;

        let assets = Self {
            background: background_sprite(config.screen_height)?,
            ground: ground_sprite()?,
            upper_pipe: pipe_sprite("pipe-upper", true)?,
            lower_pipe: pipe_sprite("pipe-lower", false)?,
            bird,
            digits,
            high_score_label: measure_text("HIGH SCORE", WHITE, FONT_TEXEL * 0.75)?,
            game_over: measure_text("GAME OVER", GOLD, FONT_TEXEL * 1.5)?,
            restart_hint: measure_text("CLICK TO PLAY", WHITE, FONT_TEXEL)?,
            paused: measure_text("PAUSED", WHITE, FONT_TEXEL * 1.5)?,
            panel: panel_sprite(360.0, 150.0)?,
        };
        log::info!("Loaded {} sprites", assets.count());
        Ok(assets)
    }

    pub fn get(&self, id: SpriteId) -> &Sprite {
        match id {
            SpriteId::Background => &self.background,
            SpriteId::Ground => &self.ground,
            SpriteId::UpperPipe => &self.upper_pipe,
            SpriteId::LowerPipe => &self.lower_pipe,
            SpriteId::Bird(frame) => &self.bird[frame % self.bird.len()],
            SpriteId::Digit(d) => &self.digits[d as usize % self.digits.len()],
            SpriteId::HighScoreLabel => &self.high_score_label,
            SpriteId::GameOver => &self.game_over,
            SpriteId::RestartHint => &self.restart_hint,
            SpriteId::Paused => &self.paused,
            SpriteId::Panel => &self.panel,
        }
    }

    fn count(&self) -> usize {
        9 + self.bird.len() + self.digits.len()
    }
}
