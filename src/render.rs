//! Draw order and the terminal pixel buffer
//!
//! `draw_list` turns game state into sprite views in a fixed order
//! (background, ground, pipes, HUD, player, then overlays). `PixelBuf`
//! rasterizes them at terminal resolution, two pixels per cell using the
//! upper half block.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::assets::{Assets, Rgb, SKY_TOP, SpriteId, SpriteView};
use crate::entity::PipeKind;
use crate::game::Game;
use crate::geom::Rect;
use crate::session::Phase;

// ── Draw list ───────────────────────────────────────────────────────────────

/// Left margin of the HUD, also the gap between label and digits
const HUD_MARGIN: f32 = 20.0;
const HUD_Y: f32 = 30.0;

pub struct DrawList<'a> {
    pub scene: Vec<SpriteView<'a>>,
    /// Darken the scene before drawing the overlay
    pub dim_scene: bool,
    pub overlay: Vec<SpriteView<'a>>,
}

pub fn draw_list<'a>(game: &Game, assets: &'a Assets) -> DrawList<'a> {
    let mut scene = Vec::new();

    let background = assets.get(SpriteId::Background);
    for &(x, y) in &game.background.tiles {
        scene.push(SpriteView::at(background, x, y));
    }

    let ground = assets.get(SpriteId::Ground);
    for &(x, y) in &game.ground.tiles {
        scene.push(SpriteView::at(ground, x, y));
    }

    for pipe in game.pipes.iter().filter(|p| !p.is_destroyed) {
        let id = match pipe.kind {
            PipeKind::Upper => SpriteId::UpperPipe,
            PipeKind::Lower => SpriteId::LowerPipe,
        };
        scene.push(SpriteView::new(assets.get(id), pipe.bounds));
    }

    // HUD: high score top-left, score top-center
    let label = assets.get(SpriteId::HighScoreLabel);
    scene.push(SpriteView::at(label, HUD_MARGIN, HUD_Y));
    push_number(
        &mut scene,
        assets,
        game.session.high_score,
        HUD_MARGIN * 2.0 + label.width,
        HUD_Y,
    );
    let digit_w = assets.get(SpriteId::Digit(0)).width;
    let score_w = digit_count(game.session.score) as f32 * digit_w;
    push_number(
        &mut scene,
        assets,
        game.session.score,
        (game.config.screen_width - score_w) / 2.0,
        HUD_Y,
    );

    scene.push(SpriteView::new(
        assets.get(SpriteId::Bird(game.player.frame)),
        game.player.bounds,
    ));

    let mut overlay = Vec::new();
    let (w, h) = (game.config.screen_width, game.config.screen_height);
    match game.phase() {
        Phase::GameOver => {
            let panel = assets.get(SpriteId::Panel);
            let px = (w - panel.width) / 2.0;
            let py = (h - panel.height) / 2.0;
            overlay.push(SpriteView::at(panel, px, py));
            let title = assets.get(SpriteId::GameOver);
            overlay.push(SpriteView::at(title, (w - title.width) / 2.0, py + 20.0));
            let hint = assets.get(SpriteId::RestartHint);
            overlay.push(SpriteView::at(
                hint,
                (w - hint.width) / 2.0,
                py + panel.height - hint.height - 20.0,
            ));
        }
        Phase::Paused => {
            let paused = assets.get(SpriteId::Paused);
            overlay.push(SpriteView::at(
                paused,
                (w - paused.width) / 2.0,
                (h - paused.height) / 3.0,
            ));
        }
        Phase::Playing => {}
    }

    DrawList {
        scene,
        dim_scene: game.phase() == Phase::GameOver,
        overlay,
    }
}

fn digit_count(n: u32) -> usize {
    n.to_string().len()
}

fn push_number<'a>(out: &mut Vec<SpriteView<'a>>, assets: &'a Assets, n: u32, x: f32, y: f32) {
    let mut x = x;
    for ch in n.to_string().bytes() {
        let sprite = assets.get(SpriteId::Digit(ch - b'0'));
        out.push(SpriteView::at(sprite, x, y));
        x += sprite.width;
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    #[cfg(test)]
    fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn dim(&mut self) {
        for c in &mut self.px {
            *c = c.dim();
        }
    }

    /// Draw a sprite view. `scale` maps world units to pixels per axis.
    /// A pixel is covered when its center lies inside the view rectangle.
    pub fn draw(&mut self, view: &SpriteView, scale: (f32, f32)) {
        let (sx, sy) = scale;
        let Rect { x, y, w, h } = view.rect;
        if w <= 0.0 || h <= 0.0 || sx <= 0.0 || sy <= 0.0 {
            return;
        }
        let x0 = (x * sx).floor().max(0.0) as i32;
        let y0 = (y * sy).floor().max(0.0) as i32;
        let x1 = ((x + w) * sx).ceil().min(self.w as f32) as i32;
        let y1 = ((y + h) * sy).ceil().min(self.h as f32) as i32;
        for py in y0..y1 {
            let v = ((py as f32 + 0.5) / sy - y) / h;
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            for px in x0..x1 {
                let u = ((px as f32 + 0.5) / sx - x) / w;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                if let Some(c) = view.sprite.sample(u, v) {
                    self.set(px, py, c);
                }
            }
        }
    }

    /// Rasterize a whole draw list for a world of the given size
    pub fn paint(&mut self, list: &DrawList, world: (f32, f32)) {
        let scale = (self.w as f32 / world.0, self.h as f32 / world.1);
        self.clear(SKY_TOP);
        for view in &list.scene {
            self.draw(view, scale);
        }
        if list.dim_scene {
            self.dim();
        }
        for view in &list.overlay {
            self.draw(view, scale);
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}
