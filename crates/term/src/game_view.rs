//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{format_u32, CellStyle, FrameBuffer, Rgb};
use crate::toast::Toast;
use crate::types::GRID_SIZE;

/// Blank columns/rows between tiles and around the board edge.
const GAP_X: u16 = 1;
const GAP_Y: u16 = 1;

const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(120, 110, 100);
const EMPTY_BG: Rgb = Rgb::new(90, 84, 78);
const DARK_TEXT: Rgb = Rgb::new(119, 110, 101);
const LIGHT_TEXT: Rgb = Rgb::new(249, 246, 242);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Adapter status shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatusView {
    pub client_count: u16,
    pub controller_id: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen rectangle occupied by the framed board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub x: u16,
    pub y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
}

/// A lightweight terminal renderer for the 2048 board.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 7x3 fits "2048" with padding and keeps tiles roughly square.
        Self {
            cell_w: 7,
            cell_h: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Where the framed board lands inside `viewport`.
    pub fn layout(&self, viewport: Viewport) -> BoardLayout {
        let n = GRID_SIZE as u16;
        let board_w = n * self.cell_w + (n + 1) * GAP_X;
        let board_h = n * self.cell_h + (n + 1) * GAP_Y;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;

        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        BoardLayout {
            x,
            y,
            frame_w,
            frame_h,
        }
    }

    /// Top-left screen position of the tile at `(row, col)`.
    pub fn tile_origin(&self, layout: &BoardLayout, row: usize, col: usize) -> (u16, u16) {
        let px = layout.x + 1 + GAP_X + (col as u16) * (self.cell_w + GAP_X);
        let py = layout.y + 1 + GAP_Y + (row as u16) * (self.cell_h + GAP_Y);
        (px, py)
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with(snap, None, None, viewport, fb);
    }

    pub fn render_into_with(
        &self,
        snap: &GameSnapshot,
        toast: Option<&Toast>,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(viewport);
        let board = CellStyle::new(BOARD_BG, BOARD_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        fb.fill_rect(
            layout.x + 1,
            layout.y + 1,
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            board,
        );
        self.draw_border(fb, &layout, border);

        for (row, values) in snap.cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                self.draw_tile(fb, &layout, row, col, value);
            }
        }

        self.draw_side_panel(fb, snap, adapter, viewport, &layout);

        if snap.game_over {
            self.draw_overlay_text(fb, &layout, "GAME OVER");
        }
        if let Some(toast) = toast {
            self.draw_toast(fb, &layout, toast);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &BoardLayout, style: CellStyle) {
        let (x, y, w, h) = (layout.x, layout.y, layout.frame_w, layout.frame_h);
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '╭', style);
        fb.put_char(x + w - 1, y, '╮', style);
        fb.put_char(x, y + h - 1, '╰', style);
        fb.put_char(x + w - 1, y + h - 1, '╯', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        row: usize,
        col: usize,
        value: u32,
    ) {
        let (px, py) = self.tile_origin(layout, row, col);
        let style = tile_style(value);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        if value == 0 {
            fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, '·', style.dim());
            return;
        }

        let mut digits = [0u8; 10];
        let len = format_u32(value, &mut digits);
        if let Ok(text) = std::str::from_utf8(&digits[..len]) {
            fb.put_str_centered(px, py + self.cell_h / 2, self.cell_w, text, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        layout: &BoardLayout,
    ) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let dim = value.dim();

        let mut y = layout.y;
        for (title, number) in [
            ("SCORE", snap.score),
            ("BEST TILE", snap.max_tile),
            ("MOVES", snap.move_count),
        ] {
            fb.put_str(panel_x, y, title, label);
            y = y.saturating_add(1);
            fb.put_u32(panel_x, y, number, value);
            y = y.saturating_add(2);
        }

        if snap.won {
            fb.put_str(panel_x, y, "2048 REACHED", tile_style(2048).bold());
            y = y.saturating_add(2);
        }

        fb.put_str(panel_x, y, "AI", label);
        y = y.saturating_add(1);
        match adapter {
            Some(st) => {
                fb.put_str(panel_x, y, "ON", value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "C", value);
                fb.put_u32(panel_x + 2, y, st.client_count as u32, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "CTRL", value);
                match st.controller_id {
                    Some(id) => {
                        fb.put_u32(panel_x + 5, y, id as u32, value);
                    }
                    None => fb.put_str(panel_x + 5, y, "-", value),
                }
            }
            None => fb.put_str(panel_x, y, "OFF", value),
        }

        let help_y = layout.y.saturating_add(layout.frame_h).saturating_sub(2);
        fb.put_str(panel_x, help_y, "arrows/hjkl/wasd", dim);
        fb.put_str(panel_x, help_y.saturating_add(1), "r restart  q quit", dim);
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &BoardLayout, text: &str) {
        let mid_y = layout.y.saturating_add(layout.frame_h / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let w = text.chars().count() as u16 + 2;
        let x = layout.x.saturating_add(layout.frame_w.saturating_sub(w) / 2);
        fb.fill_rect(x, mid_y, w, 1, ' ', style);
        fb.put_str(x + 1, mid_y, text, style);
    }

    fn draw_toast(&self, fb: &mut FrameBuffer, layout: &BoardLayout, toast: &Toast) {
        // Below the frame, or on its top edge when the terminal is too short.
        let below = layout.y.saturating_add(layout.frame_h);
        let y = if below < fb.height() { below } else { layout.y };
        let style = CellStyle::new(SCREEN_BG, Rgb::new(237, 194, 46)).bold();
        let w = toast.text().chars().count() as u16 + 4;
        let x = layout.x.saturating_add(layout.frame_w.saturating_sub(w) / 2);
        fb.fill_rect(x, y, w, 1, ' ', style);
        fb.put_str(x + 2, y, toast.text(), style);
    }
}

/// Color theme keyed on tile value. 0 is the empty slot.
pub fn tile_style(value: u32) -> CellStyle {
    let (bg, fg) = match value {
        0 => (EMPTY_BG, Rgb::new(140, 130, 120)),
        2 => (Rgb::new(238, 228, 218), DARK_TEXT),
        4 => (Rgb::new(237, 224, 200), DARK_TEXT),
        8 => (Rgb::new(242, 177, 121), LIGHT_TEXT),
        16 => (Rgb::new(245, 149, 99), LIGHT_TEXT),
        32 => (Rgb::new(246, 124, 95), LIGHT_TEXT),
        64 => (Rgb::new(246, 94, 59), LIGHT_TEXT),
        128 => (Rgb::new(237, 207, 114), LIGHT_TEXT),
        256 => (Rgb::new(237, 204, 97), LIGHT_TEXT),
        512 => (Rgb::new(237, 200, 80), LIGHT_TEXT),
        1024 => (Rgb::new(237, 197, 63), LIGHT_TEXT),
        2048 => (Rgb::new(237, 194, 46), LIGHT_TEXT),
        _ => (Rgb::new(60, 58, 50), LIGHT_TEXT),
    };
    let style = CellStyle::new(fg, bg);
    if value >= 8 {
        style.bold()
    } else {
        style
    }
}
