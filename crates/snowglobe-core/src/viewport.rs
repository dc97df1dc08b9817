//! Mapping between tree-local coordinates and canvas pixels.
//!
//! The scene is laid out in a logical view box `x ∈ [-300, 300]`,
//! `y ∈ [0, 700]`, with the tree apex translated down by `TREE_OFFSET_Y`.
//! The box is fitted into the canvas preserving aspect ratio and centered.

pub const VIEW_MIN_X: f32 = -300.0;
pub const VIEW_WIDTH: f32 = 600.0;
pub const VIEW_HEIGHT: f32 = 700.0;
pub const TREE_OFFSET_Y: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    pub fn fit(canvas_width: f32, canvas_height: f32) -> Self {
        let w = canvas_width.max(1.0);
        let h = canvas_height.max(1.0);
        let scale = (w / VIEW_WIDTH).min(h / VIEW_HEIGHT);
        let offset_x = (w - VIEW_WIDTH * scale) * 0.5 - VIEW_MIN_X * scale;
        let offset_y = (h - VIEW_HEIGHT * scale) * 0.5 + TREE_OFFSET_Y * scale;
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    #[inline]
    pub fn to_canvas(&self, tree_x: f32, tree_y: f32) -> [f32; 2] {
        [
            self.offset_x + tree_x * self.scale,
            self.offset_y + tree_y * self.scale,
        ]
    }

    #[inline]
    pub fn to_tree(&self, px: f32, py: f32) -> [f32; 2] {
        if self.scale <= 0.0 {
            return [f32::NAN, f32::NAN];
        }
        [
            (px - self.offset_x) / self.scale,
            (py - self.offset_y) / self.scale,
        ]
    }

    /// Canvas rectangle covered by the logical view box: `[x, y, w, h]`.
    pub fn view_rect(&self) -> [f32; 4] {
        let [x, y] = self.to_canvas(VIEW_MIN_X, -TREE_OFFSET_Y);
        [x, y, VIEW_WIDTH * self.scale, VIEW_HEIGHT * self.scale]
    }
}
