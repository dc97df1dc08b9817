// DOM wiring and paint tuning for the web frontend.
//
// Kept free of `web-sys` types so host tests can `include!` it.
// Element ids expected in index.html
pub const CANVAS_ID: &str = "globe-canvas";
pub const TOGGLE_ID: &str = "theme-toggle";
pub const TOGGLE_LABEL_ID: &str = "theme-label";
pub const GIFT_ID_PREFIX: &str = "gift-";

// Classes toggled on the document
pub const BODY_LIT_CLASS: &str = "golden-mode";
pub const TOGGLE_LIT_CLASS: &str = "is-on";
pub const GIFT_OPEN_CLASS: &str = "is-open";

// Blur radii (scene units, scaled by the viewport)
pub const GLOW_BLUR_PX: f32 = 20.0;
pub const STAR_HALO_BLUR_PX: f32 = 8.0;
pub const STAR_FLARE_BLUR_PX: f32 = 4.0;

// Ornament drawing (scene units before perspective scale)
pub const CRYSTAL_HALF_WIDTH: f32 = 8.0;
pub const CRYSTAL_HALF_HEIGHT: f32 = 10.0;
pub const THREAD_TOP: f32 = -20.0;
pub const THREAD_BOTTOM: f32 = -8.0;

// Snow
pub const SNOW_COLOR: &str = "#ffffff";
pub const SNOW_FADE_IN_SEC: f32 = 1.0;

#[inline]
pub fn gift_element_id(gift_id: &str) -> String {
    format!("{}{}", GIFT_ID_PREFIX, gift_id)
}
