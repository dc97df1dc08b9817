pub mod animation;
pub mod audio;
pub mod constants;
pub mod interaction;
pub mod melody;
pub mod projection;
pub mod render;
pub mod scene;
pub mod snow;
pub mod task;
pub mod theme;
pub mod viewport;

pub use animation::*;
pub use audio::*;
pub use interaction::*;
pub use melody::*;
pub use scene::*;
pub use task::*;
pub use theme::Theme;
