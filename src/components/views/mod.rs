mod library;
mod play_screen;

pub use library::*;
pub use play_screen::*;
