//! The components module contains all shared components for our app.

mod app;
mod app_view;
mod comments;
mod icons;
mod navigation;
mod player;
pub mod views;

pub use app::*;
pub use app_view::*;
pub use comments::*;
pub use icons::*;
pub use navigation::*;
pub use player::*;
// Views are accessed via views::ViewName
