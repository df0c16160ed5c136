//! Interactive terminal view (`tickit ui`).

pub mod app;
pub mod editor;
pub mod view;

pub use app::run;
