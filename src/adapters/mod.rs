//! Concrete feed sources.
//!
//! Each module exposes a `can_parse(url)` predicate and an adapter type
//! implementing [`crate::feed::Adapter`]. New sources are wired into
//! [`crate::feed::registry`].

pub mod earthporn;
mod html;
pub mod nablog;

pub use earthporn::EarthPornAdapter;
pub use html::first_image;
pub use nablog::NaBlogAdapter;
