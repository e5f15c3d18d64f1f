//! Libris application library
//!
//! The library inventory core (`library`) and the HTTP modules that expose
//! it (`modules`), wired together by `bootstrap`.

pub mod bootstrap;
pub mod library;
pub mod modules;

pub use library::Library;
