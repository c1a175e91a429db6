// Code panel library - file tree and code viewer for generated artifacts

rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod input;
pub mod model;
pub mod services;
pub mod view;

#[cfg(feature = "runtime")]
pub mod app;
#[cfg(feature = "runtime")]
pub mod config_io;
#[cfg(feature = "runtime")]
pub mod primitives;
#[cfg(feature = "runtime")]
pub mod ui;
