// Globo Note library - folder registry, tree provider and file operations

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod config_io;
pub mod host;
pub mod model;
pub mod primitives;
pub mod services;
pub mod view;
