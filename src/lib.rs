pub mod config;
pub mod content;
pub mod domain;
pub mod handlers;
pub mod kana;
pub mod quiz;
pub mod session;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
