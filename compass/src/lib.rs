//! Compass search client library
//!
//! Headless controller for a search results page: per-tab cursor pagination,
//! infinite image scroll, debounced autocomplete and a knowledge panel.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use compass::{config::Config, backends::Services, navigation::History};
//! use compass::controller::SearchController;
//! use compass::runtime::SearchRuntime;
//!
//! let config = Config::load()?;
//! let services = Services::from_config(&config)?;
//! let mut runtime = SearchRuntime::new(
//!     SearchController::new((&config.ui).into()),
//!     services,
//!     Arc::new(History::new()),
//!     config.ui.debounce(),
//! );
//! runtime.act(|c| c.mount("/search?q=Paris"));
//! runtime.settle().await;
//! println!("{}", compass::render::render_plain(&runtime.view()));
//! ```
//!
//! # Configuration
//! Set `COMPASS_API` env var or configure in `~/.compass/config.toml`

pub mod backends;
pub mod cli;
pub mod config;
pub mod controller;
pub mod navigation;
pub mod render;
pub mod runtime;
pub mod types;

// Re-export main types
pub use controller::{Command, Event, SearchController};
pub use runtime::SearchRuntime;
pub use types::{ResultItem, ResultType, SearchPage, Suggestion, Summary, Tab};
