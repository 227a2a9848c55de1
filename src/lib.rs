pub mod cli;
pub mod commit;
pub mod error;
pub mod export;
pub mod insight;
pub mod log;
pub mod model;
pub mod repo;
pub mod seed;
pub mod stats;
pub mod store;
pub mod tui;
pub mod util;
