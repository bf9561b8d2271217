pub mod astutil;
pub mod cache;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod lang;
pub mod normalize;
pub mod parser_pool;
pub mod postprocess;
pub mod querymerge;
pub mod utils;
pub mod walker;

pub use config::{Config, ConfigManager};
pub use error::{CoreError, FallbackReason, Result};
pub use lang::Language;
