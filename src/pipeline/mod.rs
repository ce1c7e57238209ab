pub mod config;
pub mod context;
pub mod enrich;
pub mod error;
pub mod observer;

pub use config::*;
pub use context::*;
pub use enrich::*;
pub use error::*;
pub use observer::*;
