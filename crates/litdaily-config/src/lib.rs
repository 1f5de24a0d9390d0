//! Configuration for litdaily
//!
//! Configuration is an explicit value built once at startup and handed to the
//! generation client and the content store. Nothing reads process-wide state
//! after [`Config::discover`] returns, except the credential lookup, which is
//! deferred until a generation actually needs it.

mod config;

pub use config::*;
pub use litdaily_utils::types::ConfigSource;
