//! CLI command handlers module
//!
//! - lookup: search, near, insights
//! - browse: states, districts, featured pincodes
//! - support: support chat
//! - serve: API server
//! - info: configuration display

pub mod browse;
pub mod info;
pub mod lookup;
pub mod serve;
pub mod support;

pub use browse::*;
pub use info::*;
pub use lookup::*;
pub use serve::*;
pub use support::*;
