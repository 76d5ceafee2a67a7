//! Request and response shapes for every resource family.
//!
//! `*Draft` types are request bodies for create and update (update is a full
//! replacement, so both share one shape). Record types are what the API
//! returns; identity and timestamps are always assigned by the store.

mod accounts;
mod fixtures;
mod reporting;
mod wagers;

pub use accounts::*;
pub use fixtures::*;
pub use reporting::*;
pub use wagers::*;

use serde::Deserialize;

/// Free-form JSON object column (`preferences`, `placement_data`)
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Filter for resources whose list endpoint takes no parameters
#[derive(Debug, Default, Deserialize)]
pub struct NoFilter {}
