//! Port traits: the seams between the domain and its data and config sources.

pub mod config_port;
pub mod deal_source;
