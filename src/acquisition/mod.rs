//! HTTP-based acquisition layer.
//!
//! Fetches the registrar's front-end bundle and feeds it to the extraction
//! engine. The extraction engine itself never performs I/O; everything
//! network-shaped lives here.

pub mod bundle;
pub mod http_client;
