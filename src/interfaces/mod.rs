//! Interface adapters: HTTP servers and clients for the RPC seams, plus CSV
//! ingestion for administrative card seeding.

pub mod client;
pub mod csv;
pub mod http;
