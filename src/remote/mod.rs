//! Remote backend access: record inserts, existence lookups, and object
//! storage uploads against a Supabase-style API.

mod client;
mod types;

pub use client::{RemoteStore, SupabaseClient};
pub use types::{PassImageLink, RemotePass};
