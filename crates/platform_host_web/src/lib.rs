//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer:
//! - [`WebLocalStore`] implements [`platform_host::LocalStore`] over `window.localStorage`;
//! - [`RestRemoteTables`] implements [`platform_host::RemoteTables`] against a PostgREST
//!   endpoint through the `fetch` bridge.
//!
//! On non-`wasm32` targets both adapters compile to inert shims so the workspace builds and tests
//! natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod remote;
pub mod storage;

pub use remote::rest::RestRemoteTables;
pub use storage::local_storage::WebLocalStore;
