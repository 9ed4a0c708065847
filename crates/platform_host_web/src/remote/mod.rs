//! Remote table adapters.

pub mod rest;
