//! Convert CSV / Excel files into each other, with light cleaning on the way.
//!
//! The [`data`] module holds the per-file pipeline; the desktop shell in
//! `main.rs` only drives it.

pub mod config;
pub mod data;
