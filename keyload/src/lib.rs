//! The keyload fixture generation tool.
//!
//! This library supports the keyload binary found elsewhere in this project.
//! It plans a mixed stream of advertise, findkey and sync requests against a
//! key-distribution service and emits them as a request-list file plus JSON
//! body files for an external load-replay tool. Nothing here speaks HTTP.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(missing_debug_implementations)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod emitter;
pub mod plan;
