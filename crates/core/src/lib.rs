//! Domain types and rules for the movie catalog.
//!
//! Everything here is free of I/O: the movie record, the create payload and
//! its normalization, the error taxonomy shared by the store and the HTTP
//! layer, and catalog filtering.

pub mod error;
pub mod filter;
pub mod movie;
pub mod types;
