//! # Chatterm Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! Directory creation and file reading helpers shared by the storage
//! initializer and the corpus loader.

/// Contains basic file I/O operations (e.g., `ensure_dir_exists`, `read_file_to_string`).
pub mod io;
