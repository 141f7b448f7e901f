//! Per-user directories.

pub mod xdg_root;
