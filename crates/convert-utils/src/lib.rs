//! Shared helpers for the format plugins.

pub mod archive;
pub mod encoding;
pub mod html;
pub mod xml;
