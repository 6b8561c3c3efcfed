//! Core domain logic for the lightbox photo library.
//!
//! This crate owns the filesystem side of the media lifecycle: handing
//! out date-bucketed destinations for uploads, resolving stored URLs
//! back to disk paths, and reclaiming files (plus the directories they
//! emptied) when their records go away. It knows nothing about HTTP or
//! whatever database the records live in.

pub mod content_type;
pub mod naming;
pub mod storage;
pub mod types;
