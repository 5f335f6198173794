//! mca-core: Core project model and packaging logic for MCAddon Studio
//!
//! This crate focuses on a small, well-factored surface:
//! - Project/Manifest/ContentItem model for one authoring session
//! - Best-effort structure preview over user-edited behavior JSON
//! - Two-pack .mcaddon archive export (plus packing an on-disk tree)
//! - Gemini-backed generation client for behavior/resource JSON pairs
//!
pub mod export;
pub mod generate;
pub mod model;
pub mod preview;

pub use export::{
    PACK_EXTENSION, build_archive, export_to_file, pack_addon_dir, slugify, suggested_file_name,
};
pub use generate::{GeneratedContent, GenerationClient};
pub use model::{AddonType, ContentItem, Manifest, PackKind, Project, new_uuid};
pub use preview::{Preview, extract};
