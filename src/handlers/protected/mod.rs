// handlers/protected/mod.rs - Protected handlers (identity required)
//
// Route Prefix: /api/*
// Handlers under /api/projects/:project_id, /api/models/:model_id and
// /api/entities/:entity_id run behind the access gate and receive its
// `Permit` as a request extension; the rest only need an `AuthUser`.
pub mod access;
pub mod attributes;
pub mod entities;
pub mod export;
pub mod members;
pub mod models;
pub mod projects;
pub mod referentials;
pub mod utils;
pub mod whoami;

pub use whoami::whoami;
