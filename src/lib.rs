//! Quill: a small blog server with public post pages and an admin-only editor.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
