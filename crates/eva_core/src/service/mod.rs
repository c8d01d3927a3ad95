//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the interactive front end decoupled from storage details.

pub mod entry_service;
