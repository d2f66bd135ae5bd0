//! # Quill Core
//!
//! The domain layer of the Quill post service.
//! This crate contains the post model, the title normalization contract and
//! the ports that storage backends implement. It has zero infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
