//! # Core Types
//!
//! The shared vocabulary of the school registry: the persisted record shapes
//! and the validation schema that both the submitting client and the server
//! run against a candidate record.
//!
//! This crate has no I/O. Everything in `validation` is pure and deterministic.

pub mod enums;
pub mod error;
pub mod school;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use enums::Field;
pub use error::FieldErrors;
pub use school::{ImageFile, NewSchool, School};
pub use validation::{
    ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES, SchoolForm, describe_limit, is_allowed_image_type, is_valid_contact,
    is_valid_email, is_within_size, validate_school,
};
