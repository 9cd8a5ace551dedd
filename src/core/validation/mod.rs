//! Input validation
//!
//! Checks run on caller input before any remote call is issued. Each check
//! returns the first [`ValidationError`](crate::core::error::ValidationError)
//! it finds, so the order in which a service calls them is the order in
//! which problems are reported.

pub mod validators;

pub use validators::{
    attachment, backend_id, content_type_in, max_size, positive_limit, required, required_text,
    sort_field,
};
