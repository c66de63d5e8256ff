//! Kernel
//!
//! Vocabulary every other crate agrees on: typed ids for users, challenges
//! and submissions, and the [`AppError`](error::app_error::AppError) that
//! crate errors are lifted into at the HTTP edge.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
