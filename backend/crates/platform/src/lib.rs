//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - REST client for the hosted auth/database backend
//! - Durable key-value storage (the local-storage equivalent)
//! - Password policy (NIST SP 800-63B length/character rules)
//! - Link validation for submitted URLs
//! - Environment configuration helpers

pub mod config;
pub mod link;
pub mod password;
pub mod rest;
pub mod storage;
