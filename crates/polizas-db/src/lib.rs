//! Polizas DB - Database repository layer for PostgreSQL
//!
//! This crate provides the repository pattern for policy persistence.
//!
//! # Overview
//!
//! The main components are:
//! - [`PolicyRepository`] - Policy persistence and aggregate queries
//! - [`SCHEMA`] - Idempotent statements creating the `polizas` table

mod repository;

pub use repository::{PolicyRepository, SCHEMA};
