//! Taskdag - A dependency-aware task tracker.
//!
//! This crate provides both a CLI application and a library for tracking
//! tasks and the dependency graph between them. Adding a dependency is
//! checked for cycles before it is accepted, and completing or blocking
//! a task re-derives the status of every task that depends on it.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod engine;
pub mod error;
pub mod id_generation;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

// Application context and output formatting
pub mod app;
pub mod output;
