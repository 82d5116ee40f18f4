//! Library crate for userlist-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Record model and store (`records`)
//! - Search, pagination, selection and edit-draft state (`search`,
//!   `pagination`, `selection`, `edit`)
//! - The HTTP record source (`source`)
//! - Application state, config files and the update loop (`app`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userlist-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod cli;
pub mod edit;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod records;
pub mod search;
pub mod selection;
pub mod source;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{Error, Result};
