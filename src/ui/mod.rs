//! UI-facing view model.
//!
//! Rendering itself belongs to the host application. This module provides the
//! piece every list UI needs on top of a session: a mirrored list driven by
//! change events, the near-end scroll trigger, and the transient error flag.
//!
//! ```text
//! ChangeStream → ListModel::apply → ListUpdate → widget
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: The [`ListModel`] and the [`ListUpdate`] instructions

pub mod viewmodel;

pub use viewmodel::{ListModel, ListUpdate, DEFAULT_LOAD_TRIGGER_THRESHOLD};
