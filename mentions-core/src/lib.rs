//! Mentions Core - mention tracking for editable text
//!
//! This crate keeps named references (`@user`) embedded in a text buffer
//! consistent while the text is edited: it detects trigger characters,
//! finalizes searches into tracked mention ranges, shifts or drops those
//! ranges as edits land, and styles them through a host surface.

pub mod adjust;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod listener;
pub mod model;
pub mod shared;
pub mod text;
pub mod trigger;

pub use adjust::{adjust, Adjustment, Edit};
pub use config::MentionConfig;
pub use engine::{MentionEngine, SearchState};
pub use error::{MentionError, MentionResult, PreconditionViolation};
pub use host::{TextBuffer, TextHost};
pub use listener::{HostDelegate, HostQuery, MentionEvent, MentionListener};
pub use model::{Attribute, AttributeSet, AttributeValue, MentionRange, NewMention, TextRange};
pub use shared::{SharedEngine, WeakEngine};
pub use trigger::{CandidateSearch, TriggerDetector};
