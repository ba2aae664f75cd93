//! Pure social rules for Hearthside.
//!
//! This crate contains the courtship and narration rules that are independent
//! of any engine, network, or runtime. Functions take plain data and return
//! results, making them unit-testable and portable to any embedding.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`dating`] | Date stages, stage pacing, and activity fulfillment rules |
//! | [`generation`] | Wire types for the text-generation backend |
//! | [`opinion`] | Directional opinion thresholds and adjustments |
//! | [`pacing`] | Speech-bubble display duration from text length |
//! | [`prompt`] | Prompt templates for backend requests |
//! | [`reply`] | Cleanup and line-splitting of raw backend output |

pub mod dating;
pub mod generation;
pub mod opinion;
pub mod pacing;
pub mod prompt;
pub mod reply;
