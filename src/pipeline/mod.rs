//! Pipeline stages for turning a PDF into comparison markup.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the HTTP and CLI front ends share them unchanged.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ assemble
//! (upload/sample/path/URL)  (base64)  (six HTML fragments)
//! ```
//!
//! 1. [`input`]    — stage an upload in a unique transient file, fall back
//!    to the sample, or download a URL
//! 2. [`encode`]   — read the bytes and wrap them as a base64 data URI
//! 3. [`assemble`] — interpolate the payload into the six fragment
//!    templates, or produce the not-found / error paragraph

pub mod assemble;
pub mod encode;
pub mod input;
