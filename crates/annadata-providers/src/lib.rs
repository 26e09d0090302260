//! # annadata-providers
//!
//! Hosted generative model providers for Annadata Connect.

pub mod gemini;
pub mod openai;
