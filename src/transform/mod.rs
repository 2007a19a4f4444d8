//! Remote text-transform module.
//!
//! This module provides:
//! * [`TextTransformer`]: async trait implemented by transform backends.
//! * [`GeminiClient`]: Gemini `generateContent` backend.
//! * [`ApiCredential`]: the API key, read once from the environment.
//! * [`parse_response`]: strict response-shape parser.
//! * [`TransformError`]: failure kinds of a transform call.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ai_text_agent::config::TransformConfig;
//! use ai_text_agent::transform::{GeminiClient, TextTransformer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = GeminiClient::from_config(&TransformConfig::default());
//!     match client.transform("Привет").await {
//!         Ok(text) => println!("{text}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod response;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiCredential, GeminiClient, TextTransformer, TransformError};
pub use prompt::{build_prompt, build_request, PROMPT_VERSION};
pub use response::parse_response;
