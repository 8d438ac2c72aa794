//! LLM provider layer for unillm.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`]: capability trait every adapter implements
//! - [`adapters`]: one adapter per backend (wire format, auth, error mapping)
//! - [`token`]: managed-auth token managers with a single-flight cache
//! - [`multimodal`]: the shared `Base64 Image Data:` prompt parser
//! - [`client::LlmClient`]: the dispatcher: option resolution + timeout
//! - [`factory`]: provider probing and the lazily cached client

pub mod adapters;
pub mod client;
pub mod factory;
pub mod multimodal;
pub mod token;
pub mod traits;

// Re-export main types for convenience
pub use client::{ClientInfo, LlmClient};
pub use factory::{client_for, create_client, global, ClientStatus, LazyClient};
pub use multimodal::{parse_prompt, ImageData, ImageFormat, ParsedPrompt};
pub use token::{Clock, OAuthTokenManager, StaticTokenManager, SystemClock, TokenManager};
pub use traits::{GenerateRequest, LlmProvider};
