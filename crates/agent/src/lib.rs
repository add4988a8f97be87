//! Answer rendering for shopper questions
//!
//! The search core decides which products answer a question. This crate only
//! turns that decision into prose:
//! - `render::TemplateRenderer` formats the result deterministically
//! - `render::LlmRenderer` asks a language model for a friendlier phrasing and
//!   falls back to the template whenever the model fails
//!
//! The model never picks products or prices. It only rewords what the search
//! engine already returned.

pub mod llm;
pub mod render;

pub use llm::LlmClient;
pub use render::{format_rupiah, LlmRenderer, ResponseRenderer, TemplateRenderer};
