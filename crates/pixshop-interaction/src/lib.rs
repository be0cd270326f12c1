//! Pixshop interaction: the Gemini REST client and panel prompt material.

pub mod gemini_image_client;
pub mod prompts;

pub use gemini_image_client::GeminiImageClient;
