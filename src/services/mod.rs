//! Service layer modules.
//!
//! Contains the generative model client, prompt construction, response
//! normalization, and the estimation flow that ties them together.

pub mod estimator;
pub mod generator;
pub mod normalize;
pub mod prompt;

pub use generator::{GeminiClient, TextGenerator};
