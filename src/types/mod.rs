// Public modules
pub mod content;
pub mod error_body;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;

// Re-exports
pub use content::{Content, Part};
pub use error_body::{ErrorBody, ErrorDetail};
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::{Candidate, GenerateContentResponse};
pub use generation_config::GenerationConfig;
