// Funnel generation: form input → prompt → model call → validated document.
// All model calls go through llm_client; nothing here talks to the backend directly.

pub mod error;
#[cfg(test)]
pub mod fixtures;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod response;
pub mod schema;
