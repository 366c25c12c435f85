//! Client for talking to the text-generation endpoint which backs the
//! completion service. The interesting bits live in `clients::types` (the
//! request/response/error types and the `LLMClient` trait) and in
//! `clients::ollama` (the one registered implementation, speaking the
//! `/api/generate` wire format).

pub mod clients;
pub mod provider;
