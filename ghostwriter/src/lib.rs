//! The ghostwriter server crate: a small webserver which turns editor
//! context into fill-in-the-middle completions against a locally running
//! model endpoint.

pub mod application;
pub mod completion;
pub mod webserver;
