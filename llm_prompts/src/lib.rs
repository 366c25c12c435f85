//! Prompt construction and response cleanup for fill-in-the-middle
//! completions. `fim` renders the model-family specific prompt around a
//! prefix/suffix pair, `answer_model` keeps the per-family generation knobs,
//! and `sanitize` turns the raw model output back into something an editor
//! can insert.

pub mod answer_model;
pub mod fim;
pub mod sanitize;
