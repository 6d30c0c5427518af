//! Coaching service for volunteers writing climate letters to the editor.
//!
//! The pure pieces ([`coach::rubric::score_draft`], [`coach::dedup::dedupe_bullets`],
//! [`coach::tighten::tighten_to_word_limit`]) need no network and are usable on
//! their own; everything under [`generation`] talks to an injected LLM.

pub mod article;
pub mod coach;
pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
