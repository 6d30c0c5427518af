// Letter generation: CCL policy briefs, LLM outline with bullet dedup,
// LLM polish with a word budget, and the local starter/assembly helpers.
// All model calls go through the injected `LlmClient`.

pub mod briefs;
pub mod drafts;
pub mod handlers;
pub mod outline;
pub mod polish;
pub mod prompts;
