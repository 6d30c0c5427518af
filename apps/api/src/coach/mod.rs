// Local coaching: rubric scoring, word-budget tightening and outline bullet dedup.
// Pure functions only; nothing in here touches the network.

pub mod dedup;
pub mod handlers;
pub mod rubric;
pub mod tighten;
