// Shared prompt fragments used by more than one generation step.
// Step-specific prompts live in generation/prompts.rs.

/// Appended to system prompts that expect a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// House style every generated sentence must follow.
pub const CCL_TONE: &str = "Follow CCL tone: respectful, appreciative, constructive, and \
    solution-focused. Avoid doom, snark, and absolutist language.";
