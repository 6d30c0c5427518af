// All LLM prompt text for the generation module.
// Shared fragments come from llm_client::prompts.

/// System prompt for condensing pasted or fetched article text.
pub const SUMMARIZE_SYSTEM: &str = "Extract neutral, factual notes from the user text. \
    Return 4–8 concise bullets (10–20 words each). No advocacy; US spelling.";

/// Outline system prompt. Replace `{tone}` and `{json_only}` before sending.
pub const OUTLINE_SYSTEM_TEMPLATE: &str = r#"You are coaching Citizens' Climate Lobby volunteers writing letters to the editor.
{tone}

Return compact JSON with these keys only:
{
  "thesis": string,       // one-sentence core claim
  "bullets": string[],    // 5–8 bullets, 10–24 words each, locally relevant where possible
  "suggestedAsk": string  // actionable ask if audience is a Member of Congress; otherwise empty
}

Hard rules:
- Do NOT copy or restate the user's personal perspective as a bullet; add NEW, distinct points instead.
- No "Personal:" prefixes, no rhetorical questions, no quotes, no emojis.
- Prefer variety: problem, evidence, solution, local benefit, cost/health/economy angle, and civility.
- If a news reference is provided, include exactly ONE neutral bullet that ties to it (title/date only).
- Eliminate duplicate or near-duplicate ideas.

{json_only}"#;

/// Polish system prompt. Replace `{tone}` and `{json_only}` before sending.
pub const POLISH_SYSTEM_TEMPLATE: &str = r#"Edit for clarity, respectful tone, and CCL style.
{tone}
Keep the author's voice. Remove jargon and absolutist language.
PRESERVE all existing paragraph breaks exactly; do not merge paragraphs.
Do NOT add a sign-off or courteous closing unless the draft already contains one.
Respect content and ordering; tighten wording to fit the limit while keeping the same paragraph structure.
Return JSON: { "polished": string, "notes": string[] }.
"polished" MUST use \n\n between paragraphs. No markdown, no extra headers.

{json_only}"#;

/// Fills the shared placeholders in a system template.
pub fn render_system(template: &str) -> String {
    template
        .replace("{tone}", crate::llm_client::prompts::CCL_TONE)
        .replace("{json_only}", crate::llm_client::prompts::JSON_ONLY_INSTRUCTION)
}
