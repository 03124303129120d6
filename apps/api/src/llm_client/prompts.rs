// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Use double quotes for every key and string value. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for calls that return a full HTML document.
pub const HTML_ONLY_SYSTEM: &str = "You MUST respond with a single complete HTML document only, \
    starting with <!DOCTYPE html>. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include explanations before or after the document.";
