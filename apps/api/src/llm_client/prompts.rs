// Shared prompt constants and prompt-building utilities.
// Each stage that needs LLM calls defines its own templates in skills/prompts.rs.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Closing line appended to every JSON-returning prompt.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return only valid JSON — no markdown code blocks, no triple backticks, and no text outside the JSON.";

/// Substitutes `{key}` placeholders in a template. Unknown placeholders are left as-is.
///
/// Single pass over the template: substituted values are never scanned again, so user text
/// containing `{json_only}` or similar stays literal.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
