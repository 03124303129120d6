// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for the pitch call. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const PITCH_SYSTEM: &str = "You are an advanced startup pitch generator. \
    From a single natural-language idea you produce a complete, concrete startup pitch.";

/// Pitch prompt template.
/// Replace: {idea}, {tone}, {language}
pub const PITCH_PROMPT_TEMPLATE: &str = r##"The user describes a startup idea below. From it, intelligently derive a complete startup pitch.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Short brandable startup name",
  "tagline": "One-line hook",
  "elevator_pitch": "Two or three sentences",
  "problem": "The problem being solved",
  "solution": "How the product solves it",
  "unique_value_proposition": "Why this beats the alternatives",
  "target_audience": {
    "description": "Who the product is for",
    "segments": ["Segment one", "Segment two"]
  },
  "landing_copy": {
    "headline": "Landing page headline",
    "subheadline": "Supporting line",
    "call_to_action": "Button text"
  },
  "industry": "e.g. FinTech, HealthTech, EdTech",
  "colors": {
    "primary": "#3B82F6",
    "secondary": "#1E293B",
    "accent": "#F59E0B"
  },
  "logo_ideas": ["Logo concept one", "Logo concept two"]
}

RULES:
1. Every color MUST be a hex color such as "#3B82F6"
2. Write every text value in this language: {language}
3. Use this tone: {tone}
4. Return ONLY the JSON object, no explanation or extra text

User Input: """{idea}""""##;

/// Persona for the landing page call. Combined with `HTML_ONLY_SYSTEM` at call time.
pub const LANDING_SYSTEM: &str = "You are a senior front-end developer who builds polished, \
    responsive marketing landing pages.";

/// Landing page prompt template.
/// Replace: {name}, {tagline}, {problem}, {solution}, {uvp}, {colors}, {audience}
pub const LANDING_PROMPT_TEMPLATE: &str = r#"Build a complete landing page for this startup.

Startup name: {name}
Tagline: {tagline}
Problem: {problem}
Solution: {solution}
Unique value proposition: {uvp}
Brand colors: {colors}
Target audience: {audience}

REQUIREMENTS:
1. A single self-contained HTML document, all CSS inline in a <style> tag
2. No external scripts, frameworks, fonts, or build step
3. Sections: hero with call to action, problem, solution, benefits, footer
4. Use the brand colors above
5. Responsive layout that works on mobile"#;

/// Tone used when the caller does not pick one.
pub const DEFAULT_TONE: &str = "professional but friendly";

/// Language used when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "English";
