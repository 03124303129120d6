//! Deterministic landing page used when the model's markup is unavailable.

use crate::extraction::normalize::is_hex_color;
use crate::models::pitch::PitchRecord;

const DEFAULT_PRIMARY: &str = "#3B82F6";
const DEFAULT_SECONDARY: &str = "#1E293B";
const DEFAULT_CTA: &str = "Get Started";

/// Template slots: {title} {primary} {secondary} {name} {tagline} {problem}
/// {solution} {uvp} {audience} {cta}. All values are HTML-escaped first.
const FALLBACK_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { font-family: system-ui, -apple-system, "Segoe UI", sans-serif; color: {secondary}; line-height: 1.6; }
  header { background: linear-gradient(135deg, {primary}, {secondary}); color: #fff; padding: 96px 24px; text-align: center; }
  header h1 { font-size: 3rem; margin-bottom: 12px; }
  header p { font-size: 1.25rem; opacity: 0.9; }
  .cta { display: inline-block; margin-top: 32px; padding: 14px 32px; border-radius: 999px; background: #fff; color: {primary}; font-weight: 600; text-decoration: none; }
  main { max-width: 960px; margin: 0 auto; padding: 64px 24px; display: grid; gap: 32px; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); }
  section { padding: 24px; border-radius: 16px; background: #f8fafc; border-top: 4px solid {primary}; }
  section h2 { font-size: 1.25rem; margin-bottom: 8px; }
  footer { text-align: center; padding: 32px 24px; font-size: 0.875rem; color: #64748b; }
</style>
</head>
<body>
<header>
  <h1>{name}</h1>
  <p>{tagline}</p>
  <a class="cta" href="#">{cta}</a>
</header>
<main>
  <section><h2>The Problem</h2><p>{problem}</p></section>
  <section><h2>Our Solution</h2><p>{solution}</p></section>
  <section><h2>Why Us</h2><p>{uvp}</p></section>
  <section><h2>Who It's For</h2><p>{audience}</p></section>
</main>
<footer>&copy; {name}</footer>
</body>
</html>
"##;

/// Renders the fallback page for `pitch`. Never empty.
pub fn fallback_landing_page(pitch: &PitchRecord) -> String {
    let color = |role: &str, default: &str| -> String {
        pitch
            .colors
            .as_ref()
            .and_then(|c| c.get(role))
            .filter(|c| is_hex_color(c))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    let cta = pitch
        .landing_copy
        .as_ref()
        .map(|c| c.call_to_action.as_str())
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_CTA);
    let audience = pitch
        .target_audience
        .as_ref()
        .map(|a| a.description.as_str())
        .unwrap_or_default();

    let primary = color("primary", DEFAULT_PRIMARY);
    let secondary = color("secondary", DEFAULT_SECONDARY);
    let name = escape_html(&pitch.name);
    let slots = [
        ("primary", primary),
        ("secondary", secondary),
        ("title", name.clone()),
        ("name", name),
        ("tagline", escape_html(&pitch.tagline)),
        ("problem", escape_html(&pitch.problem)),
        ("solution", escape_html(&pitch.solution)),
        (
            "uvp",
            escape_html(pitch.unique_value_proposition.as_deref().unwrap_or_default()),
        ),
        ("audience", escape_html(audience)),
        ("cta", escape_html(cta)),
    ];

    fill_slots(FALLBACK_TEMPLATE, &slots)
}

/// Single pass over `template`, so slot text inside a value is never expanded.
/// Braces that do not name a slot (the CSS) are copied through.
pub(crate) fn fill_slots(template: &str, slots: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after
            .find('}')
            .and_then(|close| slots.iter().find(|(key, _)| *key == &after[..close]));
        match slot {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len() + 1..];
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

/// True when `text` contains an HTML document rather than prose.
pub fn looks_like_html(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains("<html") || lower.contains("<body")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
