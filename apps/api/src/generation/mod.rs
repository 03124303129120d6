// Pitch generation: prompt building, the two Gemini calls, and the landing
// page fallback. All LLM calls go through llm_client; all parsing through
// extraction.

pub mod generator;
pub mod handlers;
pub mod landing;
pub mod prompts;
