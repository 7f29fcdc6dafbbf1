//! Prompt templates for each generation endpoint.
//!
//! Caller-supplied strings are interpolated as-is.

/// Prompt asking for ten stream titles.
pub fn title_prompt(game: &str, keywords: &str, voice: &str) -> String {
    format!(
        "Generate 10 catchy, click-worthy live stream titles for a {game} stream. \
         Use these keywords where they fit: {keywords}. \
         Write them in a {voice} voice. \
         Return one title per line with no numbering, bullets or quotes."
    )
}

/// Prompt asking for fifteen usernames.
pub fn name_prompt(keywords: &str, style: &str) -> String {
    format!(
        "Generate 15 unique streamer usernames inspired by: {keywords}. \
         Style: {style}. Avoid spaces and special characters other than underscores. \
         Return one username per line with no numbering, bullets or explanations."
    )
}

/// Prompt asking for five channel bios.
pub fn bio_prompt(vibe: &str, length: &str) -> String {
    format!(
        "Write 5 different streamer channel bios with a {vibe} vibe. \
         Each bio should be {length} in length and fit on a single line. \
         Return one bio per line with no numbering, bullets or quotes."
    )
}
