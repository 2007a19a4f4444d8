//! Instruction template and request body for the text-transform call.
//!
//! The captured clipboard text is appended verbatim after a fixed block of
//! style rules.  [`PROMPT_VERSION`] is bumped whenever the rules change so
//! log lines can be matched to the template that produced them.

use serde::Serialize;

/// Version tag of [`INSTRUCTIONS`].
pub const PROMPT_VERSION: &str = "2024-11-translate-en.3";

/// Translation and style rules placed before the user's text.
const INSTRUCTIONS: &str = "\
Please use this chat and all text below ONLY for interpretation the text to english language. \
Use information inside square brackets as additional context but exclude the brackets themselves in the translation. \
Don't put the answer inside the quotemarks. Don't provide additional information. \
Translate using the same tone that the user is using. If they write in an informal style, use an informal style too. \
DON'T USE an unnecessary period at the end. \
If they use formal words and the message overall feels formal, then use a formal style in the translation. \
When using Sanskrit terms like Виджаянти, make sure to use the correct transliteration, for example, \
Vijayantii, Мира - Miira, Даянидхи - Dayanidhi, Дидиджи - Didijii, Дададжи - Dadajii. \
Don't extend the AE abbreviation and another to full one - After Effects. \
Please use human writing style, e.g. USE \"'\" sign instead of \"\u{2019}\", e.g. \"we'll\" instead of \"we\u{2019}ll\" \
also use - instead of \u{2014}, etc.
Refrain from excessive hedging with phrases like \"some may argue,\" \"it could be said,\" \"perhaps,\" \"maybe,\" \
\"it seems,\" \"likely,\" or \"tends to\", and minimize repetitive vocabulary, clich\u{e9}s, common buzzwords, \
or overly formal verbs where simpler alternatives are natural. \
Vary sentence structure and length to avoid a monotonous rhythm, consciously mixing shorter sentences with longer, \
more complex ones, as AI often exhibits uniformity in sentence length. \
Use diverse and natural transitional phrases, avoiding over-reliance on common connectors like \"Moreover,\" \
\"Furthermore,\" or \"Thus,\" and do not use excessive signposting such as stating \"In conclusion\" or \"To sum up\" \
explicitly, especially in shorter texts. \
Do not aim for perfect grammar or spelling to the extent that it sounds unnatural; incorporating minor, \
context-appropriate variations like contractions or correctly used common idioms can enhance authenticity, \
as AI often produces grammatically flawless text that can feel too perfect. \
Do not overuse adverbs, particularly those ending in \"-ly\". Explicitly, you must never use em dashes (\u{2014}). \
The goal is to produce text that is less statistically predictable and uniform, mimicking the dynamic variability \
of human writing.

IMPORTANT STYLE RULE: You must never use em dashes (\u{2014}) under any circumstance. They are strictly forbidden. \
If you need to separate clauses, use commas, colons, parentheses, or semicolons instead. \
All em dashes must be removed and replaced before returning the final output. \
2. Before completing your output, do a final scan for em dashes. \
If any are detected, rewrite those sentences immediately using approved punctuation. \
3. If any em dashes are present in the final output, discard and rewrite that section before showing it to the user.

Please translate below:
";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// The full prompt: instructions followed by `input`, unmodified.
pub fn build_prompt(input: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + input.len());
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(input);
    prompt
}

/// A single-turn user request carrying [`build_prompt`]`(input)`.
pub fn build_request(input: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: build_prompt(input),
            }],
        }],
    }
}
