//! Prompt templates and context assembly.

use docqa_retrieval::{ScoredSegment, Segment};

/// Separator between context blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// System prompt for grounded question answering.
pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions \
based on provided documents.
You MUST ONLY use information from the provided document segments.
If the answer is not in the documents, say so clearly.
Always be accurate and provide clear, concise answers.
Cite your sources when making claims, using the [Source: ..., Segment N] labels.";

/// Context assembled for a prompt, with the segments it actually contains.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    pub text: String,

    /// How many of the offered blocks made it in (the last one possibly
    /// truncated).
    pub included: usize,
}

/// Label heading a retrieved segment in the answer prompt.
pub fn source_label(segment: &Segment) -> String {
    format!(
        "[Source: {}, Segment {}]",
        segment.source_document,
        segment.index + 1
    )
}

/// Labelled context blocks for retrieved segments.
pub fn retrieval_context(hits: &[ScoredSegment], max_chars: usize) -> PromptContext {
    join_bounded(
        hits.iter().map(|hit| {
            (
                format!("{}\n", source_label(&hit.segment)),
                hit.segment.text.as_str(),
            )
        }),
        max_chars,
    )
}

/// Plain segment text joined by blank lines, for the study tools.
pub fn document_context(segments: &[Segment], max_chars: usize) -> PromptContext {
    join_bounded(
        segments.iter().map(|s| (String::new(), s.text.as_str())),
        max_chars,
    )
}

/// Join `(header, body)` blocks with blank lines, stopping at `max_chars`
/// characters.
///
/// A block only counts when its whole header and at least one character of
/// its body fit. A body that crosses the bound is cut at a character
/// boundary and ends the context.
fn join_bounded<'a>(
    blocks: impl IntoIterator<Item = (String, &'a str)>,
    max_chars: usize,
) -> PromptContext {
    let mut text = String::new();
    let mut used = 0;
    let mut included = 0;

    for (header, body) in blocks {
        let separator = if included == 0 { 0 } else { BLOCK_SEPARATOR.len() };
        let remaining = max_chars.saturating_sub(used + separator);
        let header_chars = header.chars().count();
        if remaining <= header_chars {
            break;
        }
        if separator > 0 {
            text.push_str(BLOCK_SEPARATOR);
        }
        text.push_str(&header);

        let room = remaining - header_chars;
        let body_chars = body.chars().count();
        included += 1;
        if body_chars <= room {
            text.push_str(body);
            used += separator + header_chars + body_chars;
        } else {
            text.extend(body.chars().take(room));
            break;
        }
    }

    PromptContext { text, included }
}

/// User prompt for grounded question answering.
pub fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        "Answer this question based ONLY on the provided document segments: {question}

DOCUMENT SEGMENTS:
{context}

Provide a clear, concise answer."
    )
}

pub fn summary_prompt(context: &str) -> String {
    format!(
        "Provide a concise summary (2-3 paragraphs) of the following document excerpt:

{context}

Focus on the main ideas and key points."
    )
}

pub fn key_insights_prompt(context: &str) -> String {
    format!(
        "Extract 5 key insights from this document text.
Format as a JSON list of strings.

Document:
{context}

Return ONLY valid JSON in this format:
[\"insight 1\", \"insight 2\", \"insight 3\", \"insight 4\", \"insight 5\"]"
    )
}

pub fn mind_map_prompt(context: &str) -> String {
    format!(
        "Analyze this content and create a hierarchical mind map with ASCII tree format.

Requirements:
- Use ASCII tree structure with ├─, └─, and │ characters
- 3-4 levels of hierarchy
- 8-12 total nodes
- Be logical and clear

Content:
{context}

Output format example:
ROOT TOPIC
 ├─ Key Idea 1
 │   ├─ Subpoint A
 │   └─ Subpoint B
 └─ Conclusion

Output ONLY the mind map, no explanation."
    )
}

pub fn quiz_prompt(context: &str, count: usize) -> String {
    format!(
        "Generate {count} multiple choice quiz questions based on this document.
Return ONLY valid JSON, no other text.

Document:
{context}

JSON format (MUST be valid):
[
  {{\"question\": \"What is...\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"answer\": \"A\"}},
  {{\"question\": \"How does...\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"answer\": \"B\"}}
]"
    )
}

pub fn flashcards_prompt(context: &str, count: usize) -> String {
    format!(
        "Generate {count} flashcard pairs (Q&A) from this document.
Return ONLY valid JSON, no other text.

Document:
{context}

JSON format (MUST be valid):
[
  {{\"question\": \"What is...\", \"answer\": \"...\"}},
  {{\"question\": \"How does...\", \"answer\": \"...\"}}
]"
    )
}

pub fn table_of_contents_prompt(context: &str) -> String {
    format!(
        "Generate a table of contents with 5-8 main sections from this document.
Return as a JSON array of strings with section titles.

Document:
{context}

Return ONLY valid JSON in this format:
[\"Section 1\", \"Section 2\", \"Section 3\"]"
    )
}

pub fn audio_script_prompt(context: &str) -> String {
    format!(
        "Create a 2-3 minute audio script summarizing this document.
Make it conversational and engaging, as if explaining to a friend.
Include main points and key takeaways.

Document:
{context}

Write the script directly without any formatting."
    )
}
