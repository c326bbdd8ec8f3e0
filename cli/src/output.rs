//! Output formatting for command results.
//!
//! Every command prints either human-readable text or, with `--json`,
//! pretty-printed JSON for scripting.

use docqa_assistant::{Answer, Flashcard, QuizQuestion};
use docqa_retrieval::{PoolStats, ScoredSegment};
use serde::Serialize;

/// Maximum characters to show in a segment snippet.
const SNIPPET_MAX_CHARS: usize = 240;

/// Result of a study tool, shaped by the tool.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StudyOutput {
    Text(String),
    List(Vec<String>),
    Quiz(Vec<QuizQuestion>),
    Flashcards(Vec<Flashcard>),
}

/// JSON output structure for search results.
#[derive(Serialize)]
struct JsonSearch<'a> {
    query: &'a str,
    results: &'a [ScoredSegment],
}

/// Serialize any result as pretty JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Search results as JSON, echoing the query.
pub fn format_search_json(query: &str, results: &[ScoredSegment]) -> String {
    format_json(&JsonSearch { query, results })
}

/// Ranked segments for the terminal.
pub fn format_search_human(query: &str, results: &[ScoredSegment]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\"");
    }

    let mut output = format!(
        "Found {} segment{} for \"{query}\":\n\n",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    );
    for (rank, hit) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} #{} (score: {:.3})\n   [jaccard: {:.3}, tfidf: {:.3}, chars {}..{}]\n   {}\n\n",
            rank + 1,
            hit.segment.source_document,
            hit.segment.index + 1,
            hit.score,
            hit.jaccard,
            hit.tfidf,
            hit.segment.start_offset,
            hit.segment.end_offset,
            truncate_text(&hit.segment.text, SNIPPET_MAX_CHARS)
        ));
    }
    output.trim_end().to_string()
}

/// Answer text followed by its sources.
pub fn format_answer_human(answer: &Answer) -> String {
    let mut output = answer.answer.trim().to_string();
    if answer.citations.is_empty() {
        return output;
    }

    output.push_str("\n\nSources:\n");
    for citation in &answer.citations {
        output.push_str(&format!(
            "  - {}, segment {} (score: {:.3})\n",
            citation.source_document,
            citation.index + 1,
            citation.score
        ));
    }
    output.trim_end().to_string()
}

/// Pool statistics table.
pub fn format_stats_human(stats: &PoolStats) -> String {
    let mut output = format!(
        "{} document{}, {} segments, {} characters\n",
        stats.total_documents,
        if stats.total_documents == 1 { "" } else { "s" },
        stats.total_segments,
        stats.total_characters
    );
    for doc in &stats.documents {
        output.push_str(&format!(
            "  {}: {} segments, {} characters\n",
            doc.name, doc.segments, doc.characters
        ));
    }
    output.trim_end().to_string()
}

/// Study tool output for the terminal.
pub fn format_study_human(output: &StudyOutput) -> String {
    match output {
        StudyOutput::Text(text) => text.trim().to_string(),
        StudyOutput::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"),
        StudyOutput::Quiz(questions) => questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let options: Vec<String> = q
                    .options
                    .iter()
                    .zip('A'..='Z')
                    .map(|(option, letter)| format!("   {letter}) {option}"))
                    .collect();
                format!(
                    "{}. {}\n{}\n   Answer: {}",
                    i + 1,
                    q.question,
                    options.join("\n"),
                    q.answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        StudyOutput::Flashcards(cards) => cards
            .iter()
            .enumerate()
            .map(|(i, card)| format!("{}. Q: {}\n   A: {}", i + 1, card.question, card.answer))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Truncates text to a maximum number of characters at a word boundary,
/// adding an ellipsis if needed.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{truncated}..."),
    }
}
