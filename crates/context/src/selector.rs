//! Context selection — picks the slice of the knowledge store a question needs.
//!
//! Regions are scanned independently and emitted in a fixed order:
//!
//! 1. **Topic dossiers**: every matching topic, in store order, no cap.
//!    Single-word keys need the exact token in the query; multi-word keys
//!    need two shared tokens; a four-digit run in the key matches when it
//!    appears anywhere in the query.
//! 2. **Syllabus archive**: items whose topic occurs in the query, or any of
//!    whose longer topic words do. First `max_archive_items` across sections.
//! 3. **Marking schemes**: past questions containing a long query word.
//!    First `max_marking_examples`, each trimmed to `max_marking_points`.
//!
//! Selection never fails. An empty store or a query with nothing to match
//! simply yields an empty block.

use examiner_config::SelectionConfig;
use examiner_core::knowledge::{KnowledgeStore, MarkSchemeEntry, SyllabusItem, TopicRecord};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// Syllabus topic words must be longer than this to match on their own.
const MIN_TOPIC_WORD_CHARS: usize = 3;
/// Query words must be longer than this to match a past-paper question.
const MIN_QUESTION_WORD_CHARS: usize = 4;

/// Per-region caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    /// Q&A pairs emitted per matching topic.
    pub max_qa_pairs: usize,
    /// Characters of `raw_text` emitted per matching topic.
    pub raw_text_chars: usize,
    /// Syllabus items emitted across all three sections.
    pub max_archive_items: usize,
    /// Mark-scheme entries emitted across all past papers.
    pub max_marking_examples: usize,
    /// Marking points kept per mark-scheme entry.
    pub max_marking_points: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self::from(&SelectionConfig::default())
    }
}

impl From<&SelectionConfig> for SelectionLimits {
    fn from(config: &SelectionConfig) -> Self {
        Self {
            max_qa_pairs: config.max_qa_pairs,
            raw_text_chars: config.raw_text_chars,
            max_archive_items: config.max_archive_items,
            max_marking_examples: config.max_marking_examples,
            max_marking_points: config.max_marking_points,
        }
    }
}

/// Assemble the context block for `query` with the default limits.
pub fn select_context(query: &str, store: &KnowledgeStore) -> String {
    ContextSelector::new(store, SelectionLimits::default()).select(query)
}

/// The lowercased query plus the word views each region matches against.
struct QueryTerms {
    lowered: String,
    /// `\w+` tokens, for topic keys.
    tokens: HashSet<String>,
    /// Whitespace-split words longer than four characters, for past papers.
    long_words: Vec<String>,
}

impl QueryTerms {
    fn new(query: &str) -> Self {
        let lowered = query.to_lowercase();
        let tokens = WORD
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect();
        let long_words = lowered
            .split_whitespace()
            .filter(|w| w.chars().count() > MIN_QUESTION_WORD_CHARS)
            .map(str::to_string)
            .collect();
        Self {
            lowered,
            tokens,
            long_words,
        }
    }
}

/// Read-only view over the store that answers context queries.
pub struct ContextSelector<'a> {
    store: &'a KnowledgeStore,
    limits: SelectionLimits,
}

impl<'a> ContextSelector<'a> {
    pub fn new(store: &'a KnowledgeStore, limits: SelectionLimits) -> Self {
        Self { store, limits }
    }

    /// Build the context block for one question.
    pub fn select(&self, query: &str) -> String {
        let terms = QueryTerms::new(query);
        let mut context = String::new();

        let mut topics = 0;
        for (key, topic) in self.store.specific_topics.iter() {
            if topic_key_matches(key, &terms) {
                self.render_topic(key, topic, &mut context);
                topics += 1;
            }
        }

        let archive: Vec<String> = self
            .store
            .sections()
            .into_iter()
            .flatten()
            .filter(|item| syllabus_item_matches(item, &terms))
            .take(self.limits.max_archive_items)
            .filter_map(|item| serde_json::to_string_pretty(item).ok())
            .collect();

        let examples: Vec<&MarkSchemeEntry> = self
            .store
            .mark_scheme_entries()
            .map(|paper| paper.entry)
            .filter(|entry| question_matches(&entry.question, &terms))
            .take(self.limits.max_marking_examples)
            .collect();

        if !archive.is_empty() {
            context.push_str("\n### O-LEVEL HISTORY ARCHIVE:\n");
            context.push_str(&archive.join("\n---\n"));
        }

        if !examples.is_empty() {
            context.push_str("\n\n### CAMBRIDGE EXAMINER MARKING SCHEMES:\n");
            for entry in &examples {
                context.push_str(&format!("\n**Question: {}**\n", entry.question));
                for point in entry.points.iter().take(self.limits.max_marking_points) {
                    context.push_str(&format!("  • {point}\n"));
                }
            }
        }

        debug!(
            topics,
            archive_items = archive.len(),
            marking_examples = examples.len(),
            chars = context.len(),
            "Context selected"
        );

        context
    }

    fn render_topic(&self, key: &str, topic: &TopicRecord, out: &mut String) {
        out.push_str(&format!(
            "\n### TEXTBOOK CONTEXT: {} (Nigel Kelly Standards)\n",
            topic.title_or(key)
        ));

        if let Some(factors) = &topic.factors {
            for (factor, points) in factors.iter() {
                out.push_str(&format!("**{factor}**:\n"));
                for point in points {
                    out.push_str(&format!("- {point}\n"));
                }
            }
        }

        if let Some(pairs) = &topic.qa_pairs {
            out.push_str("\n**Relevant Past Questions & Answers:**\n");
            for qa in pairs.iter().take(self.limits.max_qa_pairs) {
                out.push_str(&format!("Q: {}\nA: {}\n\n", qa.question, qa.answer));
            }
        }

        if let Some(raw) = &topic.raw_text {
            let excerpt: String = raw.chars().take(self.limits.raw_text_chars).collect();
            out.push_str(&excerpt);
            out.push_str("...\n");
        }

        out.push('\n');
    }
}

/// Does a `specific_topics` key match the query?
fn topic_key_matches(key: &str, terms: &QueryTerms) -> bool {
    let key_words: HashSet<&str> = key.split('_').collect();
    let common = key_words
        .iter()
        .filter(|w| terms.tokens.contains(**w))
        .count();

    if key_words.len() == 1 && common == 1 {
        return true;
    }
    if common >= 2 {
        return true;
    }
    YEAR.find_iter(key)
        .any(|year| terms.lowered.contains(year.as_str()))
}

/// Items without a topic never match.
fn syllabus_item_matches(item: &SyllabusItem, terms: &QueryTerms) -> bool {
    let topic = item.topic().to_lowercase();
    if topic.trim().is_empty() {
        return false;
    }
    terms.lowered.contains(&topic)
        || topic
            .split_whitespace()
            .filter(|w| w.chars().count() > MIN_TOPIC_WORD_CHARS)
            .any(|w| terms.lowered.contains(w))
}

fn question_matches(question: &str, terms: &QueryTerms) -> bool {
    if terms.long_words.is_empty() {
        return false;
    }
    let question = question.to_lowercase();
    terms.long_words.iter().any(|w| question.contains(w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(json: &str) -> KnowledgeStore {
        serde_json::from_str(json).unwrap()
    }

    fn topics_store() -> KnowledgeStore {
        store(
            r#"{"specific_topics": {
                "jinnah": {"title": "Muhammad Ali Jinnah"},
                "two_nation_theory": {"title": "Two Nation Theory"},
                "war_of_1971": {"title": "The 1971 War"}
            }}"#,
        )
    }

    #[test]
    fn empty_store_yields_empty_context() {
        let empty = KnowledgeStore::default();
        assert_eq!(select_context("Who was Jinnah?", &empty), "");
    }

    #[test]
    fn empty_and_symbol_only_queries_yield_nothing() {
        let s = topics_store();
        assert_eq!(select_context("", &s), "");
        assert_eq!(select_context("?!? ... ---", &s), "");
    }

    #[test]
    fn single_word_key_needs_whole_token() {
        let s = topics_store();
        assert!(select_context("What did Jinnah demand?", &s).contains("Muhammad Ali Jinnah"));
        assert!(!select_context("The jinnahs were here", &s).contains("Muhammad Ali Jinnah"));
    }

    #[test]
    fn non_ascii_key_matches_whole_unicode_token() {
        let s = store(
            r#"{"specific_topics": {
                "café": {"title": "Coffee Houses"},
                "muslim_league_lahore": {"title": "League Sessions"},
                "allāma_iqbāl": {"title": "Allama Iqbal"}
            }}"#,
        );
        assert!(select_context("tell me about the café", &s).contains("Coffee Houses"));
        assert!(!select_context("tell me about the cafés", &s).contains("Coffee Houses"));
        assert!(select_context("Who was Allāma Iqbāl?", &s).contains("Allama Iqbal"));
    }

    #[test]
    fn multi_word_key_matches_on_two_shared_words() {
        let s = topics_store();
        let context = select_context("Explain the nation theory", &s);
        assert!(context.contains("Two Nation Theory"));

        let context = select_context("Explain the theory", &s);
        assert!(!context.contains("Two Nation Theory"));
    }

    #[test]
    fn year_in_key_matches_digits_in_query() {
        let s = topics_store();
        let context = select_context("What happened in 1971?", &s);
        assert!(context.contains("### TEXTBOOK CONTEXT: The 1971 War (Nigel Kelly Standards)"));
    }

    #[test]
    fn all_matching_topics_emitted_in_store_order() {
        let s = topics_store();
        let context = select_context("jinnah two nation theory 1971", &s);
        let jinnah = context.find("Muhammad Ali Jinnah").unwrap();
        let theory = context.find("Two Nation Theory").unwrap();
        let war = context.find("The 1971 War").unwrap();
        assert!(jinnah < theory && theory < war);
    }

    #[test]
    fn topic_title_falls_back_to_key() {
        let s = store(r#"{"specific_topics": {"simla": {}}}"#);
        assert!(select_context("simla", &s).contains("### TEXTBOOK CONTEXT: simla "));
    }

    #[test]
    fn factors_rendered_in_file_order() {
        let s = store(
            r#"{"specific_topics": {"partition": {
                "title": "Partition",
                "factors": {"Migration": ["Refugees", "Camps"], "Violence": ["Punjab"]}
            }}}"#,
        );
        let context = select_context("partition", &s);
        assert!(context.contains("**Migration**:\n- Refugees\n- Camps\n**Violence**:\n- Punjab\n"));
    }

    #[test]
    fn qa_pairs_capped_at_three() {
        let s = store(
            r#"{"specific_topics": {"jinnah": {"qa_pairs": [
                {"question": "q1", "answer": "a1"},
                {"question": "q2", "answer": "a2"},
                {"question": "q3", "answer": "a3"},
                {"question": "q4", "answer": "a4"},
                {"question": "q5", "answer": "a5"}
            ]}}}"#,
        );
        let context = select_context("jinnah", &s);
        assert!(context.contains("**Relevant Past Questions & Answers:**"));
        assert!(context.contains("Q: q3\nA: a3\n"));
        assert!(!context.contains("q4"));
        assert_eq!(context.matches("Q: ").count(), 3);
    }

    #[test]
    fn raw_text_truncated_to_limit_with_marker() {
        let long = "x".repeat(1500);
        let s = store(&format!(
            r#"{{"specific_topics": {{"jinnah": {{"raw_text": "{long}"}}}}}}"#
        ));
        let context = select_context("jinnah", &s);
        let expected = format!("{}...\n", "x".repeat(1000));
        assert!(context.contains(&expected));
        assert_eq!(context.matches('x').count(), 1000);
    }

    #[test]
    fn raw_text_truncation_respects_char_boundaries() {
        let s = store(r#"{"specific_topics": {"jinnah": {"raw_text": "قائداعظم"}}}"#);
        let limits = SelectionLimits {
            raw_text_chars: 4,
            ..SelectionLimits::default()
        };
        let context = ContextSelector::new(&s, limits).select("jinnah");
        assert!(context.contains("قائد..."));
    }

    fn sections_store() -> KnowledgeStore {
        store(
            r#"{
                "section_1": [{"topic": "Mughal decline", "points": ["Aurangzeb"]}],
                "section_2": [
                    {"topic": "Mughal architecture"},
                    {"topic": "Mughal administration"}
                ],
                "section_3": [{"topic": "Mughal art"}, {"period": "untitled"}]
            }"#,
        )
    }

    #[test]
    fn archive_capped_at_two_in_section_order() {
        let s = sections_store();
        let context = select_context("Why did the Mughal empire collapse?", &s);
        assert!(context.starts_with("\n### O-LEVEL HISTORY ARCHIVE:\n"));
        assert!(context.contains("Mughal decline"));
        assert!(context.contains("Mughal architecture"));
        assert!(!context.contains("Mughal administration"));
        assert!(!context.contains("Mughal art"));
        assert_eq!(context.matches("\n---\n").count(), 1);
    }

    #[test]
    fn archive_items_rendered_as_pretty_json() {
        let s = sections_store();
        let context = select_context("mughal decline", &s);
        assert!(context.contains("\"topic\": \"Mughal decline\""));
        assert!(context.contains("\"points\": [\n"));
    }

    #[test]
    fn archive_items_keep_file_field_order() {
        let s = store(r#"{"section_2": [{"period": "1857", "topic": "Mutiny", "notes": "x"}]}"#);
        let context = select_context("the mutiny", &s);
        let period = context.find("\"period\"").unwrap();
        let topic = context.find("\"topic\"").unwrap();
        let notes = context.find("\"notes\"").unwrap();
        assert!(period < topic && topic < notes);
    }

    #[test]
    fn whole_topic_phrase_matches_even_with_short_words() {
        let s = store(r#"{"section_1": [{"topic": "Raj"}]}"#);
        assert!(select_context("the british raj", &s).contains("\"Raj\""));
        assert_eq!(select_context("the british empire", &s), "");
    }

    #[test]
    fn items_without_topic_never_match() {
        let s = store(r#"{"section_1": [{"period": "untitled"}]}"#);
        assert_eq!(select_context("anything at all", &s), "");
        assert_eq!(select_context("", &s), "");
    }

    fn papers_store() -> KnowledgeStore {
        store(
            r#"{"past_papers": {
                "2022": {"Oct_Nov_2022": {"paper_1": {"mark_scheme": [
                    {"question": "Why did Pakistan break up?", "points": ["1","2","3","4","5","6","7"]}
                ]}}},
                "2023": {"May_June_2023": {"paper_1": {"mark_scheme": [
                    {"question": "Describe relations between Pakistan and India.", "points": ["Kashmir"]},
                    {"question": "Was Pakistan ready in 1947?", "points": ["Assets"]}
                ]}}}
            }}"#,
        )
    }

    #[test]
    fn marking_examples_capped_at_two_with_five_points() {
        let s = papers_store();
        let context = select_context("pakistan", &s);
        assert!(context.starts_with("\n\n### CAMBRIDGE EXAMINER MARKING SCHEMES:\n"));
        assert!(context.contains("\n**Question: Why did Pakistan break up?**\n"));
        assert!(context.contains("**Question: Describe relations between Pakistan and India.**"));
        assert!(!context.contains("ready in 1947"));
        assert!(context.contains("  • 5\n"));
        assert!(!context.contains("  • 6\n"));
    }

    #[test]
    fn short_query_words_do_not_match_questions() {
        let s = papers_store();
        assert_eq!(select_context("why did it", &s), "");
    }

    #[test]
    fn regions_concatenate_in_fixed_order() {
        let s = store(
            r#"{
                "past_papers": {"2023": {"s": {"p": {"mark_scheme": [
                    {"question": "Explain the partition plan", "points": []}
                ]}}}},
                "section_1": [{"topic": "Partition"}],
                "specific_topics": {"partition": {"title": "Partition of India"}}
            }"#,
        );
        let context = select_context("partition", &s);
        let topic = context.find("### TEXTBOOK CONTEXT").unwrap();
        let archive = context.find("### O-LEVEL HISTORY ARCHIVE").unwrap();
        let marking = context.find("### CAMBRIDGE EXAMINER MARKING SCHEMES").unwrap();
        assert!(topic < archive && archive < marking);
    }

    #[test]
    fn custom_limits_apply() {
        let s = papers_store();
        let limits = SelectionLimits {
            max_marking_examples: 3,
            max_marking_points: 1,
            ..SelectionLimits::default()
        };
        let context = ContextSelector::new(&s, limits).select("pakistan");
        assert_eq!(context.matches("**Question:").count(), 3);
        assert!(context.contains("  • 1\n"));
        assert!(!context.contains("  • 2\n"));
    }
}
