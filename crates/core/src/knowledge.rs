//! Knowledge Store data model.
//!
//! The store is one JSON document with four regions:
//!
//! - `specific_topics`: topic key (lowercase words joined by `_`) -> dossier
//! - `section_1` .. `section_3`: syllabus items, free-form apart from `topic`
//! - `past_papers`: year -> season -> paper -> mark scheme
//!
//! Every field a record may lack is optional or defaulted, and read through
//! an accessor that yields an empty value when absent. A record missing a
//! field contributes less context; it never fails a lookup.
//!
//! Fields and regions this model does not know about are carried in
//! flattened maps, so a parsed store serializes back with them intact.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// String-keyed map that remembers file order. Retrieval ties are broken by
/// that order. A repeated key keeps its first position and takes the last
/// value.
pub type OrderedMap<V> = IndexMap<String, V>;

/// Unmodelled JSON fields, in file order.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

/// Past papers keyed by year, then season label, then paper name.
pub type PastPapers = OrderedMap<OrderedMap<OrderedMap<MarkScheme>>>;

/// The whole corpus. Loaded once, read-only for the life of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeStore {
    #[serde(default)]
    pub specific_topics: OrderedMap<TopicRecord>,

    #[serde(default)]
    pub section_1: Vec<SyllabusItem>,

    #[serde(default)]
    pub section_2: Vec<SyllabusItem>,

    #[serde(default)]
    pub section_3: Vec<SyllabusItem>,

    #[serde(default)]
    pub past_papers: PastPapers,

    /// Unrecognised top-level regions, preserved verbatim.
    #[serde(flatten)]
    pub other: ExtraFields,
}

/// A topic dossier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Factor name -> bullet points, in file order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<OrderedMap<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa_pairs: Option<Vec<QaPair>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// `key_dates`, `sources`, ... rendered nowhere but kept.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl TopicRecord {
    /// The dossier title, falling back to the topic key.
    pub fn title_or<'a>(&'a self, key: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(key)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub answer: String,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A syllabus item. Only `topic` drives matching; the whole item, in file
/// order, is what gets rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyllabusItem {
    pub fields: ExtraFields,
}

impl SyllabusItem {
    /// The `topic` field, or `""` when absent or not a string.
    pub fn topic(&self) -> &str {
        self.fields
            .get("topic")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
    }
}

/// One paper's marking scheme.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkScheme {
    #[serde(default)]
    pub mark_scheme: Vec<MarkSchemeEntry>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A historical question with its official marking points.
///
/// The data pipeline writes points as `mark_scheme_points`; both spellings
/// are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkSchemeEntry {
    #[serde(default)]
    pub question: String,

    #[serde(default, alias = "mark_scheme_points")]
    pub points: Vec<String>,

    /// `marks`, `examiner_tips`, `year`, `season`, ... kept for round-trips.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A mark-scheme entry together with where it lives in the store.
#[derive(Debug, Clone, Copy)]
pub struct PaperRef<'a> {
    pub year: &'a str,
    pub season: &'a str,
    pub paper: &'a str,
    pub entry: &'a MarkSchemeEntry,
}

/// Entry counts per region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub topics: usize,
    pub syllabus_items: usize,
    pub past_paper_entries: usize,
}

impl KnowledgeStore {
    /// True when every region is empty (e.g. the backing file was absent).
    pub fn is_empty(&self) -> bool {
        self.specific_topics.is_empty()
            && self.sections().iter().all(|items| items.is_empty())
            && self.past_papers.is_empty()
    }

    /// The three syllabus sections in fixed order.
    pub fn sections(&self) -> [&[SyllabusItem]; 3] {
        [&self.section_1, &self.section_2, &self.section_3]
    }

    /// Every mark-scheme entry, walking year -> season -> paper in file order.
    pub fn mark_scheme_entries(&self) -> impl Iterator<Item = PaperRef<'_>> {
        paper_entries(&self.past_papers)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            topics: self.specific_topics.len(),
            syllabus_items: self.sections().iter().map(|items| items.len()).sum(),
            past_paper_entries: self.mark_scheme_entries().count(),
        }
    }
}

/// Every mark-scheme entry in `papers`, in file order.
pub fn paper_entries(papers: &PastPapers) -> impl Iterator<Item = PaperRef<'_>> {
    papers.iter().flat_map(|(year, seasons)| {
        seasons.iter().flat_map(move |(season, papers)| {
            papers.iter().flat_map(move |(paper, scheme)| {
                scheme.mark_scheme.iter().map(move |entry| PaperRef {
                    year,
                    season,
                    paper,
                    entry,
                })
            })
        })
    })
}

/// Deep-merge past papers produced by the offline data pipeline.
///
/// Unknown years and seasons are appended; a paper present on both sides is
/// replaced wholesale by the incoming one and keeps its position. Returns how
/// many mark-scheme entries were merged.
pub fn merge_past_papers(existing: &mut PastPapers, incoming: PastPapers) -> usize {
    let mut merged = 0;
    for (year, seasons) in incoming {
        let existing_year = existing.entry(year).or_default();
        for (season, papers) in seasons {
            let existing_season = existing_year.entry(season).or_default();
            for (paper, scheme) in papers {
                merged += scheme.mark_scheme.len();
                existing_season.insert(paper, scheme);
            }
        }
    }
    merged
}
