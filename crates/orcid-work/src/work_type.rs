//! Mapping of source metadata types to the registry work-type vocabulary

use std::fmt;

use crate::error::{Result, WorkError};

use WorkType::*;

/// Work types accepted by the version 2.0 record schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkType {
    ArtisticPerformance,
    BookChapter,
    BookReview,
    Book,
    ConferenceAbstract,
    ConferencePaper,
    ConferencePoster,
    DataSet,
    DictionaryEntry,
    Disclosure,
    Dissertation,
    EditedBook,
    EncyclopediaEntry,
    Invention,
    JournalArticle,
    JournalIssue,
    LectureSpeech,
    License,
    MagazineArticle,
    Manual,
    NewsletterArticle,
    NewspaperArticle,
    OnlineResource,
    Other,
    Patent,
    RegisteredCopyright,
    Report,
    ResearchTechnique,
    ResearchTool,
    SpinOffCompany,
    StandardsAndPolicy,
    SupervisedStudentPublication,
    TechnicalStandard,
    Test,
    Trademark,
    Translation,
    Website,
    WorkingPaper,
    Undefined,
}

impl WorkType {
    pub const ALL: [WorkType; 39] = [
        Self::ArtisticPerformance,
        Self::BookChapter,
        Self::BookReview,
        Self::Book,
        Self::ConferenceAbstract,
        Self::ConferencePaper,
        Self::ConferencePoster,
        Self::DataSet,
        Self::DictionaryEntry,
        Self::Disclosure,
        Self::Dissertation,
        Self::EditedBook,
        Self::EncyclopediaEntry,
        Self::Invention,
        Self::JournalArticle,
        Self::JournalIssue,
        Self::LectureSpeech,
        Self::License,
        Self::MagazineArticle,
        Self::Manual,
        Self::NewsletterArticle,
        Self::NewspaperArticle,
        Self::OnlineResource,
        Self::Other,
        Self::Patent,
        Self::RegisteredCopyright,
        Self::Report,
        Self::ResearchTechnique,
        Self::ResearchTool,
        Self::SpinOffCompany,
        Self::StandardsAndPolicy,
        Self::SupervisedStudentPublication,
        Self::TechnicalStandard,
        Self::Test,
        Self::Trademark,
        Self::Translation,
        Self::Website,
        Self::WorkingPaper,
        Self::Undefined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArtisticPerformance => "artistic-performance",
            Self::BookChapter => "book-chapter",
            Self::BookReview => "book-review",
            Self::Book => "book",
            Self::ConferenceAbstract => "conference-abstract",
            Self::ConferencePaper => "conference-paper",
            Self::ConferencePoster => "conference-poster",
            Self::DataSet => "data-set",
            Self::DictionaryEntry => "dictionary-entry",
            Self::Disclosure => "disclosure",
            Self::Dissertation => "dissertation",
            Self::EditedBook => "edited-book",
            Self::EncyclopediaEntry => "encyclopedia-entry",
            Self::Invention => "invention",
            Self::JournalArticle => "journal-article",
            Self::JournalIssue => "journal-issue",
            Self::LectureSpeech => "lecture-speech",
            Self::License => "license",
            Self::MagazineArticle => "magazine-article",
            Self::Manual => "manual",
            Self::NewsletterArticle => "newsletter-article",
            Self::NewspaperArticle => "newspaper-article",
            Self::OnlineResource => "online-resource",
            Self::Other => "other",
            Self::Patent => "patent",
            Self::RegisteredCopyright => "registered-copyright",
            Self::Report => "report",
            Self::ResearchTechnique => "research-technique",
            Self::ResearchTool => "research-tool",
            Self::SpinOffCompany => "spin-off-company",
            Self::StandardsAndPolicy => "standards-and-policy",
            Self::SupervisedStudentPublication => "supervised-student-publication",
            Self::TechnicalStandard => "technical-standard",
            Self::Test => "test",
            Self::Trademark => "trademark",
            Self::Translation => "translation",
            Self::Website => "website",
            Self::WorkingPaper => "working-paper",
            Self::Undefined => "undefined",
        }
    }

    /// Parse a registry vocabulary term
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mapping: source type, optional subtype, registry work type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkTypeRule {
    pub source_type: &'static str,
    /// `None` matches any subtype not listed separately
    pub subtype: Option<&'static str>,
    pub work_type: WorkType,
}

const fn rule(
    source_type: &'static str,
    subtype: Option<&'static str>,
    work_type: WorkType,
) -> WorkTypeRule {
    WorkTypeRule {
        source_type,
        subtype,
        work_type,
    }
}

/// Every known source type. Matching ignores ASCII case.
pub static WORK_TYPE_TABLE: &[WorkTypeRule] = &[
    // DataCite resourceTypeGeneral "Text", by resourceType
    rule("Text", Some("Journal Article"), JournalArticle),
    rule("Text", Some("Article"), JournalArticle),
    rule("Text", Some("Book"), Book),
    rule("Text", Some("Book Chapter"), BookChapter),
    rule("Text", Some("Chapter"), BookChapter),
    rule("Text", Some("Report"), Report),
    rule("Text", Some("Dissertation"), Dissertation),
    rule("Text", Some("Thesis"), Dissertation),
    rule("Text", Some("Conference Abstract"), ConferenceAbstract),
    rule("Text", Some("Conference Paper"), ConferencePaper),
    rule("Text", Some("Conference Poster"), ConferencePoster),
    rule("Text", Some("Poster"), ConferencePoster),
    rule("Text", Some("Working Paper"), WorkingPaper),
    rule("Text", Some("Preprint"), WorkingPaper),
    // "Collection" with the same subtypes
    rule("Collection", Some("Journal Article"), JournalArticle),
    rule("Collection", Some("Book"), Book),
    rule("Collection", Some("Book Chapter"), BookChapter),
    rule("Collection", Some("Report"), Report),
    rule("Collection", Some("Dissertation"), Dissertation),
    rule("Collection", Some("Conference Abstract"), ConferenceAbstract),
    rule("Collection", Some("Conference Paper"), ConferencePaper),
    rule("Collection", Some("Conference Poster"), ConferencePoster),
    rule("Collection", Some("Working Paper"), WorkingPaper),
    rule("Collection", Some("Dataset"), DataSet),
    // DataCite resourceTypeGeneral
    rule("Dataset", None, DataSet),
    rule("InteractiveResource", None, OnlineResource),
    rule("Text", None, Other),
    rule("Collection", None, Other),
    rule("Audiovisual", None, Other),
    rule("Event", None, Other),
    rule("Image", None, Other),
    rule("Model", None, Other),
    rule("PhysicalObject", None, Other),
    rule("Service", None, Other),
    rule("Software", None, Other),
    rule("Sound", None, Other),
    rule("Workflow", None, Other),
    rule("Other", None, Other),
    // Crossref and CSL types
    rule("journal-article", None, JournalArticle),
    rule("article-journal", None, JournalArticle),
    rule("proceedings-article", None, ConferencePaper),
    rule("paper-conference", None, ConferencePaper),
    rule("posted-content", None, WorkingPaper),
    rule("book-chapter", None, BookChapter),
    rule("chapter", None, BookChapter),
    rule("book", None, Book),
    rule("monograph", None, Book),
    rule("edited-book", None, EditedBook),
    rule("dissertation", None, Dissertation),
    rule("thesis", None, Dissertation),
    rule("report", None, Report),
    rule("reference-entry", None, EncyclopediaEntry),
    rule("entry-encyclopedia", None, EncyclopediaEntry),
    rule("entry-dictionary", None, DictionaryEntry),
    rule("article-magazine", None, MagazineArticle),
    rule("article-newspaper", None, NewspaperArticle),
    rule("standard", None, StandardsAndPolicy),
    rule("patent", None, Patent),
    rule("webpage", None, Website),
    rule("speech", None, LectureSpeech),
    rule("review-book", None, BookReview),
];

/// Table lookup: an exact subtype rule first, then the type's catch-all
pub fn lookup(source_type: &str, subtype: Option<&str>) -> Option<WorkType> {
    let source_type = source_type.trim();
    let subtype = subtype.map(str::trim).filter(|s| !s.is_empty());
    let type_matches = |rule: &&WorkTypeRule| rule.source_type.eq_ignore_ascii_case(source_type);

    let by_subtype = subtype.and_then(|subtype| {
        WORK_TYPE_TABLE
            .iter()
            .filter(type_matches)
            .find(|rule| rule.subtype.is_some_and(|s| s.eq_ignore_ascii_case(subtype)))
    });
    by_subtype
        .or_else(|| {
            WORK_TYPE_TABLE
                .iter()
                .filter(type_matches)
                .find(|rule| rule.subtype.is_none())
        })
        .map(|rule| rule.work_type)
}

/// Maps metadata types through [`WORK_TYPE_TABLE`].
///
/// Unmapped types become [`WorkType::Other`], or an error when strict.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkTypeMapper {
    strict: bool,
}

impl WorkTypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper that rejects unmapped types
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn map(&self, work_type: Option<&str>, subtype: Option<&str>) -> Result<WorkType> {
        if let Some(mapped) = work_type.and_then(|t| lookup(t, subtype)) {
            return Ok(mapped);
        }
        if self.strict {
            return Err(WorkError::UnknownWorkType {
                work_type: work_type.map(String::from),
                subtype: subtype.map(String::from),
            });
        }
        tracing::debug!(?work_type, ?subtype, "unmapped work type, using other");
        Ok(WorkType::Other)
    }
}
