//! Serialization of work records to registry XML

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::author::Contributor;
use crate::date::PublicationDate;
use crate::error::{Result, WorkError};
use crate::identifiers::ORCID_HOST;
use crate::work_type::WorkType;

pub const WORK_NAMESPACE: &str = "http://www.orcid.org/ns/work";
pub const COMMON_NAMESPACE: &str = "http://www.orcid.org/ns/common";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str = "http://www.orcid.org/ns/work ../work-2.0.xsd";

/// Longest short description the registry accepts, in characters
pub const SHORT_DESCRIPTION_LIMIT: usize = 2500;

/// Appended to a description that had to be cut
pub const OMISSION: &str = "...";

/// Everything that goes into one `work:work` document
#[derive(Debug, Clone)]
pub struct WorkDocument<'a> {
    pub title: &'a str,
    pub journal_title: Option<&'a str>,
    pub short_description: Option<&'a str>,
    pub citation: Option<&'a str>,
    pub work_type: WorkType,
    pub publication_date: PublicationDate,
    pub doi: &'a str,
    pub contributors: &'a [Contributor],
}

impl WorkDocument<'_> {
    /// Serialize to an indented UTF-8 document
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlWriter::new();
        xml.declaration()?;
        xml.start_with(
            "work:work",
            &[
                ("xmlns:work", WORK_NAMESPACE),
                ("xmlns:common", COMMON_NAMESPACE),
                ("xmlns:xsi", XSI_NAMESPACE),
                ("xsi:schemaLocation", SCHEMA_LOCATION),
            ],
        )?;

        xml.start("work:title")?;
        xml.text_element("common:title", self.title)?;
        xml.end("work:title")?;
        if let Some(journal_title) = self.journal_title {
            xml.text_element("work:journal-title", journal_title)?;
        }

        if let Some(description) = self.short_description.filter(|d| !d.trim().is_empty()) {
            let description = strip_control(description);
            xml.text_element(
                "work:short-description",
                &truncate_description(&description, SHORT_DESCRIPTION_LIMIT),
            )?;
        }

        if let Some(citation) = self.citation.filter(|c| !c.is_empty()) {
            xml.start("work:citation")?;
            xml.text_element("work:citation-type", "bibtex")?;
            xml.text_element("work:citation-value", citation)?;
            xml.end("work:citation")?;
        }

        xml.text_element("work:type", self.work_type.as_str())?;

        let date = &self.publication_date;
        if let Some(year) = date.year {
            xml.start("common:publication-date")?;
            xml.text_element("common:year", &year.to_string())?;
            if let Some(month) = date.month {
                xml.text_element("common:month", &month.to_string())?;
                if let Some(day) = date.day {
                    xml.text_element("common:day", &day.to_string())?;
                }
            }
            xml.end("common:publication-date")?;
        }

        xml.start("common:external-ids")?;
        xml.start("common:external-id")?;
        xml.text_element("common:external-id-type", "doi")?;
        xml.text_element("common:external-id-value", self.doi)?;
        xml.end("common:external-id")?;
        xml.end("common:external-ids")?;

        if !self.contributors.is_empty() {
            xml.start("work:contributors")?;
            for contributor in self.contributors {
                write_contributor(&mut xml, contributor)?;
            }
            xml.end("work:contributors")?;
        }

        xml.end("work:work")?;
        xml.finish()
    }
}

fn write_contributor(xml: &mut XmlWriter, contributor: &Contributor) -> Result<()> {
    xml.start("work:contributor")?;
    if let (Some(uri), Some(path)) = (contributor.orcid.as_deref(), contributor.orcid_path()) {
        xml.start("common:contributor-orcid")?;
        xml.text_element("common:uri", uri)?;
        xml.text_element("common:path", path)?;
        xml.text_element("common:host", ORCID_HOST)?;
        xml.end("common:contributor-orcid")?;
    }
    xml.text_element("work:credit-name", &contributor.credit_name)?;
    if let Some(role) = contributor.role.as_deref() {
        xml.start("work:contributor-attributes")?;
        xml.text_element("work:contributor-role", role)?;
        xml.end("work:contributor-attributes")?;
    }
    xml.end("work:contributor")
}

/// Shorten `text` to at most `limit` characters, [`OMISSION`] included.
///
/// Room is kept for the omission marker. The cut falls on the last space at
/// or before that point, or hard at it when there is no such space.
pub fn truncate_description(text: &str, limit: usize) -> Cow<'_, str> {
    if text.chars().count() <= limit {
        return Cow::Borrowed(text);
    }
    let keep = limit.saturating_sub(OMISSION.chars().count());
    let stop = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    // a space sitting exactly at `stop` still counts
    let window_end = text[stop..]
        .chars()
        .next()
        .map_or(stop, |c| stop + c.len_utf8());
    let cut = text[..window_end].rfind(' ').unwrap_or(stop);
    Cow::Owned(format!("{}{}", &text[..cut], OMISSION))
}

/// Remove the control characters XML 1.0 does not allow
pub fn strip_control(text: &str) -> Cow<'_, str> {
    let forbidden =
        |c: char| (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{FFFE}' | '\u{FFFF}');
    if text.chars().any(forbidden) {
        Cow::Owned(text.chars().filter(|c| !forbidden(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| WorkError::Xml(e.to_string()))
    }

    fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn start_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name)?;
        let text = strip_control(text);
        if !text.is_empty() {
            self.write(Event::Text(BytesText::new(&text)))?;
        }
        self.end(name)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| WorkError::Xml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn document<'a>(contributors: &'a [Contributor], date: PublicationDate) -> WorkDocument<'a> {
        WorkDocument {
            title: "Example Paper",
            journal_title: Some("Journal of Examples"),
            short_description: None,
            citation: None,
            work_type: WorkType::JournalArticle,
            publication_date: date,
            doi: "10.1234/example",
            contributors,
        }
    }

    #[test]
    fn test_root_and_element_order() {
        let contributors = [Contributor::new("Jane Doe")];
        let mut doc = document(&contributors, PublicationDate::new(Some(2020), Some(5), None));
        doc.short_description = Some("About things");
        doc.citation = Some("@data{x, }");
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<work:work xmlns:work=\"http://www.orcid.org/ns/work\" xmlns:common=\"http://www.orcid.org/ns/common\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://www.orcid.org/ns/work ../work-2.0.xsd\">"
        ));

        let order = [
            "<work:title>",
            "<work:journal-title>",
            "<work:short-description>",
            "<work:citation>",
            "<work:type>",
            "<common:publication-date>",
            "<common:external-ids>",
            "<work:contributors>",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", xml);
        assert!(xml.contains("<common:month>5</common:month>"));
        assert!(!xml.contains("<common:day>"));
    }

    #[rstest]
    #[case(PublicationDate::new(Some(2020), Some(5), Some(1)), &["<common:year>2020</common:year>", "<common:month>5</common:month>", "<common:day>1</common:day>"], &[])]
    #[case(PublicationDate::new(Some(2020), None, Some(1)), &["<common:year>2020</common:year>"], &["<common:month>", "<common:day>"])]
    #[case(PublicationDate::new(None, Some(5), Some(1)), &[], &["<common:publication-date>"])]
    fn test_publication_date(
        #[case] date: PublicationDate,
        #[case] present: &[&str],
        #[case] absent: &[&str],
    ) {
        let xml = document(&[], date).to_xml().unwrap();
        for fragment in present {
            assert!(xml.contains(fragment), "missing {} in {}", fragment, xml);
        }
        for fragment in absent {
            assert!(!xml.contains(fragment), "unexpected {} in {}", fragment, xml);
        }
        assert!(!xml.contains("<work:contributors>"));
    }

    #[test]
    fn test_contributor_blocks() {
        let contributors = [
            Contributor::new("Josiah Carberry").with_orcid("https://orcid.org/0000-0002-1825-0097"),
            Contributor::new("Jane Doe").with_role("author"),
        ];
        let xml = document(&contributors, PublicationDate::default())
            .to_xml()
            .unwrap();

        assert_eq!(xml.matches("<work:contributor>").count(), 2);
        assert_eq!(xml.matches("<common:contributor-orcid>").count(), 1);
        assert!(xml.contains("<common:uri>https://orcid.org/0000-0002-1825-0097</common:uri>"));
        assert!(xml.contains("<common:path>0000-0002-1825-0097</common:path>"));
        assert!(xml.contains("<common:host>orcid.org</common:host>"));
        assert!(xml.contains("<work:contributor-role>author</work:contributor-role>"));
        assert_eq!(xml.matches("<work:contributor-attributes>").count(), 1);
    }

    #[test]
    fn test_text_is_escaped_and_cleaned() {
        let contributors = [Contributor::new("A & B")];
        let mut doc = document(&contributors, PublicationDate::default());
        doc.title = "Less <than>\u{1} more";
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("Less &lt;than&gt; more"));
        assert!(xml.contains("A &amp; B"));
        assert!(!xml.contains('\u{1}'));
    }

    #[test]
    fn test_truncate_at_space() {
        assert_eq!(truncate_description("short", 10), "short");
        assert_eq!(truncate_description("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_description("hello wonderful world", 12), "hello...");
        assert_eq!(truncate_description("hello world again", 11), "hello...");
        assert_eq!(truncate_description("abcd efgh", 7), "abcd...");
        assert_eq!(truncate_description("ééé ééé", 6), "ééé...");
    }

    #[test]
    fn test_truncate_without_space_cuts_hard() {
        assert_eq!(truncate_description("unbrokenword", 5), "un...");
        assert_eq!(truncate_description(" leading", 6), "...");
    }

    #[test]
    fn test_untouched_text_is_borrowed() {
        assert!(matches!(truncate_description("short", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_control() {
        assert_eq!(strip_control("tab\tnew\nline"), "tab\tnew\nline");
        assert_eq!(strip_control("bell\u{7}s"), "bells");
        assert!(matches!(strip_control("clean"), Cow::Borrowed(_)));
    }
}
