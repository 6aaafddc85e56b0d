use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use docx_rs::{
    Docx, Footer, Header, Hyperlink, HyperlinkType, Insert, Paragraph, Run, StructuredDataTag,
};
use tempfile::tempdir;
use textmatch::scanner::{DocumentLoader, FormatLoader, LoadOptions};
use textmatch::similarity::tfidf_cosine;
use textmatch::text::DocumentStatistics;

use super::common::{write, BUDGET};

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let file = File::create(path).unwrap();
    docx.build().pack(file).unwrap();
}

fn write_zip(path: &Path, members: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in members {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn load(path: &Path) -> DocumentStatistics {
    FormatLoader::new(LoadOptions::default()).load(path).unwrap()
}

#[test]
fn test_docx_matches_plain_text_copy() {
    let dir = tempdir().unwrap();
    let docx = dir.path().join("budget.docx");
    let txt = dir.path().join("budget.txt");
    write_docx(&docx, &[BUDGET]);
    write(&txt, BUDGET);

    let from_docx = load(&docx);
    assert!(from_docx.count("payroll") >= 1);
    assert!(from_docx.count("w") == 0, "XML markup leaked into tokens");

    let score = tfidf_cosine(&from_docx, &load(&txt));
    assert!(score > 0.99, "score = {score}");
}

#[test]
fn test_docx_paragraphs_are_separate_words() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memo.docx");
    write_docx(&path, &["first paragraph", "second paragraph"]);

    let stats = load(&path);
    assert_eq!(stats.count("paragraph"), 2);
    assert_eq!(stats.count("first"), 1);
    assert_eq!(stats.count("second"), 1);
}

#[test]
fn test_docx_keeps_links_content_controls_and_page_furniture() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("letter.docx");
    let body = Paragraph::new()
        .add_run(Run::new().add_text("bodyword "))
        .add_hyperlink(
            Hyperlink::new("https://example.com", HyperlinkType::External)
                .add_run(Run::new().add_text("zebracrossing")),
        )
        .add_insert(Insert::new(Run::new().add_text(" insertedword")));
    let docx = Docx::new()
        .header(Header::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("letterheadword")),
        ))
        .footer(Footer::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("footerword")),
        ))
        .add_paragraph(body)
        .add_structured_data_tag(StructuredDataTag::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("controlword")),
        ));
    docx.build().pack(File::create(&path).unwrap()).unwrap();

    let stats = load(&path);
    for word in [
        "bodyword",
        "zebracrossing",
        "insertedword",
        "letterheadword",
        "footerword",
        "controlword",
    ] {
        assert_eq!(stats.count(word), 1, "{word}");
    }
}

#[test]
fn test_pptx_slides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    write_zip(
        &path,
        &[
            (
                "ppt/slides/slide1.xml",
                "<p:sld><a:t>Quarterly</a:t> <a:t>roadmap</a:t></p:sld>",
            ),
            ("ppt/theme/theme1.xml", "<a:theme name=\"Office Theme\"/>"),
        ],
    );

    let stats = load(&path);
    assert_eq!(stats.count("quarterly"), 1);
    assert_eq!(stats.count("roadmap"), 1);
    assert_eq!(stats.count("office"), 0);
}

#[test]
fn test_rtf_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("letter.rtf");
    fs::write(
        &path,
        r"{\rtf1\ansi\deff0\fs24 Dear committee,\par please review.}",
    )
    .unwrap();

    let stats = load(&path);
    assert_eq!(stats.count("dear"), 1);
    assert_eq!(stats.count("committee"), 1);
    assert_eq!(stats.count("review"), 1);
    assert_eq!(stats.count("rtf1"), 0);
    assert_eq!(stats.count("fs24"), 0);
}

#[test]
fn test_broken_docx_falls_back_to_raw_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    fs::write(&path, "plain words pretending to be a document").unwrap();

    let stats = load(&path);
    assert_eq!(stats.count("pretending"), 1);
}

#[test]
fn test_raw_only_reads_container_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memo.docx");
    write_docx(&path, &["unmistakable"]);

    let raw = FormatLoader::new(LoadOptions {
        raw_only: true,
        ..LoadOptions::default()
    })
    .load(&path)
    .unwrap();
    // Member names are stored uncompressed in the zip headers
    assert!(raw.count("document") >= 1);

    let extracted = load(&path);
    assert_eq!(extracted.count("unmistakable"), 1);
    assert_eq!(extracted.count("document"), 0);
}
