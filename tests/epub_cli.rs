use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Write a minimal EPUB whose spine lists `chapters` in order.
fn build_epub(dir: &Path, chapters: &[&str]) -> PathBuf {
    build_epub_with_unlisted(dir, chapters, &[])
}

/// Like [`build_epub`], plus `(id, body)` documents that appear in the
/// manifest but not in the spine.
fn build_epub_with_unlisted(dir: &Path, chapters: &[&str], unlisted: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("book.epub");
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();

    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(CONTAINER_XML.as_bytes()).unwrap();

    let mut manifest = String::new();
    let mut spine = String::new();
    for i in 0..chapters.len() {
        manifest.push_str(&format!(
            "    <item id=\"ch{i}\" href=\"ch{i}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
        ));
        spine.push_str(&format!("    <itemref idref=\"ch{i}\"/>\n"));
    }
    for (id, _) in unlisted {
        manifest.push_str(&format!(
            "    <item id=\"{id}\" href=\"{id}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
        ));
    }
    manifest.push_str("    <item id=\"css\" href=\"style.css\" media-type=\"text/css\"/>\n");

    let opf = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:12345678-1234-1234-1234-123456789abc</dc:identifier>
    <dc:title>Test Book</dc:title>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>"#
    );
    zip.start_file("OEBPS/content.opf", deflated).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();

    zip.start_file("OEBPS/style.css", deflated).unwrap();
    zip.write_all(b"body { margin: 0; }").unwrap();

    let files = chapters
        .iter()
        .enumerate()
        .map(|(i, body)| (format!("ch{i}"), *body))
        .chain(unlisted.iter().map(|(id, body)| (id.to_string(), *body)));
    for (name, body) in files {
        let xhtml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <html xmlns=\"http://www.w3.org/1999/xhtml\"><head><title></title></head>\n\
             <body>{body}</body></html>"
        );
        zip.start_file(format!("OEBPS/{name}.xhtml"), deflated).unwrap();
        zip.write_all(xhtml.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    path
}

fn run_extractor(args: &[&Path]) -> (i32, String, Value) {
    let output = Command::new(env!("CARGO_BIN_EXE_extract-epub-text"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("EXTRACT_LOG")
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json: Value = serde_json::from_str(stdout.trim()).unwrap();
    (output.status.code().unwrap(), stdout, json)
}

#[test]
fn test_missing_argument() {
    let (code, stdout, json) = run_extractor(&[]);
    assert_eq!(code, 1);
    assert_eq!(stdout, "{\"ok\":false,\"error\":\"epub path required\"}\n");
    assert_eq!(json["ok"], false);
}

#[test]
fn test_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not-an-epub.epub");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let (code, _, json) = run_extractor(&[path.as_path()]);
    assert_eq!(code, 2);
    assert_eq!(json["ok"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("ebooklib extraction failed: "));
}

#[test]
fn test_extracts_chapters_in_order() {
    let dir = TempDir::new().unwrap();
    let path = build_epub(
        dir.path(),
        &[
            "<h1>Chapter One</h1>\n<p>Café   déjà vu &amp; more.</p>",
            "<script type=\"text/javascript\">var hidden = 1;</script>",
            "<h1>Chapter Two</h1><p>x &lt; y &amp;lt; z</p>",
        ],
    );

    let (code, stdout, json) = run_extractor(&[path.as_path()]);
    assert_eq!(code, 0);
    assert_eq!(json["ok"], true);
    assert!(json.get("error").is_none());

    let text = json["text"].as_str().unwrap();
    assert!(text.starts_with("Chapter One Café déjà vu & more."));
    assert!(text.contains("\n\nChapter Two x < y &lt; z"));
    assert!(!text.contains("hidden"));
    assert_eq!(text.matches("\n\n").count(), 1);

    // Non-ASCII text is printed literally, not escaped.
    assert!(stdout.contains("Café déjà vu"));
}

#[test]
fn test_script_only_book_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = build_epub(
        dir.path(),
        &["<script>document.write('x')</script><style>p { color: red }</style>"],
    );

    let (code, _, json) = run_extractor(&[path.as_path()]);
    assert_eq!(code, 3);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "no text extracted from epub");
    assert!(json.get("text").is_none());
}

#[test]
fn test_empty_path_is_library_failure() {
    let (code, _, json) = run_extractor(&[Path::new("")]);
    assert_eq!(code, 2);
    assert_eq!(json["ok"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("ebooklib extraction failed: "));
}

#[test]
fn test_manifest_documents_outside_spine_are_included() {
    let dir = TempDir::new().unwrap();
    let path = build_epub_with_unlisted(
        dir.path(),
        &["<p>Main text</p>"],
        &[("notes_b", "<p>Second note</p>"), ("notes_a", "<p>First note</p>")],
    );

    let (code, _, json) = run_extractor(&[path.as_path()]);
    assert_eq!(code, 0);
    assert_eq!(json["text"], "Main text\n\nFirst note\n\nSecond note");
}
