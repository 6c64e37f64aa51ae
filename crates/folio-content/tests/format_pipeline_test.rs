//! End-to-end pipeline tests: classify → clean → render → sanitize,
//! exercising the fixed format→profile table the way a paste surface
//! would.

use folio_content::{
    classify, render, sanitize, select_representation, Format, MemoryPasteSource,
};

fn pipeline(content: &str) -> (Format, String) {
    let format = classify(content);
    let markup = render(content, format);
    let safe = sanitize(&markup, format.sanitize_profile());
    (format, safe)
}

#[test]
fn test_markdown_paste_renders_to_safe_html() {
    let (format, safe) = pipeline("# Plan\n\n- item one\n- item two");
    assert_eq!(format, Format::Markdown);
    assert!(safe.contains("<h1>Plan</h1>"));
    assert!(safe.contains("<li>item one</li>"));
}

#[test]
fn test_json_paste_round_trips_through_pretty_printer() {
    let (format, safe) = pipeline(r#"{"a":1,"b":[1,2,3]}"#);
    assert_eq!(format, Format::Json);
    // 2-space indentation survives sanitization inside the code block;
    // the sanitizer re-serializes text-node quotes as raw characters
    assert!(safe.contains(r#""a": 1"#));
    assert!(safe.contains("    1,"));
    assert!(safe.contains("<pre>"));
}

#[test]
fn test_script_injection_is_neutralized_end_to_end() {
    let content = "<div><p>note</p><script>document.cookie</script></div>";
    let (format, safe) = pipeline(content);
    assert_eq!(format, Format::Html);
    assert!(!safe.contains("<script"));
    assert!(!safe.contains("document.cookie"));
    assert!(safe.contains("note"));
}

#[test]
fn test_word_paste_loses_vendor_noise_but_keeps_text() {
    let mut source = MemoryPasteSource::new();
    source.insert(
        "text/html",
        r#"<p class="MsoNormal" style="mso-margin-top-alt:auto">Quarterly summary</p>"#,
    );
    let selected = select_representation(&source);
    assert_eq!(selected.format, Format::Word);

    let markup = render(&selected.content, selected.format);
    let safe = sanitize(&markup, selected.format.sanitize_profile());
    assert!(!safe.contains("Mso"));
    assert!(!safe.contains("mso-"));
    assert!(safe.contains("Quarterly summary"));
}

#[test]
fn test_plain_text_becomes_paragraphs_under_strict_profile() {
    let (format, safe) = pipeline("hello there\n\nsecond paragraph");
    assert_eq!(format, Format::Plain);
    assert_eq!(safe, "<p>hello there</p>\n<p>second paragraph</p>");
}

#[test]
fn test_csv_paste_becomes_table() {
    let (format, safe) = pipeline("name,age\nana,30\nbo,25");
    assert_eq!(format, Format::Csv);
    assert!(safe.contains("<th>name</th>"));
    assert_eq!(safe.matches("<td>").count(), 4);
}

#[test]
fn test_code_paste_is_escaped_not_executed() {
    let snippet = "function run() {\n  // boot\n  start();\n}";
    let (format, safe) = pipeline(snippet);
    assert_eq!(format, Format::Code);
    assert!(safe.contains("function run()"));
    assert!(!safe.contains("<script"));
}

#[test]
fn test_rtf_paste_survives_as_tagged_paragraph() {
    let (format, safe) = pipeline(r"{\rtf1\ansi Minutes from Monday\par}");
    assert_eq!(format, Format::Rtf);
    assert!(safe.contains("Minutes from Monday"));
    // The rich profile keeps the RTF-derived class marker
    assert!(safe.contains("rtf-content"));
}

#[test]
fn test_docx_paste_extracts_runs() {
    let docx = r#"<?xml version="1.0"?><w:document xmlns:w="ns"><w:body><w:p><w:r><w:t>Agenda</w:t></w:r></w:p></w:body></w:document>"#;
    let (format, safe) = pipeline(docx);
    assert_eq!(format, Format::Docx);
    assert_eq!(safe, "<p>Agenda</p>");
}

#[test]
fn test_xhtml_is_routed_as_html_not_xml() {
    let xhtml = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><p>hi</p></body></html>"#;
    assert_eq!(classify(xhtml), Format::Html);
}

#[test]
fn test_every_format_flows_through_its_profile() {
    let samples: [(&str, Format); 11] = [
        ("just words", Format::Plain),
        ("# h\ntext", Format::Markdown),
        ("<p>x</p>", Format::Html),
        (r#"<span style="color:#f00">x</span>"#, Format::Rich),
        ("let x = 1;", Format::Code),
        (r#"<p class="MsoNormal">x</p>"#, Format::Word),
        (r"{\rtf1 x}", Format::Rtf),
        ("<w:document><w:t>x</w:t></w:document>", Format::Docx),
        (r#"{"k": "v"}"#, Format::Json),
        ("<a><b>x</b></a>", Format::Xml),
        ("a,b\n1,2", Format::Csv),
    ];
    for (content, format) in samples {
        let markup = render(content, format);
        let safe = sanitize(&markup, format.sanitize_profile());
        assert!(!safe.contains("<script"), "{:?} leaked script surface", format);
        // Sanitizing rendered output must be stable
        assert_eq!(safe, sanitize(&safe, format.sanitize_profile()), "{:?}", format);
    }
}
