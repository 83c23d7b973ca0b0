use crate::catalog::{Catalog, Comments, Entry};
use crate::error::{TranslateError, TranslateResult};

/// A parsed PO document. `header` keeps the raw bytes of the metadata block
/// (empty msgid) so serialization can emit it unchanged.
#[derive(Debug, Clone)]
pub struct PoDocument {
    pub header: Option<String>,
    pub catalog: Catalog,
}

/// Parses gettext PO text into an ordered catalog. The header record is
/// captured verbatim and excluded from the catalog; duplicate
/// (context, msgid) pairs follow last-write-wins.
pub fn parse(content: &str) -> TranslateResult<PoDocument> {
    let mut header: Option<String> = None;
    let mut catalog = Catalog::new();
    let mut block = Block::default();
    let mut line_no = 0usize;

    for raw in content.split_inclusive('\n') {
        line_no += 1;
        let line = strip_line_ending(raw);
        if line.trim().is_empty() {
            block.flush(&mut header, &mut catalog)?;
            continue;
        }

        // A msgstr closes a message. Any following line that is not a
        // continuation or a plural slot starts the next block, blank
        // separator or not.
        let continues_block = line.starts_with('"') || line.starts_with("msgstr[");
        if block.translation.is_some() && !continues_block {
            block.flush(&mut header, &mut catalog)?;
        }

        block.raw.push_str(raw);

        if line.starts_with('#') {
            block.push_comment(line);
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            if block.source.is_none() {
                return Err(parse_error(line_no, "msgid_plural without msgid"));
            }
            parse_quoted(rest, line_no)?;
            block.field = Field::Plural;
        } else if let Some(rest) = line.strip_prefix("msgid") {
            if block.source.is_some() {
                return Err(parse_error(line_no, "duplicate msgid"));
            }
            block.source = Some(parse_quoted(rest, line_no)?);
            block.source_line = line_no;
            block.field = Field::Source;
        } else if let Some(rest) = line.strip_prefix("msgstr[") {
            let close = rest
                .find(']')
                .ok_or_else(|| parse_error(line_no, "malformed msgstr index"))?;
            let index: usize = rest[..close]
                .trim()
                .parse()
                .map_err(|_| parse_error(line_no, "malformed msgstr index"))?;
            if block.source.is_none() {
                return Err(parse_error(line_no, "msgstr without msgid"));
            }
            let value = parse_quoted(&rest[close + 1..], line_no)?;
            if index == 0 {
                if block.translation.is_some() {
                    return Err(parse_error(line_no, "duplicate msgstr"));
                }
                block.translation = Some(value);
                block.field = Field::Translation;
            } else {
                block.field = Field::PluralTranslation;
            }
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            if block.source.is_none() {
                return Err(parse_error(line_no, "msgstr without msgid"));
            }
            block.translation = Some(parse_quoted(rest, line_no)?);
            block.field = Field::Translation;
        } else if let Some(rest) = line.strip_prefix("msgctxt") {
            if block.source.is_some() {
                return Err(parse_error(line_no, "msgctxt must precede msgid"));
            }
            if block.context.is_some() {
                return Err(parse_error(line_no, "duplicate msgctxt"));
            }
            block.context = Some(parse_quoted(rest, line_no)?);
            block.field = Field::Context;
        } else if line.starts_with('"') {
            let value = parse_quoted(line, line_no)?;
            match block.field {
                Field::None => {
                    return Err(parse_error(line_no, "string continuation without a field"));
                }
                Field::Context => {
                    if let Some(context) = block.context.as_mut() {
                        context.push_str(&value);
                    }
                }
                Field::Source => {
                    if let Some(source) = block.source.as_mut() {
                        source.push_str(&value);
                    }
                }
                Field::Translation => {
                    if let Some(translation) = block.translation.as_mut() {
                        translation.push_str(&value);
                    }
                }
                Field::Plural | Field::PluralTranslation => {}
            }
        } else {
            return Err(parse_error(line_no, "unrecognized line"));
        }
    }
    block.flush(&mut header, &mut catalog)?;

    Ok(PoDocument { header, catalog })
}

/// Regenerates PO text from edited entries. The header block is recovered
/// from `original` and emitted byte for byte; every message block is written
/// from `entries`, regrouped by context in first-seen order.
pub fn serialize(entries: &[Entry], original: &str) -> TranslateResult<String> {
    let document = parse(original)?;
    let catalog: Catalog = entries.iter().cloned().collect();

    let mut out = String::new();
    if let Some(raw) = &document.header {
        out.push_str(raw);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    for entry in catalog.entries() {
        if !out.is_empty() {
            out.push('\n');
        }
        write_block(&mut out, entry);
    }
    Ok(out)
}

#[derive(Default)]
enum Field {
    #[default]
    None,
    Context,
    Source,
    Plural,
    Translation,
    PluralTranslation,
}

#[derive(Default)]
struct Block {
    raw: String,
    context: Option<String>,
    source: Option<String>,
    source_line: usize,
    translation: Option<String>,
    translator: Vec<String>,
    extracted: Vec<String>,
    reference: Vec<String>,
    field: Field,
}

impl Block {
    fn push_comment(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix("#.") {
            self.extracted.push(comment_text(rest));
        } else if let Some(rest) = line.strip_prefix("#:") {
            self.reference.push(comment_text(rest));
        } else if line.starts_with("#,") || line.starts_with("#|") || line.starts_with("#~") {
            // flags, previous-msgid and obsolete records are accepted on
            // input but not modeled
        } else {
            self.translator.push(comment_text(&line[1..]));
        }
    }

    fn flush(&mut self, header: &mut Option<String>, catalog: &mut Catalog) -> TranslateResult<()> {
        let block = std::mem::take(self);
        if block.raw.is_empty() {
            return Ok(());
        }
        let Some(source) = block.source else {
            // comment-only run, nothing addressable
            return Ok(());
        };
        let Some(translation) = block.translation else {
            return Err(parse_error(block.source_line, "msgid without msgstr"));
        };
        if source.is_empty() {
            if block.context.is_none() && header.is_none() {
                *header = Some(block.raw);
            }
            return Ok(());
        }
        catalog.insert(Entry {
            source_text: source,
            translated_text: translation,
            context: block.context,
            comments: Comments {
                reference: join_comment(block.reference),
                extracted: join_comment(block.extracted),
                translator: join_comment(block.translator),
            },
        });
        Ok(())
    }
}

fn write_block(out: &mut String, entry: &Entry) {
    if let Some(text) = &entry.comments.translator {
        write_comment(out, "#", text);
    }
    if let Some(text) = &entry.comments.extracted {
        write_comment(out, "#.", text);
    }
    if let Some(text) = &entry.comments.reference {
        write_comment(out, "#:", text);
    }
    if let Some(context) = &entry.context {
        write_field(out, "msgctxt", context);
    }
    write_field(out, "msgid", &entry.source_text);
    write_field(out, "msgstr", &entry.translated_text);
}

fn write_comment(out: &mut String, marker: &str, text: &str) {
    for segment in text.split('\n') {
        out.push_str(marker);
        if !segment.is_empty() {
            out.push(' ');
            out.push_str(segment);
        }
        out.push('\n');
    }
}

fn write_field(out: &mut String, keyword: &str, value: &str) {
    out.push_str(keyword);
    out.push(' ');
    if value.contains('\n') {
        out.push_str("\"\"\n");
        for segment in value.split_inclusive('\n') {
            out.push('"');
            out.push_str(&escape(segment));
            out.push_str("\"\n");
        }
    } else {
        out.push('"');
        out.push_str(&escape(value));
        out.push_str("\"\n");
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

fn parse_quoted(rest: &str, line_no: usize) -> TranslateResult<String> {
    let rest = rest.trim();
    let mut chars = rest.chars();
    if chars.next() != Some('"') {
        return Err(parse_error(line_no, "expected quoted string"));
    }

    let mut out = String::new();
    let mut closed = false;
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                closed = true;
                break;
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(parse_error(line_no, "unterminated string")),
            },
            other => out.push(other),
        }
    }
    if !closed {
        return Err(parse_error(line_no, "unterminated string"));
    }
    if !chars.as_str().trim().is_empty() {
        return Err(parse_error(line_no, "unexpected content after closing quote"));
    }
    Ok(out)
}

fn comment_text(rest: &str) -> String {
    rest.strip_prefix(' ').unwrap_or(rest).to_string()
}

fn join_comment(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn strip_line_ending(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_error(line: usize, message: &str) -> TranslateError {
    TranslateError::Parse(format!("line {}: {}", line, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"msgid ""
msgstr ""
"Project-Id-Version: demo\n"
"Content-Type: text/plain; charset=UTF-8\n"

#: ui/menu.c:12
msgid "Hello"
msgstr "안녕하세요"

#. Button label
msgctxt "menu"
msgid "Open"
msgstr ""
"#;

    #[test]
    fn parses_entries_and_excludes_header() {
        let document = parse(SAMPLE).unwrap();
        assert_eq!(document.catalog.len(), 2);

        let hello = document.catalog.get(None, "Hello").unwrap();
        assert_eq!(hello.translated_text, "안녕하세요");
        assert_eq!(hello.comments.reference.as_deref(), Some("ui/menu.c:12"));

        let open = document.catalog.get(Some("menu"), "Open").unwrap();
        assert_eq!(open.translated_text, "");
        assert_eq!(open.comments.extracted.as_deref(), Some("Button label"));
    }

    #[test]
    fn preserves_header_bytes() {
        let document = parse(SAMPLE).unwrap();
        let expected = "msgid \"\"\nmsgstr \"\"\n\"Project-Id-Version: demo\\n\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n";
        assert_eq!(document.header.as_deref(), Some(expected));
    }

    #[test]
    fn header_comments_stay_in_header_block() {
        let input = "# Korean translation\n# Someone <someone@example.com>\nmsgid \"\"\nmsgstr \"\"\n\"Language: ko\\n\"\n\nmsgid \"Hi\"\nmsgstr \"\"\n";
        let document = parse(input).unwrap();
        let header = document.header.unwrap();
        assert!(header.starts_with("# Korean translation\n"));
        assert!(header.ends_with("\"Language: ko\\n\"\n"));
        assert_eq!(document.catalog.len(), 1);
    }

    #[test]
    fn concatenates_continuation_lines() {
        let input = r#"msgid ""
"first line\n"
"second line"
msgstr ""
"#;
        let document = parse(input).unwrap();
        let entry = document
            .catalog
            .get(None, "first line\nsecond line")
            .unwrap();
        assert_eq!(entry.translated_text, "");
        assert!(document.header.is_none());
    }

    #[test]
    fn decodes_escape_sequences() {
        let input = r#"msgid "tab\there \"quoted\" back\\slash"
msgstr "\uXYZ"
"#;
        let document = parse(input).unwrap();
        let entry = document
            .catalog
            .get(None, "tab\there \"quoted\" back\\slash")
            .unwrap();
        assert_eq!(entry.translated_text, "\\uXYZ");
    }

    #[test]
    fn joins_repeated_comment_lines() {
        let input = "# first note\n# second note\n#: a.c:1\n#: b.c:2\nmsgid \"x\"\nmsgstr \"\"\n";
        let document = parse(input).unwrap();
        let entry = document.catalog.get(None, "x").unwrap();
        assert_eq!(
            entry.comments.translator.as_deref(),
            Some("first note\nsecond note")
        );
        assert_eq!(entry.comments.reference.as_deref(), Some("a.c:1\nb.c:2"));
    }

    #[test]
    fn duplicate_pair_keeps_last_occurrence() {
        let input = "msgid \"Hi\"\nmsgstr \"old\"\n\nmsgid \"Hi\"\nmsgstr \"new\"\n";
        let document = parse(input).unwrap();
        assert_eq!(document.catalog.len(), 1);
        assert_eq!(
            document.catalog.get(None, "Hi").unwrap().translated_text,
            "new"
        );
    }

    #[test]
    fn plural_block_takes_first_slot() {
        let input = r#"msgid "one file"
msgid_plural "many files"
msgstr[0] "파일 하나"
msgstr[1] "파일 여러 개"
"#;
        let document = parse(input).unwrap();
        let entry = document.catalog.get(None, "one file").unwrap();
        assert_eq!(entry.translated_text, "파일 하나");
    }

    #[test]
    fn skips_flags_and_obsolete_records() {
        let input = "#, fuzzy\nmsgid \"a\"\nmsgstr \"b\"\n\n#~ msgid \"gone\"\n#~ msgstr \"x\"\n";
        let document = parse(input).unwrap();
        assert_eq!(document.catalog.len(), 1);
        assert!(document.catalog.get(None, "gone").is_none());
    }

    #[test]
    fn accepts_blocks_without_blank_separators() {
        let input = "msgid \"a\"\nmsgstr \"1\"\nmsgid \"b\"\nmsgstr \"2\"\n";
        let document = parse(input).unwrap();
        assert_eq!(document.catalog.len(), 2);
        assert_eq!(document.catalog.get(None, "b").unwrap().translated_text, "2");
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let input = "msgid \"a\"\r\nmsgstr \"b\"\r\n";
        let document = parse(input).unwrap();
        assert_eq!(document.catalog.get(None, "a").unwrap().translated_text, "b");
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = parse("msgid \"broken\nmsgstr \"\"\n").unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn rejects_msgstr_without_msgid() {
        let err = parse("msgstr \"orphan\"\n").unwrap_err();
        assert!(err.to_string().contains("msgstr without msgid"));
    }

    #[test]
    fn rejects_msgid_without_msgstr() {
        let err = parse("msgid \"alone\"\n").unwrap_err();
        assert!(err.to_string().contains("msgid without msgstr"));
    }

    #[test]
    fn rejects_unrecognized_line() {
        let err = parse("msgid \"a\"\nmsgstr \"b\"\n\nnot a po line\n").unwrap_err();
        assert!(err.to_string().contains("line 4"));
        assert!(err.to_string().contains("unrecognized line"));
    }

    #[test]
    fn rejects_orphan_continuation() {
        let err = parse("\"floating\"\n").unwrap_err();
        assert!(err.to_string().contains("string continuation"));
    }

    #[test]
    fn serializes_unmodified_parse_back_to_input() {
        let document = parse(SAMPLE).unwrap();
        let entries: Vec<Entry> = document.catalog.entries().cloned().collect();
        let output = serialize(&entries, SAMPLE).unwrap();
        assert_eq!(output, SAMPLE);
    }

    #[test]
    fn serialize_writes_edited_translations() {
        let document = parse(SAMPLE).unwrap();
        let mut entries: Vec<Entry> = document.catalog.entries().cloned().collect();
        for entry in &mut entries {
            if entry.source_text == "Open" {
                entry.translated_text = "열기".to_string();
            }
        }
        let output = serialize(&entries, SAMPLE).unwrap();
        assert!(output.contains("msgstr \"열기\""));
        assert!(output.starts_with("msgid \"\"\nmsgstr \"\"\n\"Project-Id-Version: demo\\n\"\n"));
    }

    #[test]
    fn serialize_wraps_multiline_values() {
        let entry = Entry {
            source_text: "first\nsecond".to_string(),
            translated_text: "하나\n둘".to_string(),
            context: None,
            comments: Comments::default(),
        };
        let output = serialize(&[entry], "msgid \"\"\nmsgstr \"\"\n").unwrap();
        assert!(output.contains("msgid \"\"\n\"first\\n\"\n\"second\"\n"));
        assert!(output.contains("msgstr \"\"\n\"하나\\n\"\n\"둘\"\n"));
    }

    #[test]
    fn serialize_escapes_special_characters() {
        let entry = Entry {
            source_text: "say \"hi\"\tnow".to_string(),
            translated_text: "back\\slash".to_string(),
            context: None,
            comments: Comments::default(),
        };
        let output = serialize(&[entry], "msgid \"\"\nmsgstr \"\"\n").unwrap();
        assert!(output.contains(r#"msgid "say \"hi\"\tnow""#));
        assert!(output.contains(r#"msgstr "back\\slash""#));

        let reparsed = parse(&output).unwrap();
        let round = reparsed.catalog.get(None, "say \"hi\"\tnow").unwrap();
        assert_eq!(round.translated_text, "back\\slash");
    }

    #[test]
    fn serialize_rejects_invalid_original() {
        let err = serialize(&[], "garbage that is not po\n").unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)));
    }

    #[test]
    fn serialize_without_header_or_entries() {
        assert_eq!(serialize(&[], "").unwrap(), "");
    }
}
