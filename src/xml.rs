//! XML support: streaming conversion between CSV records and
//! XML, built on `quick-xml`'s pull-event reader/writer rather than an
//! owned DOM, grounded on `csved_fromxml.cpp`/`csved_toxml.cpp`.

use crate::error::{CsvFixError, CsvFixResult};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::io::Cursor;

/// Options controlling `from_xml`, mirroring `FromXMLCommand`'s flags.
pub struct FromXmlOptions {
    /// `@`-separated path to the repeating record element (`-re`), matched
    /// as a suffix of the current DOM path rather than from the root.
    pub record_path: Vec<String>,
    /// Element/attribute names to exclude (`-ex`).
    pub exclude: Vec<String>,
    /// Skip attribute values entirely (`-na`).
    pub no_attributes: bool,
    /// Prepend the matched element path as the first field (`-ip`).
    pub insert_path: bool,
    /// Separator used to join multiple text nodes under one child (`-ml`).
    pub multiline_sep: String,
}

impl Default for FromXmlOptions {
    fn default() -> Self {
        FromXmlOptions {
            record_path: Vec::new(),
            exclude: Vec::new(),
            no_attributes: false,
            insert_path: false,
            multiline_sep: " ".to_string(),
        }
    }
}

/// Read `xml` and emit one CSV record per occurrence of the path named by
/// `opts.record_path`: each attribute and child element text becomes a
/// field, in document order.
pub fn from_xml(xml: &str, opts: &FromXmlOptions) -> CsvFixResult<Vec<Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    let mut in_record_depth: Option<usize> = None;
    let mut current_fields: Vec<(String, String)> = Vec::new();
    let mut current_child: Option<String> = None;
    let mut current_text = String::new();

    loop {
        match reader.read_event().map_err(|e| CsvFixError::CsvParse {
            loc: crate::error::Location { file: "xml".to_string(), line: 0 },
            message: e.to_string(),
            line_text: String::new(),
        })? {
            Event::Start(e) => {
                let name = elem_name(&e);
                stack.push(name.clone());

                if in_record_depth.is_none() && ends_with_path(&stack, &opts.record_path) {
                    in_record_depth = Some(stack.len());
                    current_fields.clear();
                    if opts.insert_path {
                        current_fields.push((String::new(), stack.join("@")));
                    }
                    if !opts.no_attributes {
                        for a in e.attributes().flatten() {
                            let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
                            if opts.exclude.iter().any(|x| x == &key) {
                                continue;
                            }
                            let val = a.unescape_value().unwrap_or_default().to_string();
                            current_fields.push((key, val));
                        }
                    }
                } else if in_record_depth.is_some() {
                    current_child = Some(name);
                    current_text.clear();
                }
            }
            Event::Text(t) => {
                if in_record_depth.is_some() {
                    let s = t.unescape().unwrap_or_default().to_string();
                    if !current_text.is_empty() && !s.is_empty() {
                        current_text.push_str(&opts.multiline_sep);
                    }
                    current_text.push_str(&s);
                }
            }
            Event::End(e) => {
                let name = elem_name_end(&e);
                if let Some(depth) = in_record_depth {
                    if stack.len() == depth && name == *stack.last().unwrap() {
                        rows.push(current_fields.drain(..).map(|(_, v)| v).collect());
                        in_record_depth = None;
                    } else if let Some(child) = current_child.take() {
                        if !opts.exclude.iter().any(|x| x == &child) {
                            current_fields.push((child, current_text.clone()));
                        }
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

/// True when `record_path` matches the trailing segment of `stack`, the
/// suffix-match convention `@`-separated XML paths use throughout csvfix.
fn ends_with_path(stack: &[String], record_path: &[String]) -> bool {
    if record_path.is_empty() || record_path.len() > stack.len() {
        return false;
    }
    stack[stack.len() - record_path.len()..] == *record_path
}

fn elem_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn elem_name_end(e: &BytesEnd) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Options controlling `to_xml`, mirroring `ToXMLCommand`'s flags.
pub struct ToXmlOptions {
    /// Column headers to use as field element names; empty means
    /// positional names `f1`, `f2`, ... as the XHTML-table fallback does.
    pub field_names: Vec<String>,
    /// Name of the repeating record element.
    pub record_name: String,
    /// Name of the document root element.
    pub root_name: String,
    pub indent: bool,
    /// Fields (0-based) whose values become attributes of the record
    /// element instead of child elements.
    pub attribute_fields: Vec<usize>,
    /// Field values are wrapped in `<![CDATA[ ]]>` rather than escaped.
    pub cdata: bool,
    /// Fields (0-based) that group records sharing the same values under
    /// one parent element per distinct combination; each group's element
    /// name is `-gn` (default "group"), and the grouping fields are not
    /// repeated inside the child records.
    pub group_fields: Vec<usize>,
    pub group_name: String,
}

impl Default for ToXmlOptions {
    fn default() -> Self {
        ToXmlOptions {
            field_names: Vec::new(),
            record_name: "record".to_string(),
            root_name: "csv".to_string(),
            indent: true,
            attribute_fields: Vec::new(),
            cdata: false,
            group_fields: Vec::new(),
            group_name: "group".to_string(),
        }
    }
}

fn field_name(opts: &ToXmlOptions, i: usize) -> String {
    opts.field_names.get(i).cloned().unwrap_or_else(|| format!("f{}", i + 1))
}

fn write_record<W: std::io::Write>(
    writer: &mut Writer<W>,
    opts: &ToXmlOptions,
    row: &[String],
) -> CsvFixResult<()> {
    let mut start = BytesStart::new(opts.record_name.clone());
    for &i in &opts.attribute_fields {
        if let Some(v) = row.get(i) {
            start.push_attribute((field_name(opts, i).as_str(), v.as_str()));
        }
    }
    writer.write_event(Event::Start(start)).map_err(to_io_err)?;
    for (i, value) in row.iter().enumerate() {
        if opts.attribute_fields.contains(&i) || opts.group_fields.contains(&i) {
            continue;
        }
        let name = field_name(opts, i);
        writer.write_event(Event::Start(BytesStart::new(name.clone()))).map_err(to_io_err)?;
        if opts.cdata {
            writer
                .write_event(Event::CData(quick_xml::events::BytesCData::new(value)))
                .map_err(to_io_err)?;
        } else {
            writer.write_event(Event::Text(BytesText::new(value))).map_err(to_io_err)?;
        }
        writer.write_event(Event::End(BytesEnd::new(name))).map_err(to_io_err)?;
    }
    writer.write_event(Event::End(BytesEnd::new(opts.record_name.clone()))).map_err(to_io_err)
}

fn group_key(row: &[String], group_fields: &[usize]) -> Vec<String> {
    group_fields.iter().map(|&i| row.get(i).cloned().unwrap_or_default()).collect()
}

/// Write `rows` as XML, one `<record>` (or configured name) per row with
/// one child element (or, via `attribute_fields`, attribute) per field.
/// When `group_fields` is non-empty, consecutive rows sharing the same
/// values for those fields are nested under one `group_name` parent
/// element instead of being written as flat siblings.
pub fn to_xml(rows: &[Vec<String>], opts: &ToXmlOptions) -> CsvFixResult<String> {
    let mut buf = Vec::new();
    let mut writer = if opts.indent {
        Writer::new_with_indent(Cursor::new(&mut buf), b' ', 2)
    } else {
        Writer::new(Cursor::new(&mut buf))
    };

    writer
        .write_event(Event::Start(BytesStart::new(opts.root_name.clone())))
        .map_err(to_io_err)?;

    if opts.group_fields.is_empty() {
        for row in rows {
            write_record(&mut writer, opts, row)?;
        }
    } else {
        let mut current_key: Option<Vec<String>> = None;
        for row in rows {
            let key = group_key(row, &opts.group_fields);
            if current_key.as_ref() != Some(&key) {
                if current_key.is_some() {
                    writer.write_event(Event::End(BytesEnd::new(opts.group_name.clone()))).map_err(to_io_err)?;
                }
                let mut start = BytesStart::new(opts.group_name.clone());
                for (&i, v) in opts.group_fields.iter().zip(key.iter()) {
                    start.push_attribute((field_name(opts, i).as_str(), v.as_str()));
                }
                writer.write_event(Event::Start(start)).map_err(to_io_err)?;
                current_key = Some(key);
            }
            write_record(&mut writer, opts, row)?;
        }
        if current_key.is_some() {
            writer.write_event(Event::End(BytesEnd::new(opts.group_name.clone()))).map_err(to_io_err)?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(opts.root_name.clone())))
        .map_err(to_io_err)?;

    String::from_utf8(buf).map_err(|e| CsvFixError::logic(e.to_string()))
}

fn to_io_err(e: quick_xml::Error) -> CsvFixError {
    CsvFixError::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_xml_extracts_repeated_records() {
        let xml = r#"<rows><row id="1"><name>Alice</name></row><row id="2"><name>Bob</name></row></rows>"#;
        let opts = FromXmlOptions {
            record_path: vec!["rows".to_string(), "row".to_string()],
            ..Default::default()
        };
        let rows = from_xml(xml, &opts).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1".to_string(), "Alice".to_string()]);
        assert_eq!(rows[1], vec!["2".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn from_xml_excludes_named_elements() {
        let xml = r#"<rows><row><name>Alice</name><secret>x</secret></row></rows>"#;
        let opts = FromXmlOptions {
            record_path: vec!["rows".to_string(), "row".to_string()],
            exclude: vec!["secret".to_string()],
            ..Default::default()
        };
        let rows = from_xml(xml, &opts).unwrap();
        assert_eq!(rows[0], vec!["Alice".to_string()]);
    }

    #[test]
    fn from_xml_matches_record_path_as_suffix() {
        let xml = r#"<doc><rows><row><name>Alice</name></row></rows></doc>"#;
        let opts = FromXmlOptions {
            record_path: vec!["row".to_string()],
            ..Default::default()
        };
        let rows = from_xml(xml, &opts).unwrap();
        assert_eq!(rows, vec![vec!["Alice".to_string()]]);
    }

    #[test]
    fn to_xml_emits_one_element_per_field() {
        let rows = vec![vec!["Alice".to_string(), "30".to_string()]];
        let opts = ToXmlOptions {
            field_names: vec!["name".to_string(), "age".to_string()],
            ..Default::default()
        };
        let out = to_xml(&rows, &opts).unwrap();
        assert!(out.contains("<name>Alice</name>"));
        assert!(out.contains("<age>30</age>"));
    }

    #[test]
    fn to_xml_sources_attributes_from_fields() {
        let rows = vec![vec!["1".to_string(), "Alice".to_string()]];
        let opts = ToXmlOptions {
            field_names: vec!["id".to_string(), "name".to_string()],
            attribute_fields: vec![0],
            ..Default::default()
        };
        let out = to_xml(&rows, &opts).unwrap();
        assert!(out.contains(r#"id="1""#));
        assert!(out.contains("<name>Alice</name>"));
        assert!(!out.contains("<id>"));
    }

    #[test]
    fn to_xml_wraps_values_in_cdata() {
        let rows = vec![vec!["<b>x</b>".to_string()]];
        let opts = ToXmlOptions { field_names: vec!["html".to_string()], cdata: true, ..Default::default() };
        let out = to_xml(&rows, &opts).unwrap();
        assert!(out.contains("<![CDATA[<b>x</b>]]>"));
    }

    #[test]
    fn to_xml_groups_records_sharing_key_fields() {
        let rows = vec![
            vec!["US".to_string(), "Alice".to_string()],
            vec!["US".to_string(), "Bob".to_string()],
            vec!["UK".to_string(), "Cat".to_string()],
        ];
        let opts = ToXmlOptions {
            field_names: vec!["country".to_string(), "name".to_string()],
            group_fields: vec![0],
            group_name: "country_group".to_string(),
            ..Default::default()
        };
        let out = to_xml(&rows, &opts).unwrap();
        assert_eq!(out.matches("<country_group").count(), 2);
        assert_eq!(out.matches("<record>").count(), 3);
        assert!(!out.contains("<country>"));
    }
}
