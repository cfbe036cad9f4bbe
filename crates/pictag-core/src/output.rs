//! JSON / JSON Lines output for labels and search hits.

use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON array (or object) per call
    Json,
    /// One JSON object per line
    JsonLines,
}

/// Serializes results to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`]; JSON Lines is always compact.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single item followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        self.write_value(item)?;
        self.writer.flush()
    }

    /// Write a list of items: an array for JSON, one line each for JSONL.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write_value(items)?,
            OutputFormat::JsonLines => {
                for item in items {
                    self.write_value(item)?;
                }
            }
        }
        self.writer.flush()
    }

    fn write_value<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FetchFailure, FetchReport, Label, SearchHit};
    use std::path::PathBuf;

    fn hits() -> Vec<SearchHit> {
        vec![
            SearchHit {
                index: "images".to_string(),
                id: "1".to_string(),
                score: Some(1.2),
                source: serde_json::json!({ "tags": ["nature"] }),
            },
            SearchHit {
                index: "images".to_string(),
                id: "2".to_string(),
                score: None,
                source: serde_json::json!({ "tags": ["nature", "lake"] }),
            },
        ]
    }

    #[test]
    fn test_write_labels_pretty_array() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::Json, true)
            .write_all(&[Label::new("Tree", 92.0), Label::new("Plant", 80.0)])
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.contains("\n  {"));
        assert!(output.contains("\"name\": \"Tree\""));
    }

    #[test]
    fn test_write_hits_jsonl_keeps_es_field_names() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true)
            .write_all(&hits())
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"_id\":\"1\""));
        assert!(lines[1].contains("\"_score\":null"));
    }

    #[test]
    fn test_write_empty_list() {
        let mut json = Vec::new();
        OutputWriter::new(&mut json, OutputFormat::Json, false)
            .write_all::<Label>(&[])
            .unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "[]\n");

        let mut jsonl = Vec::new();
        OutputWriter::new(&mut jsonl, OutputFormat::JsonLines, false)
            .write_all::<Label>(&[])
            .unwrap();
        assert!(jsonl.is_empty());
    }

    #[test]
    fn test_write_single_report_object() {
        let report = FetchReport {
            downloaded: vec![PathBuf::from("out/a.jpg")],
            failed: vec![FetchFailure {
                key: "images/b.jpg".to_string(),
                error: "object not found".to_string(),
            }],
            ..FetchReport::default()
        };

        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::Json, false)
            .write(&report)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.ends_with("}\n"));
        assert_eq!(output.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["downloaded"][0], "out/a.jpg");
        assert_eq!(value["failed"][0]["key"], "images/b.jpg");
    }
}
