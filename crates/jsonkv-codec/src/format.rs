//! JSON text layout for encoded entries.
//!
//! Stored entries use single-line JSON with `", "` between items and `": "`
//! between keys and values, the layout flat stores written by other hosts
//! already carry. Non-ASCII characters are escaped as `\uXXXX` unless the
//! codec is configured otherwise.

use std::io;

use serde_json::ser::Formatter;

/// Single-line JSON formatter with spaced separators.
#[derive(Clone, Copy, Debug)]
pub struct SpacedFormatter {
    ensure_ascii: bool,
}

impl SpacedFormatter {
    pub fn new(ensure_ascii: bool) -> Self {
        Self { ensure_ascii }
    }
}

impl Default for SpacedFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.ensure_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    fn render(value: &serde_json::Value, ensure_ascii: bool) -> String {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter::new(ensure_ascii));
        value.serialize(&mut ser).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn arrays_use_spaced_separator() {
        assert_eq!(render(&json!([1, "two"]), true), "[1, \"two\"]");
    }

    #[test]
    fn objects_use_spaced_separators() {
        assert_eq!(
            render(&json!({"a": 1, "b": [true, null]}), true),
            "{\"a\": 1, \"b\": [true, null]}"
        );
    }

    #[test]
    fn empty_containers_have_no_padding() {
        assert_eq!(render(&json!([]), true), "[]");
        assert_eq!(render(&json!({}), true), "{}");
    }

    #[test]
    fn non_ascii_is_escaped_by_default() {
        assert_eq!(render(&json!("café"), true), "\"caf\\u00e9\"");
    }

    #[test]
    fn astral_chars_escape_as_surrogate_pairs() {
        assert_eq!(render(&json!("😀"), true), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn non_ascii_passes_through_when_allowed() {
        assert_eq!(render(&json!("café"), false), "\"café\"");
    }

    #[test]
    fn control_chars_still_escaped() {
        assert_eq!(render(&json!("a\nb\"c"), true), "\"a\\nb\\\"c\"");
    }
}
