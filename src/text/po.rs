//! gettext PO catalogs for layout strings.
//!
//! Each text panel becomes one message: the panel name is the `msgctxt`, the current text the
//! `msgid`, and the translation goes into `msgstr`. A catalog written by [`Catalog::to_po`] starts
//! with the usual header message (empty `msgid`), which [`Catalog::from_po`] skips.
//!
//! The reader understands the subset of PO that translation tools emit for such catalogs: `#`
//! comments, `msgctxt`/`msgid`/`msgstr` keywords, strings split over several quoted lines, and the
//! escapes `\\`, `\"`, `\n`, `\r` and `\t`. Plural forms are not used by layouts and are rejected.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::{text::TextEntry, Result};

/// One message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Panel name (`msgctxt`)
    pub context: String,
    /// Text as found in the layout (`msgid`)
    pub original: String,
    /// Translated text (`msgstr`), empty if not translated yet
    pub translation: String,
}

/// A list of messages, one per text panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Messages in layout order
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build an untranslated catalog from extracted strings.
    #[must_use]
    pub fn from_entries(entries: &[TextEntry]) -> Self {
        Catalog {
            entries: entries
                .iter()
                .map(|entry| CatalogEntry {
                    context: entry.panel.clone(),
                    original: entry.text.clone(),
                    translation: String::new(),
                })
                .collect(),
        }
    }

    /// The strings to inject: the translation where there is one, the original text otherwise.
    #[must_use]
    pub fn to_entries(&self) -> Vec<TextEntry> {
        self.entries
            .iter()
            .map(|entry| TextEntry {
                panel: entry.context.clone(),
                text: if entry.translation.is_empty() {
                    entry.original.clone()
                } else {
                    entry.translation.clone()
                },
            })
            .collect()
    }

    /// Render as PO text.
    #[must_use]
    pub fn to_po(&self) -> String {
        let mut out = String::new();
        out.push_str("msgid \"\"\nmsgstr \"\"\n");
        out.push_str("\"Content-Type: text/plain; charset=UTF-8\\n\"\n");
        out.push_str("\"Content-Transfer-Encoding: 8bit\\n\"\n");
        let _ = writeln!(out, "\"X-Generator: bclyt {}\\n\"", env!("CARGO_PKG_VERSION"));

        for entry in &self.entries {
            out.push('\n');
            write_field(&mut out, "msgctxt", &entry.context);
            write_field(&mut out, "msgid", &entry.original);
            write_field(&mut out, "msgstr", &entry.translation);
        }

        out
    }

    /// Parse PO text.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] naming the line of the first syntax error, or of a
    /// message without a `msgctxt`.
    pub fn from_po(input: &str) -> Result<Self> {
        let mut reader = PoReader::default();
        for (index, line) in input.lines().enumerate() {
            reader.line(line.trim(), index + 1)?;
        }
        reader.finish()
    }
}

fn write_field(out: &mut String, keyword: &str, value: &str) {
    let lines: Vec<&str> = value.split_inclusive('\n').collect();
    if lines.len() <= 1 {
        let _ = writeln!(out, "{keyword} \"{}\"", escape(value));
        return;
    }

    let _ = writeln!(out, "{keyword} \"\"");
    for line in lines {
        let _ = writeln!(out, "\"{}\"", escape(line));
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(value: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            other => {
                return Err(malformed_error!(
                    "PO line {}: unsupported escape '\\{}'",
                    line,
                    other.map(String::from).unwrap_or_default()
                ))
            }
        }
    }
    Ok(out)
}

/// Extract and unescape the content of a `"..."` token.
fn quoted(token: &str, line: usize) -> Result<String> {
    let inner = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| malformed_error!("PO line {}: expected a quoted string", line))?;
    unescape(inner, line)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Original,
    Translation,
}

#[derive(Default)]
struct PoReader {
    entries: Vec<CatalogEntry>,
    current: Option<(CatalogEntry, bool, usize)>,
    field: Option<Field>,
}

impl PoReader {
    fn line(&mut self, line: &str, number: usize) -> Result<()> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if line.starts_with('"') {
            let value = quoted(line, number)?;
            let (Some(field), Some((entry, _, _))) = (self.field, self.current.as_mut()) else {
                return Err(malformed_error!(
                    "PO line {}: string continuation outside a message",
                    number
                ));
            };
            match field {
                Field::Context => entry.context.push_str(&value),
                Field::Original => entry.original.push_str(&value),
                Field::Translation => entry.translation.push_str(&value),
            }
            return Ok(());
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).ok_or_else(|| {
            malformed_error!("PO line {}: expected a keyword and a string", number)
        })?;
        let value = quoted(rest.trim(), number)?;

        let field = match keyword {
            "msgctxt" => Field::Context,
            "msgid" => Field::Original,
            "msgstr" => Field::Translation,
            other => {
                return Err(malformed_error!(
                    "PO line {}: unsupported keyword '{}'",
                    number,
                    other
                ))
            }
        };

        // msgctxt always opens a message, msgid opens one unless it follows a msgctxt
        let opens = field == Field::Context
            || (field == Field::Original && self.field != Some(Field::Context));
        if opens {
            self.flush()?;
            self.current = Some((CatalogEntry::default(), false, number));
        }

        let Some((entry, has_context, _)) = self.current.as_mut() else {
            return Err(malformed_error!(
                "PO line {}: msgstr without a preceding msgid",
                number
            ));
        };
        match field {
            Field::Context => {
                entry.context = value;
                *has_context = true;
            }
            Field::Original => entry.original = value,
            Field::Translation => entry.translation = value,
        }
        self.field = Some(field);

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let Some((entry, has_context, line)) = self.current.take() else {
            return Ok(());
        };

        if !has_context {
            if entry.original.is_empty() {
                // header message
                return Ok(());
            }
            return Err(malformed_error!(
                "PO line {}: message '{}' has no msgctxt naming its panel",
                line,
                entry.original
            ));
        }

        self.entries.push(entry);
        Ok(())
    }

    fn finish(mut self) -> Result<Catalog> {
        self.flush()?;
        Ok(Catalog {
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog {
            entries: vec![
                CatalogEntry {
                    context: "T_Title".to_string(),
                    original: "Hello".to_string(),
                    translation: "Hola".to_string(),
                },
                CatalogEntry {
                    context: "T_Body".to_string(),
                    original: "Press \"A\"\nto continue".to_string(),
                    translation: String::new(),
                },
            ],
        }
    }

    #[test]
    fn write_format() {
        let po = sample().to_po();
        assert!(po.starts_with("msgid \"\"\nmsgstr \"\"\n"));
        assert!(po.contains("msgctxt \"T_Title\"\nmsgid \"Hello\"\nmsgstr \"Hola\"\n"));
        assert!(po.contains("msgid \"\"\n\"Press \\\"A\\\"\\n\"\n\"to continue\"\n"));
    }

    #[test]
    fn read_back() {
        let catalog = sample();
        assert_eq!(Catalog::from_po(&catalog.to_po()).unwrap(), catalog);
    }

    #[test]
    fn read_tool_output() {
        let po = r#"# Translator comment
msgid ""
msgstr ""
"Language: es-ES\n"

#: layout
msgctxt "T_Title"
msgid "Hello"
msgstr ""
"Ho"
"la"

msgctxt "T_Tab"
msgid "A\tB"
msgstr ""
"#;

        let catalog = Catalog::from_po(po).unwrap();
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.entries[0].translation, "Hola");
        assert_eq!(catalog.entries[1].original, "A\tB");

        let entries = catalog.to_entries();
        assert_eq!(entries[0].text, "Hola");
        assert_eq!(entries[1].text, "A\tB");
    }

    #[test]
    fn syntax_errors() {
        assert!(Catalog::from_po("msgctxt T_Title").is_err());
        assert!(Catalog::from_po("msgid_plural \"x\"").is_err());
        assert!(Catalog::from_po("\"orphan\"").is_err());
        assert!(Catalog::from_po("msgctxt \"a\"\nmsgid \"b\\q\"").is_err());

        match Catalog::from_po("msgid \"Hello\"\nmsgstr \"\"") {
            Err(crate::Error::Malformed { message, .. }) => assert!(message.contains("line 1")),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn from_entries_is_untranslated() {
        let catalog = Catalog::from_entries(&[TextEntry {
            panel: "T_Title".to_string(),
            text: "Hello".to_string(),
        }]);
        assert_eq!(catalog.entries[0].translation, "");
        assert_eq!(catalog.to_entries()[0].text, "Hello");
    }
}
