use std::fmt::Write as _;
use std::io;

use crate::IniFile;
use crate::parser::LINE_TERMINATOR;

/// Render `ini` in canonical form: optional `; comment` header, then each section followed by a
/// blank line, then one more blank line. Every line ends in CRLF.
///
/// Nothing is escaped. A value holding a line break will not survive a re-read.
#[must_use]
pub fn render(ini: &IniFile) -> String {
    let mut out = String::with_capacity(4096);

    if let Some(comment) = ini.comment() {
        _ = write!(out, "; {comment}{LINE_TERMINATOR}{LINE_TERMINATOR}");
    }

    for section in ini.sections() {
        _ = write!(out, "[{}]{LINE_TERMINATOR}", section.name());

        for (key, value) in section.entries() {
            _ = write!(out, "{key}={value}{LINE_TERMINATOR}");
        }

        out.push_str(LINE_TERMINATOR);
    }

    out.push_str(LINE_TERMINATOR);
    out
}

/// Render `ini` and write it in the document's encoding.
pub fn write_to<W: io::Write>(ini: &IniFile, writer: &mut W) -> io::Result<()> {
    let bytes = ini.encoding().encode(&render(ini));
    writer.write_all(&bytes)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encoding;

    #[test]
    fn canonical_layout() {
        let mut ini = IniFile::new();
        ini.set_string("General", "Name", "Alpha");
        ini.set_int("General", "Count", 3);
        ini.add_section_named("Empty")
            .expect("section should not exist yet");

        assert_eq!(
            render(&ini),
            "[General]\r\nName=Alpha\r\nCount=3\r\n\r\n[Empty]\r\n\r\n\r\n"
        );
    }

    #[test]
    fn leading_comment() {
        let mut ini = IniFile::new();
        ini.set_comment(Some("generated".to_owned()));
        ini.set_string("A", "k", "v");

        assert_eq!(render(&ini), "; generated\r\n\r\n[A]\r\nk=v\r\n\r\n\r\n");
    }

    #[test]
    fn empty_document() {
        assert_eq!(render(&IniFile::new()), "\r\n");
    }

    #[test]
    fn multi_line_values_are_written_verbatim() {
        let ini = "[A]\nMsg=$$$TextBlockBegin$$$\nline1\nline2\n$$$TextBlockEnd$$$\n"
            .parse::<IniFile>()
            .expect("failed to parse hardcoded INI data");

        assert_eq!(render(&ini), "[A]\r\nMsg=line1\r\nline2\r\n\r\n\r\n");
    }

    #[test]
    fn writes_in_document_encoding() {
        let mut ini = IniFile::new();
        ini.set_encoding(Encoding::Utf16Le);
        ini.set_string("A", "k", "v");

        let mut buffer = Vec::new();
        write_to(&ini, &mut buffer).expect("writing to a Vec cannot fail");

        assert_eq!(&buffer[..2], &[0xFF, 0xFE]);

        let reparsed = IniFile::from_reader(&mut buffer.as_slice())
            .expect("failed to parse written INI data");
        assert_eq!(reparsed.encoding(), Encoding::Utf16Le);
        assert_eq!(reparsed.get_string("A", "k", ""), "v");
    }
}
