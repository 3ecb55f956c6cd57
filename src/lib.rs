#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

pub mod conversions;
mod encoding;
mod error;
pub mod logging;
mod parser;
pub mod path;
mod property;
mod section;
mod writer;

use std::cell::Cell;
use std::fs;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

pub use crate::conversions::BooleanStringStyle;
pub use crate::encoding::Encoding;
pub use crate::error::{EntryError, ParseError, WriteError};
pub use crate::parser::{TEXT_BLOCK_BEGIN, TEXT_BLOCK_END};
pub use crate::property::{IniValue, Property};
pub use crate::section::Section;

/// Section holding directives for the INI system itself.
pub const SYSTEM_SECTION: &str = "INISystem";
/// Key in [`SYSTEM_SECTION`] naming a file, relative to this one, to use as the base layer.
pub const BASED_ON_KEY: &str = "BasedOn";

/// An INI document: an ordered list of uniquely named sections.
#[derive(Debug, Clone)]
pub struct IniFile {
    file_path: Option<PathBuf>,
    sections: Vec<Section>,
    allow_new_sections: bool,
    comment: Option<String>,
    encoding: Encoding,
    // Index of the section found by the previous lookup; the next lookup scans from here first.
    last_section: Cell<usize>,
}

impl Default for IniFile {
    fn default() -> Self {
        Self {
            file_path: None,
            sections: Vec::new(),
            allow_new_sections: true,
            comment: None,
            encoding: Encoding::default(),
            last_section: Cell::new(0),
        }
    }
}

impl IniFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the file at `path`, applying `BasedOn` inheritance. A file that does not exist
    /// yields an empty document that still remembers `path` for writing.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ParseError> {
        let mut ini = Self {
            file_path: Some(path.into()),
            ..Self::default()
        };
        ini.parse_file()?;
        Ok(ini)
    }

    /// Parse a stream. Without a file path, `BasedOn` is resolved against the working directory.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ParseError> {
        let mut ini = Self::new();
        ini.parse_reader(reader)?;
        Ok(ini)
    }

    /// Parse the file at [`IniFile::file_path`] on top of the current contents.
    ///
    /// Combined with [`IniFile::set_allow_new_sections`] and pre-registered sections this loads
    /// only the sections the caller asked for.
    pub fn parse_file(&mut self) -> Result<(), ParseError> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };

        let mut chain = vec![chain_key(&path)];
        self.parse_file_chained(&path, &mut chain)
    }

    pub fn parse_reader<R: Read>(&mut self, reader: &mut R) -> Result<(), ParseError> {
        let mut buffer = Vec::with_capacity(8192);
        reader.read_to_end(&mut buffer)?;

        let mut chain = self
            .file_path
            .as_deref()
            .map(chain_key)
            .into_iter()
            .collect::<Vec<PathBuf>>();
        self.parse_bytes(&buffer, &mut chain)
    }

    /// Drop all sections and parse the file again.
    pub fn reload(&mut self) -> Result<(), ParseError> {
        self.sections.clear();
        self.last_section.set(0);
        self.parse_file()
    }

    fn parse_file_chained(
        &mut self,
        path: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<(), ParseError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "INI file not found; starting empty");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), bytes = data.len(), "parsing INI file");
        self.parse_bytes(&data, chain)
    }

    fn parse_bytes(&mut self, data: &[u8], chain: &mut Vec<PathBuf>) -> Result<(), ParseError> {
        let (encoding, text) = Encoding::decode(data);
        self.encoding = encoding;

        parser::Parser::new(&text).parse_into(&mut self.sections, self.allow_new_sections)?;
        self.apply_base_ini(chain)
    }

    /// Layer this document over the file named by `[INISystem] BasedOn`, if any. The base is
    /// parsed (with its own inheritance) into a separate document, this document's keys are
    /// written over it and the merged sections replace ours.
    fn apply_base_ini(&mut self, chain: &mut Vec<PathBuf>) -> Result<(), ParseError> {
        let based_on = self.get_string(SYSTEM_SECTION, BASED_ON_KEY, "");

        if based_on.is_empty() {
            return Ok(());
        }

        let directory = self.file_path.as_deref().map_or(Path::new(""), path::directory_of);
        let base_path = directory.join(path::normalize_separators(based_on));
        let key = chain_key(&base_path);

        if chain.contains(&key) {
            warn!(path = %base_path.display(), "circular BasedOn chain; ignoring base file");
            return Ok(());
        }

        debug!(path = %base_path.display(), "applying base INI file");

        let mut base = Self {
            file_path: Some(base_path.clone()),
            ..Self::default()
        };

        chain.push(key);
        base.parse_file_chained(&base_path, chain)?;
        chain.pop();

        base.consolidate(self);
        self.sections = base.sections;
        self.last_section.set(0);

        Ok(())
    }

    /// Copy every section and key of `other` into this document; `other` wins on conflicts.
    pub fn consolidate(&mut self, other: &IniFile) {
        for section in &other.sections {
            let target = self.section_or_insert(section.name());

            for (key, value) in section.entries() {
                target.set_string(key.as_str(), value.as_str());
            }
        }
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    #[must_use]
    pub fn allow_new_sections(&self) -> bool {
        self.allow_new_sections
    }

    /// When `false`, parsing only fills sections that already exist in the document.
    pub fn set_allow_new_sections(&mut self, allow: bool) {
        self.allow_new_sections = allow;
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Comment written as `; comment` above the first section.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(Section::name).collect()
    }

    /// Key names of a section in order; `None` when the section does not exist, which is not the
    /// same as an existing section without keys.
    #[must_use]
    pub fn section_keys(&self, name: &str) -> Option<Vec<&str>> {
        self.section(name).map(|section| section.keys().collect())
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        let start = self.last_section.get().min(self.sections.len());
        let found = self.sections[start..]
            .iter()
            .position(|s| s.name() == name)
            .map(|i| i + start)
            .or_else(|| self.sections[..start].iter().position(|s| s.name() == name));

        self.last_section.set(found.unwrap_or(0));
        found
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.section_index(name).map(|i| &self.sections[i])
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.section_index(name).map(|i| &mut self.sections[i])
    }

    fn section_or_insert(&mut self, name: &str) -> &mut Section {
        let i = self.section_index(name).unwrap_or_else(|| {
            self.sections.push(Section::new(name));
            self.sections.len() - 1
        });

        &mut self.sections[i]
    }

    #[must_use]
    pub fn section_exists(&self, name: &str) -> bool {
        self.section_index(name).is_some()
    }

    #[must_use]
    pub fn key_exists(&self, section: &str, key: &str) -> bool {
        self.section(section).is_some_and(|s| s.key_exists(key))
    }

    /// Append `section`. Names are unique, so an existing name is rejected.
    pub fn add_section(&mut self, section: Section) -> Result<&mut Section, EntryError> {
        if self.section_exists(section.name()) {
            return Err(EntryError::SectionExists {
                name: section.name().to_owned(),
            });
        }

        self.sections.push(section);
        let i = self.sections.len() - 1;
        Ok(&mut self.sections[i])
    }

    pub fn add_section_named(&mut self, name: &str) -> Result<&mut Section, EntryError> {
        self.add_section(Section::new(name))
    }

    /// Remove the first section whose name matches `name` ignoring case.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let name = name.to_lowercase();
        let i = self
            .sections
            .iter()
            .position(|s| s.name().to_lowercase() == name)?;

        self.last_section.set(0);
        Some(self.sections.remove(i))
    }

    /// Remove every key of a section but keep the section itself.
    pub fn erase_section_keys(&mut self, name: &str) {
        if let Some(section) = self.section_mut(name) {
            section.clear();
        }
    }

    pub fn move_section_to_first(&mut self, name: &str) {
        if let Some(i) = self.section_index(name) {
            let section = self.sections.remove(i);
            self.sections.insert(0, section);
            self.last_section.set(0);
        }
    }

    /// Replace section `second` with the keys of `first` overlaid by the keys of `second`.
    /// `first` is left untouched. Does nothing unless both sections exist.
    pub fn combine_sections(&mut self, first: &str, second: &str) {
        let (Some(first), Some(second)) = (self.section_index(first), self.section_index(second))
        else {
            return;
        };

        let mut combined = Section::with_entries(
            self.sections[second].name().to_owned(),
            self.sections[first].entries().to_vec(),
        );

        for (key, value) in self.sections[second].entries() {
            combined.add_or_replace_key(key.as_str(), value.as_str());
        }

        self.sections[second] = combined;
    }

    #[must_use]
    pub fn try_get_string(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.value(key))
    }

    #[must_use]
    pub fn get_string<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.try_get_string(section, key).unwrap_or(default)
    }

    #[must_use]
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.section(section)
            .map_or(default, |s| s.get_int(key, default))
    }

    #[must_use]
    pub fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.section(section)
            .map_or(default, |s| s.get_double(key, default))
    }

    #[must_use]
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.section(section)
            .map_or(default, |s| s.get_float(key, default))
    }

    #[must_use]
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.section(section)
            .map_or(default, |s| s.get_bool(key, default))
    }

    /// See [`Section::get_list`]. A missing section or key is an empty list.
    #[must_use]
    pub fn get_list<T, F>(&self, section: &str, key: &str, separator: char, converter: F) -> Vec<T>
    where
        F: FnMut(&str) -> T,
    {
        self.section(section)
            .map_or_else(Vec::new, |s| s.get_list(key, separator, converter))
    }

    #[must_use]
    pub fn get_path_string(&self, section: &str, key: &str, default: &str) -> String {
        path::normalize_separators(self.get_string(section, key, default))
    }

    /// Strict insert; fails if the key already exists. Creates the section when missing.
    pub fn add_key(
        &mut self,
        section: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EntryError> {
        self.section_or_insert(section).add_key(key, value)
    }

    pub fn set_string(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.section_or_insert(section).set_string(key, value);
    }

    pub fn set_int(&mut self, section: &str, key: impl Into<String>, value: i32) {
        self.section_or_insert(section).set_int(key, value);
    }

    pub fn set_double(&mut self, section: &str, key: impl Into<String>, value: f64) {
        self.section_or_insert(section).set_double(key, value);
    }

    pub fn set_float(&mut self, section: &str, key: impl Into<String>, value: f32) {
        self.section_or_insert(section).set_float(key, value);
    }

    pub fn set_float_with_decimals(
        &mut self,
        section: &str,
        key: impl Into<String>,
        value: f32,
        decimals: usize,
    ) {
        self.section_or_insert(section)
            .set_float_with_decimals(key, value, decimals);
    }

    pub fn set_bool(&mut self, section: &str, key: impl Into<String>, value: bool) {
        self.section_or_insert(section).set_bool(key, value);
    }

    pub fn set_bool_with_style(
        &mut self,
        section: &str,
        key: impl Into<String>,
        value: bool,
        style: BooleanStringStyle,
    ) {
        self.section_or_insert(section)
            .set_bool_with_style(key, value, style);
    }

    pub fn set_list<T: std::fmt::Display>(
        &mut self,
        section: &str,
        key: impl Into<String>,
        list: &[T],
        separator: char,
    ) {
        self.section_or_insert(section)
            .set_list(key, list, separator);
    }

    pub fn remove_key(&mut self, section: &str, key: &str) -> Option<String> {
        self.section_mut(section)?.remove_key(key)
    }

    /// Canonical text form; see [`IniFile::write_to`].
    #[must_use]
    pub fn to_ini_string(&self) -> String {
        writer::render(self)
    }

    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writer::write_to(self, out)
    }

    /// Write back to the path this document was created from.
    pub fn write(&self) -> Result<(), WriteError> {
        let path = self.file_path.as_deref().ok_or(WriteError::MissingPath)?;
        self.write_to_path(path)
    }

    /// Write to `path`, replacing any existing file.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let path = path.as_ref();
        let mut file = BufWriter::new(fs::File::create(path)?);

        self.write_to(&mut file)?;
        debug!(path = %path.display(), sections = self.sections.len(), "wrote INI file");

        Ok(())
    }
}

impl FromStr for IniFile {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(&mut s.as_bytes())
    }
}

/// Identity of a file within a `BasedOn` chain.
fn chain_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
