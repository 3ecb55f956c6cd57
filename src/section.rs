use std::fmt::Display;

use crate::conversions::{self, BooleanStringStyle};
use crate::error::EntryError;
use crate::path;

/// A `[name]` block: an ordered list of key/value pairs. Values are always stored as text and
/// converted on access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn with_entries(name: String, entries: Vec<(String, String)>) -> Self {
        Self { name, entries }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key/value pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Append a key that must not exist yet.
    pub fn add_key(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EntryError> {
        let key = key.into();

        if self.key_exists(&key) {
            return Err(EntryError::KeyExists { key });
        }

        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Replace the value of `key` in place, or append it if it is new.
    pub fn add_or_replace_key(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the removed value, if the key was present.
    pub fn remove_key(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn key_exists(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Raw value of the first entry named `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.value(key).unwrap_or(default)
    }

    #[must_use]
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        conversions::int_from_str(self.get_string(key, ""), default)
    }

    #[must_use]
    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        conversions::double_from_str(self.get_string(key, ""), default)
    }

    #[must_use]
    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        conversions::float_from_str(self.get_string(key, ""), default)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        conversions::bool_from_str(self.get_string(key, ""), default)
    }

    /// Split the value on `separator`, skip empty pieces and convert the rest. A missing key is
    /// an empty list.
    #[must_use]
    pub fn get_list<T, F>(&self, key: &str, separator: char, converter: F) -> Vec<T>
    where
        F: FnMut(&str) -> T,
    {
        self.get_string(key, "")
            .split(separator)
            .filter(|part| !part.is_empty())
            .map(converter)
            .collect()
    }

    /// Like [`Section::get_string`], with `/` and `\` rewritten to the platform separator.
    #[must_use]
    pub fn get_path_string(&self, key: &str, default: &str) -> String {
        path::normalize_separators(self.get_string(key, default))
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.add_or_replace_key(key, value);
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.add_or_replace_key(key, value.to_string());
    }

    pub fn set_double(&mut self, key: impl Into<String>, value: f64) {
        self.add_or_replace_key(key, value.to_string());
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.add_or_replace_key(key, value.to_string());
    }

    pub fn set_float_with_decimals(&mut self, key: impl Into<String>, value: f32, decimals: usize) {
        self.add_or_replace_key(
            key,
            conversions::float_to_string_with_decimals(value, decimals),
        );
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set_bool_with_style(key, value, BooleanStringStyle::default());
    }

    pub fn set_bool_with_style(
        &mut self,
        key: impl Into<String>,
        value: bool,
        style: BooleanStringStyle,
    ) {
        self.add_or_replace_key(key, conversions::bool_to_string(value, style));
    }

    pub fn set_list<T: Display>(&mut self, key: impl Into<String>, list: &[T], separator: char) {
        let value = list
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(separator.to_string().as_str());

        self.add_or_replace_key(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_keeps_single_entry() {
        let mut section = Section::new("General");
        section.set_string("K", "a");
        section.set_string("K", "b");

        assert_eq!(section.get_string("K", ""), "b");
        assert_eq!(section.keys().filter(|&k| k == "K").count(), 1);
    }

    #[test]
    fn upsert_preserves_position() {
        let mut section = Section::new("General");
        section.set_int("first", 1);
        section.set_int("second", 2);
        section.set_int("first", 3);

        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(section.get_int("first", 0), 3);
    }

    #[test]
    fn strict_add_rejects_duplicates() {
        let mut section = Section::new("General");
        section.add_key("K", "a").expect("first insert should succeed");

        let result = section.add_key("K", "b");

        assert_eq!(
            result,
            Err(EntryError::KeyExists {
                key: "K".to_owned()
            })
        );
        assert_eq!(section.get_string("K", ""), "a");
        assert_eq!(section.len(), 1);
    }

    #[test]
    fn typed_getters_fall_back_to_default() {
        let mut section = Section::new("Video");
        section.set_string("Width", "notanumber");
        section.set_string("Scale", "1.25");
        section.set_string("Fullscreen", "xyz");

        assert_eq!(section.get_int("Width", 7), 7);
        assert_eq!(section.get_int("Missing", 640), 640);
        assert!((section.get_double("Scale", 0.0) - 1.25).abs() < f64::EPSILON);
        assert!((section.get_float("Scale", 0.0) - 1.25).abs() < f32::EPSILON);
        assert!(!section.get_bool("Fullscreen", false));
        assert!(section.get_bool("Fullscreen", true));
        assert_eq!(section.get_string("Missing", "X"), "X");
    }

    #[test]
    fn typed_setters_use_invariant_format() {
        let mut section = Section::new("Video");
        section.set_double("Gamma", 2.5);
        section.set_float("Scale", 0.75);
        section.set_float_with_decimals("Volume", 1234.5, 2);
        section.set_int("Width", -1024);
        section.set_bool("Windowed", true);
        section.set_bool_with_style("VSync", false, BooleanStringStyle::OneZero);

        assert_eq!(section.get_string("Gamma", ""), "2.5");
        assert_eq!(section.get_string("Scale", ""), "0.75");
        assert_eq!(section.get_string("Volume", ""), "1234.50");
        assert_eq!(section.get_string("Width", ""), "-1024");
        assert_eq!(section.get_string("Windowed", ""), "True");
        assert_eq!(section.get_string("VSync", ""), "0");
    }

    #[test]
    fn lists() {
        let mut section = Section::new("Lists");
        section.set_list("Ids", &[1, 2, 3], ',');
        section.set_string("Sparse", ",a,,b,");

        assert_eq!(section.get_string("Ids", ""), "1,2,3");
        assert_eq!(
            section.get_list("Ids", ',', |s| conversions::int_from_str(s, 0)),
            vec![1, 2, 3]
        );
        assert_eq!(
            section.get_list("Sparse", ',', str::to_owned),
            vec!["a".to_owned(), "b".to_owned()]
        );
        assert!(section.get_list("Missing", ',', str::to_owned).is_empty());
    }

    #[test]
    fn path_strings() {
        let mut section = Section::new("Paths");
        section.set_string("Theme", "Resources\\Themes/Default");

        let expected = std::path::Path::new("Resources")
            .join("Themes")
            .join("Default");

        assert_eq!(
            section.get_path_string("Theme", ""),
            expected.to_string_lossy()
        );
    }

    #[test]
    fn remove_and_clear() {
        let mut section = Section::new("General");
        section.set_string("a", "1");
        section.set_string("b", "2");

        assert_eq!(section.remove_key("a"), Some("1".to_owned()));
        assert_eq!(section.remove_key("a"), None);
        assert!(!section.key_exists("a"));

        section.clear();
        assert!(section.is_empty());
        assert_eq!(section.name(), "General");
    }
}
