use std::str::FromStr;

use crate::IniFile;

/// A type that can be read from an INI key with a fallback.
pub trait IniValue: Sized {
    fn read(ini: &IniFile, section: &str, key: &str, default: Self) -> Self;
}

impl IniValue for String {
    fn read(ini: &IniFile, section: &str, key: &str, default: Self) -> Self {
        ini.try_get_string(section, key)
            .map_or(default, str::to_owned)
    }
}

impl IniValue for bool {
    fn read(ini: &IniFile, section: &str, key: &str, default: Self) -> Self {
        ini.get_bool(section, key, default)
    }
}

impl IniValue for i32 {
    fn read(ini: &IniFile, section: &str, key: &str, default: Self) -> Self {
        ini.get_int(section, key, default)
    }
}

impl IniValue for f64 {
    fn read(ini: &IniFile, section: &str, key: &str, default: Self) -> Self {
        ini.get_double(section, key, default)
    }
}

impl IniValue for f32 {
    fn read(ini: &IniFile, section: &str, key: &str, default: Self) -> Self {
        ini.get_float(section, key, default)
    }
}

/// A setting with a default, loaded from an INI key on demand.
///
/// Until [`Property::load`] is called the value equals the default.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<T> {
    default: T,
    value: T,
}

impl<T: Clone> Property<T> {
    #[must_use]
    pub fn new(default: T) -> Self {
        Self {
            value: default.clone(),
            default,
        }
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Read any [`FromStr`] type, such as an enum of modes. Unparseable or missing values
    /// restore the default.
    pub fn load_parsed(&mut self, ini: &IniFile, section: &str, key: &str)
    where
        T: FromStr,
    {
        self.value = ini
            .try_get_string(section, key)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(|| self.default.clone());
    }
}

impl<T: IniValue + Clone> Property<T> {
    pub fn load(&mut self, ini: &IniFile, section: &str, key: &str) {
        self.value = T::read(ini, section, key, self.default.clone());
    }
}

impl<T: Default + Clone> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
