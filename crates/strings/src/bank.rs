//! One language's worth of localized strings.

use crate::list::StringList;
use crate::tagset::{MAX_INLINE_TAGS, TagSet, TagSlice};
use cuebank_package::error::Result;
use cuebank_package::{Header, PackageReader};
use hashbrown::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

mod sealed {
    pub trait Sealed {}
}

/// Anything a string bank can be queried with: a parsed [`TagSet`] or a raw
/// key such as `"menu title"`.
pub trait StringKey: sealed::Sealed {
    #[doc(hidden)]
    fn position_in(&self, bank: &StringBank) -> Option<usize>;
}

impl sealed::Sealed for TagSet {}
impl StringKey for TagSet {
    fn position_in(&self, bank: &StringBank) -> Option<usize> {
        bank.index.get(self).copied()
    }
}

impl sealed::Sealed for str {}
impl StringKey for str {
    fn position_in(&self, bank: &StringBank) -> Option<usize> {
        let mut buffer = [""; MAX_INLINE_TAGS];
        match TagSlice::normalize(self, &mut buffer) {
            Some(tags) => bank.index.get(&tags).copied(),
            None => bank.index.get(&TagSet::parse(self)).copied(),
        }
    }
}

impl sealed::Sealed for String {}
impl StringKey for String {
    fn position_in(&self, bank: &StringBank) -> Option<usize> {
        self.as_str().position_in(bank)
    }
}

impl<K: sealed::Sealed + ?Sized> sealed::Sealed for &K {}
impl<K: StringKey + ?Sized> StringKey for &K {
    fn position_in(&self, bank: &StringBank) -> Option<usize> {
        (**self).position_in(bank)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: TagSet,
    choices: Box<[Box<str>]>,
    uppercase: Box<[Box<str>]>,
}

impl Entry {
    fn new(key: TagSet, choices: Vec<String>) -> Self {
        let uppercase = choices.iter().map(|choice| choice.to_uppercase().into_boxed_str()).collect();
        let choices = choices.into_iter().map(String::into_boxed_str).collect();
        Self { key, choices, uppercase }
    }

    fn list(&self, uppercase: bool) -> &[Box<str>] {
        match uppercase {
            true => &self.uppercase,
            false => &self.choices,
        }
    }
}

/// `TagSet → [variant]` for a single language.
///
/// Uppercase forms are computed once at load (Unicode default case mapping,
/// independent of the host locale), so no lookup allocates.
#[derive(Debug, Clone, Default)]
pub struct StringBank {
    entries: Vec<Entry>,
    index: HashMap<TagSet, usize>,
}

impl StringBank {
    /// Open a strings package and read `language_count` banks from it, in
    /// language order.
    pub fn load(path: impl AsRef<Path>, header: Header<'_>, language_count: u8) -> Result<Vec<Self>> {
        let mut reader = PackageReader::open(path, header)?;
        let languages = Self::read_languages(&mut reader, language_count)?;
        reader.finish()?;
        Ok(languages)
    }

    /// Payload: `language_count` consecutive tables.
    pub fn read_languages<R: Read>(reader: &mut PackageReader<R>, language_count: u8) -> Result<Vec<Self>> {
        (0..language_count).map(|language| Self::read(reader, language)).collect()
    }

    /// One table: `i32 count`, then `count` × `{ string key; i32 n; n × string }`.
    #[instrument(skip_all, fields(path = %reader.path().display(), language = language, count))]
    pub fn read<R: Read>(reader: &mut PackageReader<R>, language: u8) -> Result<Self> {
        let count = reader.read_count()?;
        tracing::Span::current().record("count", count);
        let mut bank = Self::default();
        for _ in 0..count {
            let key = TagSet::parse(&reader.read_string()?);
            let variants = reader.read_count()?;
            let choices = (0..variants).map(|_| reader.read_string()).collect::<Result<Vec<_>>>()?;
            bank.insert(Entry::new(key, choices));
        }
        tracing::debug!(keys = bank.len(), "loaded string bank");
        Ok(bank)
    }

    fn insert(&mut self, entry: Entry) {
        match self.index.get(&entry.key) {
            Some(&position) => {
                tracing::warn!(key = %entry.key, "duplicate string key, later record wins");
                self.entries[position] = entry;
            },
            None => {
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
            },
        }
    }

    fn list(&self, key: impl StringKey, uppercase: bool) -> StringList<'_> {
        match key.position_in(self) {
            Some(position) => StringList::new(self.entries[position].list(uppercase)),
            None => StringList::default(),
        }
    }

    fn indexed(&self, key: impl StringKey, index: usize, uppercase: bool) -> Option<&str> {
        let position = key.position_in(self)?;
        Some(&*self.entries[position].list(uppercase)[index])
    }

    fn random(&self, key: impl StringKey, choice_index: usize, uppercase: bool) -> Option<&str> {
        let list = self.list(key, uppercase);
        match list.len() {
            0 => None,
            len => list.get(choice_index % len),
        }
    }

    /// Number of variants stored under `key`; 0 when absent.
    pub fn string_count(&self, key: impl StringKey) -> usize {
        self.list(key, false).len()
    }

    /// The first variant, if `key` exists and has any.
    pub fn single_string(&self, key: impl StringKey) -> Option<&str> {
        self.list(key, false).first()
    }

    pub fn single_string_uppercase(&self, key: impl StringKey) -> Option<&str> {
        self.list(key, true).first()
    }

    /// The variant at `index`.
    ///
    /// # Panics
    ///
    /// If `key` exists and `index` is out of range for it. An absent key is
    /// `None`.
    pub fn indexed_string(&self, key: impl StringKey, index: usize) -> Option<&str> {
        self.indexed(key, index, false)
    }

    pub fn indexed_string_uppercase(&self, key: impl StringKey, index: usize) -> Option<&str> {
        self.indexed(key, index, true)
    }

    /// The variant at `choice_index % count`. Randomness is the caller's;
    /// the same index always picks the same variant.
    pub fn random_string(&self, key: impl StringKey, choice_index: usize) -> Option<&str> {
        self.random(key, choice_index, false)
    }

    pub fn random_string_uppercase(&self, key: impl StringKey, choice_index: usize) -> Option<&str> {
        self.random(key, choice_index, true)
    }

    /// Every variant of `key`; empty when absent.
    pub fn strings(&self, key: impl StringKey) -> StringList<'_> {
        self.list(key, false)
    }

    pub fn strings_uppercase(&self, key: impl StringKey) -> StringList<'_> {
        self.list(key, true)
    }

    pub fn contains(&self, key: impl StringKey) -> bool {
        key.position_in(self).is_some()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys and their variants in package order.
    pub fn iter(&self) -> impl Iterator<Item = (&TagSet, StringList<'_>)> {
        self.entries.iter().map(|entry| (&entry.key, StringList::new(&entry.choices)))
    }

    /// Encode one bank per language as a complete strings package.
    #[cfg(any(test, feature = "writer"))]
    pub fn encode(languages: &[StringBank], header: Header<'_>) -> Result<Vec<u8>> {
        let mut writer = cuebank_package::PackageWriter::new(header);
        for bank in languages {
            writer.write_count(bank.len());
            for (key, choices) in bank.iter() {
                writer.write_string(&key.to_string()).write_count(choices.len());
                for choice in choices.iter() {
                    writer.write_string(choice);
                }
            }
        }
        writer.finish()
    }
}

/// Build a bank in memory. Keys are parsed like package keys; duplicates
/// keep the last value.
impl<K, V, S> FromIterator<(K, V)> for StringBank
where
    K: AsRef<str>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bank = Self::default();
        for (key, choices) in iter {
            let choices = choices.into_iter().map(Into::into).collect();
            bank.insert(Entry::new(TagSet::parse(key.as_ref()), choices));
        }
        bank
    }
}
