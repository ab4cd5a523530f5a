use hashbrown::Equivalent;
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Keys of up to this many tags are normalized on the stack.
pub(crate) const MAX_INLINE_TAGS: usize = 16;

fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c.is_whitespace() || c == ',').filter(|tag| !tag.is_empty())
}

/// An order-independent set of tags identifying a localized string.
///
/// `"menu title"`, `"title menu"` and `"title, menu , menu"` are all the same
/// key. Tags themselves are case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TagSet {
    /// Sorted and deduplicated.
    tags: Box<[Box<str>]>,
}

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<Box<str>> = tags
            .into_iter()
            .flat_map(|tag| split(tag.as_ref()).map(Box::<str>::from).collect::<Vec<_>>())
            .collect();
        tags.sort_unstable();
        tags.dedup();
        Self { tags: tags.into_boxed_slice() }
    }

    /// Parse a raw key: tags separated by whitespace and/or commas.
    pub fn parse(raw: &str) -> Self {
        Self::new(split(raw))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| &**tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|probe| (**probe).cmp(tag)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

// Must agree with `TagSlice`'s hash for borrowed lookups.
impl Hash for TagSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.tags.len());
        for tag in self.tags.iter() {
            str::hash(tag, state);
        }
    }
}

impl FromStr for TagSet {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for TagSet {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Canonical form: sorted tags joined by a single space.
impl Display for TagSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(tag)?;
        }
        Ok(())
    }
}

/// A normalized, borrowed tag list used to probe a `TagSet`-keyed map
/// without building a `TagSet`.
pub(crate) struct TagSlice<'a>(&'a [&'a str]);

impl<'a> TagSlice<'a> {
    /// Split `raw` into `buffer`, then sort and deduplicate in place.
    ///
    /// Returns `None` when `raw` has more than [`MAX_INLINE_TAGS`] tags.
    pub(crate) fn normalize(raw: &'a str, buffer: &'a mut [&'a str; MAX_INLINE_TAGS]) -> Option<Self> {
        let mut len = 0;
        for tag in split(raw) {
            *buffer.get_mut(len)? = tag;
            len += 1;
        }
        let tags = &mut buffer[..len];
        tags.sort_unstable();
        let mut unique = 0;
        for i in 0..len {
            if unique == 0 || tags[i] != tags[unique - 1] {
                tags[unique] = tags[i];
                unique += 1;
            }
        }
        Some(Self(&buffer[..unique]))
    }
}

impl Hash for TagSlice<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for tag in self.0 {
            str::hash(tag, state);
        }
    }
}

impl Equivalent<TagSet> for TagSlice<'_> {
    fn equivalent(&self, key: &TagSet) -> bool {
        self.0.len() == key.tags.len() && self.0.iter().zip(key.tags.iter()).all(|(a, b)| *a == &**b)
    }
}
