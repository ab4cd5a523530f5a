/// Borrowed view over a key's string variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringList<'a>(&'a [Box<str>]);

impl<'a> StringList<'a> {
    pub(crate) fn new(choices: &'a [Box<str>]) -> Self {
        Self(choices)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.0.get(index).map(|choice| &**choice)
    }

    pub fn first(&self) -> Option<&'a str> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.0.iter().map(|choice| &**choice)
    }
}

impl<'a> IntoIterator for StringList<'a> {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Box<str>>, fn(&'a Box<str>) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        let unbox: fn(&'a Box<str>) -> &'a str = |choice| &**choice;
        self.0.iter().map(unbox)
    }
}
