use std::io::Read;

/// The format-version magic that prefixes every package file.
///
/// Each content kind (cues, sounds, strings) has its own header, supplied by
/// the game at load time. A package whose first bytes don't match exactly was
/// either damaged or produced for a different format version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header<'a>(&'a [u8]);

impl<'a> Header<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Check that `bytes` start with exactly this header.
    #[must_use]
    pub fn check(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(self.0)
    }

    /// Consume exactly `self.len()` bytes from `reader` and compare them to
    /// the header. A source shorter than the header doesn't match.
    ///
    /// On `Ok(true)` the reader is positioned at the first payload byte.
    pub fn strip<R: Read>(&self, reader: &mut R) -> std::io::Result<bool> {
        let mut found = Vec::with_capacity(self.len());
        reader.take(self.len() as u64).read_to_end(&mut found)?;
        Ok(found.len() == self.len() && self.check(&found))
    }
}

impl<'a> From<&'a [u8]> for Header<'a> {
    fn from(value: &'a [u8]) -> Self {
        Header::new(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Header<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Header::new(value.as_slice())
    }
}
