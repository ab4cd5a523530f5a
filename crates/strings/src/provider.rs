use crate::bank::{StringBank, StringKey};
use crate::list::StringList;

/// Localized text for one language, as UI code consumes it.
///
/// Implemented by [`StringBank`]; UI layers that track a "current language"
/// implement it on top of their own state and hand it to widgets.
pub trait LocalizationProvider {
    fn single_string(&self, key: impl StringKey) -> Option<&str>;
    fn single_string_uppercase(&self, key: impl StringKey) -> Option<&str>;
    fn strings(&self, key: impl StringKey) -> StringList<'_>;
    fn strings_uppercase(&self, key: impl StringKey) -> StringList<'_>;
    fn random_string(&self, key: impl StringKey, choice_index: usize) -> Option<&str>;
    fn random_string_uppercase(&self, key: impl StringKey, choice_index: usize) -> Option<&str>;
}

impl LocalizationProvider for StringBank {
    fn single_string(&self, key: impl StringKey) -> Option<&str> {
        StringBank::single_string(self, key)
    }

    fn single_string_uppercase(&self, key: impl StringKey) -> Option<&str> {
        StringBank::single_string_uppercase(self, key)
    }

    fn strings(&self, key: impl StringKey) -> StringList<'_> {
        StringBank::strings(self, key)
    }

    fn strings_uppercase(&self, key: impl StringKey) -> StringList<'_> {
        StringBank::strings_uppercase(self, key)
    }

    fn random_string(&self, key: impl StringKey, choice_index: usize) -> Option<&str> {
        StringBank::random_string(self, key, choice_index)
    }

    fn random_string_uppercase(&self, key: impl StringKey, choice_index: usize) -> Option<&str> {
        StringBank::random_string_uppercase(self, key, choice_index)
    }
}
