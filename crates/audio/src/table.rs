//! Cue table: every cue in a cues package, keyed by name.

use crate::cue::{Cue, CueId};
use cuebank_package::error::Result;
use cuebank_package::{Header, PackageReader};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

/// Ordered `name → Cue` map.
///
/// Cues are kept in package order for reproducible iteration (debug dumps);
/// lookups go through a hash index. Cycling cues get a dense [`CueId`] in the
/// order they appear in the package, so the id space is a pure function of the
/// package contents and identical on every peer.
///
/// Ids encoded in a package are ignored; only load order counts.
#[derive(Debug, Clone, Default)]
pub struct CueTable {
    cues: Vec<Cue>,
    index: HashMap<String, usize>,
    cues_with_ids: u32,
}

impl CueTable {
    /// Open, validate and parse a cues package file.
    pub fn load(path: impl AsRef<Path>, header: Header<'_>) -> Result<Self> {
        let mut reader = PackageReader::open(path, header)?;
        let table = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(table)
    }

    /// Parse the cue records of an already validated package.
    ///
    /// Payload: `i32 count`, then `count` × `{ string name; cue record }`.
    #[instrument(skip_all, fields(path = %reader.path().display(), count, cues_with_ids))]
    pub fn read<R: Read>(reader: &mut PackageReader<R>) -> Result<Self> {
        let count = reader.read_count()?;
        tracing::Span::current().record("count", count);
        let mut table = Self::default();
        for _ in 0..count {
            let name = reader.read_string()?;
            let cue = Cue::read(name, reader)?;
            table.insert(cue);
        }
        table.assign_ids();
        tracing::Span::current().record("cues_with_ids", table.cues_with_ids);
        tracing::debug!(cues = table.len(), cues_with_ids = table.cues_with_ids, "loaded cue table");
        Ok(table)
    }

    /// Insert in package order. A duplicate name replaces the earlier cue in
    /// place (last wins).
    fn insert(&mut self, cue: Cue) {
        match self.index.get(cue.name.as_str()) {
            Some(&position) => {
                tracing::warn!(name = %cue.name, "duplicate cue name, later record wins");
                self.cues[position] = cue;
            },
            None => {
                self.index.insert(cue.name.clone(), self.cues.len());
                self.cues.push(cue);
            },
        }
    }

    /// Hand out `0..n` to cycling cues in table order. Without duplicate
    /// names this is exactly the order records appear in the package; with
    /// them, a replaced cue keeps its original slot so the range stays
    /// contiguous.
    fn assign_ids(&mut self) {
        let mut next = 0;
        for cue in &mut self.cues {
            cue.id = match cue.kind.is_cycling() {
                true => {
                    next += 1;
                    Some(CueId(next - 1))
                },
                false => None,
            };
        }
        self.cues_with_ids = next;
    }

    /// Case-sensitive lookup by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Cue> {
        self.index.get(name).map(|&position| &self.cues[position])
    }

    /// Number of ids handed out to cycling cues; ids are `0..cues_with_ids`.
    #[inline]
    pub fn cues_with_ids(&self) -> u32 {
        self.cues_with_ids
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Cues in package order.
    pub fn iter(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
    }

    /// Encode `cues` as a complete cues package.
    #[cfg(any(test, feature = "writer"))]
    pub fn encode<'a>(cues: impl IntoIterator<Item = &'a Cue>, header: Header<'_>) -> Result<Vec<u8>> {
        let cues: Vec<&Cue> = cues.into_iter().collect();
        let mut writer = cuebank_package::PackageWriter::new(header);
        writer.write_count(cues.len());
        for cue in cues {
            cue.write(&mut writer);
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::{CueSound, CueType};
    use cuebank_package::PackageWriter;
    use cuebank_package::error::ErrorKind;
    use rstest::rstest;

    const HEADER: &[u8] = &[0xAB, 0xCD];

    fn read(bytes: &[u8]) -> Result<CueTable> {
        let mut reader = PackageReader::from_bytes(bytes, Header::new(HEADER))?;
        let table = CueTable::read(&mut reader)?;
        reader.finish()?;
        Ok(table)
    }

    fn cue(name: &str, kind: CueType) -> Cue {
        Cue::new(name, kind).with_sound(CueSound::new(format!("sfx/{name}.wav")))
    }

    #[test]
    fn test_end_to_end_example() {
        let jump = Cue::new("jump", CueType::Single).with_sound(CueSound::new("sfx/jump.wav"));
        let ambient = Cue::new("loop_ambient", CueType::Cycle)
            .with_sound(CueSound::new("sfx/ambient_1.wav"))
            .with_sound(CueSound::new("sfx/ambient_2.wav"));
        let bytes = CueTable::encode([&jump, &ambient], Header::new(HEADER)).unwrap();

        let table = read(&bytes).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cues_with_ids(), 1);
        assert_eq!(table.get("loop_ambient").unwrap().id, Some(CueId(0)));
        assert_eq!(table.get("jump").unwrap().id, None);
        assert_eq!(table.get("jump").unwrap().sounds[0].path.as_deref(), Some("sfx/jump.wav"));
        assert_eq!(table.get("loop_ambient").unwrap().sound_count(), 2);
    }

    #[rstest]
    #[case(&[CueType::Single, CueType::Single])]
    #[case(&[CueType::Cycle])]
    #[case(&[CueType::Cycle, CueType::Single, CueType::RandomCycle])]
    #[case(&[CueType::Random, CueType::RandomCycle, CueType::Parallel, CueType::Cycle, CueType::Serial, CueType::Cycle])]
    fn test_cyclic_ids_dense_in_file_order(#[case] kinds: &[CueType]) {
        let cues: Vec<Cue> = kinds.iter().enumerate().map(|(i, kind)| cue(&format!("cue_{i}"), *kind)).collect();
        let table = read(&CueTable::encode(&cues, Header::new(HEADER)).unwrap()).unwrap();

        let expected: Vec<u32> = (0..kinds.iter().filter(|kind| kind.is_cycling()).count() as u32).collect();
        let assigned: Vec<u32> = table.iter().filter_map(|cue| cue.id).map(|id| id.0).collect();
        assert_eq!(assigned, expected);
        assert_eq!(table.cues_with_ids() as usize, expected.len());
        for cue in table.iter() {
            assert_eq!(cue.id.is_some(), cue.kind.is_cycling());
        }
    }

    #[test]
    fn test_iteration_keeps_file_order() {
        let cues = [cue("zeta", CueType::Single), cue("alpha", CueType::Cycle), cue("mid", CueType::Single)];
        let table = read(&CueTable::encode(&cues, Header::new(HEADER)).unwrap()).unwrap();
        let names: Vec<&str> = table.iter().map(|cue| cue.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = read(&CueTable::encode(&[cue("Jump", CueType::Single)], Header::new(HEADER)).unwrap()).unwrap();
        assert!(table.get("Jump").is_some());
        assert!(table.get("jump").is_none());
    }

    #[test]
    fn test_duplicate_replaced_by_non_cycling() {
        let first = cue("hit", CueType::Cycle);
        let second = cue("hit", CueType::Single);
        let after = cue("after", CueType::RandomCycle);
        let table = read(&CueTable::encode([&first, &second, &after], Header::new(HEADER)).unwrap()).unwrap();
        assert_eq!(table.get("hit").unwrap().id, None);
        assert_eq!(table.get("after").unwrap().id, Some(CueId(0)));
        assert_eq!(table.cues_with_ids(), 1);
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let first = cue("hit", CueType::Cycle);
        let second = Cue::new("hit", CueType::Cycle).with_sound(CueSound::new("sfx/hit_v2.wav"));
        let after = cue("after", CueType::Cycle);
        let table = read(&CueTable::encode([&first, &second, &after], Header::new(HEADER)).unwrap()).unwrap();

        assert_eq!(table.len(), 2);
        let hit = table.get("hit").unwrap();
        assert_eq!(hit.sounds[0].path.as_deref(), Some("sfx/hit_v2.wav"));
        assert_eq!(hit.id, Some(CueId(0)));
        assert_eq!(table.get("after").unwrap().id, Some(CueId(1)));
        assert_eq!(table.cues_with_ids(), 2);
    }

    #[test]
    fn test_silent_variant() {
        let cue = Cue::new("maybe", CueType::Random).with_sound(CueSound::silent()).with_sound(CueSound::new("a.wav"));
        let table = read(&CueTable::encode([&cue], Header::new(HEADER)).unwrap()).unwrap();
        let loaded = table.get("maybe").unwrap();
        assert_eq!(loaded.sounds[0].path, None);
        assert_eq!(loaded, &cue);
    }

    #[test]
    fn test_header_mismatch() {
        let bytes = CueTable::encode(&[cue("jump", CueType::Single)], Header::new(&[0xAB, 0xCE])).unwrap();
        let err = read(&bytes).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CorruptPackage(_)));
    }

    #[test]
    fn test_unknown_cue_type() {
        let mut writer = PackageWriter::new(Header::new(HEADER));
        writer.write_count(1).write_string("jump").write_u8(42);
        let err = read(&writer.finish().unwrap()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CorruptPackage(_)));
    }

    #[test]
    fn test_truncated_record() {
        // Claims two cues but only carries one.
        let mut writer = PackageWriter::new(Header::new(HEADER));
        writer.write_count(2);
        cue("jump", CueType::Single).write(&mut writer);
        let err = read(&writer.finish().unwrap()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CorruptPackage(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cues.rcru");
        std::fs::write(&path, CueTable::encode(&[cue("jump", CueType::Cycle)], Header::new(HEADER)).unwrap()).unwrap();
        let table = CueTable::load(&path, Header::new(HEADER)).unwrap();
        assert_eq!(table.cues_with_ids(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = read(&CueTable::encode([], Header::new(HEADER)).unwrap()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.cues_with_ids(), 0);
    }
}
