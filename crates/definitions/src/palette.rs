use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

const TEXEL_BYTES: usize = 4;

/// An RGBA8 colour as stored in a palette cube.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    fn from_texel(texel: &[u8]) -> Self {
        Self {
            r: texel[0],
            g: texel[1],
            b: texel[2],
            a: texel[3],
        }
    }
}

/// A colour lookup cube: `size³` RGBA8 texels, ready for upload as a 3D
/// texture by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    size: usize,
    data: Box<[u8]>,
    pub black: Rgba,
    pub white: Rgba,
}

impl Palette {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        Self::from_bytes(data)
    }

    /// Infer the cube edge from the data length. Data that isn't an exact
    /// cube is accepted (mods get this wrong); the excess is ignored.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        let mut data = data.into();
        let size = cube_edge(data.len());
        if size == 0 {
            exn::bail!(ErrorKind::InvalidPalette(data.len()));
        }
        let texels = size * size * size;
        if texels * TEXEL_BYTES != data.len() {
            tracing::warn!(len = data.len(), size, "palette data is not an exact cube");
        }
        data.truncate(texels * TEXEL_BYTES);
        let black = Rgba::from_texel(&data[..TEXEL_BYTES]);
        let white = Rgba::from_texel(&data[(texels - 1) * TEXEL_BYTES..]);
        Ok(Self {
            size,
            data: data.into_boxed_slice(),
            black,
            white,
        })
    }

    /// Cube edge length in texels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Exactly `size³ × 4` bytes.
    pub fn texels(&self) -> &[u8] {
        &self.data
    }
}

/// Largest `n` with `n³ × 4 <= len`.
fn cube_edge(len: usize) -> usize {
    let mut size = 0;
    while (size + 1) * (size + 1) * (size + 1) * TEXEL_BYTES <= len {
        size += 1;
    }
    size
}
