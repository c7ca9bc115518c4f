// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error raised while rasterizing, caching or rendering a number font.
///
/// Carries a non-exhaustive [`ErrorKind`] plus whatever context was available
/// at the failure site: the character being processed and the label of the
/// cache entry it belonged to.
///
/// Configurations that are merely not renderable and malformed format strings
/// are not errors; they produce placeholder output instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    character: Option<char>,
    font: Option<String>,
    detail: Option<String>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The character that was being processed, if any.
    pub fn character(&self) -> Option<char> {
        self.character
    }

    /// Label of the font (usually its cache key) the error occurred in.
    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    /// Additional free-form detail, such as a lower-level error message.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Font data could not be parsed.
    pub fn invalid_font(font: impl Into<String>, detail: impl core::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::InvalidFont,
            character: None,
            font: Some(font.into()),
            detail: Some(format!("{detail}")),
        }
    }

    /// The font has no glyph for `character`.
    pub fn missing_glyph(character: char) -> Self {
        Self {
            kind: ErrorKind::MissingGlyph,
            character: Some(character),
            font: None,
            detail: None,
        }
    }

    /// The atlas ran out of room while adding `character`.
    pub fn atlas_full(character: char, width: u32, height: u32) -> Self {
        Self {
            kind: ErrorKind::AtlasFull,
            character: Some(character),
            font: None,
            detail: Some(format!("{width}x{height} atlas")),
        }
    }

    /// A bitmap surface of the given size could not be allocated.
    pub fn surface_allocation(width: u32, height: u32) -> Self {
        Self {
            kind: ErrorKind::SurfaceAllocation,
            character: None,
            font: None,
            detail: Some(format!("{width}x{height}")),
        }
    }

    /// The atlas for `point_size` would exceed `limit` bytes.
    pub fn atlas_too_large(point_size: u32, limit: u64) -> Self {
        Self {
            kind: ErrorKind::SurfaceAllocation,
            character: None,
            font: None,
            detail: Some(format!("point size {point_size} needs an atlas over {limit} bytes")),
        }
    }

    /// Attaches a font label, keeping an existing one.
    pub fn in_font(mut self, font: impl Into<String>) -> Self {
        if self.font.is_none() {
            self.font = Some(font.into());
        }
        self
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidFont => write!(f, "invalid font data")?,
            ErrorKind::MissingGlyph => write!(f, "font has no glyph")?,
            ErrorKind::AtlasFull => write!(f, "glyph does not fit in the atlas")?,
            ErrorKind::SurfaceAllocation => write!(f, "could not allocate render surface")?,
        }
        if let Some(character) = self.character {
            write!(f, " for {character:?}")?;
        }
        if let Some(font) = &self.font {
            write!(f, " in font `{font}`")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The source font's data could not be read.
    InvalidFont,

    /// A requested character has no glyph in the source font.
    MissingGlyph,

    /// The rasterizer's atlas cannot hold every requested glyph.
    AtlasFull,

    /// A temporary or output bitmap could not be allocated.
    SurfaceAllocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::missing_glyph('$').in_font("Arimo_90_$,");
        assert_eq!(err.kind(), ErrorKind::MissingGlyph);
        assert_eq!(err.to_string(), "font has no glyph for '$' in font `Arimo_90_$,`");
    }

    #[test]
    fn in_font_keeps_first_label() {
        let err = Error::invalid_font("first", "bad table").in_font("second");
        assert_eq!(err.font(), Some("first"));
        assert_eq!(err.detail(), Some("bad table"));
    }

    #[test]
    fn oversized_atlas_names_the_point_size() {
        let err = Error::atlas_too_large(200_000, 1 << 28).in_font("Arimo_200000_");
        assert_eq!(err.kind(), ErrorKind::SurfaceAllocation);
        assert_eq!(
            err.to_string(),
            "could not allocate render surface in font `Arimo_200000_` \
             (point size 200000 needs an atlas over 268435456 bytes)"
        );
    }
}
