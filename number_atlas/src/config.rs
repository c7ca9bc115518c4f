// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use peniko::{Blob, Color, FontData};

use crate::charset::{CharacterSet, DEFAULT_FORMAT};
use crate::format::NumberCulture;
use crate::rotation::FontRotation;

/// A font to bake, with a display name used in cache labels and errors.
#[derive(Clone, Debug)]
pub struct SourceFont {
    name: Arc<str>,
    data: FontData,
}

impl SourceFont {
    /// Wraps font data that is already loaded.
    pub fn new(name: impl Into<Arc<str>>, data: FontData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Wraps the raw bytes of a font file, selecting the face at `index` of a
    /// collection.
    pub fn from_bytes(name: impl Into<Arc<str>>, bytes: Vec<u8>, index: u32) -> Self {
        Self::new(name, FontData::new(Blob::new(Arc::new(bytes)), index))
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying font data.
    pub fn data(&self) -> &FontData {
        &self.data
    }

    /// Unique identity of the font's data blob.
    ///
    /// Two fonts loaded from separate byte buffers never share an id, even if
    /// their names match.
    pub fn id(&self) -> u64 {
        self.data.data.id()
    }

    /// Index of the face within its collection.
    pub fn index(&self) -> u32 {
        self.data.index
    }
}

impl PartialEq for SourceFont {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.index() == other.index() && self.name == other.name
    }
}

/// Everything that determines how a number font is baked.
///
/// Built from [`Default`] or [`FontStyleConfig::new`] with the `with_*`
/// methods and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct FontStyleConfig {
    font: Option<SourceFont>,
    point_size: u32,
    rotation: FontRotation,
    kerning: u32,
    format: String,
    culture: NumberCulture,
    color: Color,
    use_emission: bool,
    emission_color: Color,
    use_specular: bool,
    metallic: f32,
    smoothness: f32,
}

impl Default for FontStyleConfig {
    fn default() -> Self {
        Self {
            font: None,
            point_size: 90,
            rotation: FontRotation::LeftToRight,
            kerning: 0,
            format: DEFAULT_FORMAT.into(),
            culture: NumberCulture::invariant(),
            color: Color::WHITE,
            use_emission: false,
            emission_color: Color::BLACK,
            use_specular: false,
            metallic: 0.0,
            smoothness: 0.5,
        }
    }
}

impl FontStyleConfig {
    /// Default settings for `font`.
    pub fn new(font: SourceFont) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }

    /// Sets or clears the source font.
    pub fn with_font(mut self, font: Option<SourceFont>) -> Self {
        self.font = font;
        self
    }

    /// Sets the point size, in final atlas pixels.
    pub fn with_point_size(mut self, point_size: u32) -> Self {
        self.point_size = point_size;
        self
    }

    /// Sets the orientation of the baked atlas.
    pub fn with_rotation(mut self, rotation: FontRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the extra gap between digits, in pixels.
    pub fn with_kerning(mut self, kerning: u32) -> Self {
        self.kerning = kerning;
        self
    }

    /// Sets the display format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the symbols used to apply the format.
    pub fn with_culture(mut self, culture: NumberCulture) -> Self {
        self.culture = culture;
        self
    }

    /// Sets the fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Enables emission with `color`.
    pub fn with_emission(mut self, color: Color) -> Self {
        self.use_emission = true;
        self.emission_color = color;
        self
    }

    /// Enables specular output. Both values are clamped to `[0, 1]`.
    pub fn with_specular(mut self, metallic: f32, smoothness: f32) -> Self {
        self.use_specular = true;
        self.metallic = unit(metallic);
        self.smoothness = unit(smoothness);
        self
    }

    /// Whether a font is set and the point size is not zero.
    pub fn is_renderable(&self) -> bool {
        self.font.is_some() && self.point_size != 0
    }

    /// The source font, if any.
    pub fn font(&self) -> Option<&SourceFont> {
        self.font.as_ref()
    }

    /// The point size.
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    /// The orientation.
    pub fn rotation(&self) -> FontRotation {
        self.rotation
    }

    /// The extra gap between digits.
    pub fn kerning(&self) -> u32 {
        self.kerning
    }

    /// The display format.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The symbols used to apply the format.
    pub fn culture(&self) -> &NumberCulture {
        &self.culture
    }

    /// The fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The emission color, if emission is enabled.
    pub fn emission(&self) -> Option<Color> {
        self.use_emission.then_some(self.emission_color)
    }

    /// `(metallic, smoothness)`, if specular output is enabled.
    pub fn specular(&self) -> Option<(f32, f32)> {
        self.use_specular.then_some((self.metallic, self.smoothness))
    }

    /// The characters this config bakes.
    pub fn character_set(&self) -> CharacterSet {
        CharacterSet::from_format(&self.format, &self.culture)
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
