//! Image transformation options for image asset URLs.
//!
//! Options render into the query string understood by the images API:
//!
//! ```text
//! w=100&h=50&fm=jpg&q=80&r=10&fl=progressive&fit=pad&bg=rgb%3Aff0000
//! ```

use crate::error::{ModelError, ModelResult};
use std::fmt;
use std::str::FromStr;

/// Output format of a transformed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Webp,
}

impl ImageFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "png" => Ok(ImageFormat::Png),
            "jpg" => Ok(ImageFormat::Jpg),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(ModelError::InvalidImageOption(format!(
                "unknown format `{other}`, expected png, jpg or webp"
            ))),
        }
    }
}

/// How an image is fitted into the requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFit {
    Pad,
    Crop,
    Fill,
    Thumb,
    Scale,
}

impl ResizeFit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResizeFit::Pad => "pad",
            ResizeFit::Crop => "crop",
            ResizeFit::Fill => "fill",
            ResizeFit::Thumb => "thumb",
            ResizeFit::Scale => "scale",
        }
    }
}

impl FromStr for ResizeFit {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "pad" => Ok(ResizeFit::Pad),
            "crop" => Ok(ResizeFit::Crop),
            "fill" => Ok(ResizeFit::Fill),
            "thumb" => Ok(ResizeFit::Thumb),
            "scale" => Ok(ResizeFit::Scale),
            other => Err(ModelError::InvalidImageOption(format!(
                "unknown resize fit `{other}`"
            ))),
        }
    }
}

/// Focus area used when cropping thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFocus {
    Face,
    Faces,
    Top,
    Bottom,
    Right,
    Left,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl ResizeFocus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResizeFocus::Face => "face",
            ResizeFocus::Faces => "faces",
            ResizeFocus::Top => "top",
            ResizeFocus::Bottom => "bottom",
            ResizeFocus::Right => "right",
            ResizeFocus::Left => "left",
            ResizeFocus::TopRight => "top_right",
            ResizeFocus::TopLeft => "top_left",
            ResizeFocus::BottomRight => "bottom_right",
            ResizeFocus::BottomLeft => "bottom_left",
        }
    }
}

impl FromStr for ResizeFocus {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "face" => Ok(ResizeFocus::Face),
            "faces" => Ok(ResizeFocus::Faces),
            "top" => Ok(ResizeFocus::Top),
            "bottom" => Ok(ResizeFocus::Bottom),
            "right" => Ok(ResizeFocus::Right),
            "left" => Ok(ResizeFocus::Left),
            "top_right" => Ok(ResizeFocus::TopRight),
            "top_left" => Ok(ResizeFocus::TopLeft),
            "bottom_right" => Ok(ResizeFocus::BottomRight),
            "bottom_left" => Ok(ResizeFocus::BottomLeft),
            other => Err(ModelError::InvalidImageOption(format!(
                "unknown resize focus `{other}`"
            ))),
        }
    }
}

/// Transformation options appended to an image URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    width: Option<u32>,
    height: Option<u32>,
    format: Option<ImageFormat>,
    quality: Option<u8>,
    progressive: bool,
    resize_fit: Option<ResizeFit>,
    resize_focus: Option<ResizeFocus>,
    radius: Option<u32>,
    background_color: Option<String>,
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// JPEG quality between 1 and 100. Setting a quality forces `jpg`.
    pub fn quality(mut self, quality: u8) -> ModelResult<Self> {
        if !(1..=100).contains(&quality) {
            return Err(ModelError::InvalidImageOption(format!(
                "quality has to be between 1 and 100, {quality} given"
            )));
        }
        self.quality = Some(quality);
        Ok(self)
    }

    /// Progressive JPEG. Forces `jpg`.
    #[must_use]
    pub fn progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }

    #[must_use]
    pub fn resize_fit(mut self, fit: ResizeFit) -> Self {
        self.resize_fit = Some(fit);
        self
    }

    /// Only rendered together with [`ResizeFit::Thumb`].
    #[must_use]
    pub fn resize_focus(mut self, focus: ResizeFocus) -> Self {
        self.resize_focus = Some(focus);
        self
    }

    #[must_use]
    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Padding colour as `#rgb` or `#rrggbb`. Only rendered together with
    /// [`ResizeFit::Pad`].
    pub fn background_color(mut self, color: &str) -> ModelResult<Self> {
        let hex = color
            .strip_prefix('#')
            .filter(|hex| matches!(hex.len(), 3 | 6))
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
        if hex.is_none() {
            return Err(ModelError::InvalidImageOption(format!(
                "background color `{color}` must be in hexadecimal format"
            )));
        }
        self.background_color = Some(color.to_string());
        Ok(self)
    }

    /// The effective output format.
    pub fn effective_format(&self) -> Option<ImageFormat> {
        if self.quality.is_some() || self.progressive {
            Some(ImageFormat::Jpg)
        } else {
            self.format
        }
    }

    /// Renders the options as an RFC 3986 encoded query string.
    pub fn query_string(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(width) = self.width {
            params.push(("w", width.to_string()));
        }
        if let Some(height) = self.height {
            params.push(("h", height.to_string()));
        }
        if let Some(format) = self.effective_format() {
            params.push(("fm", format.as_str().to_string()));
        }
        if let Some(quality) = self.quality {
            params.push(("q", quality.to_string()));
        }
        if let Some(radius) = self.radius {
            params.push(("r", radius.to_string()));
        }
        if self.progressive {
            params.push(("fl", "progressive".to_string()));
        }
        if let Some(fit) = self.resize_fit {
            params.push(("fit", fit.as_str().to_string()));
            match (fit, self.resize_focus, &self.background_color) {
                (ResizeFit::Thumb, Some(focus), _) => params.push(("f", focus.as_str().to_string())),
                (ResizeFit::Pad, _, Some(color)) => {
                    params.push(("bg", format!("rgb:{}", &color[1..])));
                }
                _ => {}
            }
        }

        params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for ImageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_string())
    }
}
