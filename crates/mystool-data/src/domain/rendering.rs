//! Layout parameters for the rendered exchange goods list image.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{plugin_data::DEFAULT_DATA_DIR, SchemaError};

/// `good_list_image_config` section of the data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GoodListImageConfig {
    /// Size of each goods preview icon in the final image, `(width, height)`.
    pub icon_size: (u32, u32),
    /// Width of the final image.
    pub width: u32,
    /// Vertical gap between icons.
    pub padding_icon: u32,
    /// Distance between the top of the text and the top of its icon.
    pub padding_text_and_icon_y: u32,
    /// Horizontal distance between text and icon.
    pub padding_text_and_icon_x: u32,
    /// Font file path, or the name of an installed font.  `None` downloads a
    /// default font on first use.
    pub font_path: Option<String>,
    pub font_size: u32,
    /// Cache directory for rendered images.
    pub save_path: PathBuf,
}

impl Default for GoodListImageConfig {
    fn default() -> Self {
        Self {
            icon_size: (600, 600),
            width: 2000,
            padding_icon: 0,
            padding_text_and_icon_y: 125,
            padding_text_and_icon_x: 10,
            font_path: None,
            font_size: 50,
            save_path: Path::new(DEFAULT_DATA_DIR).to_path_buf(),
        }
    }
}

impl GoodListImageConfig {
    /// Rejects zero-sized geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] naming the JSON key of the offending field.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let (icon_w, icon_h) = self.icon_size;
        if icon_w == 0 || icon_h == 0 {
            return Err(SchemaError::new("ICON_SIZE", "both dimensions must be positive"));
        }
        if self.width == 0 {
            return Err(SchemaError::new("WIDTH", "must be positive"));
        }
        if self.font_size == 0 {
            return Err(SchemaError::new("FONT_SIZE", "must be positive"));
        }
        Ok(())
    }
}
