//! Figure export to PNG or SVG, chosen by file extension

use crate::io::error::{BiasError, Result, invalid_input};
use crate::plot::figure::Figure;
use crate::plot::raster::render_raster;
use crate::plot::svg::render_svg;
use clap::ValueEnum;
use std::path::Path;

/// Supported figure file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FigureFormat {
    /// Raster image; geometry only
    Png,
    /// Vector image with all text
    Svg,
}

impl FigureFormat {
    /// File extension written for this format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// Format implied by the extension of `path`, ignoring case
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the extension is missing or unsupported
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(invalid_input(
                "output",
                &path.display(),
                &"figure files must end in .png or .svg",
            )),
        }
    }
}

/// Save a figure, creating the parent directory if needed
///
/// # Errors
///
/// Returns an error if:
/// - The extension is neither `.png` nor `.svg`
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn export_figure(figure: &Figure, output_path: &Path) -> Result<()> {
    let format = FigureFormat::from_path(output_path)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BiasError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    match format {
        FigureFormat::Png => render_raster(figure)
            .save(output_path)
            .map_err(|e| BiasError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?,
        FigureFormat::Svg => {
            std::fs::write(output_path, render_svg(figure)).map_err(|e| BiasError::FileSystem {
                path: output_path.to_path_buf(),
                operation: "write figure",
                source: e,
            })?;
        }
    }

    tracing::info!(path = %output_path.display(), ?format, "saved figure");
    Ok(())
}
