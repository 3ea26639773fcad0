use crate::server::static_files;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sidebar logo, or a blank placeholder when the image is missing
#[derive(Debug, Clone)]
pub struct LogoAsset {
    path: PathBuf,
    image: Option<LogoImage>,
}

#[derive(Debug, Clone)]
struct LogoImage {
    bytes: Vec<u8>,
    content_type: String,
}

impl LogoAsset {
    /// Read the logo from disk. A missing or unreadable file is not an error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        match std::fs::read(&path) {
            Ok(bytes) => {
                let content_type = mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .to_string();
                info!("Loaded logo {} ({})", path.display(), content_type);
                Self {
                    path,
                    image: Some(LogoImage {
                        bytes,
                        content_type,
                    }),
                }
            }
            Err(e) => {
                let logo = Self::placeholder(path);
                warn!("{} ({})", logo.warning().unwrap_or_default(), e);
                logo
            }
        }
    }

    /// Placeholder standing in for the image at `path`
    pub fn placeholder(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            image: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.image.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Warning shown in the sidebar when the placeholder is in use
    pub fn warning(&self) -> Option<String> {
        match self.image {
            Some(_) => None,
            None => Some(format!(
                "Logo not found. Add an image at {} or pass --logo.",
                self.path.display()
            )),
        }
    }

    /// Image bytes and content type to serve
    pub fn content(&self) -> (Cow<'static, [u8]>, String) {
        match &self.image {
            Some(image) => (
                Cow::Owned(image.bytes.clone()),
                image.content_type.clone(),
            ),
            None => (static_files::placeholder_logo(), "image/svg+xml".to_string()),
        }
    }
}
