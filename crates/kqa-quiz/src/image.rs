//! Per-question illustration state.
//!
//! Each displayed question gets one image request, tagged with the session
//! generation and the question index it was issued for. The slot only accepts
//! a response whose tag matches the request it is currently waiting on, so an
//! illustration that arrives after the player moved on (or reset) is dropped.

use std::fmt;

/// An inline raster image returned by an image provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// MIME type reported by the provider, e.g. `image/png`
    pub mime_type: String,
    /// Decoded image bytes
    pub data: Vec<u8>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Identifies the question an image request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTag {
    pub generation: u64,
    pub index: usize,
}

/// Display state of the current question's illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Loading,
    Ready(Image),
    /// The provider failed or had nothing to offer; shown as a placeholder.
    Unavailable,
}

/// The illustration slot of the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    tag: ImageTag,
    state: ImageState,
}

impl ImageSlot {
    /// A slot waiting for the response to the request tagged `tag`.
    pub const fn loading(tag: ImageTag) -> Self {
        Self {
            tag,
            state: ImageState::Loading,
        }
    }

    pub const fn tag(&self) -> ImageTag {
        self.tag
    }

    pub const fn state(&self) -> &ImageState {
        &self.state
    }

    /// Apply a provider response. Returns `false` when the response is stale
    /// (tag mismatch) or the slot already settled.
    pub fn resolve(&mut self, tag: ImageTag, image: Option<Image>) -> bool {
        if tag != self.tag || self.state != ImageState::Loading {
            return false;
        }

        self.state = match image {
            Some(image) => ImageState::Ready(image),
            None => ImageState::Unavailable,
        };
        true
    }
}
