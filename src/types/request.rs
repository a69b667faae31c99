//! A single generation request.

use uuid::Uuid;

use super::image::ImageInput;

/// Created per user action; identified only for log correlation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub id: Uuid,
    pub prompt: String,
    pub image: Option<ImageInput>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn is_vision(&self) -> bool {
        self.image.is_some()
    }
}
