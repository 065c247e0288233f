//! Outbound payload builders, one per KinOS operation.
//!
//! Optional fields serialize as absent, never null. The `messages` endpoint
//! takes its text under `content` while `analysis` takes `message` -- both
//! shapes are kept exactly as the upstream API expects them.

use std::path::Path;

use serde::Serialize;

use super::media;

/// Default backing model for chat and analysis requests.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Default conversation history window.
pub const DEFAULT_HISTORY_LENGTH: u32 = 25;

/// Response-generation style passed to the upstream model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Creative,
    Balanced,
    Precise,
}

/// Body for `POST .../messages`.
#[derive(Clone, Debug, Serialize)]
pub struct MessagePayload {
    pub content: String,
    pub model: String,
    pub history_length: u32,
    pub mode: Mode,
    #[serde(rename = "addSystem", skip_serializing_if = "Option::is_none")]
    pub add_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl MessagePayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: DEFAULT_MODEL.to_string(),
            history_length: DEFAULT_HISTORY_LENGTH,
            mode: Mode::Creative,
            add_system: None,
            images: None,
            attachments: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_history_length(mut self, history_length: u32) -> Self {
        self.history_length = history_length;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_add_system(mut self, add_system: Option<String>) -> Self {
        self.add_system = add_system;
        self
    }

    /// Attach already-encoded data URLs. An empty list leaves the field out.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = if images.is_empty() { None } else { Some(images) };
        self
    }

    /// Read and encode image files; unreadable paths are skipped.
    pub fn with_image_files<P: AsRef<Path>>(self, paths: &[P]) -> Self {
        let encoded = media::encode_image_files(paths);
        self.with_images(encoded)
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = if attachments.is_empty() {
            None
        } else {
            Some(attachments)
        };
        self
    }
}

/// Body for `POST .../analysis`. Not persisted in kin history upstream.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisPayload {
    pub message: String,
    pub model: String,
    #[serde(rename = "addSystem", skip_serializing_if = "Option::is_none")]
    pub add_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl AnalysisPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model: DEFAULT_MODEL.to_string(),
            add_system: None,
            images: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_add_system(mut self, add_system: Option<String>) -> Self {
        self.add_system = add_system;
        self
    }

    pub fn with_image_files<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        let encoded = media::encode_image_files(paths);
        self.images = if encoded.is_empty() { None } else { Some(encoded) };
        self
    }
}

/// Body for `POST .../autonomous_thinking`.
#[derive(Clone, Debug, Serialize)]
pub struct ThinkingPayload {
    pub iterations: u32,
    pub wait_time: u32,
}

impl Default for ThinkingPayload {
    fn default() -> Self {
        Self {
            iterations: 3,
            wait_time: 600,
        }
    }
}

/// Body for `POST /v2/blueprints/{blueprint}/kins`.
#[derive(Clone, Debug, Serialize)]
pub struct CreateKinPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_override: Option<String>,
}

impl CreateKinPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_override: None,
        }
    }

    pub fn with_template_override(mut self, template_override: Option<String>) -> Self {
        self.template_override = template_override;
        self
    }
}

/// Body for `POST .../images` (Ideogram generation via KinOS).
#[derive(Clone, Debug, Serialize)]
pub struct ImageGenPayload {
    pub prompt: String,
    pub aspect_ratio: String,
    pub model: String,
    pub magic_prompt_option: String,
}

impl ImageGenPayload {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: "ASPECT_1_1".to_string(),
            model: "V_2".to_string(),
            magic_prompt_option: "AUTO".to_string(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_magic_prompt(mut self, magic_prompt_option: impl Into<String>) -> Self {
        self.magic_prompt_option = magic_prompt_option.into();
        self
    }
}
