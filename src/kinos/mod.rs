//! KinOS API client: request builders, HTTP wrapper, response normalizer.

pub mod agent;
pub mod client;
pub mod media;
pub mod request;
pub mod response;

pub use agent::AgentRef;
pub use client::KinosClient;
pub use request::{
    AnalysisPayload, CreateKinPayload, ImageGenPayload, MessagePayload, Mode, ThinkingPayload,
};
pub use response::{reply_text, ImageResult};
