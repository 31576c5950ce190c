//! Message construction for the classification model
//!
//! A reviewer's input is always `system ++ unit ++ few-shot`:
//! 1. System blocks assembled once per run from prompt texts
//! 2. The unit's images (and metrics, when supplied)
//! 3. Few-shot example messages, rendered once per run

mod fewshot;
mod templates;
mod unit;

pub use fewshot::create_fewshot_messages;
pub use templates::PromptSet;
pub use unit::create_unit_messages;

use crate::units::ImagePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    Image(ImagePayload),
}

/// A role-tagged message made of text and image blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .filter(|b| matches!(b, ContentBlock::Image(_)))
            .count()
    }
}
