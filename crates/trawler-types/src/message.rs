//! Platform-neutral message model. The gateway adapter translates these to
//! and from the chat platform's own builders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MessageRef;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub timestamp: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

impl Embed {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Replace the value of a named field. Returns false when the embed has
    /// no such field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// A single interactive element on a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// Emits an interaction carrying `id` when pressed.
    Action {
        id: String,
        label: String,
        style: ControlStyle,
    },
    /// Opens `url`; never reaches the bot.
    Link { label: String, url: String },
}

/// A message to post. Controls are laid out in a single row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundMessage {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub controls: Vec<Control>,
}

/// A partial edit. `None` leaves that part of the message untouched,
/// `Some(vec![])` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEdit {
    pub content: Option<String>,
    pub embeds: Option<Vec<Embed>>,
    pub controls: Option<Vec<Control>>,
}

impl MessageEdit {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embeds(embeds: Vec<Embed>) -> Self {
        Self {
            embeds: Some(embeds),
            ..Default::default()
        }
    }

    pub fn controls(controls: Vec<Control>) -> Self {
        Self {
            controls: Some(controls),
            ..Default::default()
        }
    }

    /// Replace the whole message with a line of text, dropping embeds and
    /// controls.
    pub fn inert(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Some(Vec::new()),
            controls: Some(Vec::new()),
        }
    }
}

/// A message as fetched back from the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    pub reference: MessageRef,
    pub content: String,
    pub embeds: Vec<Embed>,
    pub controls: Vec<Control>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_only_touches_named_field() {
        let mut embed = Embed {
            fields: vec![
                EmbedField::new("Reporter:", "<@1>", true),
                EmbedField::new("Report Count:", "1", true),
            ],
            ..Default::default()
        };

        assert!(embed.set_field("Report Count:", "2"));
        assert!(!embed.set_field("Missing:", "x"));
        assert_eq!(embed.field("Report Count:"), Some("2"));
        assert_eq!(embed.field("Reporter:"), Some("<@1>"));
    }

    #[test]
    fn inert_edit_clears_everything() {
        let edit = MessageEdit::inert("done");
        assert_eq!(edit.content.as_deref(), Some("done"));
        assert_eq!(edit.embeds, Some(vec![]));
        assert_eq!(edit.controls, Some(vec![]));
    }
}
