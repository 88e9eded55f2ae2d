use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serenity::all::{
    ActionRowComponent, ButtonKind, ButtonStyle, ChannelId, ComponentInteraction, CreateActionRow, CreateButton,
    CreateEmbed, CreateInteractionResponse, CreateInteractionResponseFollowup, CreateMessage, EditMessage, Http,
    HttpError, Message, MessageId, Timestamp,
};
use tracing::debug;

use trawler_core::{ChatSurface, InteractionResponder, SurfaceError};
use trawler_types::message::{Control, ControlStyle, Embed, EmbedField, MessageEdit, OutboundMessage, PostedMessage};
use trawler_types::models::MessageRef;

/// Buttons per action row.
const ROW_WIDTH: usize = 5;

// Discord JSON error codes
const UNKNOWN_CHANNEL: isize = 10003;
const UNKNOWN_MESSAGE: isize = 10008;

/// [`ChatSurface`] backed by serenity's REST client.
pub struct SerenityChatSurface {
    http: Arc<Http>,
}

impl SerenityChatSurface {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatSurface for SerenityChatSurface {
    async fn post_message(&self, channel: &str, message: OutboundMessage) -> Result<MessageRef, SurfaceError> {
        let channel_id = ChannelId::new(snowflake(channel)?);

        let mut builder = CreateMessage::new()
            .embeds(message.embeds.iter().map(to_create_embed).collect())
            .components(to_action_rows(&message.controls));
        if let Some(content) = message.content {
            builder = builder.content(content);
        }

        let posted = channel_id
            .send_message(&self.http, builder)
            .await
            .map_err(surface_error)?;
        Ok(reference_of(&posted))
    }

    async fn fetch_message(&self, target: &MessageRef) -> Result<PostedMessage, SurfaceError> {
        let channel_id = ChannelId::new(snowflake(&target.channel)?);
        let message_id = MessageId::new(snowflake(&target.message)?);

        let message = channel_id
            .message(&self.http, message_id)
            .await
            .map_err(surface_error)?;

        let mut posted = posted_message(&message);
        // REST responses omit the guild
        posted.reference.guild = target.guild.clone();
        Ok(posted)
    }

    async fn edit_message(&self, target: &MessageRef, edit: MessageEdit) -> Result<(), SurfaceError> {
        let channel_id = ChannelId::new(snowflake(&target.channel)?);
        let message_id = MessageId::new(snowflake(&target.message)?);

        channel_id
            .edit_message(&self.http, message_id, to_edit_message(edit))
            .await
            .map_err(surface_error)?;
        debug!(channel = %target.channel, message = %target.message, "Message edited");
        Ok(())
    }
}

/// Replies to one button press.
pub struct ComponentResponder {
    http: Arc<Http>,
    interaction: ComponentInteraction,
}

impl ComponentResponder {
    pub fn new(http: Arc<Http>, interaction: ComponentInteraction) -> Self {
        Self { http, interaction }
    }
}

#[async_trait]
impl InteractionResponder for ComponentResponder {
    async fn acknowledge(&self) -> Result<(), SurfaceError> {
        self.interaction
            .create_response(&self.http, CreateInteractionResponse::Acknowledge)
            .await
            .map_err(surface_error)
    }

    async fn notify(&self, content: &str) -> Result<(), SurfaceError> {
        let followup = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        self.interaction
            .create_followup(&self.http, followup)
            .await
            .map(|_| ())
            .map_err(surface_error)
    }
}

// -- Conversions --

pub fn reference_of(message: &Message) -> MessageRef {
    MessageRef::new(
        message.guild_id.map(|g| g.to_string()),
        message.channel_id.to_string(),
        message.id.to_string(),
    )
}

/// Read a platform message back into the neutral model.
pub fn posted_message(message: &Message) -> PostedMessage {
    PostedMessage {
        reference: reference_of(message),
        content: message.content.clone(),
        embeds: message.embeds.iter().map(from_discord_embed).collect(),
        controls: message
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .filter_map(from_component)
            .collect(),
    }
}

fn from_discord_embed(embed: &serenity::all::Embed) -> Embed {
    Embed {
        title: embed.title.clone(),
        description: embed.description.clone(),
        colour: embed.colour.map(|c| c.0),
        fields: embed
            .fields
            .iter()
            .map(|f| EmbedField::new(f.name.clone(), f.value.clone(), f.inline))
            .collect(),
        timestamp: embed
            .timestamp
            .and_then(|ts| DateTime::from_timestamp(ts.unix_timestamp(), 0)),
        image: embed.image.as_ref().map(|i| i.url.clone()),
        thumbnail: embed.thumbnail.as_ref().map(|t| t.url.clone()),
    }
}

fn from_component(component: &ActionRowComponent) -> Option<Control> {
    let ActionRowComponent::Button(button) = component else {
        return None;
    };
    let label = button.label.clone().unwrap_or_default();

    match &button.data {
        ButtonKind::Link { url } => Some(Control::Link {
            label,
            url: url.to_string(),
        }),
        ButtonKind::NonLink { custom_id, style } => Some(Control::Action {
            id: custom_id.clone(),
            label,
            style: control_style(*style),
        }),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

pub fn to_create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(colour);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(ts) = embed
        .timestamp
        .and_then(|at| Timestamp::from_unix_timestamp(at.timestamp()).ok())
    {
        builder = builder.timestamp(ts);
    }
    if let Some(image) = &embed.image {
        builder = builder.image(image);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    builder
}

pub fn to_action_rows(controls: &[Control]) -> Vec<CreateActionRow> {
    controls
        .chunks(ROW_WIDTH)
        .map(|row| CreateActionRow::Buttons(row.iter().map(to_button).collect()))
        .collect()
}

fn to_button(control: &Control) -> CreateButton {
    match control {
        Control::Action { id, label, style } => CreateButton::new(id)
            .label(label)
            .style(button_style(*style)),
        Control::Link { label, url } => CreateButton::new_link(url).label(label),
    }
}

fn to_edit_message(edit: MessageEdit) -> EditMessage {
    let mut builder = EditMessage::new();
    if let Some(content) = edit.content {
        builder = builder.content(content);
    }
    if let Some(embeds) = edit.embeds {
        builder = builder.embeds(embeds.iter().map(to_create_embed).collect());
    }
    if let Some(controls) = edit.controls {
        builder = builder.components(to_action_rows(&controls));
    }
    builder
}

fn button_style(style: ControlStyle) -> ButtonStyle {
    match style {
        ControlStyle::Primary => ButtonStyle::Primary,
        ControlStyle::Secondary => ButtonStyle::Secondary,
        ControlStyle::Success => ButtonStyle::Success,
        ControlStyle::Danger => ButtonStyle::Danger,
    }
}

fn control_style(style: ButtonStyle) -> ControlStyle {
    match style {
        ButtonStyle::Primary => ControlStyle::Primary,
        ButtonStyle::Success => ControlStyle::Success,
        ButtonStyle::Danger => ControlStyle::Danger,
        _ => ControlStyle::Secondary,
    }
}

// -- Errors --

fn snowflake(raw: &str) -> Result<u64, SurfaceError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| SurfaceError::Other(format!("invalid snowflake '{}'", raw)))
}

pub fn surface_error(err: serenity::Error) -> SurfaceError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => classify(
            response.status_code.as_u16(),
            response.error.code,
            &response.error.message,
        ),
        _ => SurfaceError::Other(err.to_string()),
    }
}

fn classify(status: u16, code: isize, message: &str) -> SurfaceError {
    match (status, code) {
        (_, UNKNOWN_MESSAGE | UNKNOWN_CHANNEL) | (404, _) => SurfaceError::NotFound,
        (403, _) => SurfaceError::Forbidden(message.to_string()),
        (429, _) => SurfaceError::RateLimited,
        _ => SurfaceError::Other(format!("{} {}", status, message)),
    }
}
