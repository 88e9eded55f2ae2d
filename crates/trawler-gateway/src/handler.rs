use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    CommandInteraction, ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, EventHandler, Interaction, Ready,
};
use tracing::{debug, error, info, warn};

use trawler_core::normalize;
use trawler_core::{Acknowledgement, ModerationProcessor, ReportRequest, ReviewRequest, SubmissionCoordinator};
use trawler_phisherman::BrandCache;
use trawler_types::events::{ReviewAction, Reviewer};
use trawler_types::models::MessageRef;

use crate::commands::{self, string_option};
use crate::surface::{self, ComponentResponder};

/// Routes gateway events into the report lifecycle.
pub struct Handler {
    coordinator: Arc<SubmissionCoordinator>,
    moderation: Arc<ModerationProcessor>,
    brands: Arc<BrandCache>,
}

impl Handler {
    pub fn new(
        coordinator: Arc<SubmissionCoordinator>,
        moderation: Arc<ModerationProcessor>,
        brands: Arc<BrandCache>,
    ) -> Self {
        Self {
            coordinator,
            moderation,
            brands,
        }
    }

    async fn report(&self, ctx: &Context, command: &CommandInteraction) {
        let options = &command.data.options;
        let link = match normalize::normalize_link(string_option(options, commands::OPT_LINK)) {
            Ok(link) => link,
            Err(e) => {
                debug!(user = %command.user.id, "Rejected /report input: {}", e);
                reply_privately(ctx, command, &e.user_message()).await;
                return;
            }
        };

        if !defer(ctx, command).await {
            return;
        }

        // The deferred reply is the submitter's acknowledgement; its id is
        // stored with the report so the outcome can be written back to it
        let origin = match command.get_response(&ctx.http).await {
            Ok(message) => Some(MessageRef::new(
                command.guild_id.map(|g| g.to_string()),
                message.channel_id.to_string(),
                message.id.to_string(),
            )),
            Err(e) => {
                warn!("Could not read back deferred /report reply: {}", e);
                None
            }
        };

        let request = ReportRequest {
            link,
            brand: string_option(options, commands::OPT_BRAND).map(str::to_string),
            comment: string_option(options, commands::OPT_COMMENT).map(str::to_string),
            submitter_id: command.user.id.to_string(),
            origin,
        };

        let reply = match self.coordinator.submit(request).await {
            Ok(Acknowledgement::Message(text)) => EditInteractionResponse::new().content(text),
            Ok(Acknowledgement::Embed(embed)) => EditInteractionResponse::new().embed(surface::to_create_embed(&embed)),
            Err(e) => EditInteractionResponse::new().content(e.user_message()),
        };
        edit_reply(ctx, command, reply).await;
    }

    async fn check(&self, ctx: &Context, command: &CommandInteraction) {
        let raw = string_option(&command.data.options, commands::OPT_LINK);
        let domain = match normalize::normalize_link(raw) {
            Ok(link) => link.domain,
            Err(_) => match normalize::normalize_domain(raw.unwrap_or_default()) {
                Ok(domain) => domain,
                Err(e) => {
                    reply_privately(ctx, command, &e.user_message()).await;
                    return;
                }
            },
        };

        if !defer(ctx, command).await {
            return;
        }

        let reply = match self.coordinator.check(&domain).await {
            Ok(embed) => EditInteractionResponse::new().embed(surface::to_create_embed(&embed)),
            Err(e) => {
                warn!(domain = %domain, "Domain check failed: {}", e);
                EditInteractionResponse::new().content(e.user_message())
            }
        };
        edit_reply(ctx, command, reply).await;
    }

    async fn autocomplete(&self, ctx: &Context, interaction: &CommandInteraction) {
        let query = interaction
            .data
            .autocomplete()
            .map(|option| option.value)
            .unwrap_or_default();
        let brands = self.brands.search(query).await;

        let response = CreateInteractionResponse::Autocomplete(commands::brand_choices(&brands));
        if let Err(e) = interaction.create_response(&ctx.http, response).await {
            debug!("Brand autocomplete response failed: {}", e);
        }
    }

    async fn review(&self, ctx: Context, component: ComponentInteraction) {
        let Some(action) = ReviewAction::from_custom_id(&component.data.custom_id) else {
            debug!(custom_id = %component.data.custom_id, "Ignoring unknown component");
            return;
        };

        let reviewer = Reviewer {
            id: component.user.id.to_string(),
            tag: component.user.tag(),
        };
        let message = surface::posted_message(&component.message);
        let responder = ComponentResponder::new(ctx.http.clone(), component);

        let outcome = self
            .moderation
            .process(
                ReviewRequest {
                    action,
                    reviewer,
                    message,
                },
                &responder,
            )
            .await;
        debug!(?outcome, "Review processed");
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected", ready.user.name);

        match commands::register(&ctx.http).await {
            Ok(registered) => info!("Registered {} slash commands", registered.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => match command.data.name.as_str() {
                commands::REPORT => self.report(&ctx, &command).await,
                commands::CHECK => self.check(&ctx, &command).await,
                other => warn!("Unknown command '{}'", other),
            },
            Interaction::Autocomplete(interaction) => self.autocomplete(&ctx, &interaction).await,
            Interaction::Component(component) => self.review(ctx, component).await,
            _ => {}
        }
    }
}

async fn reply_privately(ctx: &Context, command: &CommandInteraction, content: &str) {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);
    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        warn!("Failed to reply to /{}: {}", command.data.name, e);
    }
}

async fn defer(ctx: &Context, command: &CommandInteraction) -> bool {
    let response = CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new());
    match command.create_response(&ctx.http, response).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to defer /{}: {}", command.data.name, e);
            false
        }
    }
}

async fn edit_reply(ctx: &Context, command: &CommandInteraction, reply: EditInteractionResponse) {
    if let Err(e) = command.edit_response(&ctx.http, reply).await {
        warn!("Failed to edit /{} reply: {}", command.data.name, e);
    }
}
