use serenity::all::{
    Command, CommandDataOption, CommandOptionType, CreateAutocompleteResponse, CreateCommand, CreateCommandOption,
    Http,
};

use trawler_types::models::Brand;

pub const REPORT: &str = "report";
pub const CHECK: &str = "check";

pub const OPT_LINK: &str = "link";
pub const OPT_BRAND: &str = "brand";
pub const OPT_COMMENT: &str = "comment";

pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(REPORT)
            .description("Report a phishing link for review")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_LINK, "The phishing URL")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_BRAND, "The brand the link impersonates")
                    .required(true)
                    .set_autocomplete(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_COMMENT, "Anything reviewers should know")
                    .max_length(1000),
            ),
        CreateCommand::new(CHECK)
            .description("Show what is known about a domain")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_LINK, "URL or domain to check")
                    .required(true),
            ),
    ]
}

/// Replace the global command set with ours.
pub async fn register(http: &Http) -> serenity::Result<Vec<Command>> {
    Command::set_global_commands(http, definitions()).await
}

pub fn string_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|o| o.name == name)
        .and_then(|o| o.value.as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Brands are offered and resolved by display name.
pub fn brand_choices(brands: &[Brand]) -> CreateAutocompleteResponse {
    brands
        .iter()
        .fold(CreateAutocompleteResponse::new(), |response, brand| {
            response.add_string_choice(&brand.name, &brand.name)
        })
}
