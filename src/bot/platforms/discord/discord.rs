use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serenity::{
    all::{
        Command, CommandDataOptionValue, CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
        Http, Permissions,
    },
    async_trait,
};
use tracing::debug;

use crate::bot::{
    commands::{CommandDescriptor, ParameterType},
    handler::handler::{ReplySink, Transport},
    invocation::invocation::{Invocation, Member, OptionValue, ScopeId, UserId},
    permissions::permissions::{Permission, PermissionSet},
    state::def::BotResult,
};

const FAIL_COLOUR: u32 = 0xED4245;

pub fn discord_flag(permission: Permission) -> Permissions {
    match permission {
        Permission::None => Permissions::empty(),
        Permission::Administrator => Permissions::ADMINISTRATOR,
        Permission::ManageServer => Permissions::MANAGE_GUILD,
        Permission::ManageRoles => Permissions::MANAGE_ROLES,
        Permission::ManageChannels => Permissions::MANAGE_CHANNELS,
        Permission::ManageMessages => Permissions::MANAGE_MESSAGES,
        Permission::ManageNicknames => Permissions::MANAGE_NICKNAMES,
        Permission::KickMembers => Permissions::KICK_MEMBERS,
        Permission::BanMembers => Permissions::BAN_MEMBERS,
        Permission::ModerateMembers => Permissions::MODERATE_MEMBERS,
        Permission::MentionEveryone => Permissions::MENTION_EVERYONE,
        Permission::ViewAuditLog => Permissions::VIEW_AUDIT_LOG,
        Permission::SendMessages => Permissions::SEND_MESSAGES,
        Permission::ViewChannel => Permissions::VIEW_CHANNEL,
    }
}

pub fn permission_set(permissions: Permissions) -> PermissionSet {
    Permission::ALL
        .into_iter()
        .filter(|p| permissions.contains(discord_flag(*p)))
        .collect()
}

pub fn option_kind(kind: ParameterType) -> CommandOptionType {
    match kind {
        ParameterType::String => CommandOptionType::String,
        ParameterType::Integer => CommandOptionType::Integer,
        ParameterType::Boolean => CommandOptionType::Boolean,
        ParameterType::User => CommandOptionType::User,
        ParameterType::Channel => CommandOptionType::Channel,
        ParameterType::Role => CommandOptionType::Role,
        ParameterType::Mentionable => CommandOptionType::Mentionable,
        ParameterType::Number => CommandOptionType::Number,
        ParameterType::Attachment => CommandOptionType::Attachment,
    }
}

pub fn option_value(value: &CommandDataOptionValue) -> Option<OptionValue> {
    Some(match value {
        CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
        CommandDataOptionValue::Integer(i) => OptionValue::Integer(*i),
        CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
        CommandDataOptionValue::Number(n) => OptionValue::Number(*n),
        CommandDataOptionValue::User(id) => OptionValue::User(UserId(id.get())),
        CommandDataOptionValue::Channel(id) => OptionValue::Channel(id.get()),
        CommandDataOptionValue::Role(id) => OptionValue::Role(id.get()),
        CommandDataOptionValue::Mentionable(id) => OptionValue::Mentionable(id.get()),
        CommandDataOptionValue::Attachment(id) => OptionValue::Attachment(id.get()),
        _ => return None,
    })
}

pub fn build_command(descriptor: &CommandDescriptor) -> CreateCommand {
    let description = if descriptor.description.is_empty() {
        descriptor.name.clone()
    } else {
        descriptor.description.clone()
    };

    descriptor.parameters.iter().fold(
        CreateCommand::new(descriptor.name.clone()).description(description),
        |command, parameter| {
            let description = if parameter.description.is_empty() {
                parameter.name.clone()
            } else {
                parameter.description.clone()
            };
            command.add_option(
                CreateCommandOption::new(option_kind(parameter.kind), parameter.name.clone(), description)
                    .required(parameter.required),
            )
        },
    )
}

pub fn to_invocation(interaction: &CommandInteraction, reply: Arc<dyn ReplySink>) -> Invocation {
    let mut invocation = Invocation::new(UserId(interaction.user.id.get()), interaction.data.name.clone(), reply);

    if let Some(guild_id) = interaction.guild_id {
        let member = interaction.member.as_ref().map(|member| Member {
            id: UserId(member.user.id.get()),
            permissions: member.permissions.map(permission_set).unwrap_or_default(),
        });
        invocation = invocation.in_scope(ScopeId(guild_id.get()), member);
    }

    for option in &interaction.data.options {
        match option_value(&option.value) {
            Some(value) => invocation = invocation.with_option(option.name.clone(), value),
            None => debug!(option = %option.name, "Skipping unsupported option value"),
        }
    }

    invocation
}

/// Answers one interaction: the first message is the interaction response,
/// anything after that is sent as a followup.
pub struct InteractionReply {
    http: Arc<Http>,
    interaction: CommandInteraction,
    responded: AtomicBool,
}

impl InteractionReply {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Arc<dyn ReplySink> {
        Arc::new(Self { http, interaction, responded: AtomicBool::new(false) })
    }

    async fn send(&self, content: &str, failure: bool) -> BotResult<()> {
        if !self.responded.swap(true, Ordering::SeqCst) {
            let message = if failure {
                CreateInteractionResponseMessage::new()
                    .embed(CreateEmbed::new().description(content).colour(FAIL_COLOUR))
                    .ephemeral(true)
            } else {
                CreateInteractionResponseMessage::new().content(content)
            };
            self.interaction
                .create_response(&self.http, CreateInteractionResponse::Message(message))
                .await?;
        } else {
            let followup = if failure {
                CreateInteractionResponseFollowup::new()
                    .embed(CreateEmbed::new().description(content).colour(FAIL_COLOUR))
                    .ephemeral(true)
            } else {
                CreateInteractionResponseFollowup::new().content(content)
            };
            self.interaction.create_followup(&self.http, followup).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySink for InteractionReply {
    async fn reply(&self, content: &str) -> BotResult<()> {
        self.send(content, false).await
    }

    async fn fail(&self, content: &str) -> BotResult<()> {
        self.send(content, true).await
    }
}

pub struct DiscordTransport {
    http: Arc<Http>,
    self_id: UserId,
}

impl DiscordTransport {
    pub fn new(http: Arc<Http>, self_id: UserId) -> Self {
        Self { http, self_id }
    }
}

#[async_trait]
impl Transport for DiscordTransport {
    fn self_id(&self) -> UserId {
        self.self_id
    }

    async fn publish(&self, descriptor: &CommandDescriptor) -> BotResult<()> {
        Command::create_global_command(&self.http, build_command(descriptor)).await?;
        Ok(())
    }
}
