use chrono::Utc;

use crate::{
    bot::{
        commands::{CommandDescriptor, CommandGroup, ParameterSpec, ParameterType},
        invocation::invocation::Invocation,
        replies::Replies,
        state::def::BotResult,
    },
    cmd,
};

pub fn general_commands() -> BotResult<CommandGroup> {
    Ok(CommandGroup {
        name: "general".into(),
        commands: vec![
            cmd!(say_descriptor()?, say),
            cmd!(ping_descriptor()?, ping),
        ],
    })
}

fn say_descriptor() -> BotResult<CommandDescriptor> {
    CommandDescriptor::builder("say")
        .description("Make the bot say something")
        .parameter(ParameterSpec::new(ParameterType::String, "text", "Text to say").required())
        .parameter(ParameterSpec::new(ParameterType::Boolean, "embed", "Make it a quote?"))
        .global(true)
        .build()
}

fn ping_descriptor() -> BotResult<CommandDescriptor> {
    CommandDescriptor::builder("ping")
        .description("Check that the bot is alive")
        .global(true)
        .build()
}

async fn say(invocation: Invocation) -> BotResult<()> {
    let Some(text) = invocation.string("text") else {
        return invocation.fail(&Replies::missing_option("text")).await;
    };

    let message = if invocation.boolean("embed").unwrap_or(false) {
        text.lines().map(|line| format!("> {line}")).collect::<Vec<_>>().join("\n")
    } else {
        text.to_string()
    };
    invocation.send(&message).await
}

async fn ping(invocation: Invocation) -> BotResult<()> {
    let latency = (Utc::now() - invocation.received_at).num_milliseconds();
    invocation.send(&Replies::pong(latency)).await
}
