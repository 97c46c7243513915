use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bot::{
    commands::commands::CommandHandler,
    permissions::permissions::{Permission, PERMISSION_PLACEHOLDER},
    state::def::{BotError, BotResult},
};

pub mod commands;
pub mod general;
pub mod registry;

pub const DEFAULT_PERMISSION_MESSAGE: &str =
    "❌ You do not have the needed permissions to execute this command ($PERMISSION$).";
pub const MAX_DESCRIPTION_LEN: usize = 100;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-_\p{Ll}\p{N}]{1,32}$").expect("static regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl ParameterSpec {
    pub fn new(kind: ParameterType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { kind, name: name.into(), description: description.into(), required: false }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Immutable metadata for one command. Built through [`CommandDescriptor::builder`],
/// which is the only place names and parameters are validated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub permission: Permission,
    pub permission_message: String,
    pub global: bool,
}

impl CommandDescriptor {
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            permission: Permission::None,
            permission_message: DEFAULT_PERMISSION_MESSAGE.to_string(),
            global: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DescriptorBuilder {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    permission: Permission,
    permission_message: String,
    global: bool,
}

impl DescriptorBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    /// `$PERMISSION$` in the template is replaced by the required permission's name.
    pub fn permission_message(mut self, template: impl Into<String>) -> Self {
        self.permission_message = template.into();
        self
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn build(self) -> BotResult<CommandDescriptor> {
        let name = self.name;
        if name.is_empty() {
            return Err(BotError::invalid(name, "name must not be empty"));
        }
        if !NAME_PATTERN.is_match(&name) {
            return Err(BotError::invalid(name, "name must be 1-32 lowercase letters, digits, `-` or `_`"));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(BotError::invalid(name, "description is longer than 100 characters"));
        }
        if !self.permission_message.contains(PERMISSION_PLACEHOLDER) && !self.permission.is_unrestricted() {
            tracing::debug!(command = %name, "permission message has no {PERMISSION_PLACEHOLDER} placeholder");
        }

        let mut seen = HashSet::new();
        let mut optional_seen = false;
        for parameter in &self.parameters {
            if !NAME_PATTERN.is_match(&parameter.name) {
                return Err(BotError::invalid(&name, format!("invalid parameter name `{}`", parameter.name)));
            }
            if parameter.description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(BotError::invalid(&name, format!("description of `{}` is too long", parameter.name)));
            }
            if !seen.insert(parameter.name.as_str()) {
                return Err(BotError::invalid(&name, format!("duplicate parameter `{}`", parameter.name)));
            }
            if parameter.required && optional_seen {
                return Err(BotError::invalid(
                    &name,
                    format!("required parameter `{}` follows an optional one", parameter.name),
                ));
            }
            optional_seen |= !parameter.required;
        }

        Ok(CommandDescriptor {
            name,
            description: self.description,
            parameters: self.parameters,
            permission: self.permission,
            permission_message: self.permission_message,
            global: self.global,
        })
    }
}

#[derive(Clone)]
pub struct CommandRegistration {
    pub descriptor: CommandDescriptor,
    pub handler: CommandHandler,
}

/// A named, explicit list of commands handed to the registry by the host.
pub struct CommandGroup {
    pub name: String,
    pub commands: Vec<CommandRegistration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let descriptor = CommandDescriptor::builder("say").build().unwrap();
        assert_eq!(descriptor.description, "");
        assert!(descriptor.parameters.is_empty());
        assert_eq!(descriptor.permission, Permission::None);
        assert_eq!(descriptor.permission_message, DEFAULT_PERMISSION_MESSAGE);
        assert!(!descriptor.global);
    }

    #[test]
    fn parameter_order_is_preserved() {
        let descriptor = CommandDescriptor::builder("say")
            .parameter(ParameterSpec::new(ParameterType::String, "text", "Text to say").required())
            .parameter(ParameterSpec::new(ParameterType::Boolean, "embed", "Make it an embed?"))
            .parameter(ParameterSpec::new(ParameterType::Channel, "where", ""))
            .build()
            .unwrap();

        let names: Vec<_> = descriptor.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["text", "embed", "where"]);
        assert!(descriptor.parameters[0].required);
    }

    #[test]
    fn rejects_empty_name() {
        let err = CommandDescriptor::builder("").build().unwrap_err();
        assert!(matches!(err, BotError::InvalidDescriptor { .. }));
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["Say", "two words", "a".repeat(33).as_str(), "slash/"] {
            assert!(CommandDescriptor::builder(name).build().is_err(), "{name}");
        }
        for name in ["say", "ban-user", "set_level2", "ñandú"] {
            assert!(CommandDescriptor::builder(name).build().is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_long_description() {
        let err = CommandDescriptor::builder("say").description("x".repeat(101)).build().unwrap_err();
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn rejects_duplicate_parameters() {
        let result = CommandDescriptor::builder("say")
            .parameter(ParameterSpec::new(ParameterType::String, "text", ""))
            .parameter(ParameterSpec::new(ParameterType::Integer, "text", ""))
            .build();
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_required_after_optional() {
        let result = CommandDescriptor::builder("say")
            .parameter(ParameterSpec::new(ParameterType::Boolean, "embed", ""))
            .parameter(ParameterSpec::new(ParameterType::String, "text", "").required())
            .build();
        assert!(result.unwrap_err().to_string().contains("follows an optional"));
    }

    #[test]
    fn serializes_with_screaming_tags() {
        let descriptor = CommandDescriptor::builder("ban")
            .permission(Permission::BanMembers)
            .parameter(ParameterSpec::new(ParameterType::User, "target", "Who").required())
            .build()
            .unwrap();
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["permission"], "BAN_MEMBERS");
        assert_eq!(json["parameters"][0]["type"], "USER");
        assert_eq!(json["parameters"][0]["required"], true);
    }
}
