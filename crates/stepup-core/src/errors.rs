use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("repository could not be determined from the upgrade identifier: {id}")]
pub struct DiscoveryError {
    pub id: String,
}

impl DiscoveryError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("; "))]
pub struct HookError {
    messages: Vec<String>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn with_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
