// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for module registration.

use thiserror::Error;

/// A descriptor was rejected by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The module name is empty or only whitespace
    #[error("Invalid module{}: name must not be empty", position(.index))]
    EmptyName { index: Option<usize> },

    /// The module name collides with a key the registry reserves
    #[error("Invalid module{} <{name}>: '{name}' is a reserved name", position(.index))]
    ReservedName { index: Option<usize>, name: String },
}

impl RegistrationError {
    /// Attach the position of the offending descriptor within a batch.
    pub fn at_index(self, at: usize) -> Self {
        match self {
            RegistrationError::EmptyName { .. } => RegistrationError::EmptyName { index: Some(at) },
            RegistrationError::ReservedName { name, .. } => RegistrationError::ReservedName {
                index: Some(at),
                name,
            },
        }
    }
}

fn position(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("[{}]", i),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_batch_position() {
        let single = RegistrationError::EmptyName { index: None };
        assert_eq!(single.to_string(), "Invalid module: name must not be empty");

        let batched = RegistrationError::ReservedName {
            index: None,
            name: "__proto__".to_string(),
        }
        .at_index(3);
        assert_eq!(
            batched.to_string(),
            "Invalid module[3] <__proto__>: '__proto__' is a reserved name"
        );
    }
}
