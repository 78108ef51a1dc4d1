// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! Service entry value object: one allow/deny line under a resource in the
//! profile's `Services` dictionary.

use crate::domain::identity::{IdentifierType, ResolvedIdentity};

/// Receiving side of an Apple Events entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiverIdentity {
    pub identity: ResolvedIdentity,
    pub code_requirement: String,
}

/// A concrete policy line. Immutable once built; equality is field-wise and
/// drives de-duplication within a resource's entry list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceEntry {
    allowed: bool,
    code_requirement: String,
    comment: String,
    identity: ResolvedIdentity,
    receiver: Option<ReceiverIdentity>,
}

impl ServiceEntry {
    pub fn new(
        allowed: bool,
        code_requirement: String,
        comment: String,
        identity: ResolvedIdentity,
        receiver: Option<ReceiverIdentity>,
    ) -> Self {
        Self {
            allowed,
            code_requirement,
            comment,
            identity,
            receiver,
        }
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn code_requirement(&self) -> &str {
        &self.code_requirement
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn identity(&self) -> &ResolvedIdentity {
        &self.identity
    }

    pub fn identifier(&self) -> &str {
        self.identity.identifier()
    }

    pub fn identifier_type(&self) -> IdentifierType {
        self.identity.identifier_type()
    }

    pub fn receiver(&self) -> Option<&ReceiverIdentity> {
        self.receiver.as_ref()
    }
}

/// `"Allow"` or `"Deny"`, as used in generated comments.
pub fn allow_statement(allowed: bool) -> &'static str {
    if allowed {
        "Allow"
    } else {
        "Deny"
    }
}
