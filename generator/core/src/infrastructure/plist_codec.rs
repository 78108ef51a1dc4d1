// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Property list encoding of a [`ProfileDocument`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Map the profile aggregate onto the XML plist format read by
//!   the configuration profile installer

use crate::domain::error::WriteError;
use crate::domain::profile::{PolicyPayload, ProfileDocument, Services};
use crate::domain::service_entry::ServiceEntry;
use plist::{Dictionary, Value};
use std::time::SystemTime;

/// Serialize `document` to XML plist bytes.
pub fn encode_xml(document: &ProfileDocument) -> Result<Vec<u8>, WriteError> {
    let mut buffer = Vec::new();
    to_value(document)
        .to_writer_xml(&mut buffer)
        .map_err(|e| WriteError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Build the plist value tree for `document`.
pub fn to_value(document: &ProfileDocument) -> Value {
    let mut root = Dictionary::new();
    root.insert(
        "PayloadContent".to_string(),
        Value::Array(vec![payload_value(document.payload())]),
    );
    root.insert("PayloadDescription".to_string(), string(document.description()));
    root.insert("PayloadDisplayName".to_string(), string(document.display_name()));
    root.insert("PayloadIdentifier".to_string(), string(document.identifier()));
    root.insert("PayloadOrganization".to_string(), string(document.organization()));
    root.insert(
        "PayloadRemovalDisallowed".to_string(),
        Value::Boolean(document.removal_disallowed()),
    );
    root.insert("PayloadScope".to_string(), string(document.scope().as_str()));
    root.insert("PayloadType".to_string(), string(document.payload_type()));
    root.insert("PayloadUUID".to_string(), string(document.uuid()));
    root.insert("PayloadVersion".to_string(), Value::Integer(document.version().into()));

    if let Some(date) = document.removal_date() {
        root.insert(
            "RemovalDate".to_string(),
            Value::Date(plist::Date::from(SystemTime::from(date))),
        );
    }
    if let Some(password) = document.removal_password() {
        root.insert("RemovalPassword".to_string(), string(password));
    }

    Value::Dictionary(root)
}

fn payload_value(payload: &PolicyPayload) -> Value {
    let mut dict = Dictionary::new();
    dict.insert("PayloadDescription".to_string(), string(payload.description()));
    dict.insert("PayloadDisplayName".to_string(), string(payload.display_name()));
    dict.insert("PayloadIdentifier".to_string(), string(payload.identifier()));
    dict.insert("PayloadOrganization".to_string(), string(payload.organization()));
    dict.insert("PayloadType".to_string(), string(payload.payload_type()));
    dict.insert("PayloadUUID".to_string(), string(payload.uuid()));
    dict.insert("PayloadVersion".to_string(), Value::Integer(payload.version().into()));
    dict.insert("Services".to_string(), services_value(payload.services()));
    Value::Dictionary(dict)
}

fn services_value(services: &Services) -> Value {
    let mut dict = Dictionary::new();
    for (kind, entries) in services.iter() {
        dict.insert(
            kind.as_str().to_string(),
            Value::Array(entries.iter().map(entry_value).collect()),
        );
    }
    Value::Dictionary(dict)
}

fn entry_value(entry: &ServiceEntry) -> Value {
    let mut dict = Dictionary::new();
    if let Some(receiver) = entry.receiver() {
        dict.insert(
            "AEReceiverCodeRequirement".to_string(),
            string(&receiver.code_requirement),
        );
        dict.insert(
            "AEReceiverIdentifier".to_string(),
            string(receiver.identity.identifier()),
        );
        dict.insert(
            "AEReceiverIdentifierType".to_string(),
            string(receiver.identity.identifier_type().as_str()),
        );
    }
    dict.insert("Allowed".to_string(), Value::Boolean(entry.allowed()));
    dict.insert("CodeRequirement".to_string(), string(entry.code_requirement()));
    dict.insert("Comment".to_string(), string(entry.comment()));
    dict.insert("Identifier".to_string(), string(entry.identifier()));
    dict.insert(
        "IdentifierType".to_string(),
        string(entry.identifier_type().as_str()),
    );
    Value::Dictionary(dict)
}

fn string(value: &str) -> Value {
    Value::String(value.to_string())
}
