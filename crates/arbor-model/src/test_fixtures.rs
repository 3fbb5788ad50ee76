//! Entity fixtures shared by unit tests across the crate.

use arbor_types::{Key, Timestamp};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, FieldValue, FieldView};

/// String-identified root entity with a kind override (`Accounts`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub name: String,
    pub key: Option<Key>,
    pub created_at: Timestamp,
}

impl Account {
    pub fn with_email(email: &str) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }
}

impl Entity for Account {
    fn type_name() -> &'static str {
        "Account"
    }

    fn fields(&self) -> Vec<FieldView<'_>> {
        vec![
            FieldView {
                name: "model",
                annotation: "Accounts",
                value: FieldValue::Marker,
            },
            FieldView {
                name: "email",
                annotation: "id",
                value: FieldValue::Str(&self.email),
            },
            FieldView {
                name: "name",
                annotation: "",
                value: FieldValue::Str(&self.name),
            },
        ]
    }

    fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    fn parent_key(&self) -> Option<&Key> {
        None
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_created_at(&mut self, at: Timestamp) {
        self.created_at = at;
    }
}

/// Integer-identified child entity declaring `has_parent`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: i64,
    pub amount_cents: i64,
    pub account: Option<Key>,
    pub key: Option<Key>,
    pub created_at: Timestamp,
}

impl Invoice {
    pub fn numbered(number: i64) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn under(number: i64, account: Key) -> Self {
        Self {
            number,
            account: Some(account),
            ..Self::default()
        }
    }
}

impl Entity for Invoice {
    fn type_name() -> &'static str {
        "Invoice"
    }

    fn fields(&self) -> Vec<FieldView<'_>> {
        vec![
            FieldView {
                name: "model",
                annotation: "Invoices,has_parent",
                value: FieldValue::Marker,
            },
            FieldView {
                name: "number",
                annotation: "id",
                value: FieldValue::Int(self.number),
            },
            FieldView {
                name: "amount_cents",
                annotation: "",
                value: FieldValue::Int(self.amount_cents),
            },
        ]
    }

    fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    fn parent_key(&self) -> Option<&Key> {
        self.account.as_ref()
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_created_at(&mut self, at: Timestamp) {
        self.created_at = at;
    }
}

/// Entity with no identifier field; the store allocates its key. The kind
/// falls back to the type name because the marker annotation is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub message: String,
    pub key: Option<Key>,
    pub created_at: Timestamp,
}

impl LogLine {
    pub fn saying(message: &str) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl Entity for LogLine {
    fn type_name() -> &'static str {
        "LogLine"
    }

    fn fields(&self) -> Vec<FieldView<'_>> {
        vec![
            FieldView {
                name: "model",
                annotation: "",
                value: FieldValue::Marker,
            },
            FieldView {
                name: "message",
                annotation: "",
                value: FieldValue::Str(&self.message),
            },
        ]
    }

    fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    fn parent_key(&self) -> Option<&Key> {
        None
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_created_at(&mut self, at: Timestamp) {
        self.created_at = at;
    }
}

/// Entity with two identifier annotations; only the first declared one
/// counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedTwice {
    pub code: String,
    pub serial: i64,
    pub key: Option<Key>,
    pub created_at: Timestamp,
}

impl Entity for TaggedTwice {
    fn type_name() -> &'static str {
        "TaggedTwice"
    }

    fn fields(&self) -> Vec<FieldView<'_>> {
        vec![
            FieldView {
                name: "model",
                annotation: "",
                value: FieldValue::Marker,
            },
            FieldView {
                name: "code",
                annotation: "id",
                value: FieldValue::Str(&self.code),
            },
            FieldView {
                name: "serial",
                annotation: "id",
                value: FieldValue::Int(self.serial),
            },
        ]
    }

    fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    fn parent_key(&self) -> Option<&Key> {
        None
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_created_at(&mut self, at: Timestamp) {
        self.created_at = at;
    }
}
