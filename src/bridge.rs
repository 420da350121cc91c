//! The seam between this crate and the native platform implementation.
//!
//! All real BLE work (radio I/O, connection management, the GATT database)
//! happens on the other side of [`NativeBridge`]. This crate only marshals
//! arguments across it and routes what comes back.
//!
//! The contract is positional: every call carries an operation name plus an
//! ordered list of [`BridgeValue`]s, and resolves with an ordered list of
//! reply fields. The field order per operation is the contract; nothing here
//! validates it beyond what the typed reply constructors need.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Optional trailing configuration for `connect` and
/// `startCharacteristicNotifications`.
///
/// Callers that pass `None` get the default (empty) configuration, exactly
/// as if they had passed `Properties::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Properties {
    /// Keep the connection or notification registration alive while the
    /// application is suspended.
    pub persistent: bool,
}

/// One positional argument or reply field of a bridge call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BridgeValue {
    /// A string field (identifiers, UUIDs, device addresses).
    Str(String),
    /// A list of strings (characteristic property flags).
    StrList(Vec<String>),
    /// A byte buffer (characteristic and descriptor values).
    Bytes(Vec<u8>),
    /// A configuration object.
    Properties(Properties),
}

impl BridgeValue {
    /// The string payload, if this is a string field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The string-list payload, if this is a string-list field.
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(l) => Some(l),
            _ => None,
        }
    }

    /// The byte payload, if this is a byte field.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for BridgeValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for BridgeValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<u8>> for BridgeValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Properties> for BridgeValue {
    fn from(p: Properties) -> Self {
        Self::Properties(p)
    }
}

/// The single-shot operations the native side implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    Disconnect,
    GetService,
    GetServices,
    GetCharacteristic,
    GetCharacteristics,
    GetIncludedServices,
    GetDescriptor,
    GetDescriptors,
    ReadCharacteristicValue,
    WriteCharacteristicValue,
    StartCharacteristicNotifications,
    StopCharacteristicNotifications,
    ReadDescriptorValue,
    WriteDescriptorValue,
}

impl Operation {
    /// The operation name as the native side spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::GetService => "getService",
            Self::GetServices => "getServices",
            Self::GetCharacteristic => "getCharacteristic",
            Self::GetCharacteristics => "getCharacteristics",
            Self::GetIncludedServices => "getIncludedServices",
            Self::GetDescriptor => "getDescriptor",
            Self::GetDescriptors => "getDescriptors",
            Self::ReadCharacteristicValue => "readCharacteristicValue",
            Self::WriteCharacteristicValue => "writeCharacteristicValue",
            Self::StartCharacteristicNotifications => "startCharacteristicNotifications",
            Self::StopCharacteristicNotifications => "stopCharacteristicNotifications",
            Self::ReadDescriptorValue => "readDescriptorValue",
            Self::WriteDescriptorValue => "writeDescriptorValue",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The positional success fields of a resolved bridge call.
pub type BridgeReply = Vec<BridgeValue>;

/// An inbound native event: a discriminator tag followed by tag-specific
/// positional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    /// The event discriminator (e.g. `"onCharacteristicValueChanged"`).
    pub tag: String,
    /// The positional fields following the tag.
    pub fields: Vec<BridgeValue>,
}

impl NativeEvent {
    /// Build an event from a tag and its positional fields.
    pub fn new(tag: impl Into<String>, fields: Vec<BridgeValue>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }
}

/// The native platform implementation this crate forwards to.
///
/// Each `invoke` is asynchronous and single-shot: it eventually resolves
/// with either the positional success fields or the raw native failure
/// payload, never both. `register_events` is a standing registration with
/// no single-shot completion; events flow on the returned channel until the
/// registration is dropped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// Issue one native call and await its outcome.
    async fn invoke(
        &self,
        operation: Operation,
        args: Vec<BridgeValue>,
    ) -> std::result::Result<BridgeReply, String>;

    /// Register the persistent event listener.
    async fn register_events(
        &self,
    ) -> std::result::Result<mpsc::UnboundedReceiver<NativeEvent>, String>;
}
