//! Snapshot types rebuilt from positional native reply fields.
//!
//! The native side replies to characteristic and descriptor reads with a
//! flat positional field list; these constructors repackage that list into
//! the structured objects callers see. Field order and count per operation
//! are fixed by the native contract.

use crate::bridge::BridgeValue;
use crate::error::{Error, Result};

/// Snapshot of a GATT characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacteristicInfo {
    /// The characteristic UUID.
    pub uuid: String,
    /// Identifier of the service this characteristic belongs to.
    pub service: String,
    /// Property flags (e.g. `"read"`, `"notify"`), as the native side
    /// spells them.
    pub properties: Vec<String>,
    /// The characteristic's composite instance identifier.
    pub instance_id: String,
    /// The last known value, if any.
    pub value: Vec<u8>,
}

impl CharacteristicInfo {
    /// Rebuild from the five positional fields
    /// `(uuid, service, properties, instanceId, value)`.
    pub(crate) fn from_fields(operation: &'static str, fields: &[BridgeValue]) -> Result<Self> {
        match fields {
            [BridgeValue::Str(uuid), BridgeValue::Str(service), BridgeValue::StrList(properties), BridgeValue::Str(instance_id), BridgeValue::Bytes(value)] => {
                Ok(Self {
                    uuid: uuid.clone(),
                    service: service.clone(),
                    properties: properties.clone(),
                    instance_id: instance_id.clone(),
                    value: value.clone(),
                })
            }
            _ => Err(Error::UnexpectedReply {
                operation,
                context: format!(
                    "expected (uuid, service, properties, instanceId, value), got {} field(s)",
                    fields.len()
                ),
            }),
        }
    }
}

/// Snapshot of a GATT descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptorInfo {
    /// The descriptor UUID.
    pub uuid: String,
    /// Identifier of the characteristic this descriptor belongs to.
    pub characteristic: String,
    /// The descriptor's composite instance identifier.
    pub instance_id: String,
    /// The last known value, if any.
    pub value: Vec<u8>,
}

impl DescriptorInfo {
    /// Rebuild from the four positional fields
    /// `(uuid, characteristic, instanceId, value)`.
    pub(crate) fn from_fields(operation: &'static str, fields: &[BridgeValue]) -> Result<Self> {
        match fields {
            [BridgeValue::Str(uuid), BridgeValue::Str(characteristic), BridgeValue::Str(instance_id), BridgeValue::Bytes(value)] => {
                Ok(Self {
                    uuid: uuid.clone(),
                    characteristic: characteristic.clone(),
                    instance_id: instance_id.clone(),
                    value: value.clone(),
                })
            }
            _ => Err(Error::UnexpectedReply {
                operation,
                context: format!(
                    "expected (uuid, characteristic, instanceId, value), got {} field(s)",
                    fields.len()
                ),
            }),
        }
    }
}
