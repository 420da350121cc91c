//! Composite GATT identifiers.
//!
//! The native platform addresses GATT nodes with slash-separated paths
//! scoped under a device address:
//!
//! - service: `deviceAddress/serviceInstanceId`
//! - characteristic: `deviceAddress/serviceInstanceId/characteristicInstanceId`
//! - descriptor: `deviceAddress/serviceInstanceId/characteristicInstanceId/descriptorInstanceId`
//!
//! Validation is arity-only: an identifier is accepted iff splitting on `'/'`
//! yields exactly the expected segment count. Segment content (including the
//! device address format) is the native side's business.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of segments in a service identifier.
const SERVICE_SEGMENTS: usize = 2;
/// Number of segments in a characteristic identifier.
const CHARACTERISTIC_SEGMENTS: usize = 3;
/// Number of segments in a descriptor identifier.
const DESCRIPTOR_SEGMENTS: usize = 4;

fn check_arity(id: &str, expected: usize) -> Result<()> {
    if id.split('/').count() == expected {
        Ok(())
    } else {
        Err(Error::invalid_instance_id(id))
    }
}

macro_rules! composite_id {
    ($(#[$doc:meta])* $name:ident, $segments:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(String);

        impl $name {
            /// Validate a candidate identifier and wrap it.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidInstanceId`] if the segment count is
            /// not exactly the expected arity.
            pub fn parse(id: &str) -> Result<Self> {
                check_arity(id, $segments)?;
                Ok(Self(id.to_string()))
            }

            /// The full identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The device address segment (first).
            pub fn device_address(&self) -> &str {
                self.0.split('/').next().unwrap_or("")
            }

            /// The final instance segment, scoped under its parent.
            pub fn instance_id(&self) -> &str {
                self.0.rsplit('/').next().unwrap_or("")
            }

            /// The identifier of the enclosing node (all but the final
            /// segment), or the device address for a service id.
            pub fn parent(&self) -> &str {
                match self.0.rfind('/') {
                    Some(idx) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

composite_id!(
    /// Identifier of a GATT service instance under a device.
    ServiceId,
    SERVICE_SEGMENTS
);

composite_id!(
    /// Identifier of a GATT characteristic instance under a service.
    CharacteristicId,
    CHARACTERISTIC_SEGMENTS
);

composite_id!(
    /// Identifier of a GATT descriptor instance under a characteristic.
    DescriptorId,
    DESCRIPTOR_SEGMENTS
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_service_id_arity() {
        assert!(ServiceId::parse("aa:bb/svc1").is_ok());
        assert!(ServiceId::parse("aa:bb").is_err());
        assert!(ServiceId::parse("aa:bb/svc1/char1").is_err());
        assert!(ServiceId::parse("").is_err());
    }

    #[test]
    fn test_characteristic_id_arity() {
        assert!(CharacteristicId::parse("aa:bb/svc1/char1").is_ok());
        assert!(CharacteristicId::parse("aa:bb/svc1").is_err());
        assert!(CharacteristicId::parse("aa:bb/svc1/char1/desc1").is_err());
    }

    #[test]
    fn test_descriptor_id_arity() {
        assert!(DescriptorId::parse("aa:bb/svc1/char1/desc1").is_ok());
        assert!(DescriptorId::parse("aa:bb/svc1/char1").is_err());
        assert!(DescriptorId::parse("a/b/c/d/e").is_err());
    }

    #[test]
    fn test_no_semantic_validation() {
        // Empty segments pass; only the count matters.
        let id = ServiceId::parse("/").unwrap();
        assert_eq!(id.device_address(), "");
        assert_eq!(id.instance_id(), "");
    }

    #[test]
    fn test_segment_accessors() {
        let id = DescriptorId::parse("aa:bb/svc1/char1/desc1").unwrap();
        assert_eq!(id.device_address(), "aa:bb");
        assert_eq!(id.instance_id(), "desc1");
        assert_eq!(id.parent(), "aa:bb/svc1/char1");

        let id = CharacteristicId::parse("aa:bb/svc1/char1").unwrap();
        assert_eq!(id.parent(), "aa:bb/svc1");
        assert_eq!(id.to_string(), "aa:bb/svc1/char1");
    }

    #[test]
    fn test_invalid_id_error_message() {
        let err = ServiceId::parse("no-slash").unwrap_err();
        assert_eq!(err.to_string(), "Invalid instanceId: no-slash");
    }

    #[test]
    fn test_from_str_round_trip() {
        let id: CharacteristicId = "aa:bb/svc1/char1".parse().unwrap();
        assert_eq!(id.as_str(), "aa:bb/svc1/char1");
    }

    proptest! {
        #[test]
        fn prop_service_id_accepts_exactly_two_segments(s in "[^/]{0,12}/[^/]{0,12}") {
            prop_assert!(ServiceId::parse(&s).is_ok());
        }

        #[test]
        fn prop_arity_matches_slash_count(s in ".{0,32}") {
            let slashes = s.matches('/').count();
            prop_assert_eq!(ServiceId::parse(&s).is_ok(), slashes == 1);
            prop_assert_eq!(CharacteristicId::parse(&s).is_ok(), slashes == 2);
            prop_assert_eq!(DescriptorId::parse(&s).is_ok(), slashes == 3);
        }
    }
}
