//! # ble-gatt-bridge
//!
//! A client façade for Bluetooth Low Energy GATT operations over a native
//! platform bridge.
//!
//! The actual BLE stack (radio I/O, connection management, the GATT
//! database) lives on the other side of the [`NativeBridge`] trait; this
//! crate marshals calls across it and routes what comes back:
//!
//! - **Identifier validation**: GATT nodes are addressed with composite
//!   slash-separated identifiers (`device/service`, `device/service/char`,
//!   `device/service/char/desc`); every operation checks the segment count
//!   before touching the bridge.
//! - **Discovery deduplication**: concurrent `get_services` requests for the
//!   same device share one in-flight native call, and every requester
//!   receives the eventual outcome exactly once.
//! - **Event fan-out**: one standing native listener feeds typed broadcast
//!   channels for service and value-change events.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ble_gatt_bridge::{GattClient, NativeBridge, Result};
//!
//! async fn run(bridge: Arc<dyn NativeBridge>) -> Result<()> {
//!     let client = GattClient::new(bridge);
//!
//!     // Start routing native events before anything can be delivered.
//!     let listener = client.start_event_listener().await?;
//!     let mut values = client.subscribe_characteristic_value_changed();
//!
//!     client.connect("aa:bb:cc:dd:ee:ff", None).await?;
//!     for service in client.get_services("aa:bb:cc:dd:ee:ff").await? {
//!         println!("service: {:?}", service);
//!     }
//!
//!     client
//!         .start_characteristic_notifications("aa:bb:cc:dd:ee:ff/svc1/char1", None)
//!         .await?;
//!     if let Ok(info) = values.recv().await {
//!         println!("value update: {:?}", info.value);
//!     }
//!
//!     listener.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for the snapshot and
//!   configuration types

// Public modules
pub mod bridge;
pub mod client;
pub mod error;
pub mod events;
pub mod ids;
pub mod info;

// Re-exports for convenience
pub use bridge::{BridgeReply, BridgeValue, NativeBridge, NativeEvent, Operation, Properties};
pub use client::GattClient;
pub use error::{Error, Result};
pub use events::{CallbackHandle, EventListenerHandle};
pub use ids::{CharacteristicId, DescriptorId, ServiceId};
pub use info::{CharacteristicInfo, DescriptorInfo};
