//! Typed event channels and the native-event dispatcher.
//!
//! The native side delivers every GATT event through one standing listener
//! as a tag plus positional fields. The dispatcher here switches on the tag,
//! rebuilds the typed payload, and broadcasts it on the matching channel.
//! Each channel is an independent `tokio::sync::broadcast` owned by the
//! client instance; observers come and go without affecting each other.

use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::bridge::{BridgeValue, NativeEvent};
use crate::info::{CharacteristicInfo, DescriptorInfo};

/// Broadcast capacity per event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Handle to a registered event callback.
///
/// Dropping the handle (or calling [`unregister`](Self::unregister))
/// detaches the callback.
pub struct CallbackHandle {
    unregister_fn: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl CallbackHandle {
    /// Wrap the closure that detaches the callback.
    pub(crate) fn new(unregister_fn: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unregister_fn: Some(Box::new(unregister_fn)),
        }
    }

    /// Unregister this callback.
    pub fn unregister(mut self) {
        if let Some(f) = self.unregister_fn.take() {
            f();
        }
    }
}

impl Drop for CallbackHandle {
    fn drop(&mut self) {
        if let Some(f) = self.unregister_fn.take() {
            f();
        }
    }
}

/// Token representing the standing native event registration.
///
/// Returned by [`GattClient::start_event_listener`]; dispatch runs until the
/// handle is stopped or dropped.
///
/// [`GattClient::start_event_listener`]: crate::client::GattClient::start_event_listener
pub struct EventListenerHandle {
    task: tokio::task::JoinHandle<()>,
}

impl EventListenerHandle {
    pub(crate) fn new(task: tokio::task::JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stop dispatching native events.
    pub fn stop(self) {
        self.task.abort();
    }

    /// Whether dispatch is still running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for EventListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The per-category broadcast channels fed by the dispatcher.
pub(crate) struct EventChannels {
    /// Service-added events (raw native payload).
    pub(crate) service_added: broadcast::Sender<BridgeValue>,
    /// Service-changed events (raw native payload).
    pub(crate) service_changed: broadcast::Sender<BridgeValue>,
    /// Characteristic value updates.
    pub(crate) characteristic_value_changed: broadcast::Sender<CharacteristicInfo>,
    /// Descriptor value updates.
    pub(crate) descriptor_value_changed: broadcast::Sender<DescriptorInfo>,
}

impl EventChannels {
    pub(crate) fn new() -> Self {
        let (service_added, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (service_changed, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (characteristic_value_changed, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (descriptor_value_changed, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            service_added,
            service_changed,
            characteristic_value_changed,
            descriptor_value_changed,
        }
    }

    /// Route one inbound native event onto its channel.
    ///
    /// Unknown tags are ignored. A tagged event with fields that do not
    /// match the tag's positional shape is logged and dropped.
    pub(crate) fn dispatch(&self, event: NativeEvent) {
        match event.tag.as_str() {
            "onServiceAdded" => {
                if let Some(payload) = event.fields.into_iter().next() {
                    let _ = self.service_added.send(payload);
                }
            }
            "onServiceChanged" => {
                if let Some(payload) = event.fields.into_iter().next() {
                    let _ = self.service_changed.send(payload);
                }
            }
            // The platform has always delivered onServiceRemoved on the
            // service-changed channel; kept as-is for compatibility.
            "onServiceRemoved" => {
                if let Some(payload) = event.fields.into_iter().next() {
                    let _ = self.service_changed.send(payload);
                }
            }
            "onCharacteristicValueChanged" => {
                match CharacteristicInfo::from_fields("onCharacteristicValueChanged", &event.fields)
                {
                    Ok(info) => {
                        let _ = self.characteristic_value_changed.send(info);
                    }
                    Err(e) => warn!("Dropping malformed characteristic event: {}", e),
                }
            }
            "onDescriptorValueChanged" => {
                match DescriptorInfo::from_fields("onDescriptorValueChanged", &event.fields) {
                    Ok(info) => {
                        let _ = self.descriptor_value_changed.send(info);
                    }
                    Err(e) => warn!("Dropping malformed descriptor event: {}", e),
                }
            }
            other => trace!("Ignoring unknown native event tag: {}", other),
        }
    }
}
