//! The GATT client façade.
//!
//! Validates composite identifiers, forwards calls across the injected
//! [`NativeBridge`], deduplicates concurrent service discovery per device
//! address, and fans native events out to typed per-category channels.
//!
//! Nothing here blocks, retries, or times out: a native call that never
//! resolves leaves its callers pending, which is the platform contract.

use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, trace};

use crate::bridge::{BridgeReply, BridgeValue, NativeBridge, Operation, Properties};
use crate::error::{Error, Result};
use crate::events::{CallbackHandle, EventChannels, EventListenerHandle};
use crate::ids::{CharacteristicId, DescriptorId, ServiceId};
use crate::info::{CharacteristicInfo, DescriptorInfo};

/// One caller waiting on a deduplicated `getServices` outcome.
type DiscoveryWaiter = oneshot::Sender<Result<BridgeReply>>;

/// Client façade for GATT operations over a native bridge.
///
/// All state is instance-owned: the discovery registry and the event
/// channels live on the client, and the bridge is injected at construction.
pub struct GattClient {
    /// The native platform implementation.
    bridge: Arc<dyn NativeBridge>,
    /// In-flight `getServices` waiters by device address. An entry exists
    /// iff a native discovery call for that address is currently in flight.
    /// Shared with the per-call fan-out task, which drains and removes it.
    pending_services: Arc<Mutex<HashMap<String, Vec<DiscoveryWaiter>>>>,
    /// Typed event channels fed by the dispatcher.
    channels: Arc<EventChannels>,
}

impl GattClient {
    /// Create a client over the given native bridge.
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            bridge,
            pending_services: Arc::new(Mutex::new(HashMap::new())),
            channels: Arc::new(EventChannels::new()),
        }
    }

    /// Forward one call to the bridge, wrapping a native failure payload.
    async fn invoke(&self, operation: Operation, args: Vec<BridgeValue>) -> Result<BridgeReply> {
        trace!("Invoking {} with {} argument(s)", operation, args.len());
        self.bridge
            .invoke(operation, args)
            .await
            .map_err(Error::native)
    }

    /// Connect to a remote device.
    ///
    /// `properties` defaults to the empty configuration when `None`.
    pub async fn connect(
        &self,
        device_address: &str,
        properties: Option<Properties>,
    ) -> Result<BridgeReply> {
        let properties = properties.unwrap_or_default();
        self.invoke(
            Operation::Connect,
            vec![device_address.into(), properties.into()],
        )
        .await
    }

    /// Disconnect from a remote device.
    pub async fn disconnect(&self, device_address: &str) -> Result<BridgeReply> {
        self.invoke(Operation::Disconnect, vec![device_address.into()])
            .await
    }

    /// Fetch one service by its composite identifier.
    pub async fn get_service(&self, service_id: &str) -> Result<BridgeReply> {
        let id = ServiceId::parse(service_id)?;
        self.invoke(Operation::GetService, vec![id.as_str().into()])
            .await
    }

    /// List the services of a device.
    ///
    /// Concurrent requests for the same address share a single native call:
    /// the first request starts it, later requests join the in-flight
    /// request, and every requester receives the eventual outcome exactly
    /// once, in join order. A request arriving after resolution starts a
    /// fresh call.
    ///
    /// The native call and its fan-out run on a detached task, so
    /// cancelling any requester (the starting one included) cannot strand
    /// the registry entry or the other waiters.
    pub async fn get_services(&self, device_address: &str) -> Result<BridgeReply> {
        let (tx, rx) = oneshot::channel();

        // Join or create the registry entry before any call is issued.
        let is_first = {
            let mut pending = self.pending_services.lock();
            match pending.entry(device_address.to_string()) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().push(tx);
                    false
                }
                Entry::Vacant(entry) => {
                    entry.insert(vec![tx]);
                    true
                }
            }
        };

        if is_first {
            debug!("Issuing native getServices for {}", device_address);
            let bridge = self.bridge.clone();
            let pending = self.pending_services.clone();
            let address = device_address.to_string();

            tokio::spawn(async move {
                let outcome = bridge
                    .invoke(Operation::GetServices, vec![address.as_str().into()])
                    .await
                    .map_err(Error::native);

                // Drain and remove the entry exactly once, then fan out in
                // join order.
                let waiters = pending.lock().remove(&address).unwrap_or_default();
                trace!(
                    "Fanning out getServices outcome for {} to {} waiter(s)",
                    address,
                    waiters.len()
                );
                for waiter in waiters {
                    let _ = waiter.send(outcome.clone());
                }
            });
        } else {
            debug!("Joining in-flight getServices for {}", device_address);
        }

        rx.await
            .unwrap_or_else(|_| Err(Error::native("getServices abandoned before resolving")))
    }

    /// Fetch one characteristic, repackaging the positional reply into a
    /// [`CharacteristicInfo`].
    pub async fn get_characteristic(&self, characteristic_id: &str) -> Result<CharacteristicInfo> {
        let id = CharacteristicId::parse(characteristic_id)?;
        let reply = self
            .invoke(Operation::GetCharacteristic, vec![id.as_str().into()])
            .await?;
        CharacteristicInfo::from_fields(Operation::GetCharacteristic.name(), &reply)
    }

    /// List the characteristics of a service. The reply is forwarded raw.
    pub async fn get_characteristics(&self, service_id: &str) -> Result<BridgeReply> {
        let id = ServiceId::parse(service_id)?;
        self.invoke(Operation::GetCharacteristics, vec![id.as_str().into()])
            .await
    }

    /// List the services included by a service. The reply is forwarded raw.
    pub async fn get_included_services(&self, service_id: &str) -> Result<BridgeReply> {
        let id = ServiceId::parse(service_id)?;
        self.invoke(Operation::GetIncludedServices, vec![id.as_str().into()])
            .await
    }

    /// Fetch one descriptor, repackaging the positional reply into a
    /// [`DescriptorInfo`].
    pub async fn get_descriptor(&self, descriptor_id: &str) -> Result<DescriptorInfo> {
        let id = DescriptorId::parse(descriptor_id)?;
        let reply = self
            .invoke(Operation::GetDescriptor, vec![id.as_str().into()])
            .await?;
        DescriptorInfo::from_fields(Operation::GetDescriptor.name(), &reply)
    }

    /// List the descriptors of a characteristic. The reply is forwarded raw.
    pub async fn get_descriptors(&self, characteristic_id: &str) -> Result<BridgeReply> {
        let id = CharacteristicId::parse(characteristic_id)?;
        self.invoke(Operation::GetDescriptors, vec![id.as_str().into()])
            .await
    }

    /// Read a characteristic value, repackaging the positional reply into a
    /// [`CharacteristicInfo`].
    pub async fn read_characteristic_value(
        &self,
        characteristic_id: &str,
    ) -> Result<CharacteristicInfo> {
        let id = CharacteristicId::parse(characteristic_id)?;
        let reply = self
            .invoke(Operation::ReadCharacteristicValue, vec![id.as_str().into()])
            .await?;
        CharacteristicInfo::from_fields(Operation::ReadCharacteristicValue.name(), &reply)
    }

    /// Write a characteristic value. The reply is forwarded raw.
    pub async fn write_characteristic_value(
        &self,
        characteristic_id: &str,
        value: &[u8],
    ) -> Result<BridgeReply> {
        let id = CharacteristicId::parse(characteristic_id)?;
        self.invoke(
            Operation::WriteCharacteristicValue,
            vec![id.as_str().into(), value.to_vec().into()],
        )
        .await
    }

    /// Enable value-changed notifications for a characteristic.
    ///
    /// `properties` defaults to the empty configuration when `None`.
    pub async fn start_characteristic_notifications(
        &self,
        characteristic_id: &str,
        properties: Option<Properties>,
    ) -> Result<BridgeReply> {
        let id = CharacteristicId::parse(characteristic_id)?;
        let properties = properties.unwrap_or_default();
        self.invoke(
            Operation::StartCharacteristicNotifications,
            vec![id.as_str().into(), properties.into()],
        )
        .await
    }

    /// Disable value-changed notifications for a characteristic.
    pub async fn stop_characteristic_notifications(
        &self,
        characteristic_id: &str,
    ) -> Result<BridgeReply> {
        let id = CharacteristicId::parse(characteristic_id)?;
        self.invoke(
            Operation::StopCharacteristicNotifications,
            vec![id.as_str().into()],
        )
        .await
    }

    /// Read a descriptor value, repackaging the positional reply into a
    /// [`DescriptorInfo`].
    pub async fn read_descriptor_value(&self, descriptor_id: &str) -> Result<DescriptorInfo> {
        let id = DescriptorId::parse(descriptor_id)?;
        let reply = self
            .invoke(Operation::ReadDescriptorValue, vec![id.as_str().into()])
            .await?;
        DescriptorInfo::from_fields(Operation::ReadDescriptorValue.name(), &reply)
    }

    /// Write a descriptor value. The reply is forwarded raw.
    pub async fn write_descriptor_value(
        &self,
        descriptor_id: &str,
        value: &[u8],
    ) -> Result<BridgeReply> {
        let id = DescriptorId::parse(descriptor_id)?;
        self.invoke(
            Operation::WriteDescriptorValue,
            vec![id.as_str().into(), value.to_vec().into()],
        )
        .await
    }

    /// Perform the standing native event registration and start dispatching
    /// inbound events onto the typed channels.
    ///
    /// Dispatch runs until the returned handle is stopped or dropped. The
    /// registration itself has no single-shot completion on the native side.
    pub async fn start_event_listener(&self) -> Result<EventListenerHandle> {
        let mut rx = self.bridge.register_events().await.map_err(Error::native)?;
        let channels = self.channels.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                channels.dispatch(event);
            }
            debug!("Native event stream ended");
        });

        Ok(EventListenerHandle::new(task))
    }

    /// Subscribe to service-added events (raw native payload).
    pub fn subscribe_service_added(&self) -> broadcast::Receiver<BridgeValue> {
        self.channels.service_added.subscribe()
    }

    /// Subscribe to service-changed events (raw native payload).
    ///
    /// Service removals are also delivered here; see the dispatcher.
    pub fn subscribe_service_changed(&self) -> broadcast::Receiver<BridgeValue> {
        self.channels.service_changed.subscribe()
    }

    /// Subscribe to characteristic value updates.
    pub fn subscribe_characteristic_value_changed(
        &self,
    ) -> broadcast::Receiver<CharacteristicInfo> {
        self.channels.characteristic_value_changed.subscribe()
    }

    /// Subscribe to descriptor value updates.
    pub fn subscribe_descriptor_value_changed(&self) -> broadcast::Receiver<DescriptorInfo> {
        self.channels.descriptor_value_changed.subscribe()
    }

    /// Register a callback for characteristic value updates.
    pub fn on_characteristic_value_changed<F>(&self, callback: F) -> CallbackHandle
    where
        F: Fn(CharacteristicInfo) + Send + Sync + 'static,
    {
        let mut rx = self.channels.characteristic_value_changed.subscribe();

        let handle = tokio::spawn(async move {
            while let Ok(info) = rx.recv().await {
                callback(info);
            }
        });

        CallbackHandle::new(move || {
            handle.abort();
        })
    }

    /// Register a callback for descriptor value updates.
    pub fn on_descriptor_value_changed<F>(&self, callback: F) -> CallbackHandle
    where
        F: Fn(DescriptorInfo) + Send + Sync + 'static,
    {
        let mut rx = self.channels.descriptor_value_changed.subscribe();

        let handle = tokio::spawn(async move {
            while let Ok(info) = rx.recv().await {
                callback(info);
            }
        });

        CallbackHandle::new(move || {
            handle.abort();
        })
    }
}
