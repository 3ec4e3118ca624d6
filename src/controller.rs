//! Launchpad discovery and connection lifecycle.

use std::collections::HashMap;

use crate::device::Device;
use crate::transport::{DeviceError, InputPort, OutputPort, Transport};

/// Case-insensitive substring used to recognize Launchpad ports.
const PRODUCT_FILTER: &str = "launchpad";

/// Discovers Launchpad devices over a transport.
pub struct Controller<T: Transport> {
    transport: T,
}

impl<T: Transport> Controller<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Find all attached Launchpads.
    ///
    /// Input and output endpoints are paired by exact name; endpoints with no
    /// counterpart are dropped, as are pairs whose name does not contain
    /// "launchpad" (case-insensitive). Order is not significant.
    pub fn discover(&self) -> Result<Vec<Device<T::In, T::Out>>, DeviceError> {
        let mut inputs: HashMap<String, T::In> = HashMap::new();
        for input in self.transport.enumerate_inputs()? {
            tracing::debug!("Found MIDI input port: {}", input.name());
            inputs.insert(input.name().to_string(), input);
        }

        let mut devices = Vec::new();
        for output in self.transport.enumerate_outputs()? {
            tracing::debug!("Found MIDI output port: {}", output.name());

            let name = output.name().to_string();
            if !name.to_lowercase().contains(PRODUCT_FILTER) {
                continue;
            }
            if let Some(input) = inputs.remove(&name) {
                devices.push(Device::new(name, input, output));
            }
        }

        tracing::info!("Identified {} Launchpads", devices.len());
        Ok(devices)
    }
}

/// Connect to a device: open the input, start receiving, open the output.
///
/// Returns true iff both ports report open afterward. A partial failure
/// leaves the device half-open for the caller to retry or abandon; nothing is
/// rolled back here.
pub fn connect<I: InputPort, O: OutputPort>(device: &mut Device<I, O>) -> bool {
    if let Err(e) = device.input_mut().open() {
        tracing::warn!("Failed to open MIDI input for {}: {}", device.name(), e);
    }

    let sink = device.raw_event_sink();
    if let Err(e) = device.input_mut().start_receiving(sink) {
        tracing::warn!("Failed to start receiving from {}: {}", device.name(), e);
    }

    if let Err(e) = device.output_mut().open() {
        tracing::warn!("Failed to open MIDI output for {}: {}", device.name(), e);
    }

    device.input().is_open() && device.output().is_open()
}

/// Disconnect from a device: clear its LEDs, stop receiving, close both ports.
///
/// Returns true iff both ports report closed afterward. Safe to call on an
/// already-disconnected device.
pub fn disconnect<I: InputPort, O: OutputPort>(device: &mut Device<I, O>) -> bool {
    if device.input().is_open() {
        device.clear();
        if let Err(e) = device.input_mut().stop_receiving() {
            tracing::warn!("Failed to stop receiving from {}: {}", device.name(), e);
        }
        if let Err(e) = device.input_mut().close() {
            tracing::warn!("Failed to close MIDI input for {}: {}", device.name(), e);
        }
    }

    if device.output().is_open() {
        if let Err(e) = device.output_mut().close() {
            tracing::warn!("Failed to close MIDI output for {}: {}", device.name(), e);
        }
    }

    !device.input().is_open() && !device.output().is_open()
}
