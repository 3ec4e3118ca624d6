//! Abstract MIDI-like transport consumed by the core.
//!
//! The core never touches wire format: it talks to input and output ports
//! through these traits and receives already-parsed [`RawEvent`]s. The
//! `midir`-backed implementation lives in [`midi`].

pub mod midi;

use thiserror::Error;

use crate::event::RawEvent;

/// Logical MIDI channel used for all LED writes.
pub const LED_CHANNEL: u8 = 0;

/// Transport-level I/O failure during open, close, send, or receive.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("MIDI transport unavailable: {0}")]
    Transport(String),

    #[error("port is not open")]
    NotOpen,

    #[error("failed to open port: {0}")]
    Open(String),

    #[error("failed to send message: {0}")]
    Send(String),
}

/// Callback invoked for each raw event delivered by an input port.
pub type RawEventHandler = Box<dyn FnMut(RawEvent) + Send + 'static>;

/// An input endpoint delivering note and control-change notifications.
pub trait InputPort {
    fn name(&self) -> &str;

    fn open(&mut self) -> Result<(), DeviceError>;

    fn close(&mut self) -> Result<(), DeviceError>;

    fn is_open(&self) -> bool;

    /// Register the handler and begin delivering raw events to it.
    ///
    /// Events arrive sequentially from a single transport callback context.
    fn start_receiving(&mut self, handler: RawEventHandler) -> Result<(), DeviceError>;

    fn stop_receiving(&mut self) -> Result<(), DeviceError>;
}

/// An output endpoint accepting LED write messages.
pub trait OutputPort {
    fn name(&self) -> &str;

    fn open(&mut self) -> Result<(), DeviceError>;

    fn close(&mut self) -> Result<(), DeviceError>;

    fn is_open(&self) -> bool;

    fn send_note_on(&mut self, channel: u8, key: u8, intensity: i8) -> Result<(), DeviceError>;

    fn send_control_change(
        &mut self,
        channel: u8,
        controller: u8,
        intensity: i8,
    ) -> Result<(), DeviceError>;
}

/// Enumeration of the input and output endpoints available on the system.
pub trait Transport {
    type In: InputPort;
    type Out: OutputPort;

    fn enumerate_inputs(&self) -> Result<Vec<Self::In>, DeviceError>;

    fn enumerate_outputs(&self) -> Result<Vec<Self::Out>, DeviceError>;
}
