//! `midir`-backed transport implementation.
//!
//! All byte-level MIDI concerns live here; the rest of the crate only sees
//! [`RawEvent`]s and the port traits.

use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use super::{DeviceError, InputPort, OutputPort, RawEventHandler, Transport};
use crate::event::RawEvent;

/// Client name registered with the system MIDI service.
const CLIENT_NAME: &str = "launchgrid";

/// Status nibbles for the two message kinds the core consumes.
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

/// Parse a raw MIDI message into a transport event.
///
/// Only note-on and control-change messages are of interest; everything else
/// (note-off, clock, aftertouch) is dropped. A note-on with velocity 0 is
/// passed through unchanged, not rewritten as a note-off: the Launchpad
/// signals input with exactly that message.
fn parse_raw(message: &[u8]) -> Option<RawEvent> {
    if message.len() < 3 {
        return None;
    }
    match message[0] & 0xF0 {
        NOTE_ON => Some(RawEvent::Note {
            key: message[1],
            velocity: message[2],
        }),
        CONTROL_CHANGE => Some(RawEvent::Control {
            controller: message[1],
            value: message[2],
        }),
        _ => None,
    }
}

/// System MIDI transport backed by `midir`.
#[derive(Debug, Default)]
pub struct MidirTransport;

impl MidirTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for MidirTransport {
    type In = MidirInputPort;
    type Out = MidirOutputPort;

    fn enumerate_inputs(&self) -> Result<Vec<MidirInputPort>, DeviceError> {
        let client =
            MidiInput::new(CLIENT_NAME).map_err(|e| DeviceError::Transport(e.to_string()))?;

        let mut ports = Vec::new();
        for port in client.ports() {
            let name = client
                .port_name(&port)
                .map_err(|e| DeviceError::Transport(e.to_string()))?;
            ports.push(MidirInputPort {
                name,
                port,
                client: None,
                connection: None,
            });
        }
        Ok(ports)
    }

    fn enumerate_outputs(&self) -> Result<Vec<MidirOutputPort>, DeviceError> {
        let client =
            MidiOutput::new(CLIENT_NAME).map_err(|e| DeviceError::Transport(e.to_string()))?;

        let mut ports = Vec::new();
        for port in client.ports() {
            let name = client
                .port_name(&port)
                .map_err(|e| DeviceError::Transport(e.to_string()))?;
            ports.push(MidirOutputPort {
                name,
                port,
                connection: None,
            });
        }
        Ok(ports)
    }
}

/// A named system MIDI input port.
pub struct MidirInputPort {
    name: String,
    port: midir::MidiInputPort,
    /// Held between open() and start_receiving().
    client: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
}

impl InputPort for MidirInputPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.client.is_none() && self.connection.is_none() {
            let client =
                MidiInput::new(CLIENT_NAME).map_err(|e| DeviceError::Transport(e.to_string()))?;
            self.client = Some(client);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.client = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.client.is_some() || self.connection.is_some()
    }

    fn start_receiving(&mut self, mut handler: RawEventHandler) -> Result<(), DeviceError> {
        let client = self.client.take().ok_or(DeviceError::NotOpen)?;
        let connection = client
            .connect(
                &self.port,
                "launchgrid-in",
                move |_timestamp, message, _| {
                    if let Some(raw) = parse_raw(message) {
                        handler(raw);
                    }
                },
                (),
            )
            .map_err(|e| DeviceError::Open(e.to_string()))?;
        self.connection = Some(connection);
        Ok(())
    }

    fn stop_receiving(&mut self) -> Result<(), DeviceError> {
        if let Some(connection) = self.connection.take() {
            let (client, ()) = connection.close();
            self.client = Some(client);
        }
        Ok(())
    }
}

/// A named system MIDI output port.
pub struct MidirOutputPort {
    name: String,
    port: midir::MidiOutputPort,
    connection: Option<MidiOutputConnection>,
}

impl MidirOutputPort {
    fn send(&mut self, message: &[u8; 3]) -> Result<(), DeviceError> {
        let connection = self.connection.as_mut().ok_or(DeviceError::NotOpen)?;
        connection
            .send(message)
            .map_err(|e| DeviceError::Send(e.to_string()))
    }
}

impl OutputPort for MidirOutputPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.connection.is_none() {
            let client =
                MidiOutput::new(CLIENT_NAME).map_err(|e| DeviceError::Transport(e.to_string()))?;
            let connection = client
                .connect(&self.port, "launchgrid-out")
                .map_err(|e| DeviceError::Open(e.to_string()))?;
            self.connection = Some(connection);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        self.connection = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn send_note_on(&mut self, channel: u8, key: u8, intensity: i8) -> Result<(), DeviceError> {
        self.send(&[
            NOTE_ON | (channel & 0x0F),
            key & 0x7F,
            (intensity as u8) & 0x7F,
        ])
    }

    fn send_control_change(
        &mut self,
        channel: u8,
        controller: u8,
        intensity: i8,
    ) -> Result<(), DeviceError> {
        self.send(&[
            CONTROL_CHANGE | (channel & 0x0F),
            controller & 0x7F,
            (intensity as u8) & 0x7F,
        ])
    }
}
