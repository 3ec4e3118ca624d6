//! A single grid controller: LED writes and input event delivery.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::address::{self, Coordinate, KeyCode, UnmappedKeyError};
use crate::event::{InputEvent, RawEvent, SubscriberRegistry, SubscriptionId};
use crate::transport::{InputPort, OutputPort, RawEventHandler, LED_CHANNEL};

/// One discovered Launchpad: a name, an input port, and an output port.
///
/// LED writes go through the address tables before touching the output port;
/// raw input events are classified and delivered to subscribers as
/// [`InputEvent`]s. Connection lifecycle is driven by
/// [`connect`](crate::controller::connect) and
/// [`disconnect`](crate::controller::disconnect).
pub struct Device<I, O> {
    name: String,
    input: I,
    output: O,
    /// Shared with the transport callback registered at connect time.
    subscribers: Arc<Mutex<SubscriberRegistry>>,
}

impl<I: InputPort, O: OutputPort> Device<I, O> {
    pub fn new(name: impl Into<String>, input: I, output: O) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            subscribers: Arc::new(Mutex::new(SubscriberRegistry::new())),
        }
    }

    /// Device name as reported by the transport.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an input-event handler. Handlers run synchronously on the
    /// transport callback thread, in subscription order.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&InputEvent) + Send + 'static,
    {
        self.subscribers.lock().subscribe(Box::new(handler))
    }

    /// Remove a previously registered handler.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.lock().unsubscribe(id)
    }

    /// Set the LED at a grid coordinate.
    ///
    /// The unused (8,0) corner is silently skipped. A coordinate outside the
    /// addressable space is a contract violation and returns
    /// [`UnmappedKeyError`]; transport failures are logged and swallowed.
    pub fn set_light(
        &mut self,
        coordinate: Coordinate,
        intensity: i8,
    ) -> Result<(), UnmappedKeyError> {
        if coordinate.is_corner() {
            return Ok(());
        }
        let key = address::to_key_code(coordinate)?;
        self.set_light_key(key, intensity);
        Ok(())
    }

    /// Set the LED behind a specific hardware key. Best effort: transport
    /// failures are logged, never propagated.
    pub fn set_light_key(&mut self, key: KeyCode, intensity: i8) {
        let result = match key {
            KeyCode::Note(note) => self.output.send_note_on(LED_CHANNEL, note, intensity),
            KeyCode::Control(controller) => {
                self.output
                    .send_control_change(LED_CHANNEL, controller, intensity)
            }
        };
        if let Err(e) = result {
            tracing::error!(
                "Failed to send LED update ({}) to {} {:?}: {}",
                intensity,
                self.name,
                key,
                e
            );
        }
    }

    /// Turn off every LED.
    ///
    /// Walks the full 9x9 inclusive grid and lets `set_light` skip the cells
    /// that have no LED behind them.
    pub fn clear(&mut self) {
        for y in 0..=8 {
            for x in 0..=8 {
                let _ = self.set_light(Coordinate::new(x, y), 0);
            }
        }
    }

    pub(crate) fn input(&self) -> &I {
        &self.input
    }

    pub(crate) fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub(crate) fn output(&self) -> &O {
        &self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Build the raw-event callback handed to the input port at connect time.
    pub(crate) fn raw_event_sink(&self) -> RawEventHandler {
        let name = self.name.clone();
        let subscribers = Arc::clone(&self.subscribers);
        Box::new(move |raw| dispatch_raw(&name, &subscribers, raw))
    }
}

/// Classify one raw transport event and deliver it.
///
/// The hardware signals a press with value/velocity exactly 0; nonzero values
/// carry no event and are ignored. Codes outside the address tables are
/// logged and dropped — hardware can legitimately emit them.
fn dispatch_raw(name: &str, subscribers: &Mutex<SubscriberRegistry>, raw: RawEvent) {
    let (key, value) = match raw {
        RawEvent::Note { key, velocity } => (KeyCode::Note(key), velocity),
        RawEvent::Control { controller, value } => (KeyCode::Control(controller), value),
    };

    if value != 0 {
        return;
    }

    match address::to_coordinate(key) {
        Ok(coordinate) => subscribers.lock().emit(&InputEvent::new(coordinate)),
        Err(e) => tracing::warn!("Ignoring input from {}: {}", name, e),
    }
}
