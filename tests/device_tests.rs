//! Device and controller tests driven through a stub transport.

use std::sync::{Arc, Mutex};

use launchgrid::{
    connect, disconnect, Controller, Coordinate, Device, DeviceError, InputPort, OutputPort,
    RawEvent, RawEventHandler, Transport, UnmappedKeyError,
};

/// One LED write observed by the stub output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sent {
    NoteOn { key: u8, intensity: i8 },
    ControlChange { controller: u8, intensity: i8 },
}

#[derive(Clone)]
struct StubOutput {
    name: String,
    open: Arc<Mutex<bool>>,
    fail_open: bool,
    fail_send: bool,
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl StubOutput {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            open: Arc::new(Mutex::new(false)),
            fail_open: false,
            fail_send: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

impl OutputPort for StubOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.fail_open {
            return Err(DeviceError::Open("stub output refuses to open".into()));
        }
        *self.open.lock().unwrap() = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        *self.open.lock().unwrap() = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        *self.open.lock().unwrap()
    }

    fn send_note_on(&mut self, _channel: u8, key: u8, intensity: i8) -> Result<(), DeviceError> {
        if self.fail_send {
            return Err(DeviceError::Send("stub output refuses to send".into()));
        }
        self.sent.lock().unwrap().push(Sent::NoteOn { key, intensity });
        Ok(())
    }

    fn send_control_change(
        &mut self,
        _channel: u8,
        controller: u8,
        intensity: i8,
    ) -> Result<(), DeviceError> {
        if self.fail_send {
            return Err(DeviceError::Send("stub output refuses to send".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::ControlChange { controller, intensity });
        Ok(())
    }
}

#[derive(Clone)]
struct StubInput {
    name: String,
    open: Arc<Mutex<bool>>,
    receiving: Arc<Mutex<bool>>,
    stop_calls: Arc<Mutex<u32>>,
    handler: Arc<Mutex<Option<RawEventHandler>>>,
}

impl StubInput {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            open: Arc::new(Mutex::new(false)),
            receiving: Arc::new(Mutex::new(false)),
            stop_calls: Arc::new(Mutex::new(0)),
            handler: Arc::new(Mutex::new(None)),
        }
    }

    /// Deliver a raw event as the transport callback would.
    fn feed(&self, raw: RawEvent) {
        if let Some(handler) = self.handler.lock().unwrap().as_mut() {
            handler(raw);
        }
    }

    fn stop_calls(&self) -> u32 {
        *self.stop_calls.lock().unwrap()
    }
}

impl InputPort for StubInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        *self.open.lock().unwrap() = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        *self.open.lock().unwrap() = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        *self.open.lock().unwrap()
    }

    fn start_receiving(&mut self, handler: RawEventHandler) -> Result<(), DeviceError> {
        *self.handler.lock().unwrap() = Some(handler);
        *self.receiving.lock().unwrap() = true;
        Ok(())
    }

    fn stop_receiving(&mut self) -> Result<(), DeviceError> {
        *self.stop_calls.lock().unwrap() += 1;
        *self.receiving.lock().unwrap() = false;
        Ok(())
    }
}

struct StubTransport {
    inputs: Vec<StubInput>,
    outputs: Vec<StubOutput>,
}

impl Transport for StubTransport {
    type In = StubInput;
    type Out = StubOutput;

    fn enumerate_inputs(&self) -> Result<Vec<StubInput>, DeviceError> {
        Ok(self.inputs.clone())
    }

    fn enumerate_outputs(&self) -> Result<Vec<StubOutput>, DeviceError> {
        Ok(self.outputs.clone())
    }
}

fn stub_device() -> (Device<StubInput, StubOutput>, StubInput, StubOutput) {
    let input = StubInput::named("Launchpad Mini");
    let output = StubOutput::named("Launchpad Mini");
    let device = Device::new("Launchpad Mini", input.clone(), output.clone());
    (device, input, output)
}

#[test]
fn test_set_light_translates_through_address_tables() {
    let (mut device, _input, output) = stub_device();

    device.set_light(Coordinate::new(0, 1), 5).unwrap(); // bottom-left pad
    device.set_light(Coordinate::new(3, 0), 12).unwrap(); // top control
    device.set_light(Coordinate::new(8, 1), 48).unwrap(); // right control

    assert_eq!(
        output.sent(),
        vec![
            Sent::NoteOn { key: 0, intensity: 5 },
            Sent::ControlChange { controller: 107, intensity: 12 },
            Sent::NoteOn { key: 8, intensity: 48 },
        ]
    );
}

#[test]
fn test_set_light_at_corner_never_touches_transport() {
    let (mut device, _input, output) = stub_device();

    assert_eq!(device.set_light(Coordinate::new(8, 0), 127), Ok(()));
    assert!(output.sent().is_empty());
}

#[test]
fn test_set_light_out_of_range_propagates() {
    let (mut device, _input, output) = stub_device();

    assert_eq!(
        device.set_light(Coordinate::new(12, 12), 1),
        Err(UnmappedKeyError::UnknownCoordinate(12, 12))
    );
    assert!(output.sent().is_empty());
}

#[test]
fn test_set_light_swallows_transport_failure() {
    let input = StubInput::named("Launchpad Mini");
    let mut output = StubOutput::named("Launchpad Mini");
    output.fail_send = true;
    let mut device = Device::new("Launchpad Mini", input, output.clone());

    assert_eq!(device.set_light(Coordinate::new(4, 4), 30), Ok(()));
    assert!(output.sent().is_empty());
}

#[test]
fn test_clear_writes_zero_to_all_lightable_cells() {
    let (mut device, _input, output) = stub_device();

    device.clear();

    // 81 cells visited, the unused corner produces no transport call.
    let sent = output.sent();
    assert_eq!(sent.len(), 80);
    assert!(sent.iter().all(|m| matches!(
        m,
        Sent::NoteOn { intensity: 0, .. } | Sent::ControlChange { intensity: 0, .. }
    )));

    let notes = sent.iter().filter(|m| matches!(m, Sent::NoteOn { .. })).count();
    assert_eq!(notes, 72); // 64 pads + 8 right controls
    assert_eq!(sent.len() - notes, 8); // 8 top controls
}

#[test]
fn test_zero_velocity_press_emits_one_event() {
    let (mut device, input, _output) = stub_device();
    assert!(connect(&mut device));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    device.subscribe(move |event| sink.lock().unwrap().push(event.coordinate));

    // Note 24 is the second right control.
    input.feed(RawEvent::Note { key: 24, velocity: 0 });
    assert_eq!(*seen.lock().unwrap(), vec![Coordinate::new(8, 2)]);

    // Nonzero velocity carries no event.
    input.feed(RawEvent::Note { key: 24, velocity: 5 });
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_control_press_maps_to_top_row() {
    let (mut device, input, _output) = stub_device();
    assert!(connect(&mut device));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    device.subscribe(move |event| sink.lock().unwrap().push((event.x(), event.y())));

    input.feed(RawEvent::Control { controller: 109, value: 0 });
    assert_eq!(*seen.lock().unwrap(), vec![(5, 0)]);
}

#[test]
fn test_unknown_code_is_dropped_without_crashing() {
    let (mut device, input, _output) = stub_device();
    assert!(connect(&mut device));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    device.subscribe(move |event| sink.lock().unwrap().push(event.coordinate));

    // 9 sits in the gap between pad rows; logged and dropped.
    input.feed(RawEvent::Note { key: 9, velocity: 0 });
    assert!(seen.lock().unwrap().is_empty());

    // The pipeline still delivers afterwards.
    input.feed(RawEvent::Note { key: 0, velocity: 0 });
    assert_eq!(*seen.lock().unwrap(), vec![Coordinate::new(0, 1)]);
}

#[test]
fn test_unsubscribed_handler_gets_nothing() {
    let (mut device, input, _output) = stub_device();
    assert!(connect(&mut device));

    let first = Arc::new(Mutex::new(0));
    let second = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&first);
    let id = device.subscribe(move |_| *sink.lock().unwrap() += 1);
    let sink = Arc::clone(&second);
    device.subscribe(move |_| *sink.lock().unwrap() += 1);

    input.feed(RawEvent::Note { key: 0, velocity: 0 });
    assert!(device.unsubscribe(id));
    input.feed(RawEvent::Note { key: 0, velocity: 0 });

    assert_eq!(*first.lock().unwrap(), 1);
    assert_eq!(*second.lock().unwrap(), 2);
}

#[test]
fn test_connect_with_failing_output_reports_false_without_rollback() {
    let input = StubInput::named("Launchpad S");
    let mut output = StubOutput::named("Launchpad S");
    output.fail_open = true;
    let mut device = Device::new("Launchpad S", input.clone(), output.clone());

    assert!(!connect(&mut device));

    // Half-open: input stays open and receiving, nothing is rolled back.
    assert!(input.is_open());
    assert!(!output.is_open());
    assert_eq!(input.stop_calls(), 0);
}

#[test]
fn test_disconnect_clears_then_closes() {
    let (mut device, input, output) = stub_device();
    assert!(connect(&mut device));

    device.set_light(Coordinate::new(2, 3), 40).unwrap();
    assert!(disconnect(&mut device));

    assert!(!input.is_open());
    assert!(!output.is_open());
    assert_eq!(input.stop_calls(), 1);

    // One lit cell plus the full clear sweep.
    assert_eq!(output.sent().len(), 81);
}

#[test]
fn test_disconnect_twice_is_a_successful_noop() {
    let (mut device, input, output) = stub_device();
    assert!(connect(&mut device));
    assert!(disconnect(&mut device));

    let writes_after_first = output.sent().len();
    assert!(disconnect(&mut device));

    // No second clear sweep and no extra stop.
    assert_eq!(output.sent().len(), writes_after_first);
    assert_eq!(input.stop_calls(), 1);
}

#[test]
fn test_discover_pairs_and_filters_by_name() {
    let transport = StubTransport {
        inputs: vec![
            StubInput::named("Launchpad Mini"),
            StubInput::named("Foo"),
            StubInput::named("Synth"),
            StubInput::named("LAUNCHPAD S"),
        ],
        outputs: vec![
            StubOutput::named("Launchpad Mini"),
            StubOutput::named("Synth"),
            StubOutput::named("LAUNCHPAD S"),
            StubOutput::named("Launchpad Pro"), // output only, no input
        ],
    };

    let controller = Controller::new(transport);
    let mut names: Vec<String> = controller
        .discover()
        .unwrap()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    names.sort();

    // "Foo" has no output, "Synth" is not a launchpad, "Launchpad Pro" has
    // no input; matching is case-insensitive.
    assert_eq!(names, vec!["LAUNCHPAD S", "Launchpad Mini"]);
}
