//! Control sinks — where each frame's mapped value goes.
//!
//! [`OscSink`] is the normal target (a CV-over-OSC module listening on UDP);
//! [`MidiCcSink`] drives a MIDI control change instead, and [`NullSink`]
//! swallows everything when no output can be opened.

use std::net::UdpSocket;

use log::{info, warn};
use pinch_cadence::ControlVoltage;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use thiserror::Error;

use crate::OscConfig;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("network: {0}")]
    Io(#[from] std::io::Error),

    #[error("OSC encode failed: {0}")]
    Encode(String),

    #[error("MIDI: {0}")]
    Midi(String),
}

/// Anything that accepts one control value per frame.
pub trait ControlSink: Send {
    fn send(&mut self, value: f32) -> Result<(), SinkError>;

    /// Short description for logs and status lines.
    fn describe(&self) -> String;
}

// ════════════════════════════════════════════════════════════════════════════
// OscSink
// ════════════════════════════════════════════════════════════════════════════

/// Sends `<address> ,f <value>` datagrams to a fixed host/port.
pub struct OscSink {
    socket:  UdpSocket,
    address: String,
    target:  String,
}

impl OscSink {
    pub fn open(cfg: &OscConfig) -> Result<Self, SinkError> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect((cfg.host.as_str(), cfg.port))?;
        let target = format!("{}:{}", cfg.host, cfg.port);
        info!("[osc] sending {} to {}", cfg.address(), target);
        Ok(OscSink { socket, address: cfg.address(), target })
    }

    pub fn address(&self) -> &str { &self.address }
}

/// Encode one float message.
pub fn encode_message(address: &str, value: f32) -> Result<Vec<u8>, SinkError> {
    let packet = OscPacket::Message(OscMessage {
        addr: address.to_string(),
        args: vec![OscType::Float(value)],
    });
    encoder::encode(&packet).map_err(|e| SinkError::Encode(format!("{:?}", e)))
}

impl ControlSink for OscSink {
    fn send(&mut self, value: f32) -> Result<(), SinkError> {
        let buf = encode_message(&self.address, value)?;
        self.socket.send(&buf)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("OSC {} → {}", self.address, self.target)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiCcSink
// ════════════════════════════════════════════════════════════════════════════

/// Sends the value as a 7-bit control change, scaled within the mapping's
/// output range.  Repeated values are not re-sent.
pub struct MidiCcSink {
    conn:       midir::MidiOutputConnection,
    port_name:  String,
    channel:    u8,
    controller: u8,
    voltage:    ControlVoltage,
    last:       Option<u8>,
}

impl MidiCcSink {
    /// Open the first MIDI output whose name contains `filter`
    /// (case-insensitive), or the first port when `filter` is empty.
    pub fn open(
        filter:     &str,
        channel:    u8,
        controller: u8,
        voltage:    ControlVoltage,
    ) -> Result<Self, SinkError> {
        let midi_out = midir::MidiOutput::new("pinch_osc")
            .map_err(|e| SinkError::Midi(e.to_string()))?;

        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(SinkError::Midi("no MIDI output ports found".to_string()));
        }

        let filter = filter.to_lowercase();
        let port_idx = ports.iter().enumerate()
            .find(|(_, p)| {
                midi_out.port_name(p)
                    .map(|n| n.to_lowercase().contains(&filter))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        let port = &ports[port_idx];
        let port_name = midi_out.port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());
        info!("[midi] opening MIDI port: {}", port_name);

        let conn = midi_out.connect(port, "pinch-cc")
            .map_err(|e| SinkError::Midi(e.to_string()))?;

        Ok(MidiCcSink {
            conn,
            port_name,
            channel: channel & 0x0F,
            controller: controller & 0x7F,
            voltage,
            last: None,
        })
    }
}

/// Scale a normalized 0.0–1.0 position to a 7-bit CC value.
pub fn cc_value(normalized: f32) -> u8 {
    (normalized.clamp(0.0, 1.0) * 127.0).round() as u8
}

impl ControlSink for MidiCcSink {
    fn send(&mut self, value: f32) -> Result<(), SinkError> {
        let cc = cc_value(self.voltage.normalized(value));
        if self.last == Some(cc) {
            return Ok(());
        }
        self.conn
            .send(&[0xB0 | self.channel, self.controller, cc])
            .map_err(|e| SinkError::Midi(e.to_string()))?;
        self.last = Some(cc);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("MIDI CC{} ch{} → {}", self.controller, self.channel + 1, self.port_name)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NullSink
// ════════════════════════════════════════════════════════════════════════════

pub struct NullSink;

impl ControlSink for NullSink {
    fn send(&mut self, _value: f32) -> Result<(), SinkError> { Ok(()) }
    fn describe(&self) -> String { "null output".to_string() }
}

/// Open the OSC sink, falling back to [`NullSink`] with a warning.
pub fn open_osc_or_null(cfg: &OscConfig) -> Box<dyn ControlSink> {
    match OscSink::open(cfg) {
        Ok(s)  => Box::new(s),
        Err(e) => {
            warn!("[osc] {} — using null output", e);
            Box::new(NullSink)
        }
    }
}

/// Open a MIDI CC sink, falling back to [`NullSink`] with a warning.
pub fn open_midi_or_null(
    filter:     &str,
    channel:    u8,
    controller: u8,
    voltage:    ControlVoltage,
) -> Box<dyn ControlSink> {
    match MidiCcSink::open(filter, channel, controller, voltage) {
        Ok(s)  => Box::new(s),
        Err(e) => {
            warn!("[midi] {} — using null output", e);
            warn!("[midi] Install a MIDI synthesiser such as:");
            warn!("         • Linux: `timidity -iA` or `fluidsynth`");
            warn!("         • macOS: built-in CoreMIDI IAC bus");
            Box::new(NullSink)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::decoder;
    use std::time::Duration;

    #[test]
    fn cc_value_scaling() {
        assert_eq!(cc_value(0.0), 0);
        assert_eq!(cc_value(1.0), 127);
        assert_eq!(cc_value(0.5), 64);
        assert_eq!(cc_value(-3.0), 0);
        assert_eq!(cc_value(7.0), 127);
    }

    #[test]
    fn encoded_message_carries_address_and_float() {
        let buf = encode_message("/ENFACE/ch/1", 1.5).unwrap();
        let (_, packet) = decoder::decode_udp(&buf).unwrap();
        match packet {
            OscPacket::Message(m) => {
                assert_eq!(m.addr, "/ENFACE/ch/1");
                assert_eq!(m.args, vec![OscType::Float(1.5)]);
            }
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn osc_sink_reaches_local_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let port = listener.local_addr().unwrap().port();

        let cfg = OscConfig { host: "127.0.0.1".to_string(), port, ..OscConfig::default() };
        let mut sink = OscSink::open(&cfg).unwrap();
        sink.send(2.25).unwrap();

        let mut buf = [0u8; 256];
        let n = listener.recv(&mut buf).unwrap();
        let (_, packet) = decoder::decode_udp(&buf[..n]).unwrap();
        match packet {
            OscPacket::Message(m) => {
                assert_eq!(m.addr, cfg.address());
                assert_eq!(m.args, vec![OscType::Float(2.25)]);
            }
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut s = NullSink;
        assert!(s.send(f32::NAN).is_ok());
        assert_eq!(s.describe(), "null output");
    }
}
