//! Landmark sources — anything that delivers [`HandFrame`]s.
//!
//! Each source runs on its own thread and pushes frames into an `mpsc`
//! channel.  Consumers drain the channel once per loop iteration and keep the
//! latest frame, so they don't need to know whether frames come from an
//! external detector, LeapMotion hardware, or a synthetic sweep.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::landmark::{synthetic_hand, HandFrame};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    /// Run until the source is exhausted or the receiver hangs up.
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

/// Drain every pending frame and return the newest one, if any.
pub fn latest_frame(rx: &Receiver<HandFrame>) -> Option<HandFrame> {
    rx.try_iter().last()
}

// ════════════════════════════════════════════════════════════════════════════
// StreamSource — JSON lines from an external detector
// ════════════════════════════════════════════════════════════════════════════

/// Reads one JSON [`HandFrame`] per line.
///
/// ```text
/// {"hands":[{"landmarks":[{"x":0.41,"y":0.52,"z":0.0}, …21 points…],"handedness":"Right"}]}
/// {"hands":[]}
/// ```
///
/// Malformed lines are logged and skipped; EOF ends the source.  When built
/// with [`StreamSource::command`] the child process is killed when the
/// stream ends.
pub struct StreamSource {
    reader: Box<dyn BufRead + Send>,
    child:  Option<Child>,
    label:  String,
}

impl StreamSource {
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R, label: &str) -> Self {
        StreamSource { reader: Box::new(reader), child: None, label: label.to_string() }
    }

    /// Frames piped into this process's stdin.
    pub fn stdin() -> Self {
        StreamSource::from_reader(BufReader::new(io::stdin()), "stdin")
    }

    /// Spawn `command_line` (program followed by arguments, see
    /// [`split_command_line`]) and read frames from its stdout.  The child
    /// is killed when the source is dropped.
    pub fn command(command_line: &str) -> Result<Self> {
        let parts = split_command_line(command_line)?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| Error::Source("empty detector command".to_string()))?;
        let program = program.as_str();

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Source(format!("no stdout from `{}`", program)))?;

        info!("spawned landmark detector `{}` (pid {})", command_line, child.id());
        Ok(StreamSource {
            reader: Box::new(BufReader::new(stdout)),
            child:  Some(child),
            label:  program.to_string(),
        })
    }

    /// Process id of the spawned detector, if any.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn stop_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!("[{}] stopping detector (pid {})", self.label, child.id());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for StreamSource {
    fn drop(&mut self) {
        self.stop_child();
    }
}

/// Split a command line into words.  Single or double quotes group words
/// containing spaces; a backslash escapes the next character outside single
/// quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word  = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => word.push(c),
            (_, '\\') => {
                let next = chars
                    .next()
                    .ok_or_else(|| Error::Source("trailing backslash in command".to_string()))?;
                word.push(next);
                in_word = true;
            }
            (Some(_), c) => word.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err(Error::Source("unterminated quote in command".to_string()));
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

/// Parse one landmark line.
pub fn parse_frame(line: &str) -> Result<HandFrame> {
    Ok(serde_json::from_str(line)?)
}

impl LandmarkSource for StreamSource {
    fn run(mut self: Box<Self>, tx: Sender<HandFrame>) {
        let label = self.label.clone();

        for (n, line) in (&mut self.reader).lines().enumerate() {
            let line = match line {
                Ok(l)  => l,
                Err(e) => {
                    warn!("[{}] read error: {} — closing stream", label, e);
                    break;
                }
            };
            if line.trim().is_empty() { continue; }

            match parse_frame(&line) {
                Ok(frame) => {
                    if tx.send(frame).is_err() { break; }
                }
                Err(e) => warn!("[{}] skipping line {}: {}", label, n + 1, e),
            }
        }

        self.stop_child();
        info!("[{}] landmark stream closed", label);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SineSource — synthetic pinch sweep
// ════════════════════════════════════════════════════════════════════════════

/// Synthetic hand whose pinch distance sweeps a sine between `low` and
/// `high`.  Useful for testing a receiver without a camera.
#[derive(Clone, Debug)]
pub struct SineSource {
    pub low:     f32,
    pub high:    f32,
    /// Angular speed of the sweep (radians per second).
    pub speed:   f32,
    /// Frames per second.
    pub rate_hz: f32,
    /// Stop after this many frames (`None` = forever).
    pub limit:   Option<usize>,
}

impl Default for SineSource {
    fn default() -> Self {
        SineSource { low: 0.0, high: 0.35, speed: 1.0, rate_hz: 100.0, limit: None }
    }
}

impl SineSource {
    /// Pinch distance at `t` seconds into the sweep.
    pub fn distance_at(&self, t: f32) -> f32 {
        self.low + (self.high - self.low) * (0.5 + 0.5 * (t * self.speed).sin())
    }
}

impl LandmarkSource for SineSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        let period = Duration::from_secs_f32(1.0 / self.rate_hz.max(1.0));
        let start  = Instant::now();
        let mut sent = 0usize;

        loop {
            if self.limit.map_or(false, |l| sent >= l) { break; }

            let d = self.distance_at(start.elapsed().as_secs_f32());
            let frame = HandFrame::single(synthetic_hand((0.5, 0.5), d));
            if tx.send(frame).is_err() { break; }
            sent += 1;

            thread::sleep(period);
        }
        debug!("sine source stopped after {} frames", sent);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Bone joints are mapped onto MediaPipe landmark indices (four joints per
/// digit, thumb first) and palm-space millimetres are normalized into the
/// 0–1 image range using [`LeapSource::span_mm`].
#[cfg(feature = "leap")]
pub struct LeapSource {
    /// Width (mm) of the interaction box mapped onto 0.0–1.0.
    pub span_mm: f32,
}

#[cfg(feature = "leap")]
impl Default for LeapSource {
    fn default() -> Self { LeapSource { span_mm: 400.0 } }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        use crate::landmark::{Hand, Landmark, LANDMARK_COUNT};
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                warn!("[leap] failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            warn!("[leap] failed to open LeapMotion device: {:?}", e);
            return;
        }
        info!("[leap] LeapMotion connection open");

        let span = self.span_mm.max(1.0);
        // Leap: x right, y up (from device), z toward user.
        let norm = |x: f32, y: f32, z: f32| -> Landmark {
            Landmark {
                x: (x / span + 0.5).clamp(0.0, 1.0),
                y: (1.0 - y / span).clamp(0.0, 1.0),
                z: z / span,
            }
        };
        macro_rules! joint {
            ($v:expr) => {{ let v = $v; norm(v.x, v.y, v.z) }};
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut out = HandFrame::empty();
                for hand in frame.hands() {
                    let digits: Vec<_> = hand.digits().collect();
                    if digits.len() < 5 { continue; }

                    let mut lm = [Landmark::default(); LANDMARK_COUNT];
                    lm[0] = joint!(digits[0].metacarpal().prev_joint());
                    for (d, digit) in digits.iter().take(5).enumerate() {
                        lm[1 + d * 4] = joint!(digit.metacarpal().next_joint());
                        lm[2 + d * 4] = joint!(digit.proximal().next_joint());
                        lm[3 + d * 4] = joint!(digit.intermediate().next_joint());
                        lm[4 + d * 4] = joint!(digit.distal().next_joint());
                    }

                    let mut h = Hand::new(lm);
                    let side = if hand.hand_type() == HandType::Left { "Left" } else { "Right" };
                    h.handedness = Some(side.to_string());
                    out.hands.push(h);
                }
                if tx.send(out).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::HandFrame;
    use std::io::Cursor;

    fn frame_line(d: f32) -> String {
        serde_json::to_string(&HandFrame::single(synthetic_hand((0.5, 0.5), d))).unwrap()
    }

    #[test]
    fn parse_empty_frame() {
        let f = parse_frame(r#"{"hands":[]}"#).unwrap();
        assert!(f.is_empty());
        let f = parse_frame("{}").unwrap();
        assert!(f.is_empty());
    }

    #[test]
    fn parse_rejects_short_hand() {
        let line = r#"{"hands":[{"landmarks":[{"x":0.1,"y":0.2}]}]}"#;
        assert!(matches!(parse_frame(line), Err(Error::Landmark(_))));
    }

    #[test]
    fn stream_skips_malformed_lines() {
        let input = format!("{}\nnot json\n\n{}\n", frame_line(0.1), frame_line(0.2));
        let src = StreamSource::from_reader(Cursor::new(input), "test");
        let rx = spawn_landmark_source(src);
        let frames: Vec<HandFrame> = rx.iter().collect();
        assert_eq!(frames.len(), 2);
        assert!((frames[0].pinch_distance() - 0.1).abs() < 1e-5);
        assert!((frames[1].pinch_distance() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn latest_frame_keeps_newest() {
        let (tx, rx) = mpsc::channel();
        assert!(latest_frame(&rx).is_none());
        for d in [0.1, 0.2, 0.3] {
            tx.send(HandFrame::single(synthetic_hand((0.5, 0.5), d))).unwrap();
        }
        let f = latest_frame(&rx).unwrap();
        assert!((f.pinch_distance() - 0.3).abs() < 1e-5);
        assert!(latest_frame(&rx).is_none());
    }

    #[test]
    fn sine_stays_in_range() {
        let s = SineSource { low: 0.05, high: 0.3, ..SineSource::default() };
        for i in 0..1000 {
            let d = s.distance_at(i as f32 * 0.01);
            assert!(d >= 0.05 - 1e-6 && d <= 0.3 + 1e-6, "d = {}", d);
        }
        assert!((s.distance_at(0.0) - 0.175).abs() < 1e-6);
    }

    #[test]
    fn sine_source_honours_limit() {
        let s = SineSource { rate_hz: 1000.0, limit: Some(5), ..SineSource::default() };
        let rx = spawn_landmark_source(s);
        assert_eq!(rx.iter().count(), 5);
    }

    #[test]
    fn command_line_respects_quotes() {
        let words = split_command_line(r#"python3 "hand tracker.py" --cam 0 'a b' x\ y"#).unwrap();
        assert_eq!(words, vec!["python3", "hand tracker.py", "--cam", "0", "a b", "x y"]);
        assert_eq!(split_command_line(r#"run """#).unwrap(), vec!["run", ""]);
        assert!(split_command_line("   ").unwrap().is_empty());
        assert!(split_command_line(r#"run "open"#).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dropping_command_source_kills_detector() {
        let src = StreamSource::command("sleep 30").unwrap();
        let pid = src.child_id().unwrap();
        assert!(std::path::Path::new(&format!("/proc/{}", pid)).exists());
        drop(src);
        // Killed and reaped, so the pid entry is gone.
        assert!(!std::path::Path::new(&format!("/proc/{}", pid)).exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn command_source_stops_when_receiver_hangs_up() {
        let src = StreamSource::command("yes {}").unwrap();
        let pid = src.child_id().unwrap();
        let rx = spawn_landmark_source(src);
        rx.recv().unwrap();
        drop(rx);
        let gone = (0..200).any(|_| {
            thread::sleep(Duration::from_millis(10));
            !std::path::Path::new(&format!("/proc/{}", pid)).exists()
        });
        assert!(gone);
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(StreamSource::command("   "), Err(Error::Source(_))));
    }
}
