//! Command Loop: one JSON request per line in, zero or one JSON line out
//!
//! Every line is handled on its own against the single registry. Lines that
//! are not JSON objects with a string `command` are dropped without a reply.

use std::io::{self, BufRead, Write};

use serde_json::{Map, Value};

use crate::core::SignalRegistry;
use crate::types::{Command, LoopConfig, UnknownCommandPolicy};

/// What to do after one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep reading; write the response line if there is one
    Continue(Option<String>),
    /// Stop without writing anything
    Exit,
}

/// The dispatch loop, owning the registry for the life of the process
#[derive(Debug)]
pub struct CommandLoop {
    config: LoopConfig,
    registry: SignalRegistry,
    cycles: u64,
}

impl Default for CommandLoop {
    fn default() -> Self {
        Self::new(LoopConfig::default())
    }
}

impl CommandLoop {
    /// Create a loop with a freshly initialized registry
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            registry: SignalRegistry::initialize(config.signals),
            cycles: 0,
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn registry(&self) -> &SignalRegistry {
        &self.registry
    }

    /// Number of `runcycle` commands applied so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Handle one raw input line (with or without its trailing newline)
    pub fn handle_line(&mut self, line: &[u8]) -> Step {
        let request = match serde_json::from_slice::<Value>(line) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                log::debug!("skipping non-object request: {}", other);
                return Step::Continue(None);
            }
            Err(e) => {
                log::debug!("skipping unparseable line: {}", e);
                return Step::Continue(None);
            }
        };

        let command = match request.get("command") {
            Some(Value::String(raw)) => Command::parse(raw, self.config.matching),
            Some(other) => {
                log::debug!("skipping request with non-string command: {}", other);
                return Step::Continue(None);
            }
            None => {
                log::debug!("skipping request without command");
                return Step::Continue(None);
            }
        };

        log::debug!("command: {}", command.name());
        self.dispatch(command, &request)
    }

    fn dispatch(&mut self, command: Command, request: &Map<String, Value>) -> Step {
        match command {
            Command::Exit => Step::Exit,
            Command::Inputs => {
                self.apply_inputs(request);
                if self.config.echo_inputs {
                    self.respond()
                } else {
                    Step::Continue(None)
                }
            }
            Command::Outputs | Command::GetInputs => self.respond(),
            Command::RunCycle => {
                let edge = self.registry.apply_cycle();
                self.cycles += 1;
                log::trace!("cycle {}: {}", self.cycles, edge);
                self.respond()
            }
            Command::Unknown(raw) => match self.config.unknown_commands {
                UnknownCommandPolicy::Snapshot => self.respond(),
                UnknownCommandPolicy::Silent => {
                    log::debug!("ignoring unknown command: {}", raw);
                    Step::Continue(None)
                }
            },
        }
    }

    /// Copy every declared input present in the request; other keys are ignored
    fn apply_inputs(&mut self, request: &Map<String, Value>) {
        let names: Vec<&'static str> = self.registry.input_names().collect();
        for name in names {
            if let Some(raw) = request.get(name) {
                if let Err(e) = self.registry.set_input(name, raw) {
                    log::warn!("{}", e);
                }
            }
        }
    }

    fn respond(&self) -> Step {
        let snapshot = self.registry.serialize(self.config.contract);
        match serde_json::to_string(&snapshot) {
            Ok(line) => Step::Continue(Some(line)),
            Err(e) => {
                log::error!("failed to serialize registry: {}", e);
                Step::Continue(None)
            }
        }
    }

    /// Drive the loop until `exit` or end of input.
    ///
    /// Only write failures are returned; every response is flushed before
    /// the next line is read. `read_until` retries `Interrupted` itself, so
    /// any read error that reaches here ends the loop like end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    log::info!("end of input after {} cycles", self.cycles);
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("read failed, treating as end of input: {}", e);
                    return Ok(());
                }
            }

            match self.handle_line(&line) {
                Step::Exit => {
                    log::info!("exit after {} cycles", self.cycles);
                    return Ok(());
                }
                Step::Continue(Some(response)) => {
                    writeln!(writer, "{}", response)?;
                    writer.flush()?;
                }
                Step::Continue(None) => {}
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Profile, Snapshot, WireContract};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::{Cursor, ErrorKind, Read};

    /// Serves `data` but fails with `kind` when the read position hits `fail_at`
    struct FaultyReader {
        data: Vec<u8>,
        pos: usize,
        fail_at: usize,
        kind: ErrorKind,
        /// Keep failing at `fail_at` instead of failing once
        persistent: bool,
        failures: usize,
    }

    impl FaultyReader {
        fn new(data: &str, fail_at: usize, kind: ErrorKind, persistent: bool) -> Self {
            Self {
                data: data.as_bytes().to_vec(),
                pos: 0,
                fail_at,
                kind,
                persistent,
                failures: 0,
            }
        }
    }

    impl Read for FaultyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let available = self.fill_buf()?;
            let n = available.len().min(buf.len());
            buf[..n].copy_from_slice(&available[..n]);
            self.consume(n);
            Ok(n)
        }
    }

    impl BufRead for FaultyReader {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.pos == self.fail_at && (self.persistent || self.failures == 0) {
                self.failures += 1;
                return Err(io::Error::new(self.kind, "injected"));
            }
            let end = if self.pos < self.fail_at {
                self.fail_at.min(self.data.len())
            } else {
                self.data.len()
            };
            Ok(&self.data[self.pos..end])
        }

        fn consume(&mut self, amt: usize) {
            self.pos += amt;
        }
    }

    /// Accepts nothing
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn board() -> CommandLoop {
        CommandLoop::new(LoopConfig::from_profile(Profile::Board))
    }

    fn counter() -> CommandLoop {
        CommandLoop::new(LoopConfig::from_profile(Profile::Counter))
    }

    fn reply(cmd: &mut CommandLoop, line: &str) -> Option<Snapshot> {
        match cmd.handle_line(line.as_bytes()) {
            Step::Continue(Some(out)) => Some(serde_json::from_str(&out).unwrap()),
            Step::Continue(None) => None,
            Step::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn test_malformed_lines_are_silent() {
        let mut cmd = board();
        let before = cmd.registry().clone();
        for line in ["not json", "", "{}", "[1,2]", "42", "{\"command\": 5}", "{\"en\":\"true\"}"] {
            assert_eq!(cmd.handle_line(line.as_bytes()), Step::Continue(None), "{line}");
        }
        assert_eq!(cmd.registry(), &before);
    }

    #[test]
    fn test_invalid_utf8_is_silent() {
        let mut cmd = board();
        assert_eq!(cmd.handle_line(&[0xff, 0xfe, b'\n']), Step::Continue(None));
    }

    #[test]
    fn test_exit() {
        assert_eq!(board().handle_line(br#"{"command":"exit"}"#), Step::Exit);
        assert_eq!(counter().handle_line(br#"{"command":"exit"}"#), Step::Exit);
    }

    #[test]
    fn test_inputs_echo_depends_on_profile() {
        let mut cmd = board();
        let snap = reply(&mut cmd, r#"{"command":"inputs","en":"true"}"#).unwrap();
        assert_eq!(snap.value("en"), Some(json!(true)));

        let mut cmd = counter();
        assert!(reply(&mut cmd, r#"{"command":"inputs","en":"true"}"#).is_none());
        let snap = reply(&mut cmd, r#"{"command":"outputs"}"#).unwrap();
        assert_eq!(snap.value("en"), Some(json!(true)));
    }

    #[test]
    fn test_inputs_ignore_outputs_and_unknown_keys() {
        let mut cmd = board();
        let before = cmd.registry().clone();
        reply(&mut cmd, r#"{"command":"inputs","counter":7,"leds":1,"bogus":"true"}"#);
        assert_eq!(cmd.registry(), &before);
    }

    #[test]
    fn test_runcycle_always_responds() {
        let mut cmd = board();
        let snap = reply(&mut cmd, r#"{"command":"runcycle"}"#).unwrap();
        assert_eq!(snap.value("counter"), Some(json!(0)));
        assert_eq!(cmd.cycles(), 1);
    }

    #[test]
    fn test_unknown_command_policy() {
        let mut cmd = board();
        assert!(reply(&mut cmd, r#"{"command":"poke"}"#).is_some());

        let mut cmd = counter();
        assert!(reply(&mut cmd, r#"{"command":"poke"}"#).is_none());

        let config = LoopConfig::from_profile(Profile::Counter)
            .with_unknown_commands(UnknownCommandPolicy::Snapshot);
        let mut cmd = CommandLoop::new(config);
        let snap = reply(&mut cmd, r#"{"command":"poke"}"#).unwrap();
        assert!(matches!(snap, Snapshot::Flat { .. }));
    }

    #[test]
    fn test_prefix_matching_only_in_board_profile() {
        let mut cmd = board();
        reply(&mut cmd, r#"{"command":"inputs","en":"true"}"#);
        let snap = reply(&mut cmd, r#"{"command":"runcycleNow"}"#).unwrap();
        assert_eq!(snap.value("counter"), Some(json!(1)));

        let mut cmd = counter();
        reply(&mut cmd, r#"{"command":"inputs","en":"true"}"#);
        assert!(reply(&mut cmd, r#"{"command":"runcycleNow"}"#).is_none());
        assert_eq!(cmd.cycles(), 0);
    }

    #[test]
    fn test_getinputs_reports_everything() {
        let mut cmd = counter();
        let snap = reply(&mut cmd, r#"{"command":"getinputs"}"#).unwrap();
        assert_eq!(snap.names(), vec!["en", "reset", "counter"]);
    }

    #[test]
    fn test_run_stops_at_exit() {
        let input = concat!(
            "{\"command\":\"outputs\"}\n",
            "garbage\n",
            "{\"command\":\"exit\"}\n",
            "{\"command\":\"outputs\"}\n",
        );
        let mut out = Vec::new();
        board().run(Cursor::new(input), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_run_stops_at_eof_without_newline() {
        let mut out = Vec::new();
        let mut cmd = counter();
        cmd.run(Cursor::new("{\"command\":\"outputs\"}"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\"inputs\":{\"en\":false,\"reset\":false},\"outputs\":{\"counter\":0}}\n"
        );
        assert_eq!(cmd.config().contract, WireContract::Flat);
    }

    #[test]
    fn test_read_error_ends_loop_cleanly() {
        let first = "{\"command\":\"outputs\"}\n";
        let input = format!("{first}{first}");
        // fail halfway through the second line, every time
        let mut reader = FaultyReader::new(&input, first.len() + 5, ErrorKind::Other, true);
        let mut out = Vec::new();
        let result = board().run(&mut reader, &mut out);

        assert!(result.is_ok());
        assert_eq!(reader.failures, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        let input = "{\"command\":\"outputs\"}\n{\"command\":\"getinputs\"}\n";
        // interrupted in the middle of the first line
        let mut reader = FaultyReader::new(input, 5, ErrorKind::Interrupted, false);
        let mut out = Vec::new();
        counter().run(&mut reader, &mut out).unwrap();

        assert_eq!(reader.failures, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_write_failure_is_returned() {
        let err = board()
            .run(Cursor::new("{\"command\":\"outputs\"}\n"), BrokenPipe)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_silent_commands_never_touch_writer() {
        let input = "{\"command\":\"inputs\",\"en\":\"true\"}\n{\"command\":\"exit\"}\n";
        assert!(counter().run(Cursor::new(input), BrokenPipe).is_ok());
    }
}
