//! Console operator interface
//!
//! Commands arrive as lines on stdin, read on a background thread and
//! handed over through a channel so `poll` never blocks. The status line is
//! written to stdout only when its text changes.

use std::io::{BufRead, Write};
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::domain::{group_thousands, PassbandPosition, StatusSnapshot, VfoStatus};
use crate::ports::{CommandSource, Display, UserCommand, NUDGE_STEP_HZ};

/// Key help printed at startup
pub const KEY_HELP: &str = "keys: l/h satellite  j/k transponder  e engage  x tune  \
p/m main ±1k  o/n sub ±1k  r reset VFOs  q quit";

/// Map one input line to a command. Unknown input is ignored.
pub fn parse_command(line: &str) -> Option<UserCommand> {
    let cmd = match line.trim() {
        "l" => UserCommand::NextSatellite,
        "h" => UserCommand::PreviousSatellite,
        "j" => UserCommand::NextTransponder,
        "k" => UserCommand::PreviousTransponder,
        "e" => UserCommand::ToggleEngage,
        "x" => UserCommand::Tune,
        "p" => UserCommand::NudgeMain(NUDGE_STEP_HZ),
        "m" => UserCommand::NudgeMain(-NUDGE_STEP_HZ),
        "o" => UserCommand::NudgeSub(NUDGE_STEP_HZ),
        "n" => UserCommand::NudgeSub(-NUDGE_STEP_HZ),
        "r" => UserCommand::ResetVfos,
        "q" => UserCommand::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Line-based command reader
pub struct StdinCommands {
    rx: Receiver<UserCommand>,
    closed: bool,
}

impl StdinCommands {
    /// Read commands from the process's stdin
    pub fn spawn() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Read commands from any line source. End of input becomes `Quit`.
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        thread::spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::warn!("Console input error: {e}");
                        break;
                    }
                };
                match parse_command(&line) {
                    Some(cmd) => {
                        if tx.send(cmd).is_err() {
                            return;
                        }
                    }
                    None if !line.trim().is_empty() => {
                        log::debug!("Ignoring unknown input {:?}", line.trim());
                    }
                    None => {}
                }
            }
            let _ = tx.send(UserCommand::Quit);
        });

        Self { rx, closed: false }
    }
}

impl CommandSource for StdinCommands {
    fn poll(&mut self) -> Option<UserCommand> {
        if self.closed {
            return None;
        }
        match self.rx.try_recv() {
            Ok(cmd) => Some(cmd),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }
}

/// Status line renderer
pub struct ConsoleDisplay<W: Write> {
    out: W,
    last: String,
}

impl ConsoleDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for ConsoleDisplay<W> {
    fn render(&mut self, status: &StatusSnapshot) {
        let line = format_status(status);
        if line == self.last {
            return;
        }
        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            log::warn!("Failed to write status: {e}");
        }
        self.last = line;
    }
}

const BAR_WIDTH: usize = 10;

fn passband_bar(position: Option<PassbandPosition>) -> String {
    match position {
        None => String::new(),
        Some(PassbandPosition::Below) => " <".to_string(),
        Some(PassbandPosition::Above) => " >".to_string(),
        Some(PassbandPosition::Within(fraction)) => {
            let marker = ((fraction * BAR_WIDTH as f64) as usize).min(BAR_WIDTH - 1);
            let bar: String = (0..BAR_WIDTH)
                .map(|i| if i == marker { '|' } else { '-' })
                .collect();
            format!(" [{bar}]")
        }
    }
}

fn format_vfo(label: &str, vfo: &VfoStatus) -> String {
    format!(
        "{label} {} ({}) sat {}{}",
        vfo.dial,
        group_thousands(vfo.doppler_hz.round() as i64, true),
        vfo.satellite,
        passband_bar(vfo.passband)
    )
}

/// One-line rendering of the whole status
pub fn format_status(status: &StatusSnapshot) -> String {
    let obs = &status.observation;
    let state = match (status.rig_connected, status.engaged) {
        (false, _) => "NO RIG",
        (true, true) => "ENGAGED",
        (true, false) => "idle",
    };
    format!(
        "{} az {:5.1} el {:5.1} dop {} | [{}/{}] {} {}{} | {}{} | {} | {}",
        status.satellite_name,
        obs.azimuth_deg,
        obs.elevation_deg,
        group_thousands(obs.doppler_100mhz_hz.round() as i64, true),
        status.transponder_index + 1,
        status.transponder_count,
        status.transponder_name,
        status.transponder_mode,
        if status.inverting { " inv" } else { "" },
        state,
        if status.radio_activity { " *" } else { "" },
        format_vfo("RX", &status.downlink),
        format_vfo("TX", &status.uplink),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, Mode, Observation};
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            satellite_name: "AO-91".into(),
            observation: Observation {
                azimuth_deg: 123.4,
                elevation_deg: 12.3,
                doppler_100mhz_hz: 2000.0,
            },
            transponder_index: 0,
            transponder_count: 2,
            transponder_name: "FM".into(),
            transponder_mode: Mode::Fm,
            inverting: false,
            engaged: true,
            radio_activity: false,
            rig_connected: true,
            downlink: VfoStatus {
                dial: Frequency::hz(145_962_918.0),
                doppler_hz: 2918.0,
                satellite: Frequency::hz(145_960_000.0),
                passband: None,
            },
            uplink: VfoStatus {
                dial: Frequency::hz(435_241_297.0),
                doppler_hz: -8703.0,
                satellite: Frequency::hz(435_250_000.0),
                passband: None,
            },
        }
    }

    #[test]
    fn parses_known_keys() {
        assert_eq!(parse_command("l"), Some(UserCommand::NextSatellite));
        assert_eq!(parse_command(" x \n"), Some(UserCommand::Tune));
        assert_eq!(parse_command("m"), Some(UserCommand::NudgeMain(-1000.0)));
        assert_eq!(parse_command("o"), Some(UserCommand::NudgeSub(1000.0)));
        assert_eq!(parse_command("zz"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn reader_thread_delivers_commands_then_quit() {
        let mut source = StdinCommands::from_reader(Cursor::new("e\nbogus\nj\n"));
        let mut got = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(2);
        while got.last() != Some(&UserCommand::Quit) && Instant::now() < deadline {
            match source.poll() {
                Some(cmd) => got.push(cmd),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }
        assert_eq!(
            got,
            vec![
                UserCommand::ToggleEngage,
                UserCommand::NextTransponder,
                UserCommand::Quit
            ]
        );
    }

    #[test]
    fn status_line_shows_grouped_frequencies() {
        let line = format_status(&snapshot());
        assert!(line.starts_with("AO-91 az 123.4 el  12.3 dop +2 000"));
        assert!(line.contains("[1/2] FM FM"));
        assert!(line.contains("ENGAGED"));
        assert!(line.contains("RX 145 962 918 (+2 918) sat 145 960 000"));
        assert!(line.contains("TX 435 241 297 (-8 703) sat 435 250 000"));
    }

    #[test]
    fn passband_marker_tracks_position() {
        assert_eq!(passband_bar(Some(PassbandPosition::Within(0.0))), " [|---------]");
        assert_eq!(passband_bar(Some(PassbandPosition::Within(1.0))), " [---------|]");
        assert_eq!(passband_bar(Some(PassbandPosition::Below)), " <");
        assert_eq!(passband_bar(None), "");
    }

    #[test]
    fn display_skips_unchanged_lines() {
        let mut display = ConsoleDisplay::new(Vec::new());
        let mut status = snapshot();
        display.render(&status);
        display.render(&status);
        status.radio_activity = true;
        display.render(&status);

        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().nth(1).unwrap().contains("ENGAGED *"));
    }
}
