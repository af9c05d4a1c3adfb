//! Steps through a scale, sounding each note and muting between them.

use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::info;

use crate::scale::Scale;
use crate::synth::{PlaybackError, ToneCommand};

pub const DEFAULT_ON_MS: u64 = 200;
pub const DEFAULT_OFF_MS: u64 = 90;

/// Anything that accepts tone commands, usually the audio output
pub trait ToneSink {
    fn send(&mut self, cmd: ToneCommand) -> Result<(), PlaybackError>;
}

/// How long each note sounds and how long the gap after it lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub on: Duration,
    pub off: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            on: Duration::from_millis(DEFAULT_ON_MS),
            off: Duration::from_millis(DEFAULT_OFF_MS),
        }
    }
}

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Completed,
    Interrupted,
}

/// Play every note of `scale` in order, printing each one to `out`.
///
/// A message on `interrupt` cuts playback short at the next wait.
pub fn play_scale<S: ToneSink, W: Write>(
    scale: &Scale,
    sink: &mut S,
    timing: Timing,
    interrupt: &Receiver<()>,
    out: &mut W,
) -> Result<Playback, PlaybackError> {
    info!("playing {} {} scale", scale.root(), scale.mode());

    for note in scale {
        let _ = writeln!(out, "{}", note);
        sink.send(ToneCommand::Play {
            freq: note.frequency_hz,
        })?;
        if wait(interrupt, timing.on) {
            return stop(sink, Playback::Interrupted);
        }

        // Pause in between notes
        sink.send(ToneCommand::Mute)?;
        if wait(interrupt, timing.off) {
            return stop(sink, Playback::Interrupted);
        }
    }

    stop(sink, Playback::Completed)
}

fn stop<S: ToneSink>(sink: &mut S, outcome: Playback) -> Result<Playback, PlaybackError> {
    sink.send(ToneCommand::Stop)?;
    info!("playback finished: {:?}", outcome);
    Ok(outcome)
}

/// Block for `duration`, returning true if interrupted first
fn wait(interrupt: &Receiver<()>, duration: Duration) -> bool {
    match interrupt.recv_timeout(duration) {
        Ok(()) => true,
        Err(RecvTimeoutError::Timeout) => false,
        Err(RecvTimeoutError::Disconnected) => {
            thread::sleep(duration);
            false
        }
    }
}
