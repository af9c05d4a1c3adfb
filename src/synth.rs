use std::f64::consts::TAU;
use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, info};

use crate::note::A4_FREQ_HZ;
use crate::player::ToneSink;

/// Output sample rate in Hz
pub const SAMPLE_RATE: u32 = 44_100;

/// Amplitude of a sounding note, as a fraction of full scale
pub const DEFAULT_VOLUME: f64 = 0.5;

/// A command sent to the audio thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneCommand {
    /// Sound a tone at the given frequency
    Play { freq: f64 },
    /// Silence output, keeping the current frequency and phase
    Mute,
    /// Silence output for good
    Stop,
}

/// Errors opening or driving the audio output
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no output audio device available")]
    NoDevice,
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to play stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("audio thread disconnected")]
    Disconnected,
}

/// Sine oscillator driven by a phase accumulator
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub frequency_hz: f64,
    /// Current phase in radians, kept in [0, 2π)
    pub phase: f64,
    /// Current amplitude as a fraction of full scale
    pub amplitude: f64,
    volume: f64,
    stopped: bool,
}

impl Oscillator {
    /// A silent oscillator that sounds at `volume` once played
    pub fn new(frequency_hz: f64, volume: f64) -> Self {
        Self {
            frequency_hz,
            phase: 0.0,
            amplitude: 0.0,
            volume,
            stopped: false,
        }
    }

    pub fn apply(&mut self, cmd: ToneCommand) {
        match cmd {
            ToneCommand::Play { freq } => {
                self.frequency_hz = freq;
                if !self.stopped {
                    self.amplitude = self.volume;
                }
            }
            ToneCommand::Mute => self.amplitude = 0.0,
            ToneCommand::Stop => {
                self.amplitude = 0.0;
                self.stopped = true;
            }
        }
    }

    /// Fill `buffer` with mono signed 16-bit samples
    pub fn fill(&mut self, buffer: &mut [i16]) {
        let phase_increment = TAU * self.frequency_hz / SAMPLE_RATE as f64;
        for sample in buffer.iter_mut() {
            *sample = (i16::MAX as f64 * self.phase.sin() * self.amplitude) as i16;
            self.phase += phase_increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }
}

/// Handle to a running output stream on the default device.
///
/// The device is released when the handle is dropped.
pub struct ToneOutput {
    stream: cpal::Stream,
    cmd_tx: mpsc::Sender<ToneCommand>,
}

impl ToneOutput {
    /// Open the default output device as a 44.1 kHz mono i16 stream and start it
    pub fn open(volume: f64) -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoDevice)?;

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            buffer_size: cpal::BufferSize::Default,
        };
        debug!("opening output stream: {:?}", config);

        let (cmd_tx, cmd_rx) = mpsc::channel::<ToneCommand>();
        let mut oscillator = Oscillator::new(A4_FREQ_HZ, volume);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                while let Ok(cmd) = cmd_rx.try_recv() {
                    oscillator.apply(cmd);
                }
                oscillator.fill(data);
            },
            move |err| {
                error!("audio stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        info!("audio output started at {} Hz", SAMPLE_RATE);

        Ok(Self { stream, cmd_tx })
    }

    /// Pause the stream and release the device
    pub fn close(self) {
        if let Err(e) = self.stream.pause() {
            debug!("failed to pause stream: {}", e);
        }
        info!("audio output closed");
    }
}

impl ToneSink for ToneOutput {
    fn send(&mut self, cmd: ToneCommand) -> Result<(), PlaybackError> {
        debug!("tone command: {:?}", cmd);
        self.cmd_tx
            .send(cmd)
            .map_err(|_| PlaybackError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(freq: f64) -> Oscillator {
        let mut osc = Oscillator::new(A4_FREQ_HZ, DEFAULT_VOLUME);
        osc.apply(ToneCommand::Play { freq });
        osc
    }

    #[test]
    fn test_starts_silent() {
        let mut osc = Oscillator::new(440.0, DEFAULT_VOLUME);
        let mut buf = [1i16; 256];
        osc.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_amplitude_is_half_scale() {
        let mut osc = playing(441.0);
        let mut buf = [0i16; 200];
        osc.fill(&mut buf);
        let peak = buf.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak <= 16384);
        assert!(peak > 16300);
    }

    #[test]
    fn test_zero_crossing_spacing() {
        // 441 Hz at 44.1 kHz crosses zero every 50 samples
        let mut osc = playing(441.0);
        let mut buf = vec![0i16; 4410];
        osc.fill(&mut buf);

        let crossings: Vec<usize> = buf
            .windows(2)
            .enumerate()
            .filter(|(_, w)| (w[0] >= 0) != (w[1] >= 0))
            .map(|(i, _)| i + 1)
            .collect();
        assert!(crossings.len() >= 80);
        for pair in crossings.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((48..=52).contains(&gap), "gap {}", gap);
        }
    }

    #[test]
    fn test_phase_stays_wrapped() {
        let mut osc = playing(15_000.0);
        let mut buf = [0i16; 64];
        for _ in 0..100 {
            osc.fill(&mut buf);
            assert!(osc.phase >= 0.0 && osc.phase < TAU);
        }
    }

    #[test]
    fn test_phase_continues_across_buffers() {
        let mut split = playing(523.25);
        let mut whole = playing(523.25);
        let mut a = [0i16; 100];
        let mut b = [0i16; 100];
        let mut both = [0i16; 200];
        split.fill(&mut a);
        split.fill(&mut b);
        whole.fill(&mut both);
        assert_eq!(&both[..100], &a[..]);
        assert_eq!(&both[100..], &b[..]);
    }

    #[test]
    fn test_mute_and_resume() {
        let mut osc = playing(440.0);
        osc.apply(ToneCommand::Mute);
        let mut buf = [0i16; 128];
        osc.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));

        osc.apply(ToneCommand::Play { freq: 660.0 });
        assert_eq!(osc.frequency_hz, 660.0);
        osc.fill(&mut buf);
        assert!(buf.iter().any(|&s| s != 0));
    }

    #[test]
    fn test_stop_is_final() {
        let mut osc = playing(440.0);
        osc.apply(ToneCommand::Stop);
        osc.apply(ToneCommand::Play { freq: 880.0 });
        let mut buf = [0i16; 128];
        osc.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }
}
