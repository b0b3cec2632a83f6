//! Sound notification sinks
//!
//! The game loop forwards `SoundCue`s to a `NotificationSink`. Playback is
//! fire-and-forget: errors come back as `AudioError` and the loop logs them.
//! In the browser the cues are synthesised with the Web Audio API, no sample
//! files needed.

use crate::error::AudioError;
use crate::sim::SoundCue;

/// Receiver for sound cues
pub trait NotificationSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;

    /// Effective volume in 0.0 - 1.0 (0 when muted)
    fn set_volume(&mut self, _volume: f32) {}
}

/// Writes cues to the log; used headless
#[derive(Debug)]
pub struct LogSink {
    volume: f32,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self { volume: 1.0 }
    }
}

impl NotificationSink for LogSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if self.volume > 0.0 {
            log::debug!("sound: {}", cue.name());
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::NotificationSink;
    use crate::error::AudioError;
    use crate::sim::SoundCue;

    /// Samples of white noise in the explosion burst
    const NOISE_SAMPLES: u32 = 4096;

    fn playback(e: JsValue) -> AudioError {
        AudioError::Playback(format!("{:?}", e))
    }

    /// Web Audio synthesiser
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(playback)?;
            let gain = ctx.create_gain().map_err(playback)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(playback)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(playback)?;

            Ok((osc, gain))
        }

        /// Falling sine chirp
        fn play_shoot(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, 880.0, OscillatorType::Sine)?;
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(880.0, t).map_err(playback)?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.1)
                .map_err(playback)?;
            gain.gain().set_value_at_time(vol * 0.3, t).map_err(playback)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .map_err(playback)?;

            osc.start().map_err(playback)?;
            osc.stop_with_when(t + 0.1).map_err(playback)
        }

        /// Short white-noise burst
        fn play_explosion(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let buffer = ctx
                .create_buffer(1, NOISE_SAMPLES, ctx.sample_rate())
                .map_err(playback)?;
            let mut noise: Vec<f32> = (0..NOISE_SAMPLES)
                .map(|_| rand::random::<f32>() * 2.0 - 1.0)
                .collect();
            buffer.copy_to_channel(&mut noise, 0).map_err(playback)?;

            let source = ctx.create_buffer_source().map_err(playback)?;
            source.set_buffer(Some(&buffer));
            let gain = ctx.create_gain().map_err(playback)?;
            source.connect_with_audio_node(&gain).map_err(playback)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(playback)?;

            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.5, t).map_err(playback)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .map_err(playback)?;

            source.start().map_err(playback)?;
            source.stop_with_when(t + 0.3).map_err(playback)
        }

        /// Rising triangle sweep
        fn play_power_up(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, 440.0, OscillatorType::Triangle)?;
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(440.0, t).map_err(playback)?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(880.0, t + 0.2)
                .map_err(playback)?;
            gain.gain().set_value_at_time(vol * 0.3, t).map_err(playback)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .map_err(playback)?;

            osc.start().map_err(playback)?;
            osc.stop_with_when(t + 0.2).map_err(playback)
        }
    }

    impl NotificationSink for WebAudioSink {
        fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            if self.volume <= 0.0 {
                return Ok(());
            }
            let Some(ctx) = &self.ctx else {
                return Err(AudioError::Unavailable("no AudioContext".into()));
            };

            // Browsers start contexts suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Shoot => Self::play_shoot(ctx, self.volume),
                SoundCue::Explosion => Self::play_explosion(ctx, self.volume),
                SoundCue::PowerUp => Self::play_power_up(ctx, self.volume),
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
