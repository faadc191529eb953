//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gun fired
    Shot,
    /// Duck squawks when hit
    Quack,
    /// Whistle of a falling duck
    Fall,
    /// Level cleared
    LevelUp,
    /// Time ran out
    GameOver,
    /// New high score
    HighScore,
}

/// Sounds to play for a simulation event, in order
pub fn sounds_for_event(event: &GameEvent) -> &'static [SoundEffect] {
    match event {
        GameEvent::Shot => &[SoundEffect::Shot],
        GameEvent::DuckHit { .. } => &[SoundEffect::Quack, SoundEffect::Fall],
        GameEvent::LevelCleared { .. } => &[SoundEffect::LevelUp],
        GameEvent::GameOver { .. } => &[SoundEffect::GameOver],
        GameEvent::Restarted => &[],
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Pick up volume settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Shot => self.play_shot(ctx, vol),
                SoundEffect::Quack => self.play_quack(ctx, vol),
                SoundEffect::Fall => self.play_fall(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Shot - sharp crack with a low boom
        fn play_shot(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                    .ok();
                osc.frequency().set_value_at_time(1800.0, t).ok();
                osc.frequency().set_value_at_time(400.0, t + 0.01).ok();
                osc.frequency().set_value_at_time(2400.0, t + 0.02).ok();
                osc.frequency().set_value_at_time(300.0, t + 0.03).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.06).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(35.0, t + 0.25)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }

        /// Quack - two nasal honks
        fn play_quack(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain().set_value_at_time(0.01, t + 0.09).ok();
            gain.gain().set_value_at_time(vol * 0.3, t + 0.12).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.24)
                .ok();
            osc.frequency().set_value_at_time(520.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(380.0, t + 0.09)
                .ok();
            osc.frequency().set_value_at_time(500.0, t + 0.12).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(340.0, t + 0.24)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.26).ok();
        }

        /// Fall - descending whistle
        fn play_fall(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1400.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.9)
                .ok();
            osc.frequency().set_value_at_time(1400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.9)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.0).ok();
        }

        /// Level up - rising arpeggio
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let notes = [523.25, 659.25, 783.99, 1046.5];

            for (i, &freq) in notes.iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                    let start = t + i as f64 * 0.08;
                    gain.gain().set_value_at_time(0.0, t).ok();
                    gain.gain().set_value_at_time(vol * 0.3, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.25).ok();
                }
            }
        }

        /// Game over - slow falling tones
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let notes = [392.0, 329.63, 261.63];

            for (i, &freq) in notes.iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) {
                    let start = t + i as f64 * 0.3;
                    gain.gain().set_value_at_time(0.0, t).ok();
                    gain.gain().set_value_at_time(vol * 0.4, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.4)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.45).ok();
                }
            }
        }

        /// High score - bright fanfare
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let notes = [783.99, 1046.5, 1318.5, 1568.0];

            for (i, &freq) in notes.iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) {
                    let start = t + 0.9 + i as f64 * 0.1;
                    gain.gain().set_value_at_time(0.0, t).ok();
                    gain.gain().set_value_at_time(vol * 0.15, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.3)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.35).ok();
                }
            }
        }
    }
}
