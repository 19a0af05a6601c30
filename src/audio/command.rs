//! Commands sent from the UI thread to the audio thread via ring buffer.

use std::sync::Arc;

use crate::instrument::SampleData;

#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Attach a pad's sample, already at the device sample rate.
    Bind { pad: usize, sample: Arc<SampleData> },

    /// Restart a pad's voice from the first frame.
    Play { pad: usize, rate: f32, volume: f32 },

    /// Set the shared gain stage multiplier (0.0 to 1.0).
    SetGain(f32),

    /// Start one metronome click.
    Click,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::{
        traits::{Consumer, Producer, Split},
        HeapRb,
    };

    #[test]
    fn commands_arrive_in_order() {
        let rb = HeapRb::<AudioCommand>::new(8);
        let (mut prod, mut cons) = rb.split();

        prod.try_push(AudioCommand::SetGain(0.5)).unwrap();
        prod.try_push(AudioCommand::Play {
            pad: 2,
            rate: 1.6,
            volume: 0.8,
        })
        .unwrap();
        prod.try_push(AudioCommand::Click).unwrap();

        assert!(matches!(cons.try_pop(), Some(AudioCommand::SetGain(_))));
        match cons.try_pop() {
            Some(AudioCommand::Play { pad, rate, .. }) => {
                assert_eq!(pad, 2);
                assert!((rate - 1.6).abs() < f32::EPSILON);
            }
            other => panic!("expected Play, got {other:?}"),
        }
        assert!(matches!(cons.try_pop(), Some(AudioCommand::Click)));
        assert!(cons.try_pop().is_none());
    }

    #[test]
    fn full_queue_rejects_push() {
        let rb = HeapRb::<AudioCommand>::new(1);
        let (mut prod, _cons) = rb.split();
        assert!(prod.try_push(AudioCommand::Click).is_ok());
        assert!(prod.try_push(AudioCommand::Click).is_err());
    }
}
