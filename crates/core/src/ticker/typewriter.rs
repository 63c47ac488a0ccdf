//! Typewriter effect for the search box placeholder.
//!
//! Each phrase of `n` characters takes `2n` steps: `n` typing steps that
//! reveal one more character each, then `n` deleting steps that remove one
//! each. The last typing step holds the full phrase for the pause as well.

use std::time::Duration;

use super::Frame;

pub const PHRASES: [&str; 3] = [
    "Search for Netflix",
    "Search for Spotify",
    "Search for Canva",
];

const TYPE_DELAY: Duration = Duration::from_millis(100);
const PAUSE: Duration = Duration::from_millis(1500);
const DELETE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
pub struct Typewriter {
    phrases: &'static [&'static str],
    type_delay: Duration,
    pause: Duration,
    delete_delay: Duration,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(&PHRASES)
    }
}

impl Typewriter {
    #[must_use]
    pub const fn new(phrases: &'static [&'static str]) -> Self {
        Self {
            phrases,
            type_delay: TYPE_DELAY,
            pause: PAUSE,
            delete_delay: DELETE_DELAY,
        }
    }

    /// Number of steps in one pass over every phrase.
    #[must_use]
    pub fn cycle_len(&self) -> u64 {
        self.phrases.iter().map(|p| steps_for(p)).sum()
    }

    /// The placeholder text at `step`, wrapping after the last phrase.
    #[must_use]
    pub fn frame(&self, step: u64) -> Frame<String> {
        let cycle = self.cycle_len();
        if cycle == 0 {
            return Frame {
                value: String::new(),
                delay: self.pause,
                next_step: 0,
            };
        }

        let step = step % cycle;
        let mut offset = step;
        for phrase in self.phrases {
            let steps = steps_for(phrase);
            if offset < steps {
                let (value, delay) = self.phrase_frame(phrase, offset);
                return Frame {
                    value,
                    delay,
                    next_step: (step + 1) % cycle,
                };
            }
            offset -= steps;
        }

        // Unreachable while `step < cycle`
        Frame {
            value: String::new(),
            delay: self.pause,
            next_step: 0,
        }
    }

    fn phrase_frame(&self, phrase: &str, offset: u64) -> (String, Duration) {
        let len = char_len(phrase);
        let (shown, delay) = if offset < len {
            let shown = offset + 1;
            let delay = if shown == len {
                self.type_delay + self.pause
            } else {
                self.type_delay
            };
            (shown, delay)
        } else {
            let deleted = offset - len + 1;
            (len - deleted, self.delete_delay)
        };

        let take = usize::try_from(shown).unwrap_or(usize::MAX);
        (phrase.chars().take(take).collect(), delay)
    }
}

fn char_len(phrase: &str) -> u64 {
    u64::try_from(phrase.chars().count()).unwrap_or(u64::MAX)
}

fn steps_for(phrase: &str) -> u64 {
    char_len(phrase).saturating_mul(2)
}
