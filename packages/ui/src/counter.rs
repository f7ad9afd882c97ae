//! # Animated counter
//!
//! [`AnimatedCounter`] counts from zero up to an amount, rendering each frame with
//! [`CountUp::format`]. Defaults match the rest of the app's money display: two
//! decimals, `,` as the decimal separator, no thousands grouping and `#` (Naira)
//! as the prefix, so `1234.5` ends on `#1234,50`.
//!
//! The curve is ease-out-exponential, normalised so that progress `1.0` lands
//! exactly on the target.

use std::time::Duration;

use dioxus::prelude::*;

/// Delay between animation frames (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Count-up animation parameters and number formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    pub start: f64,
    pub end: f64,
    pub decimals: usize,
    pub decimal: char,
    /// Thousands separator; `None` disables grouping.
    pub separator: Option<char>,
    pub prefix: String,
    pub suffix: String,
    pub duration: Duration,
}

impl CountUp {
    pub fn new(end: f64) -> Self {
        Self {
            start: 0.0,
            end,
            decimals: 2,
            decimal: ',',
            separator: None,
            prefix: "#".to_string(),
            suffix: String::new(),
            duration: Duration::from_secs(2),
        }
    }

    /// Value at `progress` in `[0, 1]`.
    pub fn value_at(&self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        if t >= 1.0 {
            return self.end;
        }
        self.start + (self.end - self.start) * ease_out_expo(t)
    }

    /// Number of frames after the first; the animation renders `frames() + 1` values.
    pub fn frames(&self) -> usize {
        let frames = self.duration.as_millis() / FRAME_INTERVAL.as_millis();
        usize::try_from(frames).unwrap_or(usize::MAX).max(1)
    }

    pub fn frame_value(&self, frame: usize) -> f64 {
        self.value_at(frame as f64 / self.frames() as f64)
    }

    /// Format `value` with the configured decimals, separators and affixes.
    pub fn format(&self, value: f64) -> String {
        let fixed = format!("{:.*}", self.decimals, value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

        let negative = value < 0.0 && fixed.chars().any(|c| matches!(c, '1'..='9'));
        let mut out = String::with_capacity(fixed.len() + self.prefix.len() + 4);
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        match self.separator {
            Some(sep) => out.push_str(&group_thousands(int_part, sep)),
            None => out.push_str(int_part),
        }
        if self.decimals > 0 {
            out.push(self.decimal);
            out.push_str(frac_part);
        }
        out.push_str(&self.suffix);
        out
    }
}

fn ease_out_expo(t: f64) -> f64 {
    (1.0 - 2f64.powf(-10.0 * t)) * 1024.0 / 1023.0
}

fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Displays `amount`, counting up to it whenever it changes.
#[component]
pub fn AnimatedCounter(
    amount: f64,
    #[props(default = "#".to_string())] prefix: String,
    #[props(default = ',')] decimal: char,
    #[props(default = 2)] decimals: usize,
) -> Element {
    let initial = CountUp {
        prefix: prefix.clone(),
        decimal,
        decimals,
        ..CountUp::new(amount)
    };
    let mut display = use_signal(move || initial.format(initial.start));

    let _animation = use_resource(use_reactive!(|(amount, prefix, decimal, decimals)| async move {
        let count = CountUp {
            prefix,
            decimal,
            decimals,
            ..CountUp::new(amount)
        };
        let frames = count.frames();
        for frame in 0..=frames {
            display.set(count.format(count.frame_value(frame)));
            if frame < frames {
                sleep(FRAME_INTERVAL).await;
            }
        }
    }));

    rsx! {
        div { class: "animated-counter", "{display}" }
    }
}
