// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rule-based relationship "horoscope".

use super::scoring::TrajectoryStats;

const HEADLINE_ENTANGLED: &str = "status: quantum entanglement";
const HEADLINE_COMPLICATED: &str = "status: it's complicated";
const HEADLINE_DECOHERENT: &str = "status: decoherence detected";

const SYNC_ECHO_CHAMBER: &str = "• your phases are so perfectly in sync that the relationship risks becoming an echo chamber. without friction or divergence, growth is stalled, and love trades depth for comfort.";
const SYNC_ANTICORRELATED: &str = "• your phases are anticorrelated, meaning there is a fundamental misalignment in your relationship. every attempt to resync costs more energy than it returns, causing you to drift further apart.";
const SYNC_NOISY: &str = "• there is noise/interference in your communication. external factors may consume your relationship and affect the quality of your interactions.";

const DECAY: &str = "• your relationship is decaying and will keep slowly losing energy.";
const DECAY_ADVICE: &str = "• advice: engage in more energetic conversation and spend more time with each other to counteract entropy.";
const VOLATILE: &str = "• your relationship is highly volatile like a rollercoaster.";
const VOLATILE_ADVICE: &str = "• advice: your hamiltonian needs damping. introduce stabilizing routines, like daily check-ins, to reduce fluctuations.";
const STEADY: &str = "• your relationship has reached a local minimum steady state.";
const STEADY_ADVICE: &str = "• advice: your quantum state is stable but stagnant. introduce a perturbation to reignite the spark in your relationship.";

const DECAY_SLOPE: f64 = -0.01;
const VOLATILITY_LIMIT: f64 = 0.4;

/// Headline, sync line and trajectory advice, newline-joined.
pub fn generate(stats: &TrajectoryStats, score: f64) -> String {
    let mut lines = Vec::with_capacity(5);

    lines.push(if score > 80.0 {
        HEADLINE_ENTANGLED
    } else if score > 50.0 {
        HEADLINE_COMPLICATED
    } else {
        HEADLINE_DECOHERENT
    });

    lines.push(if stats.correlation > 0.8 {
        SYNC_ECHO_CHAMBER
    } else if stats.correlation < 0.0 {
        SYNC_ANTICORRELATED
    } else {
        SYNC_NOISY
    });

    // First match wins.
    if stats.avg_slope < DECAY_SLOPE {
        lines.extend([DECAY, DECAY_ADVICE]);
    } else if stats.avg_volatility > VOLATILITY_LIMIT {
        lines.extend([VOLATILE, VOLATILE_ADVICE]);
    } else {
        lines.push(STEADY);
        if score < 60.0 {
            lines.push(STEADY_ADVICE);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(correlation: f64, avg_slope: f64, avg_volatility: f64) -> TrajectoryStats {
        TrajectoryStats {
            mean_happiness: 0.0,
            correlation,
            avg_slope,
            avg_volatility,
        }
    }

    #[test]
    fn test_headline_thresholds() {
        let s = stats(0.5, 0.0, 0.1);
        assert!(generate(&s, 80.1).starts_with(HEADLINE_ENTANGLED));
        assert!(generate(&s, 80.0).starts_with(HEADLINE_COMPLICATED));
        assert!(generate(&s, 50.0).starts_with(HEADLINE_DECOHERENT));
    }

    #[test]
    fn test_decay_takes_precedence_over_volatility() {
        let text = generate(&stats(0.5, -0.02, 0.9), 70.0);
        assert!(text.contains(DECAY));
        assert!(text.contains(DECAY_ADVICE));
        assert!(!text.contains(VOLATILE));
    }

    #[test]
    fn test_volatile_branch() {
        let text = generate(&stats(0.5, 0.0, 0.41), 70.0);
        assert!(text.contains(VOLATILE));
        assert!(text.contains(VOLATILE_ADVICE));
    }

    #[test]
    fn test_steady_advice_only_below_60() {
        let low = generate(&stats(0.5, 0.0, 0.1), 59.9);
        assert!(low.ends_with(STEADY_ADVICE));
        let high = generate(&stats(0.5, 0.0, 0.1), 60.0);
        assert!(high.ends_with(STEADY));
        assert_eq!(high.lines().count(), 3);
    }

    #[test]
    fn test_sync_lines() {
        assert!(generate(&stats(0.81, 0.0, 0.1), 90.0).contains(SYNC_ECHO_CHAMBER));
        assert!(generate(&stats(-1.0, 0.0, 0.1), 90.0).contains(SYNC_ANTICORRELATED));
        assert!(generate(&stats(0.0, 0.0, 0.1), 90.0).contains(SYNC_NOISY));
        assert!(generate(&stats(0.8, 0.0, 0.1), 90.0).contains(SYNC_NOISY));
    }

    #[test]
    fn test_deterministic() {
        let s = stats(0.3, -0.005, 0.2);
        assert_eq!(generate(&s, 42.0), generate(&s, 42.0));
    }
}
