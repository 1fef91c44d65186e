//! Episode metrics and running training statistics.

use std::fmt;
use std::time::Duration;

/// Read from the environment once the episode is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeMetrics {
    /// Achieved network lifetime.
    pub network_lifetime: f64,
    /// Total mobile-charger travel distance.
    pub travel_distance: f64,
    /// Number of environment steps taken.
    pub steps: usize,
}

/// Everything the driver records about one training example.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    /// Mean per-step policy loss.
    pub policy_loss: f64,
    /// Mean per-step value loss.
    pub value_loss: f64,
    /// Mean per-step entropy.
    pub entropy: f64,
    pub metrics: EpisodeMetrics,
}

/// Means over a group of examples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowSummary {
    pub examples: usize,
    pub mean_policy_loss: f64,
    pub mean_entropy: f64,
    pub mean_network_lifetime: f64,
    pub mean_travel_distance: f64,
}

/// Per-epoch accumulator of episode reports.
#[derive(Debug, Default)]
pub struct RunningStats {
    policy_losses: Vec<f64>,
    entropies: Vec<f64>,
    lifetimes: Vec<f64>,
    travel_distances: Vec<f64>,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &EpisodeReport) {
        self.policy_losses.push(report.policy_loss);
        self.entropies.push(report.entropy);
        self.lifetimes.push(report.metrics.network_lifetime);
        self.travel_distances.push(report.metrics.travel_distance);
    }

    pub fn len(&self) -> usize {
        self.policy_losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy_losses.is_empty()
    }

    /// Means over the most recent `n` examples (fewer if not enough recorded).
    pub fn window(&self, n: usize) -> WindowSummary {
        let start = self.len().saturating_sub(n);
        WindowSummary {
            examples: self.len() - start,
            mean_policy_loss: mean(&self.policy_losses[start..]),
            mean_entropy: mean(&self.entropies[start..]),
            mean_network_lifetime: mean(&self.lifetimes[start..]),
            mean_travel_distance: mean(&self.travel_distances[start..]),
        }
    }

    /// Means over everything recorded.
    pub fn overall(&self) -> WindowSummary {
        self.window(self.len())
    }
}

/// Aggregated greedy-evaluation metrics over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaluationMetrics {
    pub mean_network_lifetime: f64,
    pub mean_travel_distance: f64,
    pub mean_steps: f64,
    pub n_episodes: usize,
}

impl EvaluationMetrics {
    /// Averages a set of episode metrics.
    pub fn from_episodes(episodes: &[EpisodeMetrics]) -> Self {
        let lifetimes: Vec<f64> = episodes.iter().map(|m| m.network_lifetime).collect();
        let distances: Vec<f64> = episodes.iter().map(|m| m.travel_distance).collect();
        let steps: Vec<f64> = episodes.iter().map(|m| m.steps as f64).collect();
        Self {
            mean_network_lifetime: mean(&lifetimes),
            mean_travel_distance: mean(&distances),
            mean_steps: mean(&steps),
            n_episodes: episodes.len(),
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(
            f,
            "  Mean network lifetime:   {:.4}",
            self.mean_network_lifetime
        )?;
        writeln!(
            f,
            "  Mean travel distance:    {:.4}",
            self.mean_travel_distance
        )?;
        writeln!(f, "  Mean episode length:     {:.1}", self.mean_steps)
    }
}

/// Summary of one training epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    pub epoch: usize,
    pub train: WindowSummary,
    /// Wall time of the whole epoch.
    pub elapsed: Duration,
    /// Mean wall time of one reporting window; zero if no window completed.
    pub mean_window_time: Duration,
    /// Greedy evaluation on the validation set, when one was run.
    pub validation: Option<EvaluationMetrics>,
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(i: usize) -> EpisodeReport {
        EpisodeReport {
            policy_loss: i as f64,
            value_loss: 0.0,
            entropy: 1.0,
            metrics: EpisodeMetrics {
                network_lifetime: 10.0 * i as f64,
                travel_distance: 2.0,
                steps: i,
            },
        }
    }

    #[test]
    fn window_covers_latest_examples() {
        let mut stats = RunningStats::new();
        for i in 0..10 {
            stats.record(&report(i));
        }
        let w = stats.window(4);
        assert_eq!(w.examples, 4);
        // policy losses 6, 7, 8, 9
        assert!((w.mean_policy_loss - 7.5).abs() < 1e-12);
        assert!((w.mean_network_lifetime - 75.0).abs() < 1e-12);
        assert!((w.mean_entropy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overall_and_oversized_window_agree() {
        let mut stats = RunningStats::new();
        for i in 0..3 {
            stats.record(&report(i));
        }
        assert_eq!(stats.overall(), stats.window(100));
        assert_eq!(stats.overall().examples, 3);
    }

    #[test]
    fn empty_stats_are_zero() {
        let stats = RunningStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.overall(), WindowSummary::default());
    }

    #[test]
    fn evaluation_averages_episodes() {
        let eps = [report(1).metrics, report(3).metrics];
        let m = EvaluationMetrics::from_episodes(&eps);
        assert_eq!(m.n_episodes, 2);
        assert!((m.mean_network_lifetime - 20.0).abs() < 1e-12);
        assert!((m.mean_steps - 2.0).abs() < 1e-12);
        assert!(m.to_string().contains("2 episodes"));
    }
}
