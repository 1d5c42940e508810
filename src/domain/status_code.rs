//! Flight status codes reported by oracles.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Flight-delay classification submitted by an oracle.
///
/// The numeric values are the ones the insurance contract expects in
/// `submitOracleResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StatusCode {
    /// Status not known.
    Unknown = 0,
    /// Flight departed on time.
    OnTime = 10,
    /// Delay caused by the airline (the only payable delay).
    LateAirline = 20,
    /// Delay caused by weather.
    LateWeather = 30,
    /// Delay caused by a technical problem.
    LateTechnical = 40,
    /// Delay for any other reason.
    LateOther = 50,
}

impl StatusCode {
    /// Every status code, in ascending numeric order.
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::OnTime,
        Self::LateAirline,
        Self::LateWeather,
        Self::LateTechnical,
        Self::LateOther,
    ];

    /// Returns the on-chain numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Maps an on-chain numeric code back to a status.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            10 => Some(Self::OnTime),
            20 => Some(Self::LateAirline),
            30 => Some(Self::LateWeather),
            40 => Some(Self::LateTechnical),
            50 => Some(Self::LateOther),
            _ => None,
        }
    }

    /// Draws a status uniformly at random.
    ///
    /// The simulator has no ground truth for flights, so every code is
    /// equally likely.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL.choose(rng).copied().unwrap_or(Self::Unknown)
    }

    /// Returns the snake_case name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::OnTime => "on_time",
            Self::LateAirline => "late_airline",
            Self::LateWeather => "late_weather",
            Self::LateTechnical => "late_technical",
            Self::LateOther => "late_other",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn codes_match_contract_values() {
        let codes: Vec<u8> = StatusCode::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec![0, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn from_code_round_trips_known_values() {
        for status in StatusCode::ALL {
            assert_eq!(StatusCode::from_code(status.code()), Some(status));
        }
        assert_eq!(StatusCode::from_code(15), None);
        assert_eq!(StatusCode::from_code(255), None);
    }

    #[test]
    fn random_draw_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let trials = 6_000;
        let mut counts: HashMap<StatusCode, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(StatusCode::random(&mut rng)).or_default() += 1;
        }

        let expected = trials / StatusCode::ALL.len();
        let tolerance = expected * 15 / 100;
        for status in StatusCode::ALL {
            let count = counts.get(&status).copied().unwrap_or(0);
            assert!(count > 0, "{status} never drawn");
            assert!(
                count.abs_diff(expected) <= tolerance,
                "{status} drawn {count} times, expected {expected} ± {tolerance}"
            );
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&StatusCode::LateAirline).unwrap_or_default();
        assert_eq!(json, "\"late_airline\"");
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(StatusCode::LateWeather.to_string(), "late_weather (30)");
    }
}
