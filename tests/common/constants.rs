//! Shared constants for end-to-end tests
//!
//! Song fixtures served by the fake upstream and the timeouts used by the
//! test harness. When fixture data changes, update only this file.

// ============================================================================
// Fixture Songs
// ============================================================================

/// English song, scored through the emotion model
pub const HAPPY_TITLE: &str = "Sunny Morning";
pub const HAPPY_ARTIST: &str = "The Test Band";
pub const HAPPY_LYRICS: &str = "[Verse 1]\n\
    I woke up this morning and the sun was shining bright\n\
    We are dancing together and everything feels right\n\
    [Chorus]\n\
    Nothing in the world can bring us down tonight";

/// Spanish song, scored through the multilingual sentiment model
pub const SPANISH_TITLE: &str = "Canción Feliz";
pub const SPANISH_ARTIST: &str = "Los Probadores";
pub const SPANISH_LYRICS: &str = "[Estrofa]\n\
    Estoy tan feliz hoy porque el sol brilla en la ciudad\n\
    Bailamos juntos toda la noche y nadie nos puede detener\n\
    Mi corazón canta contigo cada día de la semana";

/// Title the fake lyrics search knows nothing about
pub const UNKNOWN_TITLE: &str = "Song Nobody Wrote";

/// Bearer token the fake lyrics API expects
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

// ============================================================================
// Expected Scores
// ============================================================================

/// Polarity returned by the fixed polarity scorer
pub const FIXED_COMPOUND: f64 = 0.9;

/// 0.6 * 0.9 + 0.4 * (0.8 - 0.0)
pub const HAPPY_VALENCE: f64 = 0.86;

/// anger 0.0 + surprise 0.1
pub const HAPPY_ENERGY: f64 = 0.1;

/// positive 0.7 - negative 0.1
pub const SPANISH_VALENCE: f64 = 0.6;

/// negative 0.1
pub const SPANISH_ENERGY: f64 = 0.1;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Timeout the server's outbound clients use against the fake upstream (seconds)
pub const UPSTREAM_TIMEOUT_SECS: u64 = 5;
