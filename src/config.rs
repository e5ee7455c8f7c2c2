/// Runtime configuration.
///
/// Every field can be overridden through the environment variable of the
/// same (upper-cased) name; unset variables fall back to the defaults
/// below.
#[derive(Clone, Debug)]
pub struct Config {
    /// Roster / output sheet path (CSV grid, fixed column layout).
    pub roster_path: String,
    /// Durable progress record enabling exact resume.
    pub checkpoint_path: String,
    /// Semester label whose presence means "still enrolled".
    pub target_semester: String,
    /// Strict lower bound for the missing/failed course ratios.
    pub dropout_threshold: f64,
    /// Cap on newly processed (non-skipped) students, for trial runs.
    pub test_limit: Option<usize>,
    /// Reprocess rows even when the status cell is already filled.
    pub force_reprocess: bool,
    /// Base inter-student delay in seconds, jittered per student.
    pub delay_between_students_secs: f64,
    /// Pause before requesting a fresh CAPTCHA after a failed attempt.
    pub delay_after_captcha_fail_secs: f64,
    /// CAPTCHA attempt budget per instance.
    pub captcha_max_retries: usize,
    // --- CAPTCHA recognition API ---
    pub captcha_api_url: String,
    pub captcha_api_key: String,
    /// Portal URL, passed to the recognition API as an accuracy hint.
    pub portal_url: String,
    /// Optional wall-clock cap in seconds, checked between students.
    pub max_runtime_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_path: "Data_SV.csv".to_string(),
            checkpoint_path: "checkpoint_gpa.json".to_string(),
            target_semester: "HK2 (2025 - 2026)".to_string(),
            dropout_threshold: 0.5,
            test_limit: None,
            force_reprocess: false,
            delay_between_students_secs: 5.0,
            delay_after_captcha_fail_secs: 1.5,
            captcha_max_retries: 10,
            captcha_api_url: "https://api.capsolver.com/createTask".to_string(),
            captcha_api_key: String::new(),
            portal_url: "https://sinhvien.huit.edu.vn".to_string(),
            max_runtime_secs: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            roster_path: std::env::var("ROSTER_PATH").unwrap_or(default.roster_path),
            checkpoint_path: std::env::var("CHECKPOINT_PATH").unwrap_or(default.checkpoint_path),
            target_semester: std::env::var("TARGET_SEMESTER").unwrap_or(default.target_semester),
            dropout_threshold: std::env::var("DROPOUT_THRESHOLD").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dropout_threshold),
            test_limit: std::env::var("TEST_LIMIT").ok().and_then(|v| v.parse().ok()).or(default.test_limit),
            force_reprocess: std::env::var("FORCE_REPROCESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.force_reprocess),
            delay_between_students_secs: std::env::var("DELAY_BETWEEN_STUDENTS_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.delay_between_students_secs),
            delay_after_captcha_fail_secs: std::env::var("DELAY_AFTER_CAPTCHA_FAIL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.delay_after_captcha_fail_secs),
            captcha_max_retries: std::env::var("CAPTCHA_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.captcha_max_retries),
            captcha_api_url: std::env::var("CAPTCHA_API_URL").unwrap_or(default.captcha_api_url),
            captcha_api_key: std::env::var("CAPTCHA_API_KEY").unwrap_or(default.captcha_api_key),
            portal_url: std::env::var("PORTAL_URL").unwrap_or(default.portal_url),
            max_runtime_secs: std::env::var("MAX_RUNTIME_SECS").ok().and_then(|v| v.parse().ok()).or(default.max_runtime_secs),
        }
    }
}
