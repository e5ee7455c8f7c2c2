use thiserror::Error;

/// Batch-level error classes.
///
/// Everything here is contained inside the per-student loop: a
/// `TransientFetch` or `CaptchaExhausted` fails one student, a
/// `Persistence` failure is logged and the in-memory result survives for
/// the next flush. Only roster-load failure aborts the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or page-load failure for one student's score page.
    #[error("page fetch failed ({url}): {source}")]
    TransientFetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every CAPTCHA attempt in the budget failed. Definitive for this
    /// CAPTCHA instance; the caller must not retry further.
    #[error("CAPTCHA unsolved after {attempts} attempts")]
    CaptchaExhausted { attempts: usize },

    /// Checkpoint or output-sheet write failed.
    #[error("write to {target} failed: {source}")]
    Persistence {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ScrapeError {
    pub fn transient_fetch(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ScrapeError::TransientFetch {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn persistence(
        target: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ScrapeError::Persistence {
            target: target.into(),
            source: source.into(),
        }
    }
}

/// Extraction-level signal: an expected piece of page structure is absent
/// or unusable. Never escapes the extractor; callers log it at debug and
/// degrade the field to absent instead of failing the student.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected structure missing: {0}")]
    ParseAmbiguity(&'static str),
}
