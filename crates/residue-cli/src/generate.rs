use crate::ledger::{check_limits, LedgerError, LimitStatus, SpendLimits, UsageLedger};
use chrono::Local;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorError(pub String);

impl Display for GeneratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GeneratorError {}

/// The cloud image-generation backend, seen only through this seam. The CLI
/// gates every call on the spend ledger and records usage after a success;
/// which vendor actually renders the images is deployment wiring.
pub trait ImageGenerator {
    fn generate(
        &self,
        prompt: &str,
        num_images: u32,
        aspect_ratio: &str,
        output: &Path,
    ) -> Result<Vec<PathBuf>, GeneratorError>;
}

/// Default backend when no vendor credentials are wired up: always refuses,
/// so the gate and ledger paths stay usable in any environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

impl ImageGenerator for UnconfiguredGenerator {
    fn generate(
        &self,
        _prompt: &str,
        _num_images: u32,
        _aspect_ratio: &str,
        _output: &Path,
    ) -> Result<Vec<PathBuf>, GeneratorError> {
        Err(GeneratorError(
            "no image-generation backend configured".to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// The spend gate refused before any backend call was made.
    Blocked(LimitStatus),
    Generated {
        saved: Vec<PathBuf>,
        status: LimitStatus,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    Ledger(LedgerError),
    Backend(GeneratorError),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger(e) => write!(f, "{e}"),
            Self::Backend(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Gate, generate, record: refuses when the ledger is at a limit, otherwise
/// calls the backend and appends the usage entry before returning. A backend
/// failure costs nothing and records nothing.
pub fn generate_with_gate<G: ImageGenerator>(
    generator: &G,
    ledger_path: &Path,
    limits: SpendLimits,
    prompt: &str,
    num_images: u32,
    aspect_ratio: &str,
    output: &Path,
) -> Result<GenerateOutcome, GenerateError> {
    let now = Local::now();
    let today = now.format("%Y-%m-%d").to_string();
    let this_month = now.format("%Y-%m").to_string();

    let mut ledger = UsageLedger::load(ledger_path).map_err(GenerateError::Ledger)?;
    let status = check_limits(&ledger, limits, &today, &this_month);
    if status.blocked {
        return Ok(GenerateOutcome::Blocked(status));
    }

    let saved = generator
        .generate(prompt, num_images, aspect_ratio, output)
        .map_err(GenerateError::Backend)?;

    ledger.record(prompt, num_images, aspect_ratio, None);
    ledger.save(ledger_path).map_err(GenerateError::Ledger)?;
    let status = check_limits(&ledger, limits, &today, &this_month);
    Ok(GenerateOutcome::Generated { saved, status })
}
