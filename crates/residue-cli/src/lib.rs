#![forbid(unsafe_code)]
//! Spend tracking for the image-generation workflow: a JSON ledger of
//! generation costs with daily/monthly limits, and the gate that refuses to
//! call the image backend once a limit is hit.

mod generate;
mod ledger;

pub use generate::{
    generate_with_gate, GenerateError, GenerateOutcome, GeneratorError, ImageGenerator,
    UnconfiguredGenerator,
};
pub use ledger::{
    check_limits, LedgerError, LimitStatus, SpendLimits, UsageEntry, UsageLedger,
    COST_PER_IMAGE_USD, PROMPT_MAX_LEN,
};

pub const CRATE_NAME: &str = "residue-cli";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    LimitBlocked = 3,
    DependencyFailure = 4,
    Internal = 10,
}
