use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

/// Imagen-class pricing, standard quality, per generated image.
pub const COST_PER_IMAGE_USD: f64 = 0.04;
pub const PROMPT_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerError(pub String);

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for LedgerError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsageEntry {
    pub timestamp: DateTime<Utc>,
    /// Local calendar date the entry was recorded under; limit arithmetic
    /// groups by this string, not by the UTC timestamp.
    pub date: String,
    pub prompt: String,
    pub num_images: u32,
    pub aspect_ratio: String,
    pub cost_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct UsageLedger {
    pub entries: Vec<UsageEntry>,
    pub total_images: u64,
    pub total_cost_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendLimits {
    pub daily_usd: f64,
    pub monthly_usd: f64,
}

impl Default for SpendLimits {
    fn default() -> Self {
        Self {
            daily_usd: 5.0,
            monthly_usd: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitStatus {
    pub daily_cost: f64,
    pub daily_count: u64,
    pub monthly_cost: f64,
    pub monthly_count: u64,
    pub daily_limit: f64,
    pub monthly_limit: f64,
    pub alerts: Vec<String>,
    pub blocked: bool,
}

impl UsageLedger {
    /// Loads the ledger, treating a missing file as an empty ledger.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| LedgerError(format!("ledger parse failed: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(LedgerError(format!("ledger read failed: {e}"))),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| LedgerError(format!("ledger directory create failed: {e}")))?;
            }
        }
        let raw = serde_json::to_vec_pretty(self)
            .map_err(|e| LedgerError(format!("ledger serialization failed: {e}")))?;
        fs::write(path, raw).map_err(|e| LedgerError(format!("ledger write failed: {e}")))
    }

    /// Appends one generation to the ledger. `cost_override` replaces the
    /// per-image default when the actual billed price is known.
    pub fn record(
        &mut self,
        prompt: &str,
        num_images: u32,
        aspect_ratio: &str,
        cost_override: Option<f64>,
    ) {
        let cost = cost_override.unwrap_or(COST_PER_IMAGE_USD * f64::from(num_images));
        let now = Local::now();
        self.entries.push(UsageEntry {
            timestamp: now.with_timezone(&Utc),
            date: now.format("%Y-%m-%d").to_string(),
            prompt: truncate_prompt(prompt),
            num_images,
            aspect_ratio: aspect_ratio.to_string(),
            cost_usd: cost,
        });
        self.total_images += u64::from(num_images);
        self.total_cost_usd = round4(self.total_cost_usd + cost);
    }
}

/// Daily/monthly spend for the given local date (`YYYY-MM-DD`) and month
/// prefix (`YYYY-MM`), with the 80% warnings and the hard-stop flag.
#[must_use]
pub fn check_limits(
    ledger: &UsageLedger,
    limits: SpendLimits,
    today: &str,
    this_month: &str,
) -> LimitStatus {
    let daily: Vec<&UsageEntry> = ledger
        .entries
        .iter()
        .filter(|e| e.date == today)
        .collect();
    let monthly: Vec<&UsageEntry> = ledger
        .entries
        .iter()
        .filter(|e| e.date.starts_with(this_month))
        .collect();

    let daily_cost = round4(daily.iter().map(|e| e.cost_usd).sum());
    let monthly_cost = round4(monthly.iter().map(|e| e.cost_usd).sum());
    let daily_count = daily.iter().map(|e| u64::from(e.num_images)).sum();
    let monthly_count = monthly.iter().map(|e| u64::from(e.num_images)).sum();

    let mut alerts = Vec::new();
    if daily_cost >= limits.daily_usd {
        alerts.push(format!(
            "daily limit reached: ${daily_cost:.2} / ${:.2}",
            limits.daily_usd
        ));
    } else if daily_cost >= limits.daily_usd * 0.8 {
        alerts.push(format!(
            "daily spend above 80%: ${daily_cost:.2} / ${:.2}",
            limits.daily_usd
        ));
    }
    if monthly_cost >= limits.monthly_usd {
        alerts.push(format!(
            "monthly limit reached: ${monthly_cost:.2} / ${:.2}",
            limits.monthly_usd
        ));
    } else if monthly_cost >= limits.monthly_usd * 0.8 {
        alerts.push(format!(
            "monthly spend above 80%: ${monthly_cost:.2} / ${:.2}",
            limits.monthly_usd
        ));
    }

    LimitStatus {
        daily_cost,
        daily_count,
        monthly_cost,
        monthly_count,
        daily_limit: limits.daily_usd,
        monthly_limit: limits.monthly_usd,
        alerts,
        blocked: daily_cost >= limits.daily_usd || monthly_cost >= limits.monthly_usd,
    }
}

fn truncate_prompt(prompt: &str) -> String {
    if prompt.chars().count() <= PROMPT_MAX_LEN {
        return prompt.to_string();
    }
    prompt.chars().take(PROMPT_MAX_LEN).collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
