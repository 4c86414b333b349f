//! Concern detection.
//!
//! Every concern type follows the same tiered pattern: scan the functions,
//! put each qualifying one into an upper or lower tier, rank each tier by a
//! type-specific score (descending, stable), keep the top
//! [`MAX_AFFECTED_ITEMS`], describe the tier and emit one [`Concern`] per
//! non-empty tier. The combined list is then stable-sorted by severity.
//!
//! Which [`Severity`] a tier maps to is given by its [`SeverityLadder`].

mod describe;

use crate::config::{BlastRadiusThresholds, ThresholdConfig};
use crate::model::{AffectedItem, Concern, ConcernType, FileMetrics, FunctionMetrics, ItemMetrics, Severity};

/// Affected items kept per concern.
pub const MAX_AFFECTED_ITEMS: usize = 5;

/// Position of a finding within a detector's two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Upper,
    Lower,
}

/// Severities assigned to the upper and lower tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityLadder {
    /// Upper tier is critical, lower tier is warning.
    Standard,
    /// Upper tier is warning, lower tier is info.
    Softened,
}

impl SeverityLadder {
    pub fn severity(self, tier: Tier) -> Severity {
        match (self, tier) {
            (Self::Standard, Tier::Upper) => Severity::Critical,
            (Self::Standard, Tier::Lower) | (Self::Softened, Tier::Upper) => Severity::Warning,
            (Self::Softened, Tier::Lower) => Severity::Info,
        }
    }
}

/// One concern type, described by how it tiers, ranks and explains.
pub trait ConcernDetector {
    fn kind(&self) -> ConcernType;

    fn ladder(&self) -> SeverityLadder {
        SeverityLadder::Standard
    }

    /// Tier for a function, or `None` if it does not qualify.
    fn classify(&self, function: &FunctionMetrics) -> Option<Tier>;

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics;

    /// Higher ranks first within a tier.
    fn rank(&self, function: &FunctionMetrics) -> f64;

    fn title(&self, tier: Tier) -> &'static str;

    /// Describe a tier. `items` holds every item in the tier, ranked.
    fn describe(&self, tier: Tier, items: &[AffectedItem]) -> String;

    /// Run the tiered pattern over `functions`.
    fn detect(&self, functions: &[&FunctionMetrics]) -> Vec<Concern> {
        let mut upper: Vec<(f64, AffectedItem)> = Vec::new();
        let mut lower: Vec<(f64, AffectedItem)> = Vec::new();

        for function in functions {
            let Some(tier) = self.classify(function) else {
                continue;
            };
            let entry = (
                self.rank(function),
                AffectedItem {
                    file_path: function.file_path.clone(),
                    function_name: function.name.clone(),
                    line: function.start_line,
                    metrics: self.item_metrics(function),
                },
            );
            match tier {
                Tier::Upper => upper.push(entry),
                Tier::Lower => lower.push(entry),
            }
        }

        let mut concerns = Vec::new();
        for (tier, mut entries) in [(Tier::Upper, upper), (Tier::Lower, lower)] {
            if entries.is_empty() {
                continue;
            }
            entries.sort_by(|a, b| b.0.total_cmp(&a.0));
            let mut items: Vec<AffectedItem> = entries.into_iter().map(|(_, item)| item).collect();
            let description = self.describe(tier, &items);
            items.truncate(MAX_AFFECTED_ITEMS);

            concerns.push(Concern {
                kind: self.kind(),
                severity: self.ladder().severity(tier),
                title: self.title(tier).to_string(),
                description,
                affected_items: items,
            });
        }
        concerns
    }
}

fn churn_commits(function: &FunctionMetrics) -> Option<u32> {
    function.churn.map(|c| c.total_commits)
}

/// Complex functions that also change often. Critical only.
pub struct HotspotDetector<'a>(pub &'a ThresholdConfig);

impl ConcernDetector for HotspotDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::ChurnComplexityHotspot
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        let commits = churn_commits(function)?;
        let hotspot = &self.0.hotspot;
        (function.cyclomatic_complexity > hotspot.min_complexity && commits > hotspot.min_churn)
            .then_some(Tier::Upper)
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::Hotspot {
            complexity: function.cyclomatic_complexity,
            churn: churn_commits(function).unwrap_or(0),
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        function.cyclomatic_complexity as f64 * churn_commits(function).unwrap_or(0) as f64
    }

    fn title(&self, _tier: Tier) -> &'static str {
        "Complexity Hotspots"
    }

    fn describe(&self, _tier: Tier, items: &[AffectedItem]) -> String {
        describe::hotspot(items)
    }
}

/// Long functions with many commits.
pub struct ChurnLengthDetector<'a>(pub &'a ThresholdConfig);

impl ConcernDetector for ChurnLengthDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::HighChurnLongFunction
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        let commits = churn_commits(function)?;
        let length = &self.0.function_length;
        let churn = &self.0.churn;
        if function.length <= length.warning || commits <= churn.warning {
            return None;
        }
        if function.length > length.critical && commits > churn.critical {
            Some(Tier::Upper)
        } else {
            Some(Tier::Lower)
        }
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::ChurnLength {
            length: function.length,
            churn: churn_commits(function).unwrap_or(0),
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        function.length as f64 * churn_commits(function).unwrap_or(0) as f64
    }

    fn title(&self, tier: Tier) -> &'static str {
        match tier {
            Tier::Upper => "Large Functions with High Churn",
            Tier::Lower => "Long Functions with Moderate Churn",
        }
    }

    fn describe(&self, tier: Tier, items: &[AffectedItem]) -> String {
        describe::churn_length(items, tier)
    }
}

/// Maintainability index below the warning or critical threshold.
pub struct MaintainabilityDetector<'a>(pub &'a ThresholdConfig);

impl ConcernDetector for MaintainabilityDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::LowMaintainability
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        let mi = &self.0.maintainability_index;
        if function.maintainability_index >= mi.warning {
            return None;
        }
        if function.maintainability_index < mi.critical {
            Some(Tier::Upper)
        } else {
            Some(Tier::Lower)
        }
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::Maintainability {
            maintainability_index: function.maintainability_index,
            cyclomatic_complexity: function.cyclomatic_complexity,
            length: function.length,
            halstead_volume: function.halstead.volume,
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        100.0 - function.maintainability_index
    }

    fn title(&self, tier: Tier) -> &'static str {
        match tier {
            Tier::Upper => "Critical Maintainability Issues",
            Tier::Lower => "Low Maintainability",
        }
    }

    fn describe(&self, tier: Tier, items: &[AffectedItem]) -> String {
        let mi = &self.0.maintainability_index;
        let threshold = match tier {
            Tier::Upper => mi.critical,
            Tier::Lower => mi.warning,
        };
        describe::maintainability(items, threshold)
    }
}

/// Nesting deeper than the warning threshold.
pub struct NestingDetector<'a>(pub &'a ThresholdConfig);

impl ConcernDetector for NestingDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::DeepNesting
    }

    fn ladder(&self) -> SeverityLadder {
        SeverityLadder::Softened
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        let nesting = &self.0.nesting_depth;
        if function.nesting_depth <= nesting.warning {
            return None;
        }
        if function.nesting_depth > nesting.critical {
            Some(Tier::Upper)
        } else {
            Some(Tier::Lower)
        }
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::Nesting {
            nesting_depth: function.nesting_depth,
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        function.nesting_depth as f64
    }

    fn title(&self, tier: Tier) -> &'static str {
        match tier {
            Tier::Upper => "Very Deep Nesting",
            Tier::Lower => "Deep Nesting",
        }
    }

    fn describe(&self, tier: Tier, items: &[AffectedItem]) -> String {
        describe::nesting(items, tier)
    }
}

/// More parameters than the warning threshold.
pub struct ParameterDetector<'a>(pub &'a ThresholdConfig);

impl ConcernDetector for ParameterDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::TooManyParameters
    }

    fn ladder(&self) -> SeverityLadder {
        SeverityLadder::Softened
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        let params = &self.0.parameter_count;
        if function.parameter_count <= params.warning {
            return None;
        }
        if function.parameter_count > params.critical {
            Some(Tier::Upper)
        } else {
            Some(Tier::Lower)
        }
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::Parameters {
            parameter_count: function.parameter_count,
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        function.parameter_count as f64
    }

    fn title(&self, tier: Tier) -> &'static str {
        match tier {
            Tier::Upper => "Too Many Parameters",
            Tier::Lower => "Many Parameters",
        }
    }

    fn describe(&self, tier: Tier, items: &[AffectedItem]) -> String {
        describe::parameters(items, tier)
    }
}

/// Many parameters and many callers. Warning only.
pub struct GodFunctionDetector<'a>(pub &'a ThresholdConfig);

impl ConcernDetector for GodFunctionDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::GodFunction
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        let god = &self.0.god_function;
        (function.parameter_count > god.min_parameters && function.fan_in > god.min_fan_in)
            .then_some(Tier::Lower)
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::GodFunction {
            parameter_count: function.parameter_count,
            fan_in: function.fan_in,
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        function.parameter_count as f64 * function.fan_in as f64
    }

    fn title(&self, _tier: Tier) -> &'static str {
        "God Functions"
    }

    fn describe(&self, _tier: Tier, items: &[AffectedItem]) -> String {
        describe::god_function(items)
    }
}

/// High fan-in among a chosen set of functions, typically the ones a
/// change touches.
pub struct BlastRadiusDetector<'a> {
    pub thresholds: &'a BlastRadiusThresholds,
    /// Whether fan-in figures come from name matching rather than
    /// resolved calls.
    pub approximate: bool,
}

impl ConcernDetector for BlastRadiusDetector<'_> {
    fn kind(&self) -> ConcernType {
        ConcernType::BlastRadius
    }

    fn classify(&self, function: &FunctionMetrics) -> Option<Tier> {
        if function.fan_in < self.thresholds.warning {
            return None;
        }
        if function.fan_in >= self.thresholds.critical {
            Some(Tier::Upper)
        } else {
            Some(Tier::Lower)
        }
    }

    fn item_metrics(&self, function: &FunctionMetrics) -> ItemMetrics {
        ItemMetrics::BlastRadius {
            fan_in: function.fan_in,
            approximate: self.approximate,
        }
    }

    fn rank(&self, function: &FunctionMetrics) -> f64 {
        function.fan_in as f64
    }

    fn title(&self, tier: Tier) -> &'static str {
        match tier {
            Tier::Upper => "Critical Blast Radius",
            Tier::Lower => "High Blast Radius",
        }
    }

    fn describe(&self, tier: Tier, items: &[AffectedItem]) -> String {
        let shown = &items[..items.len().min(MAX_AFFECTED_ITEMS)];
        describe::blast_radius(shown, tier, self.approximate)
    }
}

/// Stable sort, critical first.
pub fn sort_by_severity(concerns: &mut [Concern]) {
    concerns.sort_by_key(|c| c.severity);
}

/// Run every codebase-wide detector over all functions.
///
/// Churn-based detectors only run when churn data is available.
pub fn detect_concerns(
    files: &[FileMetrics],
    has_churn_data: bool,
    thresholds: &ThresholdConfig,
) -> Vec<Concern> {
    let functions: Vec<&FunctionMetrics> = files.iter().flat_map(|f| f.functions.iter()).collect();

    let mut detectors: Vec<Box<dyn ConcernDetector + '_>> = Vec::new();
    if has_churn_data {
        detectors.push(Box::new(HotspotDetector(thresholds)));
        detectors.push(Box::new(ChurnLengthDetector(thresholds)));
    }
    detectors.push(Box::new(MaintainabilityDetector(thresholds)));
    detectors.push(Box::new(NestingDetector(thresholds)));
    detectors.push(Box::new(ParameterDetector(thresholds)));
    detectors.push(Box::new(GodFunctionDetector(thresholds)));

    let mut concerns: Vec<Concern> = detectors
        .iter()
        .flat_map(|detector| detector.detect(&functions))
        .collect();
    sort_by_severity(&mut concerns);

    tracing::debug!(
        "Detected {} concerns over {} functions",
        concerns.len(),
        functions.len()
    );
    concerns
}

/// Blast-radius concerns for a caller-selected set of functions.
pub fn detect_blast_radius(
    functions: &[&FunctionMetrics],
    thresholds: &BlastRadiusThresholds,
    approximate: bool,
) -> Vec<Concern> {
    let detector = BlastRadiusDetector {
        thresholds,
        approximate,
    };
    let mut concerns = detector.detect(functions);
    sort_by_severity(&mut concerns);
    concerns
}
