//! Claim extraction and verification against retrieved evidence.
//!
//! The verifier decomposes a generated summary into atomic claims and tests
//! each one for case-insensitive verbatim containment in the grounding
//! context. The containment test is deliberately strict and conservative:
//! no fuzzy or semantic matching, trading recall for zero false "supported"
//! verdicts on fabricated wording.

/// Extracts atomic claims from generated prose.
///
/// Segmentation is a pluggable strategy so a better sentence-boundary
/// algorithm can replace the default without touching the verifier's
/// aggregation logic.
pub trait ClaimExtractor: Send + Sync {
    /// Split a summary into an ordered sequence of non-empty, trimmed claims.
    fn extract(&self, summary: &str) -> Vec<String>;
}

/// Splits claims on sentence-terminating periods.
///
/// A heuristic segmentation: abbreviations, decimals, and citation
/// punctuation are not handled, which limits precision but keeps claims as
/// verbatim substrings of the summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeriodClaimExtractor;

impl ClaimExtractor for PeriodClaimExtractor {
    fn extract(&self, summary: &str) -> Vec<String> {
        summary
            .split('.')
            .map(str::trim)
            .filter(|claim| !claim.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Result of verifying a summary against its grounding context.
///
/// `supported` and `not_supported` partition `claims`: they are disjoint
/// and together cover every extracted claim.
#[derive(Debug, Clone, Default)]
pub struct FactCheckReport {
    /// Ordered claims extracted from the summary.
    pub claims: Vec<String>,
    /// Claims found verbatim (modulo case) in the context.
    pub supported: Vec<String>,
    /// Claims not found in the context.
    pub not_supported: Vec<String>,
}

impl FactCheckReport {
    /// Total number of extracted claims.
    pub fn total_claims(&self) -> usize {
        self.claims.len()
    }

    /// Whether any claims could be extracted at all.
    ///
    /// A summary with zero extractable claims could not be assessed; it is
    /// never "fully verified."
    pub fn is_assessed(&self) -> bool {
        !self.claims.is_empty()
    }

    /// Whether every extracted claim is supported.
    pub fn all_supported(&self) -> bool {
        self.is_assessed() && self.not_supported.is_empty()
    }
}

/// Verifies generated summaries against retrieved context.
pub struct FactChecker {
    extractor: Box<dyn ClaimExtractor>,
}

impl FactChecker {
    /// Create a fact checker with the default period-based claim extractor.
    pub fn new() -> Self {
        Self {
            extractor: Box::new(PeriodClaimExtractor),
        }
    }

    /// Create a fact checker with a custom claim extractor.
    pub fn with_extractor(extractor: Box<dyn ClaimExtractor>) -> Self {
        Self { extractor }
    }

    /// Verify each claim of the summary against the context text.
    ///
    /// A claim is supported iff it appears as a case-insensitive substring
    /// of the context.
    pub fn verify(&self, summary: &str, context_text: &str) -> FactCheckReport {
        let claims = self.extractor.extract(summary);
        let context_lower = context_text.to_lowercase();

        let mut supported = Vec::new();
        let mut not_supported = Vec::new();

        for claim in &claims {
            if context_lower.contains(&claim.to_lowercase()) {
                supported.push(claim.clone());
            } else {
                not_supported.push(claim.clone());
            }
        }

        FactCheckReport {
            claims,
            supported,
            not_supported,
        }
    }
}

impl Default for FactChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a fact-check block to the summary.
///
/// Reports supported/total and unsupported/total counts, with a warning
/// sentence when any claim is unsupported. A report with zero claims gets
/// the counts but no warning.
pub fn annotate_summary(summary: &str, report: &FactCheckReport) -> String {
    let supported = report.supported.len();
    let unsupported = report.not_supported.len();
    let total = report.total_claims();

    let mut annotated = format!(
        "{}\n\n---\n**Fact Check Results:**\n- Supported claims: {}/{}\n- Unsupported claims: {}/{}\n",
        summary, supported, total, unsupported, total
    );

    if unsupported > 0 {
        annotated.push_str(
            "**Note:** Some statements could not be verified from retrieved sources.\n",
        );
    }

    annotated
}
