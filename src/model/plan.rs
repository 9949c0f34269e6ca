//! Plan catalog entities.
//!
//! A [`Plan`] owns its benefits keyed by canonical benefit name (see
//! [`canonical_benefit_name`]). The same canonicalization is applied to
//! every lookup key, so user-supplied names match regardless of case or
//! whitespace.

use std::collections::BTreeMap;

/// Canonicalizes a benefit name: lower-case, whitespace runs collapsed to a
/// single space, trimmed.
///
/// This is a pure mapping, not fuzzy matching.
///
/// ```
/// use u_planfit::model::canonical_benefit_name;
///
/// assert_eq!(
///     canonical_benefit_name("  Basic  Dental\tCare - ADULT "),
///     "basic dental care - adult"
/// );
/// ```
pub fn canonical_benefit_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A single cost-sharing cell of the benefits table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostShare {
    NotApplicable,
    NotCovered,
    NoCharge,
    /// Percentage of cost paid by the insured, `0..=100`.
    Percent(f64),
    /// Fixed dollar amount.
    Amount(f64),
    /// Any other non-empty text the ingestion layer passed through.
    Other(String),
}

impl CostShare {
    /// Parses a raw table cell. Returns `None` for empty input (unknown).
    ///
    /// ```
    /// use u_planfit::model::CostShare;
    ///
    /// assert_eq!(CostShare::parse("35.00%"), Some(CostShare::Percent(35.0)));
    /// assert_eq!(CostShare::parse("$1,250.00"), Some(CostShare::Amount(1250.0)));
    /// assert_eq!(CostShare::parse("No Charge"), Some(CostShare::NoCharge));
    /// assert_eq!(CostShare::parse("  "), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        let lower = text.to_lowercase();
        if lower.contains("not applicable") {
            return Some(Self::NotApplicable);
        }
        if lower.contains("not covered") {
            return Some(Self::NotCovered);
        }
        if let Some(pos) = text.find('%') {
            return Some(match leading_number(&text[..pos]) {
                Some(p) => Self::Percent(p),
                None => Self::Other(text.to_string()),
            });
        }
        if lower.contains("no charge") {
            return Some(Self::NoCharge);
        }
        if let Some(pos) = text.find('$') {
            if let Some(amount) = leading_number(&text[pos + 1..]) {
                return Some(Self::Amount(amount));
            }
        }
        Some(Self::Other(text.to_string()))
    }

    /// Coinsurance rate in percent, if this cell expresses one.
    ///
    /// `NoCharge` counts as 0%.
    pub fn coinsurance_rate(&self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(*p),
            Self::NoCharge => Some(0.0),
            _ => None,
        }
    }

    /// Whether this cell describes an actual copay arrangement.
    pub fn is_copay(&self) -> bool {
        !matches!(self, Self::NotApplicable | Self::NotCovered)
    }
}

/// Parses the first number in `s`, allowing thousands separators.
fn leading_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

/// Cost-sharing values per network tier.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierCostShare {
    pub in_network_tier1: Option<CostShare>,
    pub in_network_tier2: Option<CostShare>,
    pub out_of_network: Option<CostShare>,
}

/// One benefit row of a plan.
///
/// `None` means "unknown", never zero or false.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanBenefit {
    /// Display name as it appeared in the source table.
    pub benefit_name: String,
    pub covered: Option<bool>,
    pub ehb: Option<bool>,
    pub copay: TierCostShare,
    pub coinsurance: TierCostShare,
    /// Whether a quantity limit applies to the service.
    pub quantity_limit: Option<bool>,
    pub limit_qty: Option<f64>,
    /// Unit of the limit, e.g. "Exam(s) per Year".
    pub limit_unit: Option<String>,
    pub exclusions: Option<String>,
    pub explanation: Option<String>,
    pub ehb_var_reason: Option<String>,
    pub excluded_from_in_network_moop: Option<bool>,
    pub excluded_from_out_of_network_moop: Option<bool>,
}

impl PlanBenefit {
    /// Creates a benefit with every optional field unknown.
    pub fn new(benefit_name: impl Into<String>) -> Self {
        Self {
            benefit_name: benefit_name.into(),
            covered: None,
            ehb: None,
            copay: TierCostShare::default(),
            coinsurance: TierCostShare::default(),
            quantity_limit: None,
            limit_qty: None,
            limit_unit: None,
            exclusions: None,
            explanation: None,
            ehb_var_reason: None,
            excluded_from_in_network_moop: None,
            excluded_from_out_of_network_moop: None,
        }
    }

    pub fn with_covered(mut self, covered: bool) -> Self {
        self.covered = Some(covered);
        self
    }

    pub fn with_ehb(mut self, ehb: bool) -> Self {
        self.ehb = Some(ehb);
        self
    }

    /// Sets the in-network tier 1 copay.
    pub fn with_copay(mut self, copay: CostShare) -> Self {
        self.copay.in_network_tier1 = Some(copay);
        self
    }

    /// Sets the in-network tier 1 coinsurance.
    pub fn with_coinsurance(mut self, coinsurance: CostShare) -> Self {
        self.coinsurance.in_network_tier1 = Some(coinsurance);
        self
    }

    /// Sets the out-of-network coinsurance.
    pub fn with_out_of_network_coinsurance(mut self, coinsurance: CostShare) -> Self {
        self.coinsurance.out_of_network = Some(coinsurance);
        self
    }

    /// Sets a quantity limit of `qty` per `unit`.
    pub fn with_quantity_limit(mut self, qty: f64, unit: impl Into<String>) -> Self {
        self.quantity_limit = Some(true);
        self.limit_qty = Some(qty);
        self.limit_unit = Some(unit.into());
        self
    }

    pub fn with_exclusions(mut self, text: impl Into<String>) -> Self {
        self.exclusions = Some(text.into());
        self
    }

    pub fn with_explanation(mut self, text: impl Into<String>) -> Self {
        self.explanation = Some(text.into());
        self
    }

    pub fn is_covered(&self) -> bool {
        self.covered == Some(true)
    }

    /// Explicitly listed as not covered (as opposed to unknown).
    pub fn is_not_covered(&self) -> bool {
        self.covered == Some(false)
    }

    pub fn is_ehb(&self) -> bool {
        self.ehb == Some(true)
    }

    pub fn has_quantity_limit(&self) -> bool {
        self.quantity_limit == Some(true)
    }

    pub fn in_network_rate(&self) -> Option<f64> {
        self.coinsurance
            .in_network_tier1
            .as_ref()
            .and_then(CostShare::coinsurance_rate)
    }

    pub fn out_of_network_rate(&self) -> Option<f64> {
        self.coinsurance
            .out_of_network
            .as_ref()
            .and_then(CostShare::coinsurance_rate)
    }

    pub fn has_copay(&self) -> bool {
        self.copay
            .in_network_tier1
            .as_ref()
            .is_some_and(CostShare::is_copay)
    }
}

/// A benefit plan: metadata plus benefits keyed by canonical name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    plan_id: String,
    issuer_id: String,
    state_code: String,
    business_year: Option<u16>,
    benefits: BTreeMap<String, PlanBenefit>,
}

impl Plan {
    /// Creates an empty plan.
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            issuer_id: String::new(),
            state_code: String::new(),
            business_year: None,
            benefits: BTreeMap::new(),
        }
    }

    /// Builds a plan from benefit rows.
    ///
    /// Rows whose canonical name repeats an earlier row are dropped with a
    /// warning; the first row wins.
    pub fn from_benefits(
        plan_id: impl Into<String>,
        benefits: impl IntoIterator<Item = PlanBenefit>,
    ) -> Self {
        let mut plan = Self::new(plan_id);
        for benefit in benefits {
            plan.insert_benefit(benefit);
        }
        plan
    }

    pub fn with_issuer(mut self, issuer_id: impl Into<String>, state_code: impl Into<String>) -> Self {
        self.issuer_id = issuer_id.into();
        self.state_code = state_code.into();
        self
    }

    pub fn with_business_year(mut self, year: u16) -> Self {
        self.business_year = Some(year);
        self
    }

    pub fn with_benefit(mut self, benefit: PlanBenefit) -> Self {
        self.insert_benefit(benefit);
        self
    }

    /// Inserts a benefit under its canonical name.
    ///
    /// Returns `false` (and keeps the existing row) if a benefit with the
    /// same canonical name is already present.
    pub fn insert_benefit(&mut self, benefit: PlanBenefit) -> bool {
        let key = canonical_benefit_name(&benefit.benefit_name);
        if self.benefits.contains_key(&key) {
            tracing::warn!(
                plan_id = %self.plan_id,
                benefit = %benefit.benefit_name,
                "duplicate benefit after canonicalization, keeping first row"
            );
            return false;
        }
        self.benefits.insert(key, benefit);
        true
    }

    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    pub fn issuer_id(&self) -> &str {
        &self.issuer_id
    }

    pub fn state_code(&self) -> &str {
        &self.state_code
    }

    pub fn business_year(&self) -> Option<u16> {
        self.business_year
    }

    /// Looks up a benefit by any spelling of its name.
    pub fn benefit(&self, name: &str) -> Option<&PlanBenefit> {
        self.benefits.get(&canonical_benefit_name(name))
    }

    /// Looks up a benefit by an already-canonical key.
    pub(crate) fn benefit_by_key(&self, key: &str) -> Option<&PlanBenefit> {
        self.benefits.get(key)
    }

    /// All benefits in canonical-name order, with their canonical key.
    pub fn benefits(&self) -> impl Iterator<Item = (&str, &PlanBenefit)> {
        self.benefits.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn benefit_count(&self) -> usize {
        self.benefits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benefits.is_empty()
    }

    /// Covered benefits in canonical-name order.
    pub fn covered_benefits(&self) -> impl Iterator<Item = (&str, &PlanBenefit)> {
        self.benefits().filter(|(_, b)| b.is_covered())
    }

    /// Benefits flagged as Essential Health Benefits.
    pub fn ehb_benefits(&self) -> impl Iterator<Item = (&str, &PlanBenefit)> {
        self.benefits().filter(|(_, b)| b.is_ehb())
    }
}
