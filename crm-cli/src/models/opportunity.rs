use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::field::{
    FieldError, format_date, format_number, format_yes_no, parse_date, parse_number, parse_yes_no,
};
use super::remark::RemarkEntry;
use super::{Record, RecordKind, record_id};

/// Pipeline stage of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OppStage {
    #[default]
    Qualification,
    #[serde(rename = "Needs Analysis")]
    NeedsAnalysis,
    #[serde(rename = "Value Proposition")]
    ValueProposition,
    #[serde(rename = "Identify Decision Makers")]
    IdentifyDecisionMakers,
    #[serde(rename = "Proposal/Price Quote")]
    ProposalPriceQuote,
    #[serde(rename = "Negotiation/Review")]
    NegotiationReview,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl OppStage {
    /// Get display label for UI
    pub fn label(&self) -> &'static str {
        match self {
            OppStage::Qualification => "Qualification",
            OppStage::NeedsAnalysis => "Needs Analysis",
            OppStage::ValueProposition => "Value Proposition",
            OppStage::IdentifyDecisionMakers => "Identify Decision Makers",
            OppStage::ProposalPriceQuote => "Proposal/Price Quote",
            OppStage::NegotiationReview => "Negotiation/Review",
            OppStage::ClosedWon => "Closed Won",
            OppStage::ClosedLost => "Closed Lost",
        }
    }

    /// Default win probability in percent
    pub fn probability(&self) -> f64 {
        match self {
            OppStage::Qualification => 10.0,
            OppStage::NeedsAnalysis => 20.0,
            OppStage::ValueProposition => 50.0,
            OppStage::IdentifyDecisionMakers => 60.0,
            OppStage::ProposalPriceQuote => 75.0,
            OppStage::NegotiationReview => 90.0,
            OppStage::ClosedWon => 100.0,
            OppStage::ClosedLost => 0.0,
        }
    }

    /// Get all variants in pipeline order
    pub fn all_variants() -> &'static [OppStage] {
        &[
            OppStage::Qualification,
            OppStage::NeedsAnalysis,
            OppStage::ValueProposition,
            OppStage::IdentifyDecisionMakers,
            OppStage::ProposalPriceQuote,
            OppStage::NegotiationReview,
            OppStage::ClosedWon,
            OppStage::ClosedLost,
        ]
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::all_variants()
            .iter()
            .copied()
            .find(|s| s.label() == trimmed)
    }
}

impl std::fmt::Display for OppStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A qualified deal moving through the stage pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Opportunity {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub account_name: String,
    pub contact_name: String,
    pub contact_number: String,
    pub region: String,
    pub country: String,
    #[serde(rename = "type")]
    pub opp_type: String,
    pub source: String,
    pub next_step: String,
    pub currency: String,
    pub value: f64,
    pub expected_closing_date: Option<NaiveDate>,
    pub stage: OppStage,
    pub probability: f64,
    pub feasibility_status: String,
    pub presales_recommendation: String,
    pub risks: String,
    pub expected_revenue: f64,
    pub campaign_source: String,
    pub sales_owner: String,
    #[serde(rename = "technicalPoC")]
    pub technical_poc: String,
    #[serde(rename = "presalesPoC")]
    pub presales_poc: String,
    pub partner_org: bool,
    pub partner_org_name: String,
    pub partner_contact_name: String,
    pub partner_contact_number: String,
    pub description: String,
    pub remarks_history: Vec<RemarkEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Probability used for imported rows that leave the column blank
const IMPORT_DEFAULT_PROBABILITY: f64 = 10.0;

impl Opportunity {
    /// Bring probability and expected revenue in line with stage and value
    pub fn recompute_derived(&mut self) {
        self.probability = self.stage.probability();
        self.expected_revenue = self.value * (self.probability / 100.0);
    }
}

impl Record for Opportunity {
    const KIND: RecordKind = RecordKind::Opportunities;

    const FIELDS: &'static [&'static str] = &[
        "owner",
        "name",
        "accountName",
        "contactName",
        "contactNumber",
        "region",
        "country",
        "type",
        "source",
        "nextStep",
        "currency",
        "value",
        "expectedClosingDate",
        "stage",
        "probability",
        "feasibilityStatus",
        "presalesRecommendation",
        "risks",
        "expectedRevenue",
        "campaignSource",
        "salesOwner",
        "technicalPoC",
        "presalesPoC",
        "partnerOrg",
        "partnerOrgName",
        "partnerContactName",
        "partnerContactNumber",
        "description",
    ];

    const REQUIRED: &'static [&'static str] = &["name", "accountName"];

    const DERIVED: &'static [&'static str] = &["probability", "expectedRevenue"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn assignee(&self) -> &str {
        &self.sales_owner
    }

    fn field(&self, key: &str) -> Option<String> {
        let value = match key {
            "id" => self.id.clone(),
            "owner" => self.owner.clone(),
            "name" => self.name.clone(),
            "accountName" => self.account_name.clone(),
            "contactName" => self.contact_name.clone(),
            "contactNumber" => self.contact_number.clone(),
            "region" => self.region.clone(),
            "country" => self.country.clone(),
            "type" => self.opp_type.clone(),
            "source" => self.source.clone(),
            "nextStep" => self.next_step.clone(),
            "currency" => self.currency.clone(),
            "value" => format_number(self.value),
            "expectedClosingDate" => format_date(self.expected_closing_date),
            "stage" => self.stage.label().to_string(),
            "probability" => format_number(self.probability),
            "feasibilityStatus" => self.feasibility_status.clone(),
            "presalesRecommendation" => self.presales_recommendation.clone(),
            "risks" => self.risks.clone(),
            "expectedRevenue" => format_number(self.expected_revenue),
            "campaignSource" => self.campaign_source.clone(),
            "salesOwner" => self.sales_owner.clone(),
            "technicalPoC" => self.technical_poc.clone(),
            "presalesPoC" => self.presales_poc.clone(),
            "partnerOrg" => format_yes_no(self.partner_org),
            "partnerOrgName" => self.partner_org_name.clone(),
            "partnerContactName" => self.partner_contact_name.clone(),
            "partnerContactNumber" => self.partner_contact_number.clone(),
            "description" => self.description.clone(),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }

    fn set_field(&mut self, key: &str, raw: &str) -> Result<(), FieldError> {
        let text = raw.to_string();
        match key {
            "id" => return Err(FieldError::ReadOnly { field: key.to_string() }),
            "owner" => self.owner = text,
            "name" => self.name = text,
            "accountName" => self.account_name = text,
            "contactName" => self.contact_name = text,
            "contactNumber" => self.contact_number = text,
            "region" => self.region = text,
            "country" => self.country = text,
            "type" => self.opp_type = text,
            "source" => self.source = text,
            "nextStep" => self.next_step = text,
            "currency" => self.currency = text,
            "value" => self.value = parse_number(key, raw)?,
            "expectedClosingDate" => self.expected_closing_date = parse_date(key, raw)?,
            "stage" if raw.trim().is_empty() => self.stage = OppStage::default(),
            "stage" => {
                self.stage = OppStage::from_label(raw).ok_or_else(|| FieldError::InvalidOption {
                    field: key.to_string(),
                    value: text.clone(),
                })?
            }
            "probability" => self.probability = parse_number(key, raw)?,
            "feasibilityStatus" => self.feasibility_status = text,
            "presalesRecommendation" => self.presales_recommendation = text,
            "risks" => self.risks = text,
            "expectedRevenue" => self.expected_revenue = parse_number(key, raw)?,
            "campaignSource" => self.campaign_source = text,
            "salesOwner" => self.sales_owner = text,
            "technicalPoC" => self.technical_poc = text,
            "presalesPoC" => self.presales_poc = text,
            "partnerOrg" => self.partner_org = parse_yes_no(raw),
            "partnerOrgName" => self.partner_org_name = text,
            "partnerContactName" => self.partner_contact_name = text,
            "partnerContactNumber" => self.partner_contact_number = text,
            "description" => self.description = text,
            other => {
                self.extra.insert(other.to_string(), text);
            }
        }
        Ok(())
    }

    fn remarks_history_mut(&mut self) -> Option<&mut Vec<RemarkEntry>> {
        Some(&mut self.remarks_history)
    }

    fn on_field_changed(&mut self, key: &str) {
        if key == "stage" || key == "value" {
            self.recompute_derived();
        }
    }

    fn on_form_open(&mut self) {
        self.recompute_derived();
    }

    fn create_defaults(user: &str, now: DateTime<Local>) -> Self {
        Self {
            id: record_id(Self::KIND.id_prefix(), &now),
            owner: user.to_string(),
            stage: OppStage::Qualification,
            probability: OppStage::Qualification.probability(),
            currency: "USD".to_string(),
            value: 0.0,
            expected_revenue: 0.0,
            sales_owner: user.to_string(),
            feasibility_status: "Pending".to_string(),
            presales_recommendation: "Proceed".to_string(),
            partner_org: false,
            region: "North America".to_string(),
            opp_type: "RFP".to_string(),
            source: "Advertisement".to_string(),
            ..Default::default()
        }
    }

    fn apply_import_defaults(&mut self, row: &BTreeMap<String, String>, user: &str, now: DateTime<Local>) {
        self.owner = user.to_string();
        self.remarks_history = match row.get("remarks").filter(|r| !r.is_empty()) {
            Some(text) => vec![RemarkEntry::new(text.clone(), user, now)],
            None => Vec::new(),
        };
        let blank = |key: &str| row.get(key).is_none_or(|v| v.trim().is_empty());
        if blank("probability") {
            self.probability = IMPORT_DEFAULT_PROBABILITY;
        }
    }

    fn list_columns() -> &'static [&'static str] {
        &["OpsID", "Ops Name", "Ops Owner", "Region", "Type", "Lead Source", "Stage"]
    }

    fn list_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.owner.clone(),
            self.region.clone(),
            self.opp_type.clone(),
            self.source.clone(),
            self.stage.label().to_string(),
        ]
    }
}
