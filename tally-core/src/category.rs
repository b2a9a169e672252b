//! Deterministic transaction-type rules.
//!
//! An ordered list of (pattern, category) pairs evaluated top to bottom over the
//! lowercased description; the first hit wins. Patterns overlap on purpose, so the
//! order of [`RULES`] is part of the contract: the specific cheque rules sit above
//! the generic `cheque` one, `24x7 pay` above `24x7 bill`, and so on.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Closed vocabulary of transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    // Cheques
    #[serde(rename = "cheque deposit")]
    ChequeDeposit,
    #[serde(rename = "cheque returned")]
    ChequeReturned,
    #[serde(rename = "cheque returned fee")]
    ChequeReturnedFee,
    #[serde(rename = "cheque payment")]
    ChequePayment,
    // Transfers
    #[serde(rename = "account transfer")]
    AccountTransfer,
    #[serde(rename = "internal transfer")]
    InternalTransfer,
    #[serde(rename = "incoming sct transfer")]
    IncomingSctTransfer,
    #[serde(rename = "outgoing sct transfer")]
    OutgoingSctTransfer,
    #[serde(rename = "instant payment in")]
    InstantPaymentIn,
    #[serde(rename = "instant payment")]
    InstantPayment,
    // Fees & charges
    #[serde(rename = "bank fee")]
    BankFee,
    #[serde(rename = "bank charge")]
    BankCharge,
    #[serde(rename = "administration fee")]
    AdministrationFee,
    #[serde(rename = "standing instruction charge")]
    StandingInstructionCharge,
    #[serde(rename = "standing instruction")]
    StandingInstruction,
    // Employment
    Salary,
    #[serde(rename = "employment payment")]
    EmploymentPayment,
    #[serde(rename = "stipend/salary")]
    Stipend,
    // Loans
    #[serde(rename = "loan principal repayment")]
    LoanPrincipalRepayment,
    #[serde(rename = "loan interest repayment")]
    LoanInterestRepayment,
    Loan,
    // Tax & government
    #[serde(rename = "tax payment")]
    TaxPayment,
    #[serde(rename = "vat payment")]
    VatPayment,
    #[serde(rename = "customs payment")]
    CustomsPayment,
    #[serde(rename = "government payment")]
    GovernmentPayment,
    // ATM
    #[serde(rename = "atm cash deposit")]
    AtmCashDeposit,
    // 24x7 rails
    #[serde(rename = "third party payment")]
    ThirdPartyPayment,
    #[serde(rename = "bill payment")]
    BillPayment,
    #[serde(rename = "mobile payment")]
    MobilePayment,
    #[serde(rename = "direct debit out")]
    DirectDebitOut,
    #[serde(rename = "insurance payment")]
    InsurancePayment,
    // Retail / hospitality
    #[serde(rename = "hotel payment")]
    HotelPayment,
    #[serde(rename = "catering payment")]
    CateringPayment,
    #[serde(rename = "food & retail")]
    FoodAndRetail,
    #[serde(rename = "retail payment")]
    RetailPayment,
    #[serde(rename = "utility payment")]
    UtilityPayment,
    // Generic
    Refund,
    Deposit,
    Withdrawal,
    Other,
}

/// Rule chain, most specific first.
const RULES: &[(&str, Category)] = &[
    // Cheques
    (r"cheque.*deposit", Category::ChequeDeposit),
    (r"cheques returned", Category::ChequeReturned),
    (r"cheque.*returned", Category::ChequeReturnedFee),
    (r"cheque", Category::ChequePayment),
    // Transfers
    (r"account to account", Category::AccountTransfer),
    (r"transfer between own accounts", Category::InternalTransfer),
    (r"sct inwards", Category::IncomingSctTransfer),
    (r"sct outwards", Category::OutgoingSctTransfer),
    (r"instant payments inwards", Category::InstantPaymentIn),
    (r"instant payment", Category::InstantPayment),
    // Fees & charges
    (r"fee", Category::BankFee),
    (r"charge", Category::BankCharge),
    (r"administration fee", Category::AdministrationFee),
    (r"standing instruction charge", Category::StandingInstructionCharge),
    (r"standing instruction", Category::StandingInstruction),
    // Employment
    (r"salary", Category::Salary),
    (r"employment", Category::EmploymentPayment),
    (r"stipendio|stipend", Category::Stipend),
    // Loans
    (r"repayment.*principal", Category::LoanPrincipalRepayment),
    (r"repayment.*interest", Category::LoanInterestRepayment),
    (r"loan", Category::Loan),
    // Tax & government
    (r"tax", Category::TaxPayment),
    (r"vat", Category::VatPayment),
    (r"customs", Category::CustomsPayment),
    (r"government|gov", Category::GovernmentPayment),
    // ATM
    (r"atm.*cash.*deposit", Category::AtmCashDeposit),
    // 24x7 rails
    (r"24x7 pay", Category::ThirdPartyPayment),
    (r"24x7 bill", Category::BillPayment),
    (r"24x7 mobile pay", Category::MobilePayment),
    // Direct debits
    (r"sdd outwards", Category::DirectDebitOut),
    // Insurance
    (r"mapfre|msv life|insurance", Category::InsurancePayment),
    // Retail / hospitality
    (r"hotel", Category::HotelPayment),
    (r"catering", Category::CateringPayment),
    (r"butcher|food|supermarket|restaurant|eat", Category::FoodAndRetail),
    (r"retail", Category::RetailPayment),
    // Utilities
    (r"electricity|water|gas|utility", Category::UtilityPayment),
    // Generic
    (r"refund", Category::Refund),
    (r"deposit", Category::Deposit),
    (r"withdrawal", Category::Withdrawal),
];

impl Category {
    /// Every category, in rule order, `Other` last.
    pub const ALL: [Category; 40] = [
        Category::ChequeDeposit,
        Category::ChequeReturned,
        Category::ChequeReturnedFee,
        Category::ChequePayment,
        Category::AccountTransfer,
        Category::InternalTransfer,
        Category::IncomingSctTransfer,
        Category::OutgoingSctTransfer,
        Category::InstantPaymentIn,
        Category::InstantPayment,
        Category::BankFee,
        Category::BankCharge,
        Category::AdministrationFee,
        Category::StandingInstructionCharge,
        Category::StandingInstruction,
        Category::Salary,
        Category::EmploymentPayment,
        Category::Stipend,
        Category::LoanPrincipalRepayment,
        Category::LoanInterestRepayment,
        Category::Loan,
        Category::TaxPayment,
        Category::VatPayment,
        Category::CustomsPayment,
        Category::GovernmentPayment,
        Category::AtmCashDeposit,
        Category::ThirdPartyPayment,
        Category::BillPayment,
        Category::MobilePayment,
        Category::DirectDebitOut,
        Category::InsurancePayment,
        Category::HotelPayment,
        Category::CateringPayment,
        Category::FoodAndRetail,
        Category::RetailPayment,
        Category::UtilityPayment,
        Category::Refund,
        Category::Deposit,
        Category::Withdrawal,
        Category::Other,
    ];

    /// Lowercase label as it appears before output capitalization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ChequeDeposit => "cheque deposit",
            Category::ChequeReturned => "cheque returned",
            Category::ChequeReturnedFee => "cheque returned fee",
            Category::ChequePayment => "cheque payment",
            Category::AccountTransfer => "account transfer",
            Category::InternalTransfer => "internal transfer",
            Category::IncomingSctTransfer => "incoming sct transfer",
            Category::OutgoingSctTransfer => "outgoing sct transfer",
            Category::InstantPaymentIn => "instant payment in",
            Category::InstantPayment => "instant payment",
            Category::BankFee => "bank fee",
            Category::BankCharge => "bank charge",
            Category::AdministrationFee => "administration fee",
            Category::StandingInstructionCharge => "standing instruction charge",
            Category::StandingInstruction => "standing instruction",
            Category::Salary => "salary",
            Category::EmploymentPayment => "employment payment",
            Category::Stipend => "stipend/salary",
            Category::LoanPrincipalRepayment => "loan principal repayment",
            Category::LoanInterestRepayment => "loan interest repayment",
            Category::Loan => "loan",
            Category::TaxPayment => "tax payment",
            Category::VatPayment => "vat payment",
            Category::CustomsPayment => "customs payment",
            Category::GovernmentPayment => "government payment",
            Category::AtmCashDeposit => "atm cash deposit",
            Category::ThirdPartyPayment => "third party payment",
            Category::BillPayment => "bill payment",
            Category::MobilePayment => "mobile payment",
            Category::DirectDebitOut => "direct debit out",
            Category::InsurancePayment => "insurance payment",
            Category::HotelPayment => "hotel payment",
            Category::CateringPayment => "catering payment",
            Category::FoodAndRetail => "food & retail",
            Category::RetailPayment => "retail payment",
            Category::UtilityPayment => "utility payment",
            Category::Refund => "refund",
            Category::Deposit => "deposit",
            Category::Withdrawal => "withdrawal",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compiled_rules() -> &'static [(Regex, Category)] {
    static RULES_RE: OnceLock<Vec<(Regex, Category)>> = OnceLock::new();
    RULES_RE.get_or_init(|| {
        RULES
            .iter()
            .map(|(pattern, category)| {
                (Regex::new(pattern).expect("category rule regex"), *category)
            })
            .collect()
    })
}

/// Classify a transaction description. Unmatched text falls back to [`Category::Other`].
pub fn classify(description: &str) -> Category {
    let desc = description.to_lowercase();
    if desc.is_empty() {
        return Category::Other;
    }

    compiled_rules()
        .iter()
        .find(|(re, _)| re.is_match(&desc))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}
