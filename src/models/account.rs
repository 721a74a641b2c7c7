use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountType {
    Depository,
    Credit,
    Loan,
    Investment,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Depository => "Depository",
            Self::Credit => "Credit",
            Self::Loan => "Loan",
            Self::Investment => "Investment",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "depository" | "checking" | "savings" => Self::Depository,
            "credit" | "credit card" | "creditcard" => Self::Credit,
            "loan" | "mortgage" => Self::Loan,
            "investment" | "brokerage" => Self::Investment,
            _ => Self::Other,
        }
    }

    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Credit | Self::Loan)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A linked bank account as reported alongside the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    /// Current balance; `None` when the provider did not report one.
    pub balance: Option<Decimal>,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type,
            balance: None,
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }
}
