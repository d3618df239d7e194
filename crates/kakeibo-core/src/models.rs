//! Domain models for Kakeibo

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transaction category, stored as text in the `type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Monthly salary credit (the only income category)
    Salary,
    Food,
    Utilities,
    AtmWithdrawal,
    Entertainment,
    Transport,
    Phone,
    Insurance,
}

impl Category {
    /// Categories the generator draws daily expenses from
    pub const EXPENSES: [Category; 7] = [
        Self::Food,
        Self::Utilities,
        Self::AtmWithdrawal,
        Self::Entertainment,
        Self::Transport,
        Self::Phone,
        Self::Insurance,
    ];

    pub fn all() -> &'static [Category] {
        &[
            Self::Salary,
            Self::Food,
            Self::Utilities,
            Self::AtmWithdrawal,
            Self::Entertainment,
            Self::Transport,
            Self::Phone,
            Self::Insurance,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Food => "food",
            Self::Utilities => "utilities",
            Self::AtmWithdrawal => "atm_withdrawal",
            Self::Entertainment => "entertainment",
            Self::Transport => "transport",
            Self::Phone => "phone",
            Self::Insurance => "insurance",
        }
    }

    /// Human-readable label for tables and prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Food => "Food",
            Self::Utilities => "Utilities",
            Self::AtmWithdrawal => "ATM withdrawal",
            Self::Entertainment => "Entertainment",
            Self::Transport => "Transport",
            Self::Phone => "Phone",
            Self::Insurance => "Insurance",
        }
    }

    /// Canned description written by the generator
    pub fn description(&self) -> &'static str {
        match self {
            Self::Salary => "Salary from employer",
            Self::Food => "Convenience store purchase",
            Self::Utilities => "Electricity bill",
            Self::AtmWithdrawal => "ATM cash withdrawal",
            Self::Entertainment => "Drinks with friends",
            Self::Transport => "Train fare",
            Self::Phone => "Mobile phone bill",
            Self::Insurance => "Insurance premium",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Salary)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "salary" => Ok(Self::Salary),
            "food" => Ok(Self::Food),
            "utilities" => Ok(Self::Utilities),
            "atm_withdrawal" => Ok(Self::AtmWithdrawal),
            "entertainment" => Ok(Self::Entertainment),
            "transport" => Ok(Self::Transport),
            "phone" => Ok(Self::Phone),
            "insurance" => Ok(Self::Insurance),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// A transaction to be inserted (id is assigned by the store)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

/// Who wrote a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in a session's conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_labels() {
        for category in Category::all() {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_expense_categories_exclude_salary() {
        assert_eq!(Category::EXPENSES.len(), 7);
        assert!(!Category::EXPENSES.contains(&Category::Salary));
        assert!(Category::EXPENSES.iter().all(|c| !c.is_income()));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let entry = ConversationEntry::assistant("hi");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
