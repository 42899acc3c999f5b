use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Accounts,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accounts => "accounts",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    /// Lenient parse for values coming off the wire. Anything outside the
    /// closed set is `None`, which every policy treats as "no permissions".
    pub fn parse(value: &str) -> Option<Role> {
        value.trim().parse().ok()
    }

    /// Admin and accounts staff may edit records and back/forward-date.
    pub fn is_office_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Accounts)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "accounts" => Ok(Role::Accounts),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRef {
    pub id: String,
    pub teacher_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Fee,
    Salary,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Paid,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub status: TransactionStatus,
    /// Student (or guardian) paying a fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
    /// Employee receiving a salary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<String>,
}

impl Transaction {
    pub fn is(&self, kind: TransactionKind, status: TransactionStatus) -> bool {
        self.kind == kind && self.status == status
    }
}

/// Type selector used by the payments table. `All` is the UI's "all" sentinel;
/// `Unknown` keeps an unrecognised selector from matching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Kind(TransactionKind),
    Unknown,
}

impl TypeFilter {
    pub fn parse(value: &str) -> TypeFilter {
        let t = value.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("all") {
            return TypeFilter::All;
        }
        match t.to_ascii_lowercase().as_str() {
            "fee" => TypeFilter::Kind(TransactionKind::Fee),
            "salary" => TypeFilter::Kind(TransactionKind::Salary),
            "expense" => TypeFilter::Kind(TransactionKind::Expense),
            _ => TypeFilter::Unknown,
        }
    }

    pub fn matches(self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Kind(k) => k == kind,
            TypeFilter::Unknown => false,
        }
    }
}
