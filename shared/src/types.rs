//! Common identity types
//!
//! Authentication itself lives upstream (API gateway); the server only
//! consumes the caller's identity and role.

use serde::{Deserialize, Serialize};

/// Caller role as asserted by the upstream gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A shop customer; may only touch their own resources
    Customer,
    /// Back-office staff; may progress any order through fulfilment
    Staff,
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "staff" | "admin" => Ok(Role::Staff),
            _ => Err(()),
        }
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn customer(id: i64) -> Self {
        Self {
            id,
            role: Role::Customer,
        }
    }

    pub fn staff(id: i64) -> Self {
        Self {
            id,
            role: Role::Staff,
        }
    }

    /// Role check consumed by forward status progression
    pub fn is_elevated(&self) -> bool {
        matches!(self.role, Role::Staff)
    }

    /// Ownership check consumed by read/cancel paths
    pub fn owns(&self, customer_id: i64) -> bool {
        self.id == customer_id
    }
}
