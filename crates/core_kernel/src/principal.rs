//! Authenticated principals and their roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identifiers::UserId;

/// Role granted by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Athlete,
    Coach,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Athlete => "athlete",
            Role::Coach => "coach",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "athlete" | "athletes" => Ok(Role::Athlete),
            "coach" | "coaches" => Ok(Role::Coach),
            "admin" | "admins" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The caller of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Role recorded on authored records (comments, annotations)
    ///
    /// Admin wins over coach, coach over athlete.
    pub fn primary_role(&self) -> Role {
        if self.has_role(Role::Admin) {
            Role::Admin
        } else if self.has_role(Role::Coach) {
            Role::Coach
        } else {
            Role::Athlete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_group_names() {
        assert_eq!("Coaches".parse::<Role>().unwrap(), Role::Coach);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("referee".parse::<Role>().is_err());
    }

    #[test]
    fn test_primary_role_precedence() {
        let user = UserId::new("u1").unwrap();
        let p = Principal::new(user.clone(), vec![Role::Athlete, Role::Coach]);
        assert_eq!(p.primary_role(), Role::Coach);

        let p = Principal::new(user, vec![]);
        assert_eq!(p.primary_role(), Role::Athlete);
        assert!(!p.is_admin());
    }
}
