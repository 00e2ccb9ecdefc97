use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::id;
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Passenger,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Passenger => "passenger",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A user record as the backend stores it, password included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// What the rest of the system gets to see of an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Account {
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

impl Registration {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().chars().count() < 3 {
            return Err(invalid_input_error("name must have at least 3 characters"));
        }

        if !is_valid_email(&self.email) {
            return Err(invalid_input_error("invalid email"));
        }

        if self.password.trim().chars().count() < 6 {
            return Err(invalid_input_error(
                "password must have at least 6 characters",
            ));
        }

        Ok(())
    }

    pub fn into_account(self, id: String) -> Account {
        Account {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            role: self.role,
        }
    }
}

/// `local@domain.tld`: no whitespace, one `@`, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
