//! Users and products as exposed over the HTTP API.
//!
//! `New*` types are request bodies; `validate` is called before anything is
//! stored.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorefrontError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StorefrontError::BadRequest("user.name must not be empty".into()));
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(StorefrontError::BadRequest(format!(
                "user.email is not a valid address: {}",
                self.email
            ))),
        }
    }

    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name.trim().to_string(),
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price_cents: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: u64,
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StorefrontError::BadRequest("product.name must not be empty".into()));
        }
        if self.price_cents == 0 {
            return Err(StorefrontError::BadRequest(
                "product.price_cents must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            price_cents: self.price_cents,
        }
    }
}
