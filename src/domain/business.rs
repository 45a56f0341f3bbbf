use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::common::{require, Address, Validate};

/// The billing entity printed on every statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    /// Who payments are made out to.
    pub name: String,
    /// Where payments are sent.
    pub address: Address,
    /// How to reach the business about a statement.
    pub contact: String,
}

impl Validate for Business {
    fn validate(&self) -> Result<()> {
        require(&self.name, "business name")?;
        require(&self.address.0, "business address")?;
        require(&self.contact, "business contact")
    }
}
