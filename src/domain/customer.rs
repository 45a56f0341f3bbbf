use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::ledger::Period;

use super::common::{require, Address, Validate};
use super::expense::Method;

/// One water connection and the party responsible for paying for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Internal identifier, unique across the customer list.
    pub account_name: String,
    /// Responsible party as printed on the statement.
    pub user_name: String,
    pub service_address: Address,
    pub billing_address: Address,
    /// First cycle this customer is billed for.
    pub first_period_start: Period,
    /// Commercial connections count twice under the normal billing method.
    pub commercial: bool,
}

impl Customer {
    /// Number of shares this customer consumes when active under `method`.
    pub fn weight(&self, method: Method) -> usize {
        if self.commercial && method == Method::Normal {
            2
        } else {
            1
        }
    }

    /// Whether billing has started for this customer by the period beginning `cycle`.
    pub fn is_billed_in(&self, cycle: &Period) -> bool {
        self.first_period_start.starting() <= cycle.starting()
    }
}

impl Validate for Customer {
    fn validate(&self) -> Result<()> {
        require(&self.account_name, "customer account name")?;
        require(&self.user_name, "user name")?;
        require(&self.service_address.0, "service address")?;
        require(&self.billing_address.0, "billing address")?;
        self.first_period_start.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(commercial: bool) -> Customer {
        Customer {
            account_name: "School".into(),
            user_name: "School".into(),
            service_address: Address::new("1 Road; Caspar, CA 91234"),
            billing_address: Address::new("1 Road; Caspar, CA 91234"),
            first_period_start: Period::parse_start("10/1/2022").unwrap(),
            commercial,
        }
    }

    #[test]
    fn commercial_weight_depends_on_method() {
        assert_eq!(customer(true).weight(Method::Normal), 2);
        assert_eq!(customer(true).weight(Method::Introductory), 1);
        assert_eq!(customer(false).weight(Method::Normal), 1);
    }

    #[test]
    fn billing_starts_with_first_period() {
        let c = customer(false);
        assert!(!c.is_billed_in(&Period::parse_start("4/1/2022").unwrap()));
        assert!(c.is_billed_in(&Period::parse_start("10/1/2022").unwrap()));
        assert!(c.is_billed_in(&Period::parse_start("4/1/2023").unwrap()));
    }

    #[test]
    fn validation_requires_names_and_addresses() {
        assert!(customer(false).validate().is_ok());
        let mut missing = customer(false);
        missing.billing_address = Address::default();
        assert!(missing.validate().is_err());
    }
}
