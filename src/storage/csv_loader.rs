//! Reads the four billing input tables.
//!
//! Every file has a header row. Spaces are removed from header names before
//! fields are mapped, so `Account Name` and `AccountName` are the same column.
//! Rows are first read as raw text and then lexed field by field, so a bad
//! value surfaces as the specific [`BillingError`] for its type, tagged with
//! the file and row it came from.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::core::BillingInputs;
use crate::currency::Amount;
use crate::domain::{
    parse_flag, Address, Business, Customer, ExpenseCycle, InactiveSet, Method, Validate,
};
use crate::errors::{BillingError, Result};
use crate::ledger::{Payment, Period};
use crate::utils::dates;

use super::InputSource;

/// A raw CSV row that can be lexed into a validated record.
pub trait CsvRow: DeserializeOwned {
    type Record;

    fn into_record(self) -> Result<Self::Record>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRow {
    account_name: String,
    user_name: String,
    service_address: String,
    billing_address: String,
    first_period_start: String,
    commercial: String,
}

impl CsvRow for CustomerRow {
    type Record = Customer;

    fn into_record(self) -> Result<Customer> {
        let customer = Customer {
            account_name: self.account_name,
            user_name: self.user_name,
            service_address: Address::new(self.service_address),
            billing_address: Address::new(self.billing_address),
            first_period_start: Period::parse_start(&self.first_period_start)?,
            commercial: parse_flag(&self.commercial)?,
        };
        customer.validate()?;
        Ok(customer)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessRow {
    name: String,
    address: String,
    contact: String,
}

impl CsvRow for BusinessRow {
    type Record = Business;

    fn into_record(self) -> Result<Business> {
        let business = Business {
            name: self.name,
            address: Address::new(self.address),
            contact: self.contact,
        };
        business.validate()?;
        Ok(business)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CycleRow {
    period_start: String,
    operations: String,
    utilities: String,
    insurance: String,
    taxes: String,
    bill_date: String,
    method: String,
    margin: String,
    effective_connections: String,
    #[serde(default)]
    inactive: String,
}

impl CsvRow for CycleRow {
    type Record = ExpenseCycle;

    fn into_record(self) -> Result<ExpenseCycle> {
        let margin: f64 = self.margin.trim().parse().map_err(|_| {
            BillingError::InvalidExpense(format!("margin is not a number: {:?}", self.margin))
        })?;
        let effective_connections: usize =
            self.effective_connections.trim().parse().map_err(|_| {
                BillingError::InvalidExpense(format!(
                    "effective connections is not a whole number: {:?}",
                    self.effective_connections
                ))
            })?;
        let cycle = ExpenseCycle {
            period: Period::parse_start(&self.period_start)?,
            operations: Amount::parse(&self.operations)?,
            utilities: Amount::parse(&self.utilities)?,
            insurance: Amount::parse(&self.insurance)?,
            taxes: Amount::parse(&self.taxes)?,
            bill_date: dates::parse_checked_date(&self.bill_date)?,
            method: self.method.parse::<Method>()?,
            margin,
            effective_connections,
            inactive: InactiveSet::parse(&self.inactive),
        };
        cycle.validate()?;
        Ok(cycle)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentRow {
    date: String,
    account_name: String,
    amount: String,
    #[serde(default)]
    comments: String,
}

impl CsvRow for PaymentRow {
    type Record = Payment;

    fn into_record(self) -> Result<Payment> {
        let payment = Payment::new(
            dates::parse_date(&self.date)?,
            self.account_name,
            Amount::parse(&self.amount)?,
        )
        .with_comments(self.comments);
        payment.validate()?;
        Ok(payment)
    }
}

/// Parses every data row of `input`. `name` labels errors.
pub fn read_rows<T: CsvRow, R: Read>(name: &str, input: R) -> Result<Vec<T::Record>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|header| header.replace(' ', ""))
        .collect();
    reader.set_headers(headers);

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<T>().enumerate() {
        let row_number = idx + 1;
        let record = row
            .map_err(BillingError::from)
            .and_then(T::into_record)
            .map_err(|err| err.in_row(name, row_number))?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(BillingError::InvalidInput(format!("{name}: no data rows")));
    }
    debug!(file = name, rows = records.len(), "loaded rows");
    Ok(records)
}

/// Opens `path` and parses it with [`read_rows`].
pub fn read_file<T: CsvRow>(path: &Path) -> Result<Vec<T::Record>> {
    read_rows::<T, _>(&path.display().to_string(), open(path)?)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| BillingError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the single business row.
pub fn read_business<R: Read>(name: &str, input: R) -> Result<Business> {
    let mut rows = read_rows::<BusinessRow, _>(name, input)?;
    match rows.len() {
        1 => Ok(rows.remove(0)),
        n => Err(BillingError::MissingBusiness(n)),
    }
}

/// The on-disk location of each input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvInputs {
    pub customers: PathBuf,
    pub business: PathBuf,
    pub cycles: PathBuf,
    pub payments: PathBuf,
}

impl InputSource for CsvInputs {
    fn load(&self) -> Result<BillingInputs> {
        let customers = read_file::<CustomerRow>(&self.customers)?;
        let business = read_business(
            &self.business.display().to_string(),
            open(&self.business)?,
        )?;
        let cycles = read_file::<CycleRow>(&self.cycles)?;
        let payments = read_file::<PaymentRow>(&self.payments)?;
        Ok(BillingInputs {
            customers,
            business,
            cycles,
            payments,
        })
    }
}
