#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const CUSTOMERS: &str = "\
Account Name,User Name,Service Address,Billing Address,First Period Start,Commercial
School,Caspar School,1 School Rd; Caspar CA 95420,PO Box 1; Caspar CA 95420,10/1/1914,TRUE
House2,Miller,2 Main St; Caspar CA 95420,2 Main St; Caspar CA 95420,10/1/1914,FALSE
House3,Sawyer,3 Main St; Caspar CA 95420,3 Main St; Caspar CA 95420,10/1/1914,FALSE
House4,Vacant,4 Main St; Caspar CA 95420,4 Main St; Caspar CA 95420,10/1/1914,FALSE
";

pub const BUSINESS: &str = "\
Name,Address,Contact
Caspar Water,PO Box 9; Caspar CA 95420,billing@caspar.example
";

pub const CYCLES: &str = "\
Period Start,Operations,Utilities,Insurance,Taxes,Bill Date,Method,Margin,Effective Connections,Inactive
10/1/1914,$300.00,$300.00,$600.00,$600.00,5/1/1915,Introductory,0.0,3,House4
4/1/1915,$300.00,$300.00,$0.00,$0.00,10/15/1915,Introductory,0.0,3,House4
10/1/1915,$300.00,$300.00,$600.00,$600.00,4/16/1916,Normal,0.0,4,House4
4/1/1916,$300.00,$300.00,$0.00,$0.00,10/10/1916,Normal,0.1,4,House4
";

pub const PAYMENTS: &str = "\
Date,Account Name,Amount,Comments
6/1/1915,School,$400.00,
6/1/1915,House2,$400.00,
6/1/1915,House3,$200.00,partial
12/1/1915,School,$400.00,
12/1/1915,House2,$400.00,
12/1/1915,House3,$600.00,
5/1/1916,School,$600.00,
5/1/1916,House2,$300.00,
5/1/1916,House3,$300.00,
";

/// Total due per cycle for School, House2, House3, House4.
pub const EXPECTED_TOTAL_DUE: [[&str; 4]; 4] = [
    ["$400.00", "$400.00", "$400.00", "$0.00"],
    ["$400.00", "$400.00", "$600.00", "$0.00"],
    ["$600.00", "$300.00", "$300.00", "$0.00"],
    ["$660.00", "$330.00", "$330.00", "$0.00"],
];

/// A temporary directory holding the four input tables under their default names.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        };
        fixture.write("users.csv", CUSTOMERS);
        fixture.write("business.csv", BUSINESS);
        fixture.write("cycles.csv", CYCLES);
        fixture.write("payments.csv", PAYMENTS);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }
}
