//! Fixed lookup inputs for point-lookup and search cases
//!
//! These must stay in sync with `data/init-db.sql`: every id here exists in
//! the fixture, and every search term matches at least one row, so a case
//! exercises real result decoding rather than empty responses.

pub const CUSTOMER_IDS: &[&str] = &["ALFKI", "ANATR", "ANTON", "AROUT", "BERGS"];

pub const EMPLOYEE_IDS: &[&str] = &["1", "3", "5", "8"];

pub const SUPPLIER_IDS: &[&str] = &["1", "2", "3"];

pub const PRODUCT_IDS: &[&str] = &["1", "4", "7", "10"];

pub const ORDER_IDS: &[&str] = &["10248", "10251", "10255"];

/// Substrings matched against `customers.company_name` (case-insensitive).
pub const CUSTOMER_SEARCHES: &[&str] = &["ve", "ha", "bl", "ko"];

/// Substrings matched against `products.name` (case-insensitive).
pub const PRODUCT_SEARCHES: &[&str] = &["cha", "an", "sy", "ea"];

/// Page size for the offset-pagination cases.
pub const PAGE_SIZE: i64 = 50;
