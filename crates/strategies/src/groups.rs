//! Group labels: one per logical query, shared by every strategy
//!
//! The group names follow the original suite's convention of naming groups
//! after the query shape rather than the code that issues it.

pub const CUSTOMERS_ALL: &str = "select * from customers";
pub const CUSTOMERS_BY_ID: &str = "select * from customers where id = $1";
pub const CUSTOMERS_SEARCH: &str = "select * from customers where company_name ilike $1";
pub const EMPLOYEES_ALL: &str = "select * from employees";
pub const EMPLOYEES_BY_ID: &str = "select * from employees where id = $1 left join reportee";
pub const SUPPLIERS_ALL: &str = "select * from suppliers";
pub const SUPPLIERS_BY_ID: &str = "select * from suppliers where id = $1";
pub const PRODUCTS_ALL: &str = "select * from products";
pub const PRODUCTS_BY_ID: &str = "select * from products left join suppliers where id = $1";
pub const PRODUCTS_SEARCH: &str = "select * from products where name ilike $1";
pub const ORDERS_ALL: &str = "select all orders with sum and count";
pub const ORDERS_PAGINATED: &str = "select orders with sum and count using limit with offset";
pub const ORDERS_BY_ID: &str = "select orders where id = $1 with sum and count";
pub const ORDER_DETAILS_BY_ORDER: &str = "select * from order_details where order_id = $1";

/// Every group, in execution order.
pub const ALL: &[&str] = &[
    CUSTOMERS_ALL,
    CUSTOMERS_BY_ID,
    CUSTOMERS_SEARCH,
    EMPLOYEES_ALL,
    EMPLOYEES_BY_ID,
    SUPPLIERS_ALL,
    SUPPLIERS_BY_ID,
    PRODUCTS_ALL,
    PRODUCTS_BY_ID,
    PRODUCTS_SEARCH,
    ORDERS_ALL,
    ORDERS_PAGINATED,
    ORDERS_BY_ID,
    ORDER_DETAILS_BY_ORDER,
];
