//! `simple` strategy: text protocol, literals inlined
//!
//! Uses `simple_query`, so every invocation ships the full SQL text and gets
//! text-format rows back - the baseline every other strategy is compared
//! against. Inputs come from the fixed lists in [`meta`]; inlining them is
//! safe because they are compile-time constants.

use crate::client::PgSession;
use crate::{groups, meta};
use ormbench_core::{BenchResult, CaseFuture, Catalog};
use std::sync::Arc;
use tokio_postgres::SimpleQueryMessage;

const LABEL: &str = "simple";

type Op = fn(Arc<PgSession>) -> CaseFuture;

fn add(
    catalog: &mut Catalog,
    group: &'static str,
    session: &Arc<PgSession>,
    op: Op,
) -> BenchResult<()> {
    let session = Arc::clone(session);
    catalog.register(group, LABEL, Box::new(move || op(Arc::clone(&session))))
}

pub fn register(catalog: &mut Catalog, session: Arc<PgSession>) -> BenchResult<()> {
    add(catalog, groups::CUSTOMERS_ALL, &session, customers_all)?;
    add(catalog, groups::CUSTOMERS_BY_ID, &session, customers_by_id)?;
    add(catalog, groups::CUSTOMERS_SEARCH, &session, customers_search)?;
    add(catalog, groups::EMPLOYEES_ALL, &session, employees_all)?;
    add(catalog, groups::EMPLOYEES_BY_ID, &session, employees_by_id)?;
    add(catalog, groups::SUPPLIERS_ALL, &session, suppliers_all)?;
    add(catalog, groups::SUPPLIERS_BY_ID, &session, suppliers_by_id)?;
    add(catalog, groups::PRODUCTS_ALL, &session, products_all)?;
    add(catalog, groups::PRODUCTS_BY_ID, &session, products_by_id)?;
    add(catalog, groups::PRODUCTS_SEARCH, &session, products_search)?;
    add(catalog, groups::ORDERS_ALL, &session, orders_all)?;
    add(catalog, groups::ORDERS_PAGINATED, &session, orders_paginated)?;
    add(catalog, groups::ORDERS_BY_ID, &session, orders_by_id)?;
    add(
        catalog,
        groups::ORDER_DETAILS_BY_ORDER,
        &session,
        order_details_by_order,
    )?;
    Ok(())
}

fn customers_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .simple_query(r#"select * from "customers""#)
            .await?;
        Ok(())
    })
}

fn customers_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::CUSTOMER_IDS {
            client
                .simple_query(&format!(
                    r#"select * from "customers" where "customers"."id" = '{id}'"#
                ))
                .await?;
        }
        Ok(())
    })
}

fn customers_search(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for term in meta::CUSTOMER_SEARCHES {
            client
                .simple_query(&format!(
                    r#"select * from "customers" where "customers"."company_name" ilike '%{term}%'"#
                ))
                .await?;
        }
        Ok(())
    })
}

fn employees_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .simple_query(r#"select * from "employees""#)
            .await?;
        Ok(())
    })
}

fn employees_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::EMPLOYEE_IDS {
            client
                .simple_query(&format!(
                    r#"select "e1".*, "e2"."last_name" as "reports_lname", "e2"."first_name" as "reports_fname"
                       from "employees" as "e1"
                       left join "employees" as "e2" on "e2"."id" = "e1"."recipient_id"
                       where "e1"."id" = '{id}'"#
                ))
                .await?;
        }
        Ok(())
    })
}

fn suppliers_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .simple_query(r#"select * from "suppliers""#)
            .await?;
        Ok(())
    })
}

fn suppliers_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::SUPPLIER_IDS {
            client
                .simple_query(&format!(
                    r#"select * from "suppliers" where "suppliers"."id" = '{id}'"#
                ))
                .await?;
        }
        Ok(())
    })
}

fn products_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .simple_query(r#"select * from "products""#)
            .await?;
        Ok(())
    })
}

fn products_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::PRODUCT_IDS {
            client
                .simple_query(&format!(
                    r#"select "products".*, "suppliers".*
                       from "products"
                       left join "suppliers" on "products"."supplier_id" = "suppliers"."id"
                       where "products"."id" = '{id}'"#
                ))
                .await?;
        }
        Ok(())
    })
}

fn products_search(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for term in meta::PRODUCT_SEARCHES {
            client
                .simple_query(&format!(
                    r#"select * from "products" where "products"."name" ilike '%{term}%'"#
                ))
                .await?;
        }
        Ok(())
    })
}

const ORDERS_AGGREGATE: &str = r#"select "id", "shipped_date", "ship_name", "ship_city", "ship_country",
       count("product_id") as "products", sum("quantity") as "quantity",
       sum("quantity" * "unit_price") as "total_price"
  from "orders" as "o"
  left join "order_details" as "od" on "od"."order_id" = "o"."id""#;

fn orders_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .simple_query(&format!(
                r#"{ORDERS_AGGREGATE} group by "o"."id" order by "o"."id" asc"#
            ))
            .await?;
        Ok(())
    })
}

fn orders_paginated(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        let mut offset = 0i64;
        loop {
            let messages = client
                .simple_query(&format!(
                    r#"{ORDERS_AGGREGATE} group by "o"."id" order by "o"."id" asc
                       limit {} offset {offset}"#,
                    meta::PAGE_SIZE
                ))
                .await?;
            let rows = messages
                .iter()
                .filter(|m| matches!(m, SimpleQueryMessage::Row(_)))
                .count() as i64;
            if rows < meta::PAGE_SIZE {
                break;
            }
            offset += meta::PAGE_SIZE;
        }
        Ok(())
    })
}

fn orders_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::ORDER_IDS {
            client
                .simple_query(&format!(
                    r#"{ORDERS_AGGREGATE} where "o"."id" = '{id}'
                       group by "o"."id" order by "o"."id" asc"#
                ))
                .await?;
        }
        Ok(())
    })
}

fn order_details_by_order(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::ORDER_IDS {
            client
                .simple_query(&format!(
                    r#"select * from "orders" as "o"
                       left join "order_details" as "od" on "o"."id" = "od"."order_id"
                       left join "products" as "p" on "od"."product_id" = "p"."id"
                       where "o"."id" = '{id}'"#
                ))
                .await?;
        }
        Ok(())
    })
}
