//! `extended` strategy: binary protocol with bind parameters
//!
//! Each invocation goes through unnamed prepare/bind/execute, so the server
//! plans the statement every time but values travel out-of-band. Integer keys
//! are parsed from the shared input lists before binding so the parameter
//! types line up with the column types.

use crate::client::PgSession;
use crate::{groups, meta};
use ormbench_core::{BenchResult, CaseFuture, Catalog};
use std::sync::Arc;

const LABEL: &str = "extended";

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
            .query(r#"select * from "customers""#, &[])
            .await?;
        Ok(())
    })
}

fn customers_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::CUSTOMER_IDS {
            client
                .query(
                    r#"select * from "customers" where "customers"."id" = $1"#,
                    &[id],
                )
                .await?;
        }
        Ok(())
    })
}

fn customers_search(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for term in meta::CUSTOMER_SEARCHES {
            let pattern = format!("%{term}%");
            client
                .query(
                    r#"select * from "customers" where "customers"."company_name" ilike $1"#,
                    &[&pattern],
                )
                .await?;
        }
        Ok(())
    })
}

fn employees_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .query(r#"select * from "employees""#, &[])
            .await?;
        Ok(())
    })
}

fn employees_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::EMPLOYEE_IDS {
            let id: i32 = id.parse()?;
            client
                .query(
                    r#"select "e1".*, "e2"."last_name" as "reports_lname", "e2"."first_name" as "reports_fname"
                       from "employees" as "e1"
                       left join "employees" as "e2" on "e2"."id" = "e1"."recipient_id"
                       where "e1"."id" = $1"#,
                    &[&id],
                )
                .await?;
        }
        Ok(())
    })
}

fn suppliers_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .query(r#"select * from "suppliers""#, &[])
            .await?;
        Ok(())
    })
}

fn suppliers_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::SUPPLIER_IDS {
            let id: i32 = id.parse()?;
            client
                .query(
                    r#"select * from "suppliers" where "suppliers"."id" = $1"#,
                    &[&id],
                )
                .await?;
        }
        Ok(())
    })
}

fn products_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        s.client()
            .await?
            .query(r#"select * from "products""#, &[])
            .await?;
        Ok(())
    })
}

fn products_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::PRODUCT_IDS {
            let id: i32 = id.parse()?;
            client
                .query(
                    r#"select "products".*, "suppliers".*
                       from "products"
                       left join "suppliers" on "products"."supplier_id" = "suppliers"."id"
                       where "products"."id" = $1"#,
                    &[&id],
                )
                .await?;
        }
        Ok(())
    })
}

fn products_search(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for term in meta::PRODUCT_SEARCHES {
            let pattern = format!("%{term}%");
            client
                .query(
                    r#"select * from "products" where "products"."name" ilike $1"#,
                    &[&pattern],
                )
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
            .query(
                &format!(r#"{ORDERS_AGGREGATE} group by "o"."id" order by "o"."id" asc"#),
                &[],
            )
            .await?;
        Ok(())
    })
}

fn orders_paginated(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        let sql = format!(
            r#"{ORDERS_AGGREGATE} group by "o"."id" order by "o"."id" asc
               limit $1 offset $2"#
        );
        let mut offset = 0i64;
        loop {
            let rows = client.query(&sql, &[&meta::PAGE_SIZE, &offset]).await?;
            if (rows.len() as i64) < meta::PAGE_SIZE {
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
        let sql = format!(
            r#"{ORDERS_AGGREGATE} where "o"."id" = $1
               group by "o"."id" order by "o"."id" asc"#
        );
        for id in meta::ORDER_IDS {
            let id: i32 = id.parse()?;
            client.query(&sql, &[&id]).await?;
        }
        Ok(())
    })
}

fn order_details_by_order(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let client = s.client().await?;
        for id in meta::ORDER_IDS {
            let id: i32 = id.parse()?;
            client
                .query(
                    r#"select * from "orders" as "o"
                       left join "order_details" as "od" on "o"."id" = "od"."order_id"
                       left join "products" as "p" on "od"."product_id" = "p"."id"
                       where "o"."id" = $1"#,
                    &[&id],
                )
                .await?;
        }
        Ok(())
    })
}
