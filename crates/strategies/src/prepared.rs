//! `prepared` strategy: named statements, planned once per session
//!
//! Statements are prepared on first use and cached in the session, so
//! steady-state invocations only bind and execute. SQL lives in `'static`
//! literals because the statement cache is keyed by the query text.

use crate::client::PgSession;
use crate::{groups, meta};
use ormbench_core::{BenchResult, CaseFuture, Catalog};
use std::sync::Arc;

const LABEL: &str = "prepared";

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
        let statement = s.prepared(r#"select * from "customers""#).await?;
        s.client().await?.query(&statement, &[]).await?;
        Ok(())
    })
}

fn customers_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(r#"select * from "customers" where "customers"."id" = $1"#)
            .await?;
        let client = s.client().await?;
        for id in meta::CUSTOMER_IDS {
            client.query(&statement, &[id]).await?;
        }
        Ok(())
    })
}

fn customers_search(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(r#"select * from "customers" where "customers"."company_name" ilike $1"#)
            .await?;
        let client = s.client().await?;
        for term in meta::CUSTOMER_SEARCHES {
            let pattern = format!("%{term}%");
            client.query(&statement, &[&pattern]).await?;
        }
        Ok(())
    })
}

fn employees_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s.prepared(r#"select * from "employees""#).await?;
        s.client().await?.query(&statement, &[]).await?;
        Ok(())
    })
}

fn employees_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(
                r#"select "e1".*, "e2"."last_name" as "reports_lname", "e2"."first_name" as "reports_fname"
                   from "employees" as "e1"
                   left join "employees" as "e2" on "e2"."id" = "e1"."recipient_id"
                   where "e1"."id" = $1"#,
            )
            .await?;
        let client = s.client().await?;
        for id in meta::EMPLOYEE_IDS {
            let id: i32 = id.parse()?;
            client.query(&statement, &[&id]).await?;
        }
        Ok(())
    })
}

fn suppliers_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s.prepared(r#"select * from "suppliers""#).await?;
        s.client().await?.query(&statement, &[]).await?;
        Ok(())
    })
}

fn suppliers_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(r#"select * from "suppliers" where "suppliers"."id" = $1"#)
            .await?;
        let client = s.client().await?;
        for id in meta::SUPPLIER_IDS {
            let id: i32 = id.parse()?;
            client.query(&statement, &[&id]).await?;
        }
        Ok(())
    })
}

fn products_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s.prepared(r#"select * from "products""#).await?;
        s.client().await?.query(&statement, &[]).await?;
        Ok(())
    })
}

fn products_by_id(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(
                r#"select "products".*, "suppliers".*
                   from "products"
                   left join "suppliers" on "products"."supplier_id" = "suppliers"."id"
                   where "products"."id" = $1"#,
            )
            .await?;
        let client = s.client().await?;
        for id in meta::PRODUCT_IDS {
            let id: i32 = id.parse()?;
            client.query(&statement, &[&id]).await?;
        }
        Ok(())
    })
}

fn products_search(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(r#"select * from "products" where "products"."name" ilike $1"#)
            .await?;
        let client = s.client().await?;
        for term in meta::PRODUCT_SEARCHES {
            let pattern = format!("%{term}%");
            client.query(&statement, &[&pattern]).await?;
        }
        Ok(())
    })
}

fn orders_all(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(
                r#"select "id", "shipped_date", "ship_name", "ship_city", "ship_country",
                       count("product_id") as "products", sum("quantity") as "quantity",
                       sum("quantity" * "unit_price") as "total_price"
                   from "orders" as "o"
                   left join "order_details" as "od" on "od"."order_id" = "o"."id"
                   group by "o"."id" order by "o"."id" asc"#,
            )
            .await?;
        s.client().await?.query(&statement, &[]).await?;
        Ok(())
    })
}

fn orders_paginated(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(
                r#"select "id", "shipped_date", "ship_name", "ship_city", "ship_country",
                       count("product_id") as "products", sum("quantity") as "quantity",
                       sum("quantity" * "unit_price") as "total_price"
                   from "orders" as "o"
                   left join "order_details" as "od" on "od"."order_id" = "o"."id"
                   group by "o"."id" order by "o"."id" asc
                   limit $1 offset $2"#,
            )
            .await?;
        let client = s.client().await?;
        let mut offset = 0i64;
        loop {
            let rows = client.query(&statement, &[&meta::PAGE_SIZE, &offset]).await?;
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
        let statement = s
            .prepared(
                r#"select "id", "shipped_date", "ship_name", "ship_city", "ship_country",
                       count("product_id") as "products", sum("quantity") as "quantity",
                       sum("quantity" * "unit_price") as "total_price"
                   from "orders" as "o"
                   left join "order_details" as "od" on "od"."order_id" = "o"."id"
                   where "o"."id" = $1
                   group by "o"."id" order by "o"."id" asc"#,
            )
            .await?;
        let client = s.client().await?;
        for id in meta::ORDER_IDS {
            let id: i32 = id.parse()?;
            client.query(&statement, &[&id]).await?;
        }
        Ok(())
    })
}

fn order_details_by_order(s: Arc<PgSession>) -> CaseFuture {
    Box::pin(async move {
        let statement = s
            .prepared(
                r#"select * from "orders" as "o"
                   left join "order_details" as "od" on "o"."id" = "od"."order_id"
                   left join "products" as "p" on "od"."product_id" = "p"."id"
                   where "o"."id" = $1"#,
            )
            .await?;
        let client = s.client().await?;
        for id in meta::ORDER_IDS {
            let id: i32 = id.parse()?;
            client.query(&statement, &[&id]).await?;
        }
        Ok(())
    })
}
