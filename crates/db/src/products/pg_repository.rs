use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::products::models::{
    NewProduct, Product, ProductFilter, ProductPatch, ProductUpsert, UpsertOutcome,
};
use crate::products::repositories::{ProductRepository, ProductUpsertRepository};
use catalog_common::error::{CatalogError, CatalogResult};
use catalog_common::types::Page;

const PRODUCT_COLUMNS: &str = "id, contentful_id, sku, name, category, brand, model, color, \
     currency, price, stock, source_created_at, source_updated_at, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: PgRow) -> Product {
        Product {
            id: row.get("id"),
            contentful_id: row.get("contentful_id"),
            sku: row.get("sku"),
            name: row.get("name"),
            category: row.get("category"),
            brand: row.get("brand"),
            model: row.get("model"),
            color: row.get("color"),
            currency: row.get("currency"),
            price: row.get("price"),
            stock: row.get("stock"),
            source_created_at: row.get("source_created_at"),
            source_updated_at: row.get("source_updated_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
        if let Some(name) = &filter.name {
            // Matches the trigram index expression on immutable_unaccent(name).
            qb.push(" and immutable_unaccent(name) ilike immutable_unaccent(")
                .push_bind(format!("%{}%", escape_like(name)))
                .push(")");
        }

        let text_columns = [
            ("category", &filter.category),
            ("brand", &filter.brand),
            ("model", &filter.model),
            ("color", &filter.color),
            ("currency", &filter.currency),
            ("sku", &filter.sku),
        ];
        for (column, value) in text_columns {
            if let Some(value) = value {
                qb.push(format!(" and lower(immutable_unaccent({column})) = lower(immutable_unaccent("))
                    .push_bind(value.clone())
                    .push("))");
            }
        }

        if let Some(price) = filter.price {
            qb.push(" and price = ").push_bind(price);
        }
        if let Some(min) = filter.price_min {
            qb.push(" and price >= ").push_bind(min);
        }
        if let Some(max) = filter.price_max {
            qb.push(" and price <= ").push_bind(max);
        }
        if let Some(stock) = filter.stock {
            qb.push(" and stock = ").push_bind(stock);
        }
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_write_error(e: sqlx::Error) -> CatalogError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            CatalogError::Conflict("a product with the same contentful_id or sku already exists".into())
        }
        _ => CatalogError::Database(e.to_string()),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn search(&self, filter: &ProductFilter) -> CatalogResult<Page<Product>> {
        let limit = filter.effective_limit();
        let offset = filter.effective_offset();

        let mut count_qb =
            QueryBuilder::new("select count(*) from products where deleted_at is null");
        Self::push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut qb = QueryBuilder::new(format!(
            "select {PRODUCT_COLUMNS} from products where deleted_at is null"
        ));
        Self::push_filters(&mut qb, filter);
        qb.push(" order by created_at desc");
        qb.push(" limit ").push_bind(limit);
        qb.push(" offset ").push_bind(offset);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(Page {
            offset,
            limit,
            total,
            data: rows.into_iter().map(Self::map_row).collect(),
        })
    }

    async fn get_active(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "select {PRODUCT_COLUMNS} from products where id = $1 and deleted_at is null"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(row.map(Self::map_row))
    }

    async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
        let row = sqlx::query(&format!(
            "insert into products
             (contentful_id, sku, name, category, brand, model, color, currency, price, stock)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             returning {PRODUCT_COLUMNS}"
        ))
        .bind(&product.contentful_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.color)
        .bind(&product.currency)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(Self::map_row(row))
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> CatalogResult<Product> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let current = sqlx::query(&format!(
            "select {PRODUCT_COLUMNS} from products
             where id = $1 and deleted_at is null
             for update"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?
        .map(Self::map_row)
        .ok_or_else(|| CatalogError::NotFound(format!("product not found: {id}")))?;

        if patch.is_empty() {
            tx.commit()
                .await
                .map_err(|e| CatalogError::Database(e.to_string()))?;
            return Ok(current);
        }

        let merged = patch.apply_to(&current);
        let row = sqlx::query(&format!(
            "update products
             set sku = $2, name = $3, category = $4, brand = $5, model = $6, color = $7,
                 currency = $8, price = $9, stock = $10, updated_at = now()
             where id = $1 and deleted_at is null
             returning {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&merged.sku)
        .bind(&merged.name)
        .bind(&merged.category)
        .bind(&merged.brand)
        .bind(&merged.model)
        .bind(&merged.color)
        .bind(&merged.currency)
        .bind(merged.price)
        .bind(merged.stock)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit()
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(Self::map_row(row))
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<()> {
        let result = sqlx::query(
            "update products set deleted_at = now(), updated_at = now()
             where id = $1 and deleted_at is null",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("product not found: {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductUpsertRepository for PgProductRepository {
    async fn upsert_from_source(&self, record: &ProductUpsert) -> CatalogResult<UpsertOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let updated = sqlx::query(
            "update products
             set sku = $2, name = $3, category = $4, brand = $5, model = $6, color = $7,
                 currency = $8, price = $9, stock = $10, source_updated_at = $11, updated_at = now()
             where contentful_id = $1 and deleted_at is null",
        )
        .bind(&record.contentful_id)
        .bind(&record.sku)
        .bind(&record.name)
        .bind(&record.category)
        .bind(&record.brand)
        .bind(&record.model)
        .bind(&record.color)
        .bind(&record.currency)
        .bind(record.price)
        .bind(record.stock)
        .bind(record.source_updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        let outcome = if updated.rows_affected() > 0 {
            UpsertOutcome::Updated
        } else {
            let inserted = sqlx::query(
                "insert into products
                 (contentful_id, sku, name, category, brand, model, color, currency, price, stock,
                  source_created_at, source_updated_at)
                 values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                 on conflict do nothing",
            )
            .bind(&record.contentful_id)
            .bind(&record.sku)
            .bind(&record.name)
            .bind(&record.category)
            .bind(&record.brand)
            .bind(&record.model)
            .bind(&record.color)
            .bind(&record.currency)
            .bind(record.price)
            .bind(record.stock)
            .bind(record.source_created_at)
            .bind(record.source_updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

            if inserted.rows_affected() > 0 {
                UpsertOutcome::Inserted
            } else {
                UpsertOutcome::Skipped
            }
        };

        tx.commit()
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::debug!(
            contentful_id = %record.contentful_id,
            outcome = outcome.as_str(),
            "product upserted"
        );
        Ok(outcome)
    }
}
