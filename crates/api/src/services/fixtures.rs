//! Demo fixture data, seeded on startup when `MERCADO_SEED_FIXTURES=true`.
//!
//! Seeding is a no-op when the catalog already has rows, so restarting
//! with the flag on never duplicates data.

use sqlx::PgPool;

use crate::error::Result;

/// Demo account passwords. Fixture-only; real registrations go through
/// the normal hashing path with user-chosen passwords.
const DEMO_PASSWORD: &str = "mercado-demo-123";

/// Seed the demo dataset: locations, catalog, two accounts and one order.
///
/// # Errors
///
/// Returns `AppError::Database` if any insert fails.
pub async fn seed_demo_data(pool: &PgPool) -> Result<()> {
    let (categories,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM category")
        .fetch_one(pool)
        .await?;
    if categories > 0 {
        tracing::debug!("fixture data already present, skipping seed");
        return Ok(());
    }

    let hash = super::auth::hash_password(DEMO_PASSWORD)?;
    let mut tx = pool.begin().await?;

    // Locations
    sqlx::query("INSERT INTO state (id, name) VALUES (1, 'Minas Gerais'), (2, 'Sao Paulo')")
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "INSERT INTO city (id, name, state_id) VALUES
             (1, 'Uberlandia', 1), (2, 'Sao Paulo', 2), (3, 'Campinas', 2)",
    )
    .execute(&mut *tx)
    .await?;

    // Catalog
    sqlx::query(
        "INSERT INTO category (id, name) VALUES
             (1, 'Informatica'), (2, 'Escritorio'), (3, 'Cama mesa e banho')",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO product (id, name, price) VALUES
             (1, 'Computador', 2000.00),
             (2, 'Impressora', 800.00),
             (3, 'Mouse', 80.00)",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO product_category (product_id, category_id) VALUES
             (1, 1), (2, 1), (2, 2), (3, 1)",
    )
    .execute(&mut *tx)
    .await?;

    // Accounts: one regular customer, one admin
    sqlx::query(
        "INSERT INTO customer (id, name, email, tax_id, kind, password_hash) VALUES
             (1, 'Maria Silva', 'maria@mercado.dev', '36378912377', 1, $1),
             (2, 'Ana Costa', 'admin@mercado.dev', '31628382740', 1, $1)",
    )
    .bind(&hash)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO customer_role (customer_id, role) VALUES (1, 2), (2, 2), (2, 1)",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO customer_phone (customer_id, phone) VALUES
             (1, '27363323'), (1, '93838393'), (2, '99771234')",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO address
             (id, street, number, complement, neighborhood, postal_code, customer_id, city_id)
         VALUES
             (1, 'Rua Flores', '300', 'Apto 303', 'Jardim', '38220834', 1, 1),
             (2, 'Avenida Matos', '105', 'Sala 800', 'Centro', '38777012', 1, 2),
             (3, 'Avenida Floriano', '2106', NULL, 'Centro', '81560220', 2, 2)",
    )
    .execute(&mut *tx)
    .await?;

    // One placed order for the demo customer
    sqlx::query(
        "INSERT INTO customer_order (id, customer_id, address_id) VALUES (1, 1, 1)",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO order_item (order_id, product_id, quantity, unit_price, discount) VALUES
             (1, 1, 1, 2000.00, 0.00),
             (1, 3, 2, 80.00, 0.00)",
    )
    .execute(&mut *tx)
    .await?;

    // Explicit ids above bypass the sequences; move them past the seeds
    for (seq, next) in [
        ("state_id_seq", 3),
        ("city_id_seq", 4),
        ("category_id_seq", 4),
        ("product_id_seq", 4),
        ("customer_id_seq", 3),
        ("address_id_seq", 4),
        ("customer_order_id_seq", 2),
    ] {
        sqlx::query(&format!("SELECT setval('{seq}', {next}, false)"))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!("seeded demo fixture data");
    Ok(())
}
