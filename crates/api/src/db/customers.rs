//! Customer repository.
//!
//! Queries are written with runtime binding (`query_as`) and map database
//! rows into validated domain types; values that fail domain parsing are
//! surfaced as `DataCorruption` rather than handed to callers raw.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mercado_core::{
    AddressId, CityId, CustomerId, CustomerKind, Email, Role, StateId, TaxId,
};

use super::page::{Page, PageRequest};
use super::RepositoryError;
use crate::models::{Address, City, Customer, NewCustomer};

/// Columns `find_page` may sort by.
pub const SORTABLE: &[&str] = &["id", "name", "email"];

/// A customer row without its dependent collections.
#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    name: String,
    email: String,
    tax_id: String,
    kind: i32,
    picture_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// An address row joined with its city and state.
#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    street: String,
    number: String,
    complement: Option<String>,
    neighborhood: Option<String>,
    postal_code: String,
    city_id: i32,
    city_name: String,
    state_id: i32,
    state_name: String,
}

/// Credential lookup result for login.
pub struct CustomerAuth {
    pub id: CustomerId,
    pub password_hash: Option<String>,
    pub roles: HashSet<Role>,
}

/// Summary row for paginated listings.
#[derive(Debug, serde::Serialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by id, with phones, addresses and roles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `DataCorruption` if stored values fail domain parsing.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, email, tax_id, kind, picture_url, created_at, updated_at
             FROM customer WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Get a customer by email, with phones, addresses and roles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `DataCorruption` if stored values fail domain parsing.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, email, tax_id, kind, picture_url, created_at, updated_at
             FROM customer WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Get the credential hash and role set for a login attempt.
    ///
    /// Returns `None` when no account exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_auth_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<CustomerAuth>, RepositoryError> {
        let row = sqlx::query_as::<_, (i32, Option<String>)>(
            "SELECT id, password_hash FROM customer WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some((id, password_hash)) = row else {
            return Ok(None);
        };

        let id = CustomerId::new(id);
        Ok(Some(CustomerAuth {
            id,
            password_hash,
            roles: self.roles_of(id).await?,
        }))
    }

    /// Insert a customer together with its roles, phones and addresses in
    /// one transaction (parent and dependents are one atomic unit).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the email is taken or an
    /// address references a missing city; `Database` otherwise.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO customer (name, email, tax_id, kind, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(new.tax_id.as_str())
        .bind(new.kind.code())
        .bind(new.password_hash.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::unique_as_conflict(e, "email already registered"))?;

        for role in &new.roles {
            sqlx::query("INSERT INTO customer_role (customer_id, role) VALUES ($1, $2)")
                .bind(id)
                .bind(role.code())
                .execute(&mut *tx)
                .await?;
        }

        for phone in &new.phones {
            sqlx::query("INSERT INTO customer_phone (customer_id, phone) VALUES ($1, $2)")
                .bind(id)
                .bind(phone)
                .execute(&mut *tx)
                .await?;
        }

        for address in &new.addresses {
            sqlx::query(
                "INSERT INTO address
                     (street, number, complement, neighborhood, postal_code, customer_id, city_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&address.street)
            .bind(&address.number)
            .bind(address.complement.as_deref())
            .bind(address.neighborhood.as_deref())
            .bind(&address.postal_code)
            .bind(id)
            .bind(address.city_id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::fk_as_conflict(e, "address references a missing city"))?;
        }

        tx.commit().await?;

        self.get_by_id(CustomerId::new(id))
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption("customer vanished after insert".into()))
    }

    /// Copy the whitelisted mutable fields onto the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist,
    /// `Conflict` if the new email is taken.
    pub async fn update_contact(
        &self,
        id: CustomerId,
        name: &str,
        email: &Email,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE customer SET name = $2, email = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(name)
        .bind(email.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::unique_as_conflict(e, "email already registered"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Store the profile picture URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    pub async fn set_picture_url(
        &self,
        id: CustomerId,
        url: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE customer SET picture_url = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_i32())
                .bind(url)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when order records still
    /// reference the customer, `NotFound` when it doesn't exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::fk_as_conflict(e, "customer has related orders"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// One page of customer summaries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_page(
        &self,
        request: &PageRequest,
    ) -> Result<Page<CustomerSummary>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM customer")
            .fetch_one(self.pool)
            .await?;

        let query = format!(
            "SELECT id, name, email FROM customer {} LIMIT $1 OFFSET $2",
            request.order_clause()
        );
        let rows = sqlx::query_as::<_, (i32, String, String)>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool)
            .await?;

        let content = rows
            .into_iter()
            .map(|(id, name, email)| CustomerSummary {
                id: CustomerId::new(id),
                name,
                email,
            })
            .collect();

        Ok(Page::new(content, request, total))
    }

    /// Load dependent collections and convert a row to the domain type.
    async fn hydrate(&self, row: CustomerRow) -> Result<Customer, RepositoryError> {
        let id = CustomerId::new(row.id);

        let phones: Vec<String> = sqlx::query_scalar(
            "SELECT phone FROM customer_phone WHERE customer_id = $1 ORDER BY phone",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        let addresses = self.addresses_of(id).await?;
        let roles = self.roles_of(id).await?;

        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let tax_id = TaxId::parse(&row.tax_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tax id in database: {e}"))
        })?;
        let kind = CustomerKind::from_code(row.kind).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown customer kind code {}", row.kind))
        })?;

        Ok(Customer {
            id,
            name: row.name,
            email,
            tax_id,
            kind,
            picture_url: row.picture_url,
            roles,
            phones,
            addresses,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// The customer's addresses with city and state joined in.
    async fn addresses_of(&self, id: CustomerId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            "SELECT a.id, a.street, a.number, a.complement, a.neighborhood, a.postal_code,
                    c.id AS city_id, c.name AS city_name, s.id AS state_id, s.name AS state_name
             FROM address a
             JOIN city c ON c.id = a.city_id
             JOIN state s ON s.id = c.state_id
             WHERE a.customer_id = $1
             ORDER BY a.id",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Address {
                id: AddressId::new(r.id),
                street: r.street,
                number: r.number,
                complement: r.complement,
                neighborhood: r.neighborhood,
                postal_code: r.postal_code,
                city: City {
                    id: CityId::new(r.city_id),
                    name: r.city_name,
                    state_id: StateId::new(r.state_id),
                    state_name: r.state_name,
                },
            })
            .collect())
    }

    /// The customer's role set. Unknown codes are skipped rather than
    /// failing the whole lookup.
    async fn roles_of(&self, id: CustomerId) -> Result<HashSet<Role>, RepositoryError> {
        let codes: Vec<i32> =
            sqlx::query_scalar("SELECT role FROM customer_role WHERE customer_id = $1")
                .bind(id.as_i32())
                .fetch_all(self.pool)
                .await?;

        Ok(codes.into_iter().filter_map(Role::from_code).collect())
    }
}
