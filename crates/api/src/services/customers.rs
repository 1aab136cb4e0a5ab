//! Customer operations: lookup, registration, update, delete, listing and
//! profile picture upload.

use mercado_core::CustomerId;

use crate::auth::{authorize_owner, authorize_username, Principal};
use crate::db::customers::{CustomerSummary, SORTABLE};
use crate::db::{CityRepository, CustomerRepository, Page, PageRequest, SortDirection};
use crate::dto::{CustomerRegistration, CustomerUpdate};
use crate::error::{AppError, FieldMessage, Result};
use crate::models::Customer;
use crate::services::images::{self, ImageError};
use crate::services::not_found_as;
use crate::state::AppState;

/// Customer business operations.
pub struct CustomerService<'a> {
    state: &'a AppState,
}

impl<'a> CustomerService<'a> {
    /// Create a customer service over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Fetch a customer by id. Authorization runs before the lookup, so a
    /// caller probing foreign ids learns nothing about their existence.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-owners, `NotFound` for a miss.
    pub async fn find(
        &self,
        principal: Option<&Principal>,
        id: CustomerId,
    ) -> Result<Customer> {
        authorize_owner(principal, id)?;

        self.repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Customer",
                id: id.to_string(),
            })
    }

    /// Fetch a customer by email, same policy keyed on the username.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-owners, `Validation` for an unparsable email,
    /// `NotFound` for a miss.
    pub async fn find_by_email(
        &self,
        principal: Option<&Principal>,
        raw_email: &str,
    ) -> Result<Customer> {
        let email = mercado_core::Email::parse(raw_email).map_err(|e| {
            AppError::Validation(vec![FieldMessage::new("email", e.to_string())])
        })?;
        authorize_username(principal, email.as_str())?;

        self.repo()
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Customer",
                // authorize_username guarantees a principal by this point;
                // the miss message carries the requester's numeric id.
                id: principal.map_or_else(String::new, |p| p.id.to_string()),
            })
    }

    /// Register a new customer: validate the payload, resolve the city,
    /// hash the password and persist the aggregate in one transaction.
    ///
    /// # Errors
    ///
    /// `Validation` for shape problems or an unknown city, `DataIntegrity`
    /// for a duplicate email.
    pub async fn register(&self, registration: CustomerRegistration) -> Result<Customer> {
        let valid = registration.validate()?;

        let city = CityRepository::new(self.state.pool())
            .get_by_id(valid.city_id)
            .await?;
        if city.is_none() {
            return Err(AppError::Validation(vec![FieldMessage::new(
                "cidadeId",
                format!("no city with id {}", valid.city_id),
            )]));
        }

        let hash = super::auth::hash_password(&valid.password)?;
        let new = valid.into_new_customer(hash);
        Ok(self.repo().create(&new).await?)
    }

    /// Update the whitelisted contact fields of a customer.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-owners, `Validation` for shape problems,
    /// `NotFound` for a miss, `DataIntegrity` for a duplicate email.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<()> {
        authorize_owner(principal, id)?;
        let (name, email) = update.validate()?;

        self.repo()
            .update_contact(id, &name, &email)
            .await
            .map_err(|e| not_found_as(e, "Customer", id.to_string()))
    }

    /// Delete a customer. Blocked with a conflict when orders reference
    /// the account.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss, `DataIntegrity` when orders exist.
    pub async fn delete(&self, id: CustomerId) -> Result<()> {
        self.repo()
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "Customer", id.to_string()))
    }

    /// One page of customer summaries.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an unsortable column or out-of-range page size.
    pub async fn find_page(
        &self,
        page: u32,
        page_size: u32,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Page<CustomerSummary>> {
        let request = PageRequest::new(
            page,
            page_size,
            super::sort_column(order_by),
            direction,
            SORTABLE,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(self.repo().find_page(&request).await?)
    }

    /// Normalize an uploaded profile picture, store it and record its URL
    /// on the uploader's own account.
    ///
    /// The object key is derived from the authenticated principal, never
    /// from request input, so a customer can only ever overwrite their own
    /// picture.
    ///
    /// # Errors
    ///
    /// `Validation` for an undecodable image, `Internal` for storage
    /// failures.
    pub async fn upload_profile_picture(
        &self,
        principal: &Principal,
        bytes: &[u8],
    ) -> Result<String> {
        let config = self.state.config();

        let jpeg = images::to_profile_jpeg(bytes, config.img_profile_size).map_err(
            |e| match e {
                ImageError::Decode(_) => {
                    AppError::Validation(vec![FieldMessage::new("file", e.to_string())])
                }
                ImageError::Encode(_) => AppError::Internal(e.to_string()),
            },
        )?;

        let key = format!("{}{}.jpg", config.img_prefix, principal.id);
        let url = self
            .state
            .storage()
            .put(&key, jpeg, "image/jpeg")
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.repo()
            .set_picture_url(principal.id, &url)
            .await
            .map_err(|e| not_found_as(e, "Customer", principal.id.to_string()))?;
        Ok(url)
    }

    fn repo(&self) -> CustomerRepository<'_> {
        CustomerRepository::new(self.state.pool())
    }
}
