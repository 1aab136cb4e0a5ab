//! Customer, address and city domain types.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mercado_core::{AddressId, CityId, CustomerId, CustomerKind, Email, Role, StateId, TaxId};

/// A customer account with its dependent collections.
///
/// The credential hash never leaves the repository layer, so it is not a
/// field here.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: Email,
    #[serde(rename = "cpfOuCnpj")]
    pub tax_id: TaxId,
    #[serde(rename = "tipo")]
    pub kind: CustomerKind,
    #[serde(rename = "imagemUrl", skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(skip)]
    pub roles: HashSet<Role>,
    #[serde(rename = "telefones")]
    pub phones: Vec<String>,
    #[serde(rename = "enderecos")]
    pub addresses: Vec<Address>,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// A delivery address; belongs to exactly one customer and one city.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "complemento", skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(rename = "bairro", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "cidade")]
    pub city: City,
}

/// A city, denormalized with its state name for display.
#[derive(Debug, Clone, Serialize)]
pub struct City {
    pub id: CityId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "estadoId")]
    pub state_id: StateId,
    #[serde(rename = "estado")]
    pub state_name: String,
}

/// A customer to insert.
///
/// Deliberately carries no id: presence of an id is the insert-vs-update
/// discriminator upstream, and making the insert type id-less removes the
/// "clear the client-supplied id" step structurally. Persisted together
/// with its addresses and phones in one transaction.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub tax_id: TaxId,
    pub kind: CustomerKind,
    /// Argon2 hash; never the plaintext.
    pub password_hash: Option<String>,
    pub roles: HashSet<Role>,
    pub phones: Vec<String>,
    pub addresses: Vec<NewAddress>,
}

/// An address to insert alongside its new owner.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub postal_code: String,
    pub city_id: CityId,
}
