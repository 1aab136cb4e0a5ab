//! Wire-format DTOs and their conversion into domain types.
//!
//! DTOs keep the original Portuguese field names on the wire
//! (`nome`, `senha`, `cpfOuCnpj`, ...) while the code works with English
//! names. Validation produces a full list of [`FieldMessage`]s rather than
//! failing on the first problem.

use serde::Deserialize;

use mercado_core::{CityId, CustomerKind, Email, TaxId};

use crate::error::{AppError, FieldMessage};
use crate::models::{NewAddress, NewCustomer};

/// Name length bounds shared by several DTOs.
const NAME_MIN: usize = 5;
const NAME_MAX: usize = 120;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Whitelisted mutable customer fields for `PUT /clientes/{id}`.
///
/// Deliberately flat and small: update copies exactly these onto the
/// stored record, so a partial DTO can never blank other fields.
#[derive(Debug, Deserialize)]
pub struct CustomerUpdate {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

impl CustomerUpdate {
    /// Validate the update payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every offending field.
    pub fn validate(&self) -> Result<(String, Email), AppError> {
        let mut errors = Vec::new();

        if let Err(msg) = check_name(&self.name) {
            errors.push(FieldMessage::new("nome", msg));
        }
        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push(FieldMessage::new("email", e.to_string()));
                None
            }
        };

        match email {
            Some(email) if errors.is_empty() => Ok((self.name.clone(), email)),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Registration request body (`POST /clientes`).
///
/// The richer DTO variant: tax id, classification code, plaintext password
/// (hashed before storage), one address and one mandatory plus two
/// optional phone numbers as discrete fields.
#[derive(Debug, Deserialize)]
pub struct CustomerRegistration {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "cpfOuCnpj")]
    pub tax_id: String,
    #[serde(rename = "tipo")]
    pub kind: i32,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "telefone1")]
    pub phone1: String,
    #[serde(rename = "telefone2")]
    pub phone2: Option<String>,
    #[serde(rename = "telefone3")]
    pub phone3: Option<String>,
    #[serde(rename = "cidadeId")]
    pub city_id: i32,
}

/// A registration that passed shape validation.
#[derive(Debug)]
pub struct ValidRegistration {
    pub name: String,
    pub email: Email,
    pub tax_id: TaxId,
    pub kind: CustomerKind,
    pub password: String,
    pub address: NewAddress,
    /// 1 to 3 phone numbers, first mandatory.
    pub phones: Vec<String>,
    pub city_id: CityId,
}

impl CustomerRegistration {
    /// Validate shape invariants and convert to typed values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every offending field.
    pub fn validate(self) -> Result<ValidRegistration, AppError> {
        let mut errors = Vec::new();

        if let Err(msg) = check_name(&self.name) {
            errors.push(FieldMessage::new("nome", msg));
        }

        let email = Email::parse(&self.email)
            .map_err(|e| errors.push(FieldMessage::new("email", e.to_string())))
            .ok();
        let tax_id = TaxId::parse(&self.tax_id)
            .map_err(|e| errors.push(FieldMessage::new("cpfOuCnpj", e.to_string())))
            .ok();
        let kind = CustomerKind::from_code(self.kind);
        if kind.is_none() {
            errors.push(FieldMessage::new(
                "tipo",
                format!("unknown customer kind code {}", self.kind),
            ));
        }

        if self.password.len() < MIN_PASSWORD_LENGTH {
            errors.push(FieldMessage::new(
                "senha",
                format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }

        if self.street.trim().is_empty() {
            errors.push(FieldMessage::new("logradouro", "street is required"));
        }
        if self.number.trim().is_empty() {
            errors.push(FieldMessage::new("numero", "number is required"));
        }
        if self.postal_code.trim().is_empty() {
            errors.push(FieldMessage::new("cep", "postal code is required"));
        }
        if self.phone1.trim().is_empty() {
            errors.push(FieldMessage::new("telefone1", "at least one phone is required"));
        }

        let (Some(email), Some(tax_id), Some(kind)) = (email, tax_id, kind) else {
            return Err(AppError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let city_id = CityId::new(self.city_id);
        let phones = collect_phones(self.phone1, self.phone2, self.phone3);

        Ok(ValidRegistration {
            name: self.name,
            email,
            tax_id,
            kind,
            password: self.password,
            address: NewAddress {
                street: self.street,
                number: self.number,
                complement: self.complement,
                neighborhood: self.neighborhood,
                postal_code: self.postal_code,
                city_id,
            },
            phones,
            city_id,
        })
    }
}

impl ValidRegistration {
    /// Assemble the insertable customer: exactly one address referencing
    /// the resolved city, 1-3 phones, the hash instead of the plaintext.
    #[must_use]
    pub fn into_new_customer(self, password_hash: String) -> NewCustomer {
        NewCustomer {
            name: self.name,
            email: self.email,
            tax_id: self.tax_id,
            kind: self.kind,
            password_hash: Some(password_hash),
            roles: std::iter::once(mercado_core::Role::Customer).collect(),
            phones: self.phones,
            addresses: vec![self.address],
        }
    }
}

/// Collect the discrete phone fields into a 1-3 element list.
fn collect_phones(phone1: String, phone2: Option<String>, phone3: Option<String>) -> Vec<String> {
    let mut phones = vec![phone1];
    phones.extend(phone2.into_iter().filter(|p| !p.trim().is_empty()));
    phones.extend(phone3.into_iter().filter(|p| !p.trim().is_empty()));
    phones
}

/// Shared name validation.
fn check_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        return Err(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        ));
    }
    Ok(())
}

/// Category create/update payload.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    #[serde(rename = "nome")]
    pub name: String,
}

impl CategoryPayload {
    /// Validate the category name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the name is out of bounds.
    pub fn validate(&self) -> Result<String, AppError> {
        check_name(&self.name)
            .map_err(|msg| AppError::Validation(vec![FieldMessage::new("nome", msg)]))?;
        Ok(self.name.clone())
    }
}

/// Product create/update payload.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: rust_decimal::Decimal,
    #[serde(rename = "categorias", default)]
    pub category_ids: Vec<i32>,
}

impl ProductPayload {
    /// Validate the product name and price.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every offending field.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if let Err(msg) = check_name(&self.name) {
            errors.push(FieldMessage::new("nome", msg));
        }
        if self.price <= rust_decimal::Decimal::ZERO {
            errors.push(FieldMessage::new("preco", "price must be positive"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Order placement payload (`POST /pedidos`).
#[derive(Debug, Deserialize)]
pub struct OrderPayload {
    #[serde(rename = "enderecoId")]
    pub address_id: i32,
    #[serde(rename = "itens")]
    pub items: Vec<OrderItemPayload>,
}

/// One requested line of an order.
#[derive(Debug, Deserialize)]
pub struct OrderItemPayload {
    #[serde(rename = "produtoId")]
    pub product_id: i32,
    #[serde(rename = "quantidade")]
    pub quantity: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration() -> CustomerRegistration {
        CustomerRegistration {
            name: "Maria Silva".to_string(),
            email: "maria@gmail.com".to_string(),
            tax_id: "123".to_string(),
            kind: 1,
            password: "correct-horse".to_string(),
            street: "Rua Flores".to_string(),
            number: "300".to_string(),
            complement: Some("Apto 303".to_string()),
            neighborhood: Some("Jardim".to_string()),
            postal_code: "38220834".to_string(),
            phone1: "9999-0000".to_string(),
            phone2: None,
            phone3: None,
            city_id: 1,
        }
    }

    #[test]
    fn test_registration_wire_field_names() {
        let dto: CustomerRegistration = serde_json::from_value(serde_json::json!({
            "nome": "Maria Silva",
            "email": "maria@gmail.com",
            "cpfOuCnpj": "36378912377",
            "tipo": 1,
            "senha": "correct-horse",
            "logradouro": "Rua Flores",
            "numero": "300",
            "complemento": "Apto 303",
            "bairro": "Jardim",
            "cep": "38220834",
            "telefone1": "9999-0000",
            "cidadeId": 1
        }))
        .unwrap();

        assert_eq!(dto.name, "Maria Silva");
        assert_eq!(dto.tax_id, "36378912377");
        assert_eq!(dto.postal_code, "38220834");
        assert!(dto.phone2.is_none());
    }

    #[test]
    fn test_registration_single_phone() {
        let valid = registration().validate().unwrap();
        assert_eq!(valid.phones, vec!["9999-0000".to_string()]);
        assert_eq!(valid.tax_id.as_str(), "123");
        assert_eq!(valid.kind, CustomerKind::Individual);
    }

    #[test]
    fn test_registration_three_phones() {
        let mut dto = registration();
        dto.phone2 = Some("98888-1111".to_string());
        dto.phone3 = Some("97777-2222".to_string());

        let valid = dto.validate().unwrap();
        assert_eq!(valid.phones.len(), 3);
    }

    #[test]
    fn test_registration_blank_optional_phone_skipped() {
        let mut dto = registration();
        dto.phone2 = Some("  ".to_string());

        let valid = dto.validate().unwrap();
        assert_eq!(valid.phones.len(), 1);
    }

    #[test]
    fn test_registration_missing_phone1_rejected() {
        let mut dto = registration();
        dto.phone1 = String::new();

        let err = dto.validate().unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.iter().any(|f| f.field == "telefone1"));
    }

    #[test]
    fn test_registration_collects_all_errors() {
        let mut dto = registration();
        dto.email = "not-an-email".to_string();
        dto.password = "short".to_string();
        dto.kind = 9;

        let AppError::Validation(fields) = dto.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        let named: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert!(named.contains(&"email"));
        assert!(named.contains(&"senha"));
        assert!(named.contains(&"tipo"));
    }

    #[test]
    fn test_into_new_customer_cardinality() {
        let valid = registration().validate().unwrap();
        let customer = valid.into_new_customer("$argon2id$stub".to_string());

        // Exactly one address, 1-3 phones, never the plaintext password.
        assert_eq!(customer.addresses.len(), 1);
        assert_eq!(customer.phones.len(), 1);
        assert_eq!(customer.password_hash.as_deref(), Some("$argon2id$stub"));
        assert_eq!(customer.addresses[0].city_id, CityId::new(1));
    }

    #[test]
    fn test_product_payload_rejects_blank_name_and_negative_price() {
        let payload: ProductPayload = serde_json::from_value(serde_json::json!({
            "nome": "",
            "preco": "-5.00",
            "categorias": [1]
        }))
        .unwrap();

        let AppError::Validation(fields) = payload.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        let named: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert!(named.contains(&"nome"));
        assert!(named.contains(&"preco"));
    }

    #[test]
    fn test_product_payload_rejects_zero_price() {
        let payload = ProductPayload {
            name: "Impressora".to_string(),
            price: rust_decimal::Decimal::ZERO,
            category_ids: vec![1, 2],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_product_payload_valid() {
        let payload: ProductPayload = serde_json::from_value(serde_json::json!({
            "nome": "Impressora",
            "preco": "800.00",
            "categorias": [1, 2]
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_update_whitelist_shape() {
        let update = CustomerUpdate {
            name: "Maria Souza".to_string(),
            email: "maria.souza@gmail.com".to_string(),
        };
        let (name, email) = update.validate().unwrap();
        assert_eq!(name, "Maria Souza");
        assert_eq!(email.as_str(), "maria.souza@gmail.com");
    }

    #[test]
    fn test_update_rejects_short_name() {
        let update = CustomerUpdate {
            name: "Ana".to_string(),
            email: "ana@gmail.com".to_string(),
        };
        assert!(update.validate().is_err());
    }
}
