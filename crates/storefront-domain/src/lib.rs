//! # Storefront Domain Model
//!
//! Record types shared by the order, product and customer services, the
//! persistence layer and the smoke client. Every record is a flat row of
//! three string columns whose first column is the primary key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// A flat, three-column record keyed by its first column.
///
/// Stores and caches are generic over this trait; the column list drives
/// both SQL/CQL statement generation and JSON field naming.
pub trait Record:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Lower-case entity name used in routes and cache keys.
    const ENTITY: &'static str;

    /// Capitalised entity name used in response messages.
    const LABEL: &'static str;

    /// Column names, primary key first. Identical to the JSON field names.
    const FIELDS: [&'static str; 3];

    /// Primary key.
    fn id(&self) -> &str;

    /// Column values in `FIELDS` order.
    fn field_values(&self) -> [&str; 3];

    /// Build a record from column values in `FIELDS` order.
    fn from_field_values(values: [String; 3]) -> Self;

    /// Build a record from a stored row where the non-key columns may be
    /// absent. Absent columns become empty strings.
    fn from_row(id: String, second: Option<String>, third: Option<String>) -> Self {
        Self::from_field_values([id, second.unwrap_or_default(), third.unwrap_or_default()])
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// A customer's order of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: String,
    pub customerid: String,
    pub productid: String,
}

impl Record for Order {
    const ENTITY: &'static str = "order";
    const LABEL: &'static str = "Order";
    const FIELDS: [&'static str; 3] = ["id", "customerid", "productid"];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> [&str; 3] {
        [&self.id, &self.customerid, &self.productid]
    }

    fn from_field_values([id, customerid, productid]: [String; 3]) -> Self {
        Self {
            id,
            customerid,
            productid,
        }
    }
}

/// A catalogue product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
}

impl Record for Product {
    const ENTITY: &'static str = "product";
    const LABEL: &'static str = "Product";
    const FIELDS: [&'static str; 3] = ["id", "name", "category"];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> [&str; 3] {
        [&self.id, &self.name, &self.category]
    }

    fn from_field_values([id, name, category]: [String; 3]) -> Self {
        Self { id, name, category }
    }
}

/// A registered customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub gender: String,
}

impl Record for Customer {
    const ENTITY: &'static str = "customer";
    const LABEL: &'static str = "Customer";
    const FIELDS: [&'static str; 3] = ["id", "name", "gender"];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> [&str; 3] {
        [&self.id, &self.name, &self.gender]
    }

    fn from_field_values([id, name, gender]: [String; 3]) -> Self {
        Self { id, name, gender }
    }
}

// =============================================================================
// ENTITY KIND
// =============================================================================

/// Runtime tag for the three record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Order,
    Product,
    Customer,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::Order, Self::Product, Self::Customer];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Order => Order::ENTITY,
            Self::Product => Product::ENTITY,
            Self::Customer => Customer::ENTITY,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "order" | "orders" => Ok(Self::Order),
            "product" | "products" => Ok(Self::Product),
            "customer" | "customers" => Ok(Self::Customer),
            other => Err(DomainError::UnknownEntity(other.to_string())),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::name::en::Name;

    #[test]
    fn test_order_wire_names() {
        let order = Order {
            id: "o-1".into(),
            customerid: "c-1".into(),
            productid: "p-1".into(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "o-1", "customerid": "c-1", "productid": "p-1"})
        );
    }

    #[test]
    fn test_field_values_follow_field_order() {
        let name: String = Name().fake();
        let customer = Customer {
            id: "c-9".into(),
            name: name.clone(),
            gender: "F".into(),
        };
        assert_eq!(customer.field_values(), ["c-9", name.as_str(), "F"]);
        assert_eq!(Customer::FIELDS[0], "id");

        let rebuilt = Customer::from_field_values(
            customer.field_values().map(str::to_string),
        );
        assert_eq!(rebuilt, customer);
    }

    #[test]
    fn test_from_row_defaults_missing_columns() {
        let order = Order::from_row("o-2".into(), None, Some("p-2".into()));
        assert_eq!(order.customerid, "");
        assert_eq!(order.productid, "p-2");
    }

    #[test]
    fn test_missing_json_field_defaults_to_empty() {
        let product: Product = serde_json::from_str(r#"{"id": "p-1", "name": "lamp"}"#).unwrap();
        assert_eq!(product.category, "");

        let order: Order = serde_json::from_str("{}").unwrap();
        assert_eq!(order, Order::default());
    }

    #[test]
    fn test_wrong_json_type_is_rejected() {
        let parsed: Result<Customer, _> = serde_json::from_str(r#"{"id": 7}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!("Orders".parse::<EntityKind>().unwrap(), EntityKind::Order);
        assert_eq!(" customer ".parse::<EntityKind>().unwrap(), EntityKind::Customer);
        assert!(matches!(
            "invoice".parse::<EntityKind>(),
            Err(DomainError::UnknownEntity(name)) if name == "invoice"
        ));
        assert_eq!(EntityKind::Product.to_string(), "product");
    }
}
