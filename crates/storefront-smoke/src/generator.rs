//! Random record generation for seeding the services.

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use storefront_domain::{Customer, Order, Product};
use uuid::{Builder, Uuid};

const ADJECTIVES: &[&str] = &[
    "Compact", "Rugged", "Classic", "Wireless", "Organic", "Modular", "Portable", "Deluxe",
];

const NOUNS: &[&str] = &[
    "Desk Lamp", "Backpack", "Kettle", "Headphones", "Planter", "Notebook", "Chair", "Blender",
];

const CATEGORIES: &[&str] = &["lighting", "outdoor", "kitchen", "audio", "garden", "office"];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Frances", "Niklaus", "Radia",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Torvalds", "Hamilton", "Ritchie", "Liskov", "Thompson", "Allen",
];

const GENDERS: &[&str] = &["female", "male", "other"];

/// Generates products, customers and orders that reference them.
pub struct RecordGenerator<R: Rng = ThreadRng> {
    rng: R,
}

impl RecordGenerator {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for RecordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RecordGenerator<R> {
    /// Use a caller-supplied RNG, e.g. a seeded one for reproducible runs.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Random v4 UUID drawn from this generator's RNG.
    pub fn id(&mut self) -> String {
        let uuid: Uuid = Builder::from_random_bytes(self.rng.r#gen()).into_uuid();
        uuid.to_string()
    }

    fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values.choose(&mut self.rng).copied().unwrap_or_default()
    }

    pub fn product(&mut self) -> Product {
        Product {
            id: self.id(),
            name: format!("{} {}", self.pick(ADJECTIVES), self.pick(NOUNS)),
            category: self.pick(CATEGORIES).to_string(),
        }
    }

    pub fn customer(&mut self) -> Customer {
        Customer {
            id: self.id(),
            name: format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES)),
            gender: self.pick(GENDERS).to_string(),
        }
    }

    /// An order for a random customer and product. Falls back to fresh ids
    /// when either list is empty; the services do not check references.
    pub fn order(&mut self, customers: &[Customer], products: &[Product]) -> Order {
        let customerid = match customers.choose(&mut self.rng) {
            Some(customer) => customer.id.clone(),
            None => self.id(),
        };
        let productid = match products.choose(&mut self.rng) {
            Some(product) => product.id.clone(),
            None => self.id(),
        };

        Order {
            id: self.id(),
            customerid,
            productid,
        }
    }
}
