use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use sea_orm::DbErr;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductOption};

/// Data access for products.
///
/// Every mutating call commits immediately. Lookups that miss return `None`
/// (or `false` for delete), never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in storage order
    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Products whose name matches `%name%`, ignoring case. `%` and `_` in
    /// `name` are LIKE wildcards; a backslash escapes them.
    async fn get_by_name(&self, name: &str) -> ProductResult<Vec<Product>>;

    /// Store a new product
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Write the mutable fields of an existing product, keyed by id.
    /// Returns the number of rows written.
    async fn save(&self, product: &Product) -> ProductResult<u64>;

    /// Remove a product. Its options are left in place.
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// Data access for product options.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductOptionRepository: Send + Sync {
    async fn get_all(&self) -> ProductResult<Vec<ProductOption>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductOption>>;

    /// Options owned by `product_id`
    async fn get_by_product_id(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>>;

    async fn insert(&self, option: ProductOption) -> ProductResult<ProductOption>;

    /// Write name and description of an existing option, keyed by id.
    async fn save(&self, option: &ProductOption) -> ProductResult<u64>;

    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// In-memory product store for the isolated environment and tests.
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, in the given order.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let pattern = contains_like(name)?;
        let products = self.products.read().await;

        Ok(products
            .iter()
            .filter(|p| p.name.as_deref().is_some_and(|n| pattern.is_match(n)))
            .cloned()
            .collect())
    }

    async fn insert(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if products.iter().any(|p| p.id == product.id) {
            return Err(ProductError::AlreadyExists(product.id));
        }

        products.push(product.clone());
        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn save(&self, product: &Product) -> ProductResult<u64> {
        let mut products = self.products.write().await;

        match products.iter_mut().find(|p| p.id == product.id) {
            Some(stored) => {
                stored.apply_update(product.clone());
                tracing::info!(product_id = %product.id, "Updated product");
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);

        let deleted = products.len() < before;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }
}

/// Case-insensitive matcher for the LIKE pattern `%text%`.
fn contains_like(text: &str) -> ProductResult<Regex> {
    let mut pattern = String::from("^.*");
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '%' => pattern.push_str(".*"),
            '_' => pattern.push('.'),
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                pattern.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4])));
            }
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push_str(".*$");

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| ProductError::Database(DbErr::Custom(format!("Invalid name pattern: {e}"))))
}

/// In-memory option store for the isolated environment and tests.
#[derive(Clone, Default)]
pub struct InMemoryProductOptionRepository {
    options: Arc<RwLock<Vec<ProductOption>>>,
}

impl InMemoryProductOptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Vec<ProductOption>) -> Self {
        Self {
            options: Arc::new(RwLock::new(options)),
        }
    }
}

#[async_trait]
impl ProductOptionRepository for InMemoryProductOptionRepository {
    async fn get_all(&self) -> ProductResult<Vec<ProductOption>> {
        Ok(self.options.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductOption>> {
        let options = self.options.read().await;
        Ok(options.iter().find(|o| o.id == id).cloned())
    }

    async fn get_by_product_id(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        let options = self.options.read().await;
        Ok(options
            .iter()
            .filter(|o| o.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, option: ProductOption) -> ProductResult<ProductOption> {
        let mut options = self.options.write().await;

        if options.iter().any(|o| o.id == option.id) {
            return Err(ProductError::OptionAlreadyExists(option.id));
        }

        options.push(option.clone());
        tracing::info!(option_id = %option.id, product_id = %option.product_id, "Created option");
        Ok(option)
    }

    async fn save(&self, option: &ProductOption) -> ProductResult<u64> {
        let mut options = self.options.write().await;

        match options.iter_mut().find(|o| o.id == option.id) {
            Some(stored) => {
                stored.apply_update(option.clone());
                tracing::info!(option_id = %option.id, "Updated option");
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut options = self.options.write().await;
        let before = options.len();
        options.retain(|o| o.id != id);

        let deleted = options.len() < before;
        if deleted {
            tracing::info!(option_id = %id, "Deleted option");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            description: None,
            price: 10.0,
            delivery_price: 1.5,
        }
    }

    fn option(product_id: Uuid, name: &str) -> ProductOption {
        ProductOption {
            id: Uuid::new_v4(),
            product_id,
            name: Some(name.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(product("Product1")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(repo.get_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let repo = InMemoryProductRepository::new();
        let first = repo.insert(product("Product1")).await.unwrap();

        let result = repo.insert(first.clone()).await;
        assert!(matches!(result, Err(ProductError::AlreadyExists(id)) if id == first.id));
    }

    #[tokio::test]
    async fn test_get_all_keeps_insertion_order() {
        let repo = InMemoryProductRepository::new();
        repo.insert(product("Zeta")).await.unwrap();
        repo.insert(product("Alpha")).await.unwrap();

        let names: Vec<_> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|p| p.name)
            .collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
    }

    #[tokio::test]
    async fn test_get_by_name_is_case_insensitive_substring() {
        let repo =
            InMemoryProductRepository::with_products(vec![product("Product1"), product("Product2")]);

        let matches = repo.get_by_name("DUCT1").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name.as_deref(), Some("Product1"));

        assert_eq!(repo.get_by_name("product").await.unwrap().len(), 2);
        assert!(repo.get_by_name("widget").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_name_treats_like_wildcards() {
        let repo = InMemoryProductRepository::with_products(vec![
            product("Product1"),
            product("Product2"),
            product("100% cotton"),
        ]);

        let names = |found: Vec<Product>| -> Vec<String> {
            found.into_iter().filter_map(|p| p.name).collect()
        };

        assert_eq!(names(repo.get_by_name("Prod%1").await.unwrap()), ["Product1"]);
        assert_eq!(
            names(repo.get_by_name("product_").await.unwrap()),
            ["Product1", "Product2"]
        );
        assert!(repo.get_by_name("product__").await.unwrap().is_empty());
        assert_eq!(names(repo.get_by_name("0\\% c").await.unwrap()), ["100% cotton"]);
        assert!(repo.get_by_name("1\\%").await.unwrap().is_empty());
        assert_eq!(repo.get_by_name("").await.unwrap().len(), 3);
    }

    #[test]
    fn test_contains_like_escapes_regex_syntax() {
        let pattern = contains_like("a.b(c").unwrap();
        assert!(pattern.is_match("xA.B(Cx"));
        assert!(!pattern.is_match("aXb(c"));
    }

    #[tokio::test]
    async fn test_save_updates_existing_only() {
        let repo = InMemoryProductRepository::new();
        let mut stored = repo.insert(product("Product1")).await.unwrap();

        stored.price = 99.0;
        assert_eq!(repo.save(&stored).await.unwrap(), 1);
        assert_eq!(
            repo.get_by_id(stored.id).await.unwrap().unwrap().price,
            99.0
        );

        assert_eq!(repo.save(&product("Ghost")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        let stored = repo.insert(product("Product1")).await.unwrap();

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryProductRepository::new();
        let clone = repo.clone();
        clone.insert(product("Shared")).await.unwrap();

        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_options_by_product() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let repo = InMemoryProductOptionRepository::with_options(vec![
            option(owner, "Red"),
            option(other, "Green"),
            option(owner, "Blue"),
        ]);

        let owned = repo.get_by_product_id(owner).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|o| o.product_id == owner));
        assert_eq!(repo.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_option_save_keeps_owner() {
        let owner = Uuid::new_v4();
        let repo = InMemoryProductOptionRepository::new();
        let stored = repo.insert(option(owner, "Red")).await.unwrap();

        let mut changed = stored.clone();
        changed.product_id = Uuid::new_v4();
        changed.name = Some("Crimson".to_string());
        assert_eq!(repo.save(&changed).await.unwrap(), 1);

        let reloaded = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(reloaded.product_id, owner);
        assert_eq!(reloaded.name.as_deref(), Some("Crimson"));
    }

    #[tokio::test]
    async fn test_option_delete() {
        let repo = InMemoryProductOptionRepository::new();
        let stored = repo.insert(option(Uuid::new_v4(), "Red")).await.unwrap();

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
    }
}
