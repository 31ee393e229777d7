//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductOption};
use crate::repository::{ProductOptionRepository, ProductRepository};
use crate::validation::Validated;

/// Product catalog operations.
///
/// Write payloads are validated before the store is touched. Options are
/// addressed by their own id; the owning product only matters on create.
pub struct ProductService<P: ProductRepository, O: ProductOptionRepository> {
    products: Arc<P>,
    options: Arc<O>,
}

impl<P: ProductRepository, O: ProductOptionRepository> ProductService<P, O> {
    pub fn new(products: P, options: O) -> Self {
        Self {
            products: Arc::new(products),
            options: Arc::new(options),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> ProductResult<Vec<Product>> {
        self.products.get_all().await
    }

    /// Products whose name contains `name`, ignoring case
    #[instrument(skip(self))]
    pub async fn search_products(&self, name: &str) -> ProductResult<Vec<Product>> {
        self.products.get_by_name(name).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn create_product(&self, product: Product) -> ProductResult<Product> {
        check(&product)?;

        if self.products.get_by_id(product.id).await?.is_some() {
            return Err(ProductError::AlreadyExists(product.id));
        }

        self.products.insert(product).await
    }

    /// Replace the mutable fields of product `id` with those of `input`.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: Product) -> ProductResult<Product> {
        check(&input)?;

        let mut stored = self.get_product(id).await?;
        stored.apply_update(input);

        if self.products.save(&stored).await? == 0 {
            return Err(ProductError::NotFound(id));
        }

        Ok(stored)
    }

    /// Remove a product. Its options are not touched.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        self.options.get_by_product_id(product_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_option(&self, id: Uuid) -> ProductResult<ProductOption> {
        self.options
            .get_by_id(id)
            .await?
            .ok_or(ProductError::OptionNotFound(id))
    }

    /// Create an option owned by `product_id`, whatever the payload says.
    #[instrument(skip(self, option), fields(option_id = %option.id))]
    pub async fn create_option(
        &self,
        product_id: Uuid,
        mut option: ProductOption,
    ) -> ProductResult<ProductOption> {
        check(&option)?;
        option.product_id = product_id;

        if self.options.get_by_id(option.id).await?.is_some() {
            return Err(ProductError::OptionAlreadyExists(option.id));
        }

        self.options.insert(option).await
    }

    /// Replace name and description of option `id`. The owner is kept.
    #[instrument(skip(self, input))]
    pub async fn update_option(&self, id: Uuid, input: ProductOption) -> ProductResult<ProductOption> {
        check(&input)?;

        let mut stored = self.get_option(id).await?;
        stored.apply_update(input);

        if self.options.save(&stored).await? == 0 {
            return Err(ProductError::OptionNotFound(id));
        }

        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn delete_option(&self, id: Uuid) -> ProductResult<()> {
        if self.options.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::OptionNotFound(id))
        }
    }
}

fn check<T: Validated>(payload: &T) -> ProductResult<()> {
    let failures = payload.validation_failures();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ProductError::Validation(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockProductOptionRepository, MockProductRepository};
    use mockall::predicate::eq;

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            description: Some("Newest mobile product from Samsung.".to_string()),
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

    fn service(
        products: MockProductRepository,
        options: MockProductOptionRepository,
    ) -> ProductService<MockProductRepository, MockProductOptionRepository> {
        ProductService::new(products, options)
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut products = MockProductRepository::new();
        let id = Uuid::new_v4();

        products
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = service(products, MockProductOptionRepository::new());
        let err = service.get_product(id).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_search_delegates_to_name_lookup() {
        let mut products = MockProductRepository::new();

        products
            .expect_get_by_name()
            .withf(|name| name.to_string() == "duct1")
            .times(1)
            .returning(|_| Ok(vec![product("Product1")]));

        let service = service(products, MockProductOptionRepository::new());
        let found = service.search_products("duct1").await.unwrap();

        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_invalid_never_touches_store() {
        let products = MockProductRepository::new();
        let service = service(products, MockProductOptionRepository::new());

        let mut input = product("Product1");
        input.name = None;
        input.price = -1.0;

        let err = service.create_product(input).await.unwrap_err();
        let ProductError::Validation(failures) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let names: Vec<_> = failures.iter().map(|f| f.property_name.as_str()).collect();
        assert_eq!(names, ["Name", "Price"]);
    }

    #[tokio::test]
    async fn test_create_product_inserts_new_id() {
        let mut products = MockProductRepository::new();
        let input = product("Product1");
        let id = input.id;

        products
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));
        products.expect_insert().times(1).returning(Ok);

        let service = service(products, MockProductOptionRepository::new());
        let created = service.create_product(input.clone()).await.unwrap();

        assert_eq!(created, input);
    }

    #[tokio::test]
    async fn test_create_product_duplicate_id() {
        let mut products = MockProductRepository::new();
        let input = product("Product1");
        let existing = input.clone();

        products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        products.expect_insert().never();

        let service = service(products, MockProductOptionRepository::new());
        let err = service.create_product(input).await.unwrap_err();

        assert!(matches!(err, ProductError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_update_product_keeps_id() {
        let mut products = MockProductRepository::new();
        let stored = product("Product1");
        let id = stored.id;

        products
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(stored.clone())));
        products
            .expect_save()
            .withf(move |p| p.id == id && p.price == 20.0)
            .returning(|_| Ok(1));

        let service = service(products, MockProductOptionRepository::new());

        let mut input = product("Renamed");
        input.price = 20.0;
        let updated = service.update_product(id, input).await.unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.name.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_update_product_validates_before_lookup() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().never();

        let service = service(products, MockProductOptionRepository::new());

        let mut input = product("Product1");
        input.name = Some(String::new());
        let err = service.update_product(Uuid::new_v4(), input).await.unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|_| Ok(None));
        products.expect_save().never();

        let service = service(products, MockProductOptionRepository::new());
        let err = service
            .update_product(Uuid::new_v4(), product("Product1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_product_missing() {
        let mut products = MockProductRepository::new();
        products.expect_delete().returning(|_| Ok(false));

        let service = service(products, MockProductOptionRepository::new());
        let err = service.delete_product(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_product_leaves_options() {
        let mut products = MockProductRepository::new();
        let mut options = MockProductOptionRepository::new();

        products.expect_delete().times(1).returning(|_| Ok(true));
        options.expect_delete().never();

        let service = service(products, options);
        service.delete_product(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_option_by_id() {
        let mut options = MockProductOptionRepository::new();
        let owner = Uuid::new_v4();
        let stored = option(owner, "Red");
        let id = stored.id;
        let missing = Uuid::new_v4();

        options
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(stored.clone())));
        options
            .expect_get_by_id()
            .with(eq(missing))
            .returning(|_| Ok(None));

        let service = service(MockProductRepository::new(), options);

        let found = service.get_option(id).await.unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.product_id, owner);
        assert!(matches!(
            service.get_option(missing).await,
            Err(ProductError::OptionNotFound(m)) if m == missing
        ));
    }

    #[tokio::test]
    async fn test_create_option_takes_owner_from_route() {
        let mut options = MockProductOptionRepository::new();
        let route_owner = Uuid::new_v4();

        options.expect_get_by_id().returning(|_| Ok(None));
        options
            .expect_insert()
            .withf(move |o| o.product_id == route_owner)
            .returning(Ok);

        let service = service(MockProductRepository::new(), options);
        let created = service
            .create_option(route_owner, option(Uuid::new_v4(), "Red"))
            .await
            .unwrap();

        assert_eq!(created.product_id, route_owner);
    }

    #[tokio::test]
    async fn test_create_option_without_name() {
        let service = service(
            MockProductRepository::new(),
            MockProductOptionRepository::new(),
        );

        let mut input = option(Uuid::new_v4(), "Red");
        input.name = None;
        let err = service
            .create_option(Uuid::new_v4(), input)
            .await
            .unwrap_err();

        let ProductError::Validation(failures) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].property_name, "Name");
    }

    #[tokio::test]
    async fn test_update_option_keeps_owner() {
        let mut options = MockProductOptionRepository::new();
        let owner = Uuid::new_v4();
        let stored = option(owner, "Red");
        let id = stored.id;

        options
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        options
            .expect_save()
            .withf(move |o| o.product_id == owner && o.id == id)
            .returning(|_| Ok(1));

        let service = service(MockProductRepository::new(), options);
        let updated = service
            .update_option(id, option(Uuid::new_v4(), "Blue"))
            .await
            .unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.product_id, owner);
        assert_eq!(updated.name.as_deref(), Some("Blue"));
    }

    #[tokio::test]
    async fn test_delete_option_by_id() {
        let mut options = MockProductOptionRepository::new();
        let id = Uuid::new_v4();

        options
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));

        let service = service(MockProductRepository::new(), options);
        service.delete_option(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_option_missing() {
        let mut options = MockProductOptionRepository::new();
        options.expect_delete().returning(|_| Ok(false));

        let service = service(MockProductRepository::new(), options);
        let err = service.delete_option(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, ProductError::OptionNotFound(_)));
    }
}
