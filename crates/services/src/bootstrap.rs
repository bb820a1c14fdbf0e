use feedback_core::model::{FormLayout, seed_categories, seed_lessons};
use storage::repository::CatalogRepository;
use tracing::info;

use crate::error::BootstrapError;

/// Outcome of preparing the catalog for serving.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub layout: FormLayout,
    /// `true` when this call wrote the seed catalog.
    pub seeded: bool,
}

/// Seed the fixed categories and lessons when the store has none, then
/// load the catalog and validate it into a [`FormLayout`].
///
/// Running it against an initialized store writes nothing.
///
/// # Errors
///
/// Returns `BootstrapError::Storage` if the catalog cannot be read or
/// written, and `BootstrapError::Layout` if the stored catalog is unusable.
pub async fn ensure_catalog(catalog: &dyn CatalogRepository) -> Result<Bootstrap, BootstrapError> {
    let seeded = catalog
        .seed_catalog(&seed_categories(), &seed_lessons())
        .await?;
    if seeded {
        info!("seeded empty store with default categories and lessons");
    }

    let categories = catalog.list_categories().await?;
    let lessons = catalog.list_lessons().await?;
    let layout = FormLayout::new(categories, lessons)?;
    info!(
        categories = layout.categories().len(),
        lessons = layout.lessons().len(),
        fields = layout.field_count(),
        "catalog loaded"
    );

    Ok(Bootstrap { layout, seeded })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use feedback_core::model::{Category, FormLayoutError, Lesson};
    use storage::repository::{InMemoryRepository, StorageError};

    #[tokio::test]
    async fn seeds_once_then_loads() {
        let repo = InMemoryRepository::new();

        let first = ensure_catalog(&repo).await.unwrap();
        assert!(first.seeded);
        assert_eq!(first.layout.categories().len(), 3);
        assert_eq!(first.layout.lessons().len(), 13);

        let second = ensure_catalog(&repo).await.unwrap();
        assert!(!second.seeded);
        assert_eq!(repo.list_lessons().await.unwrap().len(), 13);
    }

    /// Catalog that already holds a single lesson and refuses reseeding.
    struct PartialCatalog {
        inner: Arc<InMemoryRepository>,
    }

    #[async_trait]
    impl CatalogRepository for PartialCatalog {
        async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
            self.inner.list_categories().await
        }

        async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
            self.inner.list_lessons().await
        }

        async fn seed_catalog(
            &self,
            _categories: &[Category],
            _lessons: &[Lesson],
        ) -> Result<bool, StorageError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn rejects_catalog_without_categories() {
        let inner = Arc::new(InMemoryRepository::new());
        inner
            .seed_catalog(&[], &[Lesson::new(1, "solo", "Solo").unwrap()])
            .await
            .unwrap();

        let err = ensure_catalog(&PartialCatalog { inner }).await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Layout(FormLayoutError::NoCategories)
        ));
    }
}
