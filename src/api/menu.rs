use async_trait::async_trait;
use reqwest::Method;

use crate::{
    api::RestBackend,
    app_error::AppError,
    menu::{NewCategory, NewMenuItem},
    models::{Category, MenuItem},
    normalize,
    session::Session,
};

/// Dishes and categories. Every mutation answers with the fresh list, or
/// `None` when it was applied but the list could not be reloaded.
#[async_trait]
pub trait MenuApi: Send + Sync {
    async fn list_menu_items(&self, session: &Session) -> Result<Vec<MenuItem>, AppError>;

    async fn list_categories(&self, session: &Session) -> Result<Vec<Category>, AppError>;

    async fn add_menu_item(
        &self,
        session: &Session,
        item: &NewMenuItem,
    ) -> Result<Option<Vec<MenuItem>>, AppError>;

    async fn remove_menu_item(
        &self,
        session: &Session,
        item_id: &str,
    ) -> Result<Option<Vec<MenuItem>>, AppError>;

    async fn add_category(
        &self,
        session: &Session,
        category: &NewCategory,
    ) -> Result<Option<Vec<Category>>, AppError>;

    async fn remove_category(
        &self,
        session: &Session,
        category_id: &str,
    ) -> Result<Option<Vec<Category>>, AppError>;
}

#[async_trait]
impl MenuApi for RestBackend {
    async fn list_menu_items(&self, session: &Session) -> Result<Vec<MenuItem>, AppError> {
        let value = self
            .get(&["api", "dishes"], session, "Failed to load menu items")
            .await?;
        Ok(normalize::menu_items(value))
    }

    async fn list_categories(&self, session: &Session) -> Result<Vec<Category>, AppError> {
        let value = self
            .get(&["api", "categories"], session, "Failed to load categories")
            .await?;
        Ok(normalize::categories(value))
    }

    async fn add_menu_item(
        &self,
        session: &Session,
        item: &NewMenuItem,
    ) -> Result<Option<Vec<MenuItem>>, AppError> {
        let builder = self
            .request(Method::POST, &["api", "dishes"], session)?
            .json(item);
        self.send(builder, AppError::Mutation, "Failed to add menu item")
            .await?;
        Ok(self.relist(self.list_menu_items(session), "Menu items").await)
    }

    async fn remove_menu_item(
        &self,
        session: &Session,
        item_id: &str,
    ) -> Result<Option<Vec<MenuItem>>, AppError> {
        let builder = self.request(Method::DELETE, &["api", "dishes", item_id], session)?;
        self.send(builder, AppError::Mutation, "Failed to remove menu item")
            .await?;
        Ok(self.relist(self.list_menu_items(session), "Menu items").await)
    }

    async fn add_category(
        &self,
        session: &Session,
        category: &NewCategory,
    ) -> Result<Option<Vec<Category>>, AppError> {
        let builder = self
            .request(Method::POST, &["api", "categories"], session)?
            .json(category);
        self.send(builder, AppError::Mutation, "Failed to add category")
            .await?;
        Ok(self.relist(self.list_categories(session), "Categories").await)
    }

    async fn remove_category(
        &self,
        session: &Session,
        category_id: &str,
    ) -> Result<Option<Vec<Category>>, AppError> {
        let builder =
            self.request(Method::DELETE, &["api", "categories", category_id], session)?;
        self.send(builder, AppError::Mutation, "Failed to remove category")
            .await?;
        Ok(self.relist(self.list_categories(session), "Categories").await)
    }
}
