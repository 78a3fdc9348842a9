use async_trait::async_trait;
use reqwest::Method;

use crate::{
    api::RestBackend,
    app_error::AppError,
    models::Table,
    normalize,
    session::Session,
    tables::{Booking, NewTable},
};

/// Dining tables and their bookings. Every mutation answers with the fresh
/// list, or `None` when it was applied but the list could not be reloaded.
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn list_tables(&self, session: &Session) -> Result<Vec<Table>, AppError>;

    async fn add_table(
        &self,
        session: &Session,
        table: &NewTable,
    ) -> Result<Option<Vec<Table>>, AppError>;

    async fn remove_table(
        &self,
        session: &Session,
        table_id: &str,
    ) -> Result<Option<Vec<Table>>, AppError>;

    async fn book_table(
        &self,
        session: &Session,
        table_id: &str,
        booking: &Booking,
    ) -> Result<Option<Vec<Table>>, AppError>;

    async fn unbook_table(
        &self,
        session: &Session,
        table_id: &str,
    ) -> Result<Option<Vec<Table>>, AppError>;
}

#[async_trait]
impl TableApi for RestBackend {
    async fn list_tables(&self, session: &Session) -> Result<Vec<Table>, AppError> {
        let value = self
            .get(&["api", "tables"], session, "Failed to load tables")
            .await?;
        Ok(normalize::tables(value))
    }

    async fn add_table(
        &self,
        session: &Session,
        table: &NewTable,
    ) -> Result<Option<Vec<Table>>, AppError> {
        let builder = self
            .request(Method::POST, &["api", "tables"], session)?
            .json(table);
        self.send(builder, AppError::Mutation, "Failed to add table")
            .await?;
        Ok(self.relist(self.list_tables(session), "Tables").await)
    }

    async fn remove_table(
        &self,
        session: &Session,
        table_id: &str,
    ) -> Result<Option<Vec<Table>>, AppError> {
        let builder = self.request(Method::DELETE, &["api", "tables", table_id], session)?;
        self.send(builder, AppError::Mutation, "Failed to remove table")
            .await?;
        Ok(self.relist(self.list_tables(session), "Tables").await)
    }

    async fn book_table(
        &self,
        session: &Session,
        table_id: &str,
        booking: &Booking,
    ) -> Result<Option<Vec<Table>>, AppError> {
        let builder = self
            .request(Method::POST, &["api", "bookings", table_id], session)?
            .json(booking);
        self.send(builder, AppError::Mutation, "Failed to book table")
            .await?;
        Ok(self.relist(self.list_tables(session), "Tables").await)
    }

    async fn unbook_table(
        &self,
        session: &Session,
        table_id: &str,
    ) -> Result<Option<Vec<Table>>, AppError> {
        let builder = self.request(Method::DELETE, &["api", "bookings", table_id], session)?;
        self.send(builder, AppError::Mutation, "Failed to free table")
            .await?;
        Ok(self.relist(self.list_tables(session), "Tables").await)
    }
}
