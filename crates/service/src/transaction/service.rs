use std::sync::Arc;

use models::enums::Status;
use tracing::{debug, info, instrument};

use super::domain::{TransactionInput, TransactionView};
use super::repository::TransactionRepository;
use crate::errors::ServiceError;
use crate::ids::parse_id;
use crate::notify::{send_best_effort, EmailMessage, Mailer};
use crate::populate::UserContact;

const RESOURCE: &str = "transaction";

pub struct TransactionService<R: TransactionRepository + ?Sized, M: Mailer + ?Sized> {
    repo: Arc<R>,
    mailer: Arc<M>,
}

fn created_email(to: &UserContact, tx: &TransactionView) -> EmailMessage {
    let products = tx.product.iter().map(|p| p.product_name.as_str()).collect::<Vec<_>>().join(", ");
    EmailMessage {
        to: to.email.clone(),
        subject: "Your transaction has been created".into(),
        body: format!(
            "Hi {}, your transaction {} dated {} was received and is {}. Products: {}.",
            to.name,
            tx.id,
            tx.date.date_naive(),
            tx.status.as_str(),
            if products.is_empty() { "none" } else { products.as_str() },
        ),
    }
}

fn status_changed_email(to: &UserContact, tx: &TransactionView, previous: Status) -> EmailMessage {
    EmailMessage {
        to: to.email.clone(),
        subject: format!("Your transaction is now {}", tx.status.as_str()),
        body: format!(
            "Hi {}, the status of transaction {} changed from {} to {}.",
            to.name,
            tx.id,
            previous.as_str(),
            tx.status.as_str()
        ),
    }
}

impl<R: TransactionRepository + ?Sized, M: Mailer + ?Sized> TransactionService<R, M> {
    pub fn new(repo: Arc<R>, mailer: Arc<M>) -> Self { Self { repo, mailer } }

    async fn notify(&self, contact: &UserContact, message: EmailMessage) {
        if contact.email.trim().is_empty() {
            debug!(user_id = %contact.id, "user has no email address; notification skipped");
            return;
        }
        send_best_effort(self.mailer.as_ref(), message).await;
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TransactionView>, ServiceError> {
        let rows = self.repo.list().await?;
        common::metrics::record_crud(RESOURCE, "list");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<TransactionView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let row = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Transaction", id))?;
        common::metrics::record_crud(RESOURCE, "get");
        Ok(row)
    }

    /// Insert a pending transaction and email its owner.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: TransactionInput) -> Result<TransactionView, ServiceError> {
        let new = input.into_new()?;
        let contact = self
            .repo
            .user_contact(new.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", new.user_id))?;
        let created = self.repo.insert(new).await?;
        common::metrics::record_crud(RESOURCE, "create");
        info!(transaction_id = %created.id, user_id = %contact.id, products = created.product.len(), "transaction created");
        self.notify(&contact, created_email(&contact, &created)).await;
        Ok(created)
    }

    /// Apply changes; a status transition emails the owner.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: TransactionInput) -> Result<TransactionView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let before = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Transaction", id))?;
        let changes = input.into_changes()?;
        if let Some(user_id) = changes.user_id {
            if self.repo.user_contact(user_id).await?.is_none() {
                return Err(ServiceError::not_found("User", user_id));
            }
        }
        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Transaction", id))?;
        common::metrics::record_crud(RESOURCE, "update");
        info!(transaction_id = %id, status = updated.status.as_str(), "transaction updated");

        if updated.status != before.status {
            if let Some(user) = &updated.user {
                if let Some(contact) = self.repo.user_contact(user.id).await? {
                    self.notify(&contact, status_changed_email(&contact, &updated, before.status)).await;
                }
            }
        }
        Ok(updated)
    }

    /// Removes the transaction plus its comments; returns the transaction as it was.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<TransactionView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let existing = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Transaction", id))?;
        let comments_removed = self.repo.delete_cascade(id).await?;
        common::metrics::record_crud(RESOURCE, "delete");
        info!(transaction_id = %id, comments_removed, "transaction deleted");
        Ok(existing)
    }
}
