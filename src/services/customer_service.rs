use std::sync::Arc;
use uuid::Uuid;

use crate::api::{CreateCustomerRequest, ListQuery, UpdateCustomerRequest};
use crate::database::models::{Customer, NewCustomer};
use crate::database::{DatabaseError, Page, Repository, Scope};

pub struct CustomerService {
    repository: Arc<dyn Repository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, scope: Scope, query: ListQuery) -> Result<Vec<Customer>, DatabaseError> {
        let page = Page::resolve(query.limit, query.offset);
        self.repository.list_customers(scope, page).await
    }

    pub async fn select_404(&self, scope: Scope, id: Uuid) -> Result<Customer, DatabaseError> {
        self.repository.get_customer(scope, id).await
    }

    pub async fn create_one(&self, request: CreateCustomerRequest) -> Result<Uuid, DatabaseError> {
        self.repository
            .create_customer(NewCustomer {
                id: Uuid::new_v4(),
                tenant_id: request.tenant_id,
                name: request.name,
                email: request.email,
                phone_number: request.phone_number,
                address: request.address,
            })
            .await
    }

    pub async fn update_404(
        &self,
        scope: Scope,
        id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<Customer, DatabaseError> {
        let mut customer = self.repository.get_customer(scope, id).await?;

        if let Some(name) = request.name {
            customer.name = name;
        }
        if let Some(email) = request.email {
            customer.email = email;
        }
        if let Some(phone_number) = request.phone_number {
            customer.phone_number = phone_number;
        }
        if let Some(address) = request.address {
            customer.address = address;
        }

        self.repository.update_customer(scope, customer).await
    }

    pub async fn delete_404(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError> {
        self.repository.delete_customer(scope, id).await
    }
}
