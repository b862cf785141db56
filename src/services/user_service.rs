use std::sync::Arc;
use uuid::Uuid;

use crate::api::{CreateUserRequest, ListQuery, UpdateUserRequest};
use crate::database::models::{NewUser, User};
use crate::database::{DatabaseError, Page, Repository, Scope};

pub struct UserService {
    repository: Arc<dyn Repository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, scope: Scope, query: ListQuery) -> Result<Vec<User>, DatabaseError> {
        let page = Page::resolve(query.limit, query.offset);
        self.repository.list_users(scope, page).await
    }

    pub async fn select_404(&self, scope: Scope, id: Uuid) -> Result<User, DatabaseError> {
        self.repository.get_user(scope, id).await
    }

    pub async fn create_one(&self, request: CreateUserRequest) -> Result<Uuid, DatabaseError> {
        self.repository
            .create_user(NewUser {
                id: Uuid::new_v4(),
                store_id: request.store_id,
                name: request.name,
                email: request.email,
                employee_number: request.employee_number,
                gender: request.gender,
            })
            .await
    }

    /// Fetch within scope, overwrite the fields present in the request, persist
    pub async fn update_404(
        &self,
        scope: Scope,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, DatabaseError> {
        let mut user = self.repository.get_user(scope, id).await?;

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email {
            user.email = email;
        }
        if let Some(employee_number) = request.employee_number {
            user.employee_number = employee_number;
        }
        if let Some(gender) = request.gender {
            user.gender = gender.map(|g| g.as_str().to_string());
        }

        self.repository.update_user(scope, user).await
    }

    pub async fn delete_404(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError> {
        self.repository.delete_user(scope, id).await
    }
}
