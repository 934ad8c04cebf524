//! In-memory credential store for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};

pub struct InMemoryUserRepository {
    users: DashMap<i32, User>,
    /// email -> user id; also serializes concurrent signups for one address
    emails: DashMap<String, i32>,
    user_counter: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            user_counter: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Drop a user row, leaving any issued tokens pointing at nothing
    pub fn remove_user(&self, id: i32) -> Option<User> {
        let (_, user) = self.users.remove(&id)?;
        self.emails.remove(&user.email);
        Some(user)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user_with_credit(&self, dto: CreateUserDto) -> DomainResult<User> {
        match self.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "email {} already registered",
                dto.email
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let id = self.user_counter.fetch_add(1, Ordering::SeqCst);
                let user = User {
                    id,
                    email: dto.email,
                    password_hash: dto.password_hash,
                    credit: dto.credit,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(id);
                self.users.insert(id, user.clone());
                Ok(user)
            }
        }
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_credit(&self, user_id: i32) -> DomainResult<Option<i64>> {
        Ok(self.users.get(&user_id).map(|u| u.credit))
    }
}
