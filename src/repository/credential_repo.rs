//! Credential store (用户凭据访问层)
//!
//! 目前只有固定的内存表实现；换成数据库时调用方无需改动。

use crate::{
    error::AppError,
    models::user::{CredentialRecord, Role},
};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// 凭据存储接口
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 根据用户名查找凭据
    async fn find(&self, username: &str) -> Result<Option<CredentialRecord>, AppError>;

    /// 列出全部凭据，按用户名排序
    async fn list(&self) -> Result<Vec<CredentialRecord>, AppError>;
}

/// 固定内存表，启动时构建，之后只读
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    records: BTreeMap<String, CredentialRecord>,
}

impl StaticCredentialStore {
    /// 以用户名为键构建；重复用户名以后者为准
    pub fn new(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();
        Self { records }
    }

    /// 预置目录
    pub fn seeded() -> Self {
        Self::new([
            CredentialRecord {
                username: "Ronald_Reagan".to_string(),
                password_hash: "$2b$12$EixZaYVK1fsbw1ZfbX3OXePaWxn96p36WQoeG6Lruj3vjPGga31lW"
                    .to_string(),
                phone: "231-44-956".to_string(),
                email: "reagan@example.com".to_string(),
                role: Role::Admin,
            },
            CredentialRecord {
                username: "Jimmy_Carter".to_string(),
                password_hash: "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewdBPj4fYw9iS9G6"
                    .to_string(),
                phone: "231-12-888".to_string(),
                email: "carter@example.com".to_string(),
                role: Role::User,
            },
        ])
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn find(&self, username: &str) -> Result<Option<CredentialRecord>, AppError> {
        Ok(self.records.get(username).cloned())
    }

    async fn list(&self) -> Result<Vec<CredentialRecord>, AppError> {
        Ok(self.records.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_directory() {
        let store = StaticCredentialStore::seeded();
        assert_eq!(store.list().await.unwrap().len(), 2);

        let reagan = store.find("Ronald_Reagan").await.unwrap().unwrap();
        assert_eq!(reagan.role, Role::Admin);
        assert_eq!(reagan.email, "reagan@example.com");

        let carter = store.find("Jimmy_Carter").await.unwrap().unwrap();
        assert_eq!(carter.role, Role::User);
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let store = StaticCredentialStore::seeded();
        assert!(store.find("Jimmy Carter").await.unwrap().is_none());
        assert!(store.find("ronald_reagan").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_username() {
        let store = StaticCredentialStore::seeded();
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.username)
            .collect();
        assert_eq!(names, vec!["Jimmy_Carter", "Ronald_Reagan"]);
    }
}
