//! 管理员账户
//!
//! 账户来自配置 (ADMIN_USERNAME / ADMIN_PASSWORD)，密码只以 argon2 哈希形式保存在内存中。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::permissions::get_default_permissions;

/// 管理员账户
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
    hash_pass: String,
}

impl AdminAccount {
    /// 创建账户并哈希密码
    pub fn new(
        id: i64,
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self {
            id,
            username: username.into(),
            role: "admin".to_string(),
            permissions: get_default_permissions("admin"),
            hash_pass: Self::hash_password(password)?,
        })
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        verify_hash(&self.hash_pass, password)
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    pub fn to_user_info(&self) -> shared::client::UserInfo {
        shared::client::UserInfo {
            id: self.id,
            username: self.username.clone(),
            role: self.role.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

fn verify_hash(hash: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 账户目录
///
/// 持有一个占位哈希：用户名不存在时也做一次 argon2 校验，
/// 使响应耗时与密码错误一致。
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    accounts: Vec<AdminAccount>,
    dummy_hash: String,
}

impl AccountDirectory {
    pub fn new(accounts: Vec<AdminAccount>) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self {
            accounts,
            dummy_hash: AdminAccount::hash_password("meja-placeholder")?,
        })
    }

    /// 校验用户名和密码，成功时返回账户
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<&AdminAccount>, argon2::password_hash::Error> {
        match self.find_by_username(username) {
            Some(account) => Ok(account.verify_password(password)?.then_some(account)),
            None => {
                verify_hash(&self.dummy_hash, password)?;
                Ok(None)
            }
        }
    }

    /// 按用户名查找
    pub fn find_by_username(&self, username: &str) -> Option<&AdminAccount> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// 按 ID 查找
    pub fn find_by_id(&self, id: i64) -> Option<&AdminAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }
}
